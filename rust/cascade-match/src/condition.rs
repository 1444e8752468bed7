//! The conditional-element algebra and its evaluator
//!
//! A rule's preconditions are composed from a closed set of conditional
//! elements: leaf fact [`Pattern`]s and the `And` / `Or` / `Not`
//! combinators. Evaluation is synchronous and depth-first: a condition is
//! evaluated against a working memory and yields the deduplicated set of
//! [`Activation`]s currently satisfying it. There is no incremental
//! re-matching; every call recomputes from the store's current state.
//!
//! The combination semantics are deliberately precise:
//!
//! - **Conjunction** computes the Cartesian product across the per-child
//!   candidate lists and emits one activation per combination, with
//!   short-circuit failure as soon as any child has no candidates.
//! - **Disjunction** aggregates: one activation listing every matched fact
//!   across all children, propagating no bindings outward. The binding
//!   asymmetry against conjunction is intentional and preserved; OR signals
//!   only "something matched", not which alternative with what bindings.
//! - **Negation** holds exactly when its children (combined as a
//!   conjunction) have no activation, and anchors its single activation to
//!   the sentinel fact since there is no concrete fact to point to.

use crate::activation::Activation;
use crate::context::Context;
use crate::error::MatchResult;
use crate::fact::{FactId, Pattern};
use crate::memory::WorkingMemory;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, trace};

/// A composable unit of rule preconditions.
///
/// The variants form a closed algebra; the evaluator dispatches over them
/// exhaustively rather than inspecting types at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    /// Leaf condition: match a single fact against a pattern
    Pattern(Pattern),
    /// All children must hold simultaneously
    And(Vec<Condition>),
    /// Any child holding is sufficient
    Or(Vec<Condition>),
    /// Holds precisely when the wrapped conjunction has no match
    Not(Vec<Condition>),
}

impl Condition {
    /// A leaf pattern condition.
    pub fn pattern(pattern: Pattern) -> Self {
        Condition::Pattern(pattern)
    }

    /// A conjunction over the given children.
    pub fn and(conditions: Vec<Condition>) -> Self {
        Condition::And(non_empty(conditions))
    }

    /// A disjunction over the given children.
    pub fn or(conditions: Vec<Condition>) -> Self {
        Condition::Or(non_empty(conditions))
    }

    /// A negation of the conjunction of the given children.
    pub fn not(conditions: Vec<Condition>) -> Self {
        Condition::Not(non_empty(conditions))
    }

    /// Evaluate this condition against a working memory.
    ///
    /// `rule` names the rule driving the evaluation; it is stamped onto
    /// every produced activation and passed through to the store for
    /// diagnostics. The result is deduplicated by structural equality and
    /// deterministic for an unchanged store.
    pub fn get_activations<M: WorkingMemory>(
        &self,
        memory: &M,
        rule: &str,
    ) -> MatchResult<BTreeSet<Activation>> {
        match self {
            Condition::Pattern(_) => conjunction(std::slice::from_ref(self), memory, rule),
            Condition::And(conditions) => conjunction(conditions, memory, rule),
            Condition::Or(conditions) => disjunction(conditions, memory, rule),
            Condition::Not(conditions) => negation(conditions, memory, rule),
        }
    }

    /// The `(FactId, Context)` pairs this condition could bind to, used as
    /// one dimension of a parent combination.
    ///
    /// Leaf patterns delegate to the store directly. A composite child is
    /// evaluated recursively and its activations are flattened into
    /// single-fact slots; a fact missing its context degrades to an empty
    /// binding instead of failing the match.
    fn candidates<M: WorkingMemory>(
        &self,
        memory: &M,
        rule: &str,
    ) -> MatchResult<Vec<(FactId, Context)>> {
        match self {
            Condition::Pattern(pattern) => memory.matches(pattern, rule),
            composite => {
                let activations = composite.get_activations(memory, rule)?;
                let mut slots = Vec::new();
                for activation in &activations {
                    for id in activation.facts() {
                        let context = activation.context_for(*id).cloned().unwrap_or_default();
                        slots.push((*id, context));
                    }
                }
                Ok(slots)
            }
        }
    }
}

/// Constructing a composite with no children installs the sentinel pattern,
/// so every condition matches at least the sentinel state when otherwise
/// unconstrained.
///
/// The helper constructors normalize eagerly; the evaluator normalizes
/// again (see [`normalized`]) because the variants are public and
/// deserializable, so a tree built without the constructors can still carry
/// an empty child list.
fn non_empty(conditions: Vec<Condition>) -> Vec<Condition> {
    if conditions.is_empty() {
        vec![Condition::Pattern(Pattern::initial())]
    } else {
        conditions
    }
}

/// Evaluation-time rendering of the never-empty invariant: an empty child
/// list collapses to the sentinel pattern.
fn normalized<'a>(conditions: &'a [Condition], sentinel: &'a [Condition; 1]) -> &'a [Condition] {
    if conditions.is_empty() {
        sentinel
    } else {
        conditions
    }
}

/// Conjunctive combination: all conditions must simultaneously hold.
///
/// Also the evaluation of a bare rule body, which behaves as an implicit
/// `And` over its conditions.
pub(crate) fn conjunction<M: WorkingMemory>(
    conditions: &[Condition],
    memory: &M,
    rule: &str,
) -> MatchResult<BTreeSet<Activation>> {
    let sentinel = [Condition::Pattern(Pattern::initial())];
    let conditions = normalized(conditions, &sentinel);

    let mut dimensions: Vec<Vec<(FactId, Context)>> = Vec::with_capacity(conditions.len());
    for condition in conditions {
        let candidates = condition.candidates(memory, rule)?;
        if candidates.is_empty() {
            // All-or-nothing: one unsatisfied child fails the whole
            // conjunction without evaluating the rest.
            debug!(rule, condition = %condition, "conjunction short-circuited");
            return Ok(BTreeSet::new());
        }
        trace!(rule, condition = %condition, count = candidates.len(), "collected candidates");
        dimensions.push(candidates);
    }

    let mut activations = BTreeSet::new();
    for selection in CartesianProduct::new(&dimensions) {
        // One context per involved fact; selecting the same fact for two
        // conditions keeps the later condition's bindings.
        let mut combined: BTreeMap<FactId, Context> = BTreeMap::new();
        for (id, context) in selection {
            combined.insert(*id, context.clone());
        }
        if combined.is_empty() {
            continue;
        }

        let facts: Vec<FactId> = combined.keys().copied().collect();
        let contexts: Vec<(FactId, Context)> = combined.into_iter().collect();
        activations.insert(Activation::new(rule, facts, contexts));
    }

    debug!(rule, count = activations.len(), "conjunction evaluated");
    Ok(activations)
}

/// Disjunctive combination: aggregate every match across all children into
/// at most one activation, with no outward bindings.
fn disjunction<M: WorkingMemory>(
    conditions: &[Condition],
    memory: &M,
    rule: &str,
) -> MatchResult<BTreeSet<Activation>> {
    let sentinel = [Condition::Pattern(Pattern::initial())];
    let conditions = normalized(conditions, &sentinel);

    let mut matched: Vec<(FactId, Context)> = Vec::new();
    for condition in conditions {
        matched.extend(condition.candidates(memory, rule)?);
    }

    if matched.is_empty() {
        debug!(rule, "disjunction found no match");
        return Ok(BTreeSet::new());
    }

    // Duplicates are permitted and order is accumulation order; bindings
    // are dropped by design.
    let facts: Vec<FactId> = matched.into_iter().map(|(id, _)| id).collect();
    debug!(rule, count = facts.len(), "disjunction matched");
    Ok(BTreeSet::from([Activation::new(rule, facts, Vec::new())]))
}

/// Negation as failure: succeed only when the wrapped conjunction has no
/// activation, anchoring the result to the sentinel fact.
fn negation<M: WorkingMemory>(
    conditions: &[Condition],
    memory: &M,
    rule: &str,
) -> MatchResult<BTreeSet<Activation>> {
    let inner = conjunction(conditions, memory, rule)?;
    if !inner.is_empty() {
        debug!(rule, count = inner.len(), "negated condition is present");
        return Ok(BTreeSet::new());
    }

    // A store without a retrievable sentinel yields no activation rather
    // than an error.
    let sentinel = memory.matches(&Pattern::initial(), rule)?;
    match sentinel.into_iter().next() {
        Some((id, context)) => {
            debug!(rule, anchor = %id, "negation satisfied");
            Ok(BTreeSet::from([Activation::new(
                rule,
                vec![id],
                vec![(id, context)],
            )]))
        }
        None => Ok(BTreeSet::new()),
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, conditions: &[Condition]) -> fmt::Result {
            for (index, condition) in conditions.iter().enumerate() {
                if index > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{condition}")?;
            }
            Ok(())
        }

        match self {
            Condition::Pattern(pattern) => write!(f, "{pattern}"),
            Condition::And(conditions) => {
                write!(f, "AND(")?;
                list(f, conditions)?;
                write!(f, ")")
            }
            Condition::Or(conditions) => {
                write!(f, "OR(")?;
                list(f, conditions)?;
                write!(f, ")")
            }
            Condition::Not(conditions) => {
                write!(f, "NOT(")?;
                list(f, conditions)?;
                write!(f, ")")
            }
        }
    }
}

/// Odometer-style iterator over the Cartesian product of candidate lists:
/// one selection per dimension, advanced rightmost-first so the product
/// enumerates in a stable order.
struct CartesianProduct<'a, T> {
    dimensions: &'a [Vec<T>],
    indices: Vec<usize>,
    exhausted: bool,
}

impl<'a, T> CartesianProduct<'a, T> {
    fn new(dimensions: &'a [Vec<T>]) -> Self {
        Self {
            dimensions,
            indices: vec![0; dimensions.len()],
            exhausted: dimensions.iter().any(|dimension| dimension.is_empty()),
        }
    }
}

impl<'a, T> Iterator for CartesianProduct<'a, T> {
    type Item = Vec<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let selection = self
            .indices
            .iter()
            .enumerate()
            .map(|(dimension, &index)| &self.dimensions[dimension][index])
            .collect();

        // Advance the odometer; wrapping past the leftmost digit ends the
        // iteration. Zero dimensions yield exactly one empty selection.
        self.exhausted = true;
        for digit in (0..self.indices.len()).rev() {
            self.indices[digit] += 1;
            if self.indices[digit] < self.dimensions[digit].len() {
                self.exhausted = false;
                break;
            }
            self.indices[digit] = 0;
        }

        Some(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::Fact;
    use crate::memory::FactList;
    use crate::term::Term;

    fn memory_with_colors() -> FactList {
        let mut memory = FactList::new();
        memory.insert(Fact::new().with("color", "red"));
        memory.insert(Fact::new().with("color", "blue"));
        memory
    }

    #[test]
    fn test_cartesian_product_counts() {
        let dimensions = vec![vec![1, 2], vec![10, 20, 30]];
        let selections: Vec<Vec<&i32>> = CartesianProduct::new(&dimensions).collect();
        assert_eq!(selections.len(), 6);
        assert_eq!(selections[0], vec![&1, &10]);
        assert_eq!(selections[5], vec![&2, &30]);
    }

    #[test]
    fn test_cartesian_product_of_nothing_is_one_empty_selection() {
        let dimensions: Vec<Vec<i32>> = Vec::new();
        let selections: Vec<Vec<&i32>> = CartesianProduct::new(&dimensions).collect();
        assert_eq!(selections, vec![Vec::<&i32>::new()]);
    }

    #[test]
    fn test_cartesian_product_with_empty_dimension_is_empty() {
        let dimensions = vec![vec![1, 2], vec![]];
        assert_eq!(CartesianProduct::new(&dimensions).count(), 0);
    }

    #[test]
    fn test_empty_composites_install_the_sentinel_pattern() {
        let condition = Condition::and(Vec::new());
        assert_eq!(
            condition,
            Condition::And(vec![Condition::Pattern(Pattern::initial())])
        );
    }

    #[test]
    fn test_variant_constructed_empty_composites_match_the_sentinel() {
        // Bypassing the helper constructors must not bypass the never-empty
        // invariant: the evaluator normalizes an empty child list too.
        let memory = FactList::new();

        let and = Condition::And(Vec::new()).get_activations(&memory, "raw").unwrap();
        assert_eq!(and.len(), 1);
        assert_eq!(and.iter().next().unwrap().facts(), &[crate::FactId(0)]);

        let or = Condition::Or(Vec::new()).get_activations(&memory, "raw").unwrap();
        assert_eq!(or.len(), 1);

        // An empty NOT negates the sentinel match, which always succeeds
        let not = Condition::Not(Vec::new()).get_activations(&memory, "raw").unwrap();
        assert!(not.is_empty());
    }

    #[test]
    fn test_deserialized_empty_conjunction_matches_the_sentinel() {
        let memory = FactList::new();
        let condition: Condition = serde_json::from_str(r#"{"And":[]}"#).unwrap();

        let activations = condition.get_activations(&memory, "decoded").unwrap();
        assert_eq!(activations.len(), 1);
        assert_eq!(
            activations.iter().next().unwrap().facts(),
            &[crate::FactId(0)]
        );
    }

    #[test]
    fn test_leaf_pattern_produces_one_activation_per_match() {
        let memory = memory_with_colors();
        let condition = Condition::pattern(Pattern::new().with("color", Term::var("c")));

        let activations = condition.get_activations(&memory, "probe").unwrap();
        assert_eq!(activations.len(), 2);
    }

    #[test]
    fn test_nested_or_inside_and_flattens_to_slots() {
        let memory = memory_with_colors();
        let condition = Condition::and(vec![
            Condition::or(vec![
                Condition::pattern(Pattern::new().with("color", "red")),
                Condition::pattern(Pattern::new().with("color", "blue")),
            ]),
            Condition::pattern(Pattern::new().with("color", Term::var("c"))),
        ]);

        let activations = condition.get_activations(&memory, "probe").unwrap();
        // The OR contributes its matched facts as alternative slots, the
        // pattern contributes both facts: 2 x 2 combinations, deduped.
        assert_eq!(activations.len(), 4);
    }
}
