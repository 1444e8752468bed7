//! Working-memory boundary and the reference fact store
//!
//! The matcher consumes fact storage through the narrow [`WorkingMemory`]
//! trait: enumerate the `(FactId, Context)` pairs a pattern matches, in the
//! store's own stable order. Insertion, retraction, and indexing strategies
//! live behind that seam and are not this crate's concern.
//!
//! [`FactList`] is the reference implementation: a flat insertion-ordered
//! store that installs the [`Fact::Initial`] sentinel at id 0 on
//! construction, mirroring the guarantee every conforming store must give.

use crate::context::Context;
use crate::error::{MatchError, MatchResult};
use crate::fact::{Fact, FactId, Pattern};
use tracing::trace;

/// Read-only matching interface the evaluator drives.
///
/// Implementations must guarantee:
/// - enumeration order is stable for an unchanged store (insertion order by
///   convention), so activation enumeration stays deterministic;
/// - a sentinel [`Fact::Initial`] entry is retrievable at all times via
///   [`Pattern::initial`];
/// - a typed [`MatchError`] is raised when the store cannot honor a match
///   request, rather than returning misleading results.
///
/// The name of the rule driving the evaluation is passed explicitly with
/// every call. It exists for diagnostics and store-side tracing only and
/// must not influence match results.
pub trait WorkingMemory {
    /// All facts currently matching `pattern`, paired with the variable
    /// bindings the pattern produced against each fact.
    ///
    /// An empty result means the condition is currently unsatisfied.
    fn matches(&self, pattern: &Pattern, rule: &str) -> MatchResult<Vec<(FactId, Context)>>;
}

/// Insertion-ordered reference fact store.
///
/// Fact ids are indices into the insertion sequence; the sentinel occupies
/// id 0 from construction, so the store is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactList {
    facts: Vec<Fact>,
}

impl FactList {
    /// Create a store holding only the sentinel fact.
    pub fn new() -> Self {
        Self {
            facts: vec![Fact::Initial],
        }
    }

    /// Store a fact, returning its stable id.
    pub fn insert(&mut self, fact: Fact) -> FactId {
        let id = FactId(self.facts.len() as u64);
        self.facts.push(fact);
        id
    }

    /// Look up a fact by id.
    pub fn get(&self, id: FactId) -> Option<&Fact> {
        self.facts.get(id.0 as usize)
    }

    /// Number of stored facts, sentinel included.
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// A `FactList` is never empty; the sentinel is always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over `(id, fact)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (FactId, &Fact)> {
        self.facts
            .iter()
            .enumerate()
            .map(|(index, fact)| (FactId(index as u64), fact))
    }
}

impl Default for FactList {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkingMemory for FactList {
    fn matches(&self, pattern: &Pattern, rule: &str) -> MatchResult<Vec<(FactId, Context)>> {
        if self.facts.is_empty() || !self.facts[0].is_initial() {
            return Err(MatchError::InvalidStore {
                reason: "sentinel fact is missing from slot 0".to_string(),
            });
        }

        let matched: Vec<(FactId, Context)> = self
            .iter()
            .filter_map(|(id, fact)| pattern.matches(fact).map(|context| (id, context)))
            .collect();

        trace!(rule, %pattern, count = matched.len(), "pattern matched");
        Ok(matched)
    }
}

impl FromIterator<Fact> for FactList {
    fn from_iter<I: IntoIterator<Item = Fact>>(facts: I) -> Self {
        let mut list = Self::new();
        for fact in facts {
            list.insert(fact);
        }
        list
    }
}
