//! Activation records capturing satisfied rule matches
//!
//! An `Activation` is the transient product of one evaluation pass: which
//! rule matched, over which facts, with which variable bindings per fact.
//! Activations are consumed immediately by the conflict-resolution strategy
//! (an external collaborator) or discarded; they are never persisted.
//!
//! Equality, ordering, and hashing are explicitly structural over
//! `(rule, sorted fact ids, sorted context pairs)` so that logically
//! identical matches built along different evaluation paths collapse to a
//! single element in a set, and so that repeated passes over an unchanged
//! working memory can be deduped by the agenda.

use crate::context::Context;
use crate::fact::FactId;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A satisfied match: rule name, involved facts, and per-fact bindings.
#[derive(Debug, Clone)]
pub struct Activation {
    rule: String,
    facts: Vec<FactId>,
    contexts: Vec<(FactId, Context)>,
}

impl Activation {
    /// Create an activation.
    ///
    /// `facts` is the ordered sequence of fact ids involved in the match.
    /// Conjunctions emit sorted unique ids; disjunctions may carry
    /// duplicates in accumulation order. `contexts` pairs a fact id with
    /// the bindings produced against that fact, for each fact where a
    /// binding exists.
    pub fn new(
        rule: impl Into<String>,
        facts: Vec<FactId>,
        contexts: Vec<(FactId, Context)>,
    ) -> Self {
        Self {
            rule: rule.into(),
            facts,
            contexts,
        }
    }

    /// Name of the rule that produced this activation.
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Fact ids involved in the match, in emission order.
    pub fn facts(&self) -> &[FactId] {
        &self.facts
    }

    /// Per-fact binding pairs, in emission order.
    pub fn contexts(&self) -> &[(FactId, Context)] {
        &self.contexts
    }

    /// The bindings produced against one fact of this match.
    pub fn context_for(&self, id: FactId) -> Option<&Context> {
        self.contexts
            .iter()
            .find(|(fact, _)| *fact == id)
            .map(|(_, context)| context)
    }

    /// Merge every fact's bindings into one context, walking the facts in
    /// their recorded order. A fact without a context contributes nothing.
    /// Name collisions resolve last-write-wins, matching the combination
    /// semantics of conjunctions.
    pub fn bindings(&self) -> Context {
        let mut merged = Context::new();
        for id in &self.facts {
            if let Some(context) = self.context_for(*id) {
                merged.merge(context);
            }
        }
        merged
    }

    /// Normalized view used by the structural Eq/Ord/Hash implementations.
    fn sort_key(&self) -> (&str, Vec<FactId>, Vec<(FactId, &Context)>) {
        let mut facts = self.facts.clone();
        facts.sort_unstable();

        let mut contexts: Vec<(FactId, &Context)> = self
            .contexts
            .iter()
            .map(|(id, context)| (*id, context))
            .collect();
        contexts.sort();

        (self.rule.as_str(), facts, contexts)
    }
}

impl PartialEq for Activation {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for Activation {}

impl PartialOrd for Activation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Activation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl Hash for Activation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (rule, facts, contexts) = self.sort_key();
        rule.hash(state);
        facts.hash(state);
        contexts.hash(state);
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.rule)?;
        for (index, id) in self.facts.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{id}")?;
        }
        write!(f, ")")
    }
}
