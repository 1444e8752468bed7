//! Facts, fact identifiers, and the patterns that match them
//!
//! A [`Fact`] is an immutable record of named attribute values. Once stored
//! in a working memory it is addressed by a stable [`FactId`]. The
//! distinguished [`Fact::Initial`] sentinel is always present in a working
//! memory (conventionally at id 0) and anchors matches that are not tied to
//! any concrete fact, such as satisfied negations and rules declared without
//! conditions.
//!
//! A [`Pattern`] is the leaf conditional element: a set of per-attribute
//! [`Term`] constraints matched against a single fact. Matching uses subset
//! semantics — every constrained attribute must be present and accepted,
//! attributes the pattern does not mention are ignored.

use crate::context::Context;
use crate::term::Term;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable identifier of a fact within a working memory.
///
/// Identifiers are assigned by the store in insertion order and never reused
/// while the store lives.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct FactId(
    /// Raw insertion index within the store
    pub u64,
);

impl fmt::Display for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// An immutable record stored in working memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fact {
    /// The always-present sentinel fact
    Initial,
    /// An ordinary record of named attribute values
    Tuple(BTreeMap<String, Value>),
}

impl Fact {
    /// The sentinel fact.
    pub fn initial() -> Self {
        Fact::Initial
    }

    /// Create an empty tuple fact; attach attributes with [`Fact::with`].
    pub fn new() -> Self {
        Fact::Tuple(BTreeMap::new())
    }

    /// Builder-style attribute assignment.
    ///
    /// Attaching an attribute to the sentinel turns it into a tuple; the
    /// sentinel itself carries no data.
    pub fn with(self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut values = match self {
            Fact::Initial => BTreeMap::new(),
            Fact::Tuple(values) => values,
        };
        values.insert(attribute.into(), value.into());
        Fact::Tuple(values)
    }

    /// Check if this is the sentinel fact.
    pub fn is_initial(&self) -> bool {
        matches!(self, Fact::Initial)
    }

    /// Look up an attribute value. The sentinel has no attributes.
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        match self {
            Fact::Initial => None,
            Fact::Tuple(values) => values.get(attribute),
        }
    }
}

impl Default for Fact {
    fn default() -> Self {
        Fact::new()
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fact::Initial => write!(f, "InitialFact"),
            Fact::Tuple(values) => {
                write!(f, "Fact(")?;
                for (index, (attribute, value)) in values.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{attribute}: {value}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// The leaf conditional element: per-attribute constraints over one fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pattern {
    /// Matches only the sentinel fact
    Initial,
    /// Matches any fact whose attributes satisfy every listed term
    Fact(BTreeMap<String, Term>),
}

impl Pattern {
    /// A pattern matching only the sentinel fact.
    pub fn initial() -> Self {
        Pattern::Initial
    }

    /// An unconstrained fact pattern; add constraints with [`Pattern::with`].
    pub fn new() -> Self {
        Pattern::Fact(BTreeMap::new())
    }

    /// Builder-style constraint assignment.
    pub fn with(self, attribute: impl Into<String>, term: impl Into<Term>) -> Self {
        let mut terms = match self {
            Pattern::Initial => BTreeMap::new(),
            Pattern::Fact(terms) => terms,
        };
        terms.insert(attribute.into(), term.into());
        Pattern::Fact(terms)
    }

    /// Match this pattern against a single fact.
    ///
    /// Returns the captured bindings when every constraint is satisfied, or
    /// `None` when the fact does not match. Named variables bind the matched
    /// value under the variable name; constant terms record it under the
    /// attribute's own name, so consequences see which literal matched;
    /// blank variables bind nothing.
    ///
    /// [`Pattern::Initial`] matches only [`Fact::Initial`]. A fact pattern
    /// with no constraints matches every fact, the sentinel included, and
    /// produces an empty context.
    pub fn matches(&self, fact: &Fact) -> Option<Context> {
        match self {
            Pattern::Initial => fact.is_initial().then(Context::new),
            Pattern::Fact(terms) => {
                let mut context = Context::new();
                for (attribute, term) in terms {
                    let value = fact.get(attribute)?;
                    if !term.accepts(value) {
                        return None;
                    }
                    match term {
                        Term::Variable { name: Some(name) } => {
                            context.bind(name.clone(), value.clone());
                        }
                        Term::Variable { name: None } => {}
                        Term::Constant(_) => {
                            context.bind(attribute.clone(), value.clone());
                        }
                    }
                }
                Some(context)
            }
        }
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Pattern::new()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Initial => write!(f, "InitialFact()"),
            Pattern::Fact(terms) => {
                write!(f, "Pattern(")?;
                for (index, (attribute, term)) in terms.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{attribute}: {term}")?;
                }
                write!(f, ")")
            }
        }
    }
}
