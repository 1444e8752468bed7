//! Variable bindings produced by pattern matching
//!
//! A `Context` maps variable names to the values they captured while a
//! pattern was matched against a concrete fact. Contexts are value types
//! with structural equality, ordering, and hashing, so activations built
//! from them dedupe correctly inside sets.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// An ordered mapping from variable name to bound [`Value`].
///
/// Iteration order is the lexicographic order of the variable names, which
/// keeps every derived artifact (activation equality, display, firing
/// arguments) deterministic for a given working-memory state.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    bindings: BTreeMap<String, Value>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bindings held.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if no variables are bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Look up the value bound to a variable name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Check whether a variable name is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Bind a variable to a value, replacing any previous binding for the
    /// same name.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.bindings.insert(name.into(), value.into());
        self
    }

    /// Merge another context into this one.
    ///
    /// On a name collision the incoming binding overwrites the existing one.
    /// Last-write-wins is the defined merge semantics throughout the
    /// matcher: when two conditions of the same rule bind the same variable
    /// to different values, the binding of the later condition (in
    /// declaration order) survives. This is a documented quirk inherited
    /// from the combination order, not an error.
    pub fn merge(&mut self, other: &Context) -> &mut Self {
        for (name, value) in &other.bindings {
            self.bindings.insert(name.clone(), value.clone());
        }
        self
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl FromIterator<(String, Value)> for Context {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(pairs: I) -> Self {
        Self {
            bindings: pairs.into_iter().collect(),
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (index, (name, value)) in self.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, "}}")
    }
}
