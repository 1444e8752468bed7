//! Term types for pattern matching
//!
//! A `Term` is one slot of a fact pattern: either a concrete [`Value`] the
//! fact must carry, or a variable placeholder. Named variables capture the
//! matched value into the produced [`crate::Context`]; blank variables match
//! anything without capturing.
//!
//! # JSON serialization
//! Terms serialize to different JSON forms:
//! - Named variables: `{ "?": { "name": "color" } }`
//! - Blank variables: `{ "?": {} }`
//! - Constants: plain JSON values (e.g. `"red"`, `42`, `true`)

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A constant value or variable placeholder within a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Term {
    /// A variable slot. Variables with `name: None` still match any value
    /// but do not produce a binding.
    #[serde(rename = "?")]
    Variable {
        /// Binding name, or `None` for a blank (non-capturing) variable
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },

    /// A concrete value the matched fact attribute must equal
    #[serde(untagged)]
    Constant(Value),
}

impl Term {
    /// Create a named variable term.
    pub fn var(name: impl Into<String>) -> Self {
        Term::Variable {
            name: Some(name.into()),
        }
    }

    /// Create a blank variable term that matches any value without binding.
    pub fn blank() -> Self {
        Term::Variable { name: None }
    }

    /// Create a constant term from anything convertible to a [`Value`].
    pub fn constant(value: impl Into<Value>) -> Self {
        Term::Constant(value.into())
    }

    /// Check if this term is a variable (named or blank).
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable { .. })
    }

    /// Check if this term is a blank variable.
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Variable { name: None })
    }

    /// Check if this term is a constant value.
    pub fn is_constant(&self) -> bool {
        matches!(self, Term::Constant(_))
    }

    /// The variable name, if this is a named variable term.
    pub fn name(&self) -> Option<&str> {
        match self {
            Term::Variable { name: Some(name) } => Some(name),
            _ => None,
        }
    }

    /// Check whether this term accepts the given value.
    ///
    /// Variables accept any value; constants accept only an equal value.
    /// Capturing the accepted value into a binding is the caller's concern
    /// (see [`crate::Pattern::matches`]).
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Term::Variable { .. } => true,
            Term::Constant(constant) => constant == value,
        }
    }
}

impl From<Value> for Term {
    fn from(value: Value) -> Self {
        Term::Constant(value)
    }
}

macro_rules! constant_from {
    ($($source:ty),*) => {
        $(impl From<$source> for Term {
            fn from(value: $source) -> Self {
                Term::Constant(value.into())
            }
        })*
    };
}

constant_from!(bool, u32, u64, i32, i64, f64, &str, String);

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable { name: Some(name) } => write!(f, "?{name}"),
            Term::Variable { name: None } => write!(f, "_"),
            Term::Constant(value) => write!(f, "{value}"),
        }
    }
}
