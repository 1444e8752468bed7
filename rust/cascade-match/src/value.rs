//! Scalar values stored in facts and bound to variables
//!
//! `Value` is the dynamic scalar type flowing through the matcher: fact
//! attributes hold values, constant terms compare against them, and variable
//! bindings capture them into a [`crate::Context`].
//!
//! Values participate in set-based deduplication of activations, so the type
//! carries a *total* order and a hash that agree with each other. Floats are
//! compared by their IEEE-754 bit pattern (`f64::total_cmp`), which makes
//! `NaN` well-behaved inside ordered collections at the cost of `-0.0` and
//! `+0.0` being distinct. That trade is deliberate: matching must never
//! panic or lose activations because a fact carried an odd float.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A dynamically typed scalar value.
///
/// # JSON serialization
/// Values serialize untagged, as plain JSON scalars: `true`, `42`, `-7`,
/// `3.5`, `"red"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean flag
    Boolean(bool),
    /// An unsigned 64-bit integer
    UnsignedInt(u64),
    /// A signed 64-bit integer
    SignedInt(i64),
    /// A 64-bit IEEE-754 float
    Float(f64),
    /// A UTF-8 string
    String(String),
}

impl Value {
    /// Ordering rank of the variant, used to totally order values of
    /// different kinds. Values only compare equal within the same kind.
    fn rank(&self) -> u8 {
        match self {
            Value::Boolean(_) => 0,
            Value::UnsignedInt(_) => 1,
            Value::SignedInt(_) => 2,
            Value::Float(_) => 3,
            Value::String(_) => 4,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::UnsignedInt(a), Value::UnsignedInt(b)) => a.cmp(b),
            (Value::SignedInt(a), Value::SignedInt(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(self.rank());
        match self {
            Value::Boolean(flag) => flag.hash(state),
            Value::UnsignedInt(number) => number.hash(state),
            Value::SignedInt(number) => number.hash(state),
            // Bit pattern keeps Hash consistent with total_cmp equality.
            Value::Float(number) => state.write_u64(number.to_bits()),
            Value::String(text) => text.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(flag) => write!(f, "{flag}"),
            Value::UnsignedInt(number) => write!(f, "{number}"),
            Value::SignedInt(number) => write!(f, "{number}"),
            Value::Float(number) => write!(f, "{number}"),
            Value::String(text) => write!(f, "{text:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Boolean(flag)
    }
}

impl From<u64> for Value {
    fn from(number: u64) -> Self {
        Value::UnsignedInt(number)
    }
}

impl From<u32> for Value {
    fn from(number: u32) -> Self {
        Value::UnsignedInt(number as u64)
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Value::SignedInt(number)
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Value::SignedInt(number as i64)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Value::Float(number)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::String(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::String(text)
    }
}
