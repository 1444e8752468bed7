//! Cascade matching core
//!
//! The matching half of a forward-chaining production-rule engine: given a
//! working memory of facts and rules composed from declarative conditional
//! elements, determine which rules currently have satisfied preconditions
//! and produce the [`Activation`]s — facts plus variable bindings — needed
//! to fire them.
//!
//! The algebra is small and closed: leaf fact [`Pattern`]s combined with
//! `And` / `Or` / `Not` under [`Condition`], evaluated synchronously and
//! depth-first by full re-evaluation against the store's current state.
//! Conflict resolution (agenda ordering by [`RuleDefinition::salience`]),
//! fact insertion and indexing, and schema validation are external
//! collaborators reached only through the narrow [`WorkingMemory`] seam.
//!
//! ```
//! use cascade_match::{Condition, Fact, FactList, Pattern, RuleDefinition, Term};
//!
//! let mut memory = FactList::new();
//! memory.insert(Fact::new().with("color", "red"));
//!
//! let rule = RuleDefinition::new(
//!     "spot-red",
//!     vec![Condition::pattern(Pattern::new().with("color", Term::var("c")))],
//! );
//!
//! let activations = rule.get_activations(&memory)?;
//! assert_eq!(activations.len(), 1);
//! # Ok::<(), cascade_match::MatchError>(())
//! ```

#![warn(missing_docs)]

/// Activation records capturing satisfied rule matches.
pub mod activation;
/// The conditional-element algebra and its evaluator.
pub mod condition;
/// Variable bindings produced by pattern matching.
pub mod context;
/// Error types for the matching core.
pub mod error;
/// Facts, fact identifiers, and the patterns that match them.
pub mod fact;
/// Working-memory boundary and the reference fact store.
pub mod memory;
/// Rule definitions, consequence binding, and firing.
pub mod rule;
/// Term types for pattern matching.
pub mod term;
/// Scalar values stored in facts and bound to variables.
pub mod value;

pub use activation::Activation;
pub use condition::Condition;
pub use context::Context;
pub use error::{MatchError, MatchResult, RuleError};
pub use fact::{Fact, FactId, Pattern};
pub use memory::{FactList, WorkingMemory};
pub use rule::{BoundRule, Consequence, Fireable, RuleDefinition};
pub use term::Term;
pub use value::Value;

/// Re-export of the commonly used types.
pub mod prelude {
    pub use crate::activation::Activation;
    pub use crate::condition::Condition;
    pub use crate::context::Context;
    pub use crate::error::{MatchError, MatchResult, RuleError};
    pub use crate::fact::{Fact, FactId, Pattern};
    pub use crate::memory::{FactList, WorkingMemory};
    pub use crate::rule::{BoundRule, Fireable, RuleDefinition};
    pub use crate::term::Term;
    pub use crate::value::Value;
}
