//! Error types for the matching core

use thiserror::Error;

/// Errors raised at the working-memory boundary during pattern matching.
///
/// These are contract violations, fatal to the calling evaluation, and are
/// propagated to the caller. Data-shape anomalies inside the matcher itself
/// (a malformed fact/context pairing, a missing sentinel during negation)
/// are absorbed locally instead and never surface as errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// The store is not in a state that can be matched against. A store
    /// that cannot honor its contract (for example one whose sentinel was
    /// never installed because it was built from raw parts) reports this
    /// instead of returning misleading matches.
    #[error("Invalid working memory: {reason}")]
    InvalidStore {
        /// Why the store rejected the evaluation
        reason: String,
    },

    /// The store could not interpret the pattern it was given.
    #[error("Invalid pattern: {reason}")]
    InvalidPattern {
        /// Why the pattern was rejected
        reason: String,
    },
}

/// Errors raised while binding or firing a rule's consequence.
#[derive(Error, Debug)]
pub enum RuleError {
    /// Firing was attempted on a rule that never had a consequence bound.
    #[error("Rule {rule:?} has no bound consequence")]
    UnboundConsequence {
        /// Name of the offending rule
        rule: String,
    },

    /// Evaluation failed at the working-memory boundary.
    #[error(transparent)]
    Match(#[from] MatchError),
}

/// Result type for working-memory matching.
pub type MatchResult<T> = Result<T, MatchError>;
