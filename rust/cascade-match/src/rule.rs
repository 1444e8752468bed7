//! Rule definitions, consequence binding, and firing
//!
//! A [`RuleDefinition`] is the declarative half of a rule: a name, a
//! salience, and an ordered sequence of [`Condition`]s evaluated as an
//! implicit conjunction. Binding a consequence is a separate, explicit step:
//! [`RuleDefinition::bind`] consumes the definition and returns a
//! [`BoundRule`] that can fire. Splitting the two phases into two types
//! makes fire-before-bind unrepresentable in direct use; attempting it
//! anyway through the [`Fireable`] seam reports
//! [`RuleError::UnboundConsequence`](crate::error::RuleError).
//!
//! Firing resolves the activation's per-fact contexts into one merged set of
//! bindings (last-write-wins in fact order, see [`Activation::bindings`])
//! and invokes the consequence with it.

use crate::activation::Activation;
use crate::condition::{Condition, conjunction};
use crate::error::{MatchResult, RuleError};
use crate::memory::WorkingMemory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// A user-supplied action invoked with the resolved bindings of a fired
/// activation.
pub type Consequence = Box<dyn FnMut(&crate::Context)>;

/// The declarative half of a rule: conditions plus salience.
///
/// Conditions and salience are fixed at construction. A definition built
/// with no conditions is given a single sentinel pattern condition, so an
/// otherwise unconstrained rule still matches the sentinel state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    name: String,
    #[serde(default)]
    salience: i64,
    conditions: Vec<Condition>,
}

impl RuleDefinition {
    /// Define a rule over the given conditions.
    pub fn new(name: impl Into<String>, conditions: Vec<Condition>) -> Self {
        let conditions = if conditions.is_empty() {
            vec![Condition::pattern(crate::Pattern::initial())]
        } else {
            conditions
        };

        Self {
            name: name.into(),
            salience: 0,
            conditions,
        }
    }

    /// Set the salience consumed by the external conflict-resolution
    /// strategy. Higher fires earlier by convention; this core only carries
    /// the number.
    pub fn with_salience(mut self, salience: i64) -> Self {
        self.salience = salience;
        self
    }

    /// The rule's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The rule's salience.
    pub fn salience(&self) -> i64 {
        self.salience
    }

    /// The rule's conditions.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Evaluate the rule body against a working memory.
    ///
    /// The conditions combine as an implicit conjunction; see
    /// [`Condition::get_activations`] for the combination semantics.
    pub fn get_activations<M: WorkingMemory>(
        &self,
        memory: &M,
    ) -> MatchResult<BTreeSet<Activation>> {
        debug!(rule = %self.name, "evaluating rule");
        conjunction(&self.conditions, memory, &self.name)
    }

    /// Bind a consequence, completing the rule.
    pub fn bind<F>(self, consequence: F) -> BoundRule
    where
        F: FnMut(&crate::Context) + 'static,
    {
        BoundRule {
            definition: self,
            consequence: Box::new(consequence),
        }
    }
}

impl fmt::Display for RuleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (index, condition) in self.conditions.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{condition}")?;
        }
        write!(f, ")")
    }
}

/// A rule definition with its consequence bound, ready to fire.
pub struct BoundRule {
    definition: RuleDefinition,
    consequence: Consequence,
}

impl BoundRule {
    /// The underlying definition.
    pub fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    /// Evaluate the rule body; see [`RuleDefinition::get_activations`].
    pub fn get_activations<M: WorkingMemory>(
        &self,
        memory: &M,
    ) -> MatchResult<BTreeSet<Activation>> {
        self.definition.get_activations(memory)
    }
}

impl fmt::Debug for BoundRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundRule")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

/// Uniform firing seam for engines that hold definitions and bound rules
/// behind one interface.
pub trait Fireable {
    /// Fire the rule for a resolved activation.
    fn fire(&mut self, activation: &Activation) -> Result<(), RuleError>;
}

impl Fireable for BoundRule {
    fn fire(&mut self, activation: &Activation) -> Result<(), RuleError> {
        let bindings = activation.bindings();
        debug!(rule = %self.definition.name, %bindings, "firing");
        (self.consequence)(&bindings);
        Ok(())
    }
}

impl Fireable for RuleDefinition {
    /// A bare definition has nothing to invoke; firing one is a contract
    /// violation surfaced as a typed error.
    fn fire(&mut self, _activation: &Activation) -> Result<(), RuleError> {
        Err(RuleError::UnboundConsequence {
            rule: self.name.clone(),
        })
    }
}
