//! Consequence binding, firing, and boundary error propagation.

use cascade_match::{
    Activation, Condition, Context, Fact, FactId, FactList, Fireable, MatchError, MatchResult,
    Pattern, RuleDefinition, RuleError, Term, Value, WorkingMemory,
};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn bound_rule_fires_with_the_activation_bindings() {
    let mut memory = FactList::new();
    memory.insert(Fact::new().with("color", "red").with("size", 4u64));

    let fired = Rc::new(RefCell::new(Vec::new()));
    let sink = fired.clone();

    let mut rule = RuleDefinition::new(
        "record",
        vec![Condition::pattern(
            Pattern::new()
                .with("color", Term::var("color"))
                .with("size", Term::var("size")),
        )],
    )
    .bind(move |bindings: &Context| {
        sink.borrow_mut().push((
            bindings.get("color").cloned(),
            bindings.get("size").cloned(),
        ));
    });

    let activations = rule.get_activations(&memory).unwrap();
    for activation in &activations {
        rule.fire(activation).unwrap();
    }

    assert_eq!(
        fired.borrow().as_slice(),
        &[(Some(Value::from("red")), Some(Value::from(4u64)))]
    );
}

#[test]
fn firing_an_unbound_definition_fails() {
    let mut rule = RuleDefinition::new("unbound", Vec::new());
    let activation = Activation::new("unbound", vec![FactId(0)], Vec::new());

    let error = rule.fire(&activation).unwrap_err();
    assert!(matches!(
        error,
        RuleError::UnboundConsequence { rule } if rule == "unbound"
    ));
}

#[test]
fn firing_merges_contexts_across_facts_last_write_wins() {
    let mut first = Context::new();
    first.bind("x", "one").bind("only-first", true);
    let mut second = Context::new();
    second.bind("x", "two");

    let activation = Activation::new(
        "merge",
        vec![FactId(1), FactId(2)],
        vec![(FactId(1), first), (FactId(2), second)],
    );

    let seen = Rc::new(RefCell::new(None));
    let sink = seen.clone();
    let mut rule = RuleDefinition::new("merge", Vec::new()).bind(move |bindings: &Context| {
        *sink.borrow_mut() = Some(bindings.clone());
    });

    rule.fire(&activation).unwrap();

    let bindings = seen.borrow().clone().unwrap();
    assert_eq!(bindings.get("x"), Some(&Value::from("two")));
    assert_eq!(bindings.get("only-first"), Some(&Value::from(true)));
}

/// A store that refuses every match request.
struct BrokenStore;

impl WorkingMemory for BrokenStore {
    fn matches(&self, _pattern: &Pattern, _rule: &str) -> MatchResult<Vec<(FactId, Context)>> {
        Err(MatchError::InvalidStore {
            reason: "not a fact store".to_string(),
        })
    }
}

#[test]
fn store_errors_propagate_to_the_caller() {
    let rule = RuleDefinition::new(
        "doomed",
        vec![Condition::pattern(Pattern::new().with("color", "red"))],
    );

    let error = rule.get_activations(&BrokenStore).unwrap_err();
    assert!(matches!(error, MatchError::InvalidStore { .. }));
}

#[test]
fn store_errors_propagate_out_of_negation() {
    let rule = RuleDefinition::new(
        "doomed",
        vec![Condition::not(vec![Condition::pattern(
            Pattern::new().with("color", "red"),
        )])],
    );

    assert!(rule.get_activations(&BrokenStore).is_err());
}

#[test]
fn activation_sets_dedupe_across_repeated_passes() {
    let mut memory = FactList::new();
    memory.insert(Fact::new().with("color", "red"));

    let rule = RuleDefinition::new(
        "agenda",
        vec![Condition::pattern(Pattern::new().with("color", "red"))],
    );

    // An agenda folding repeated evaluation passes into one set must not
    // grow: equality and hashing are structural and stable.
    let mut agenda = rule.get_activations(&memory).unwrap();
    agenda.extend(rule.get_activations(&memory).unwrap());
    assert_eq!(agenda.len(), 1);
}

#[test]
fn deserialized_rule_without_conditions_matches_the_sentinel() -> anyhow::Result<()> {
    // Deserialization bypasses RuleDefinition::new, so the never-empty
    // invariant is enforced at evaluation time instead.
    let rule: RuleDefinition = serde_json::from_str(r#"{"name":"always","conditions":[]}"#)?;

    let memory = FactList::new();
    let activations = rule.get_activations(&memory)?;
    assert_eq!(activations.len(), 1);
    assert_eq!(activations.iter().next().unwrap().facts(), &[FactId(0)]);
    Ok(())
}

#[test]
fn rule_definitions_round_trip_through_json() -> anyhow::Result<()> {
    let rule = RuleDefinition::new(
        "serialized",
        vec![
            Condition::pattern(Pattern::new().with("color", Term::var("c"))),
            Condition::not(vec![Condition::pattern(
                Pattern::new().with("color", "green"),
            )]),
        ],
    )
    .with_salience(5);

    let encoded = serde_json::to_string(&rule)?;
    let decoded: RuleDefinition = serde_json::from_str(&encoded)?;
    assert_eq!(decoded, rule);
    assert_eq!(decoded.salience(), 5);
    Ok(())
}
