//! Negation-as-failure semantics: sentinel anchoring and local recovery.

use cascade_match::{
    Condition, Context, Fact, FactId, FactList, MatchResult, Pattern, RuleDefinition, Term,
    WorkingMemory,
};

fn color_memory() -> FactList {
    let mut memory = FactList::new();
    memory.insert(Fact::new().with("color", "red"));
    memory.insert(Fact::new().with("color", "blue"));
    memory
}

#[test]
fn absence_produces_one_activation_anchored_to_the_sentinel() {
    // Working memory = [InitialFact@0, color:red@1, color:blue@2]
    let memory = color_memory();
    let rule = RuleDefinition::new(
        "no-green",
        vec![Condition::not(vec![Condition::pattern(
            Pattern::new().with("color", "green"),
        )])],
    );

    let activations = rule.get_activations(&memory).unwrap();
    assert_eq!(activations.len(), 1);

    let activation = activations.iter().next().unwrap();
    assert_eq!(activation.facts(), &[FactId(0)]);
    assert_eq!(activation.context_for(FactId(0)), Some(&Context::new()));
}

#[test]
fn presence_of_the_negated_condition_yields_nothing() {
    let memory = color_memory();
    let rule = RuleDefinition::new(
        "no-red",
        vec![Condition::not(vec![Condition::pattern(
            Pattern::new().with("color", "red"),
        )])],
    );

    assert!(rule.get_activations(&memory).unwrap().is_empty());
}

#[test]
fn negated_conjunction_requires_all_children_present() {
    let memory = color_memory();

    // red AND green has no joint match, so the negation holds
    let rule = RuleDefinition::new(
        "not-both",
        vec![Condition::not(vec![
            Condition::pattern(Pattern::new().with("color", "red")),
            Condition::pattern(Pattern::new().with("color", "green")),
        ])],
    );

    assert_eq!(rule.get_activations(&memory).unwrap().len(), 1);
}

#[test]
fn negation_composes_with_positive_conditions() {
    let memory = color_memory();
    let rule = RuleDefinition::new(
        "red-but-no-green",
        vec![
            Condition::pattern(Pattern::new().with("color", "red")),
            Condition::not(vec![Condition::pattern(
                Pattern::new().with("color", "green"),
            )]),
        ],
    );

    let activations = rule.get_activations(&memory).unwrap();
    assert_eq!(activations.len(), 1);

    // The match involves the concrete red fact and the sentinel anchor
    let activation = activations.iter().next().unwrap();
    assert_eq!(activation.facts(), &[FactId(0), FactId(1)]);
}

/// A store that honors the contract shape but has lost its sentinel.
struct SentinelLessStore;

impl WorkingMemory for SentinelLessStore {
    fn matches(&self, _pattern: &Pattern, _rule: &str) -> MatchResult<Vec<(FactId, Context)>> {
        Ok(Vec::new())
    }
}

#[test]
fn missing_sentinel_means_no_activation_not_an_error() {
    let rule = RuleDefinition::new(
        "anchorless",
        vec![Condition::not(vec![Condition::pattern(
            Pattern::new().with("color", "green"),
        )])],
    );

    let activations = rule.get_activations(&SentinelLessStore).unwrap();
    assert!(activations.is_empty());
}

#[test]
fn double_negation_still_anchors_to_the_sentinel() {
    let memory = color_memory();
    let rule = RuleDefinition::new(
        "some-color",
        vec![Condition::not(vec![Condition::not(vec![
            Condition::pattern(Pattern::new().with("color", Term::var("c"))),
        ])])],
    );

    // Colors exist, so the inner NOT fails and the outer NOT holds
    let activations = rule.get_activations(&memory).unwrap();
    assert_eq!(activations.len(), 1);
    assert_eq!(activations.iter().next().unwrap().facts(), &[FactId(0)]);
}
