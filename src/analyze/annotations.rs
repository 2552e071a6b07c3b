use super::GroupContext;
use crate::types::facts::TestFileFacts;
use crate::types::rules::RuleSet;
use crate::types::violation::Violation;

/// Rule 4: only allow-listed annotations may be applied.
pub fn check(facts: &TestFileFacts, _ctx: &GroupContext, rules: &RuleSet) -> Vec<Violation> {
    let items: Vec<_> = facts
        .annotations
        .iter()
        .filter(|annotation| !rules.allowed_annotations.contains(&annotation.name))
        .cloned()
        .collect();
    if items.is_empty() {
        Vec::new()
    } else {
        vec![Violation::DisallowedAnnotations { items }]
    }
}
