use super::GroupContext;
use crate::types::facts::TestFileFacts;
use crate::types::rules::RuleSet;
use crate::types::violation::Violation;

/// Rule 11: test names cover at least one success and one failure path.
pub fn check(facts: &TestFileFacts, _ctx: &GroupContext, rules: &RuleSet) -> Vec<Violation> {
    if facts.tests.is_empty() {
        return Vec::new();
    }
    let has_success = facts
        .tests
        .iter()
        .any(|test| rules.success_pattern.is_match(&test.name));
    let has_failure = facts
        .tests
        .iter()
        .any(|test| rules.failure_pattern.is_match(&test.name));
    if has_success && has_failure {
        return Vec::new();
    }
    vec![Violation::CoverageByName {
        missing_success: !has_success,
        missing_failure: !has_failure,
    }]
}
