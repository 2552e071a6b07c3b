use super::GroupContext;
use crate::types::facts::{TestFileFacts, TestMethod};
use crate::types::rules::RuleSet;
use crate::types::violation::{ControllerFinding, ControllerIssue, Violation};

/// Rule 3: a controller permission test exists and goes through the
/// controller to an HTTP status assertion.
pub fn check(facts: &TestFileFacts, _ctx: &GroupContext, rules: &RuleSet) -> Vec<Violation> {
    let permission_tests: Vec<_> = facts
        .tests
        .iter()
        .filter(|test| test.name.contains(&rules.controller_permission_token))
        .collect();
    if permission_tests.is_empty() {
        return vec![Violation::MissingControllerPermissionTest];
    }

    let mut items = Vec::new();
    for test in permission_tests {
        let calls_controller = statements_contain(test, &rules.controller_tokens);
        let asserts_status = statements_contain(test, &rules.status_tokens);
        if !calls_controller {
            items.push(ControllerFinding {
                name: test.name.clone(),
                line: test.line,
                issue: ControllerIssue::NoControllerInvocation,
            });
        }
        if !asserts_status {
            items.push(ControllerFinding {
                name: test.name.clone(),
                line: test.line,
                issue: ControllerIssue::NoHttpStatusAssertion,
            });
        }
    }

    if items.is_empty() {
        Vec::new()
    } else {
        vec![Violation::InvalidControllerPermissionTests { items }]
    }
}

/// Token match over the body without its signature line, whose method name
/// always carries the permission token.
fn statements_contain(test: &TestMethod, tokens: &[String]) -> bool {
    test.body
        .lines
        .iter()
        .skip(1)
        .any(|line| tokens.iter().any(|token| line.text.contains(token.as_str())))
}
