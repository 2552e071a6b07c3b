use super::GroupContext;
use crate::types::facts::{BaseTestFacts, TestFileFacts};
use crate::types::rules::RuleSet;
use crate::types::violation::{CodeLine, InlineMock, Violation};

/// Rule 6: mock creation belongs in the base-test file.
pub fn check_mock_usage(
    facts: &TestFileFacts,
    _ctx: &GroupContext,
    rules: &RuleSet,
) -> Vec<Violation> {
    let items: Vec<CodeLine> = facts
        .lines
        .iter()
        .filter(|line| rules.mock_usage.is_match(&line.text))
        .map(|line| CodeLine {
            line: line.number,
            code: line.trimmed().to_string(),
        })
        .collect();
    if items.is_empty() {
        Vec::new()
    } else {
        vec![Violation::MockInTestFile { items }]
    }
}

/// Rule 14, test side: no stubbing statements inside a test body.
pub fn check_inline_mocks(
    facts: &TestFileFacts,
    _ctx: &GroupContext,
    rules: &RuleSet,
) -> Vec<Violation> {
    let items: Vec<InlineMock> = facts
        .tests
        .iter()
        .flat_map(|test| {
            test.body
                .lines
                .iter()
                .filter(|line| !line.is_comment() && rules.is_mock_setup(&line.text))
                .map(|line| InlineMock {
                    name: test.name.clone(),
                    line: line.number,
                    code: line.trimmed().to_string(),
                })
        })
        .collect();
    if items.is_empty() {
        Vec::new()
    } else {
        vec![Violation::InlineMocks { items }]
    }
}

/// Rules 13 and 14 on the base-test file: the setup hook does not stub,
/// and every method that stubs carries the stub prefix.
pub fn check_base_test(base: &BaseTestFacts, rules: &RuleSet) -> Vec<Violation> {
    let mut violations = Vec::new();
    for body in &base.setup_bodies {
        for line in &body.lines {
            if !line.is_comment() && rules.is_mock_setup(&line.text) {
                violations.push(Violation::InlineMockInSetup {
                    line: line.number,
                    code: line.trimmed().to_string(),
                });
            }
        }
    }
    for method in &base.methods {
        let stubs = method
            .body
            .lines
            .iter()
            .any(|line| !line.is_comment() && rules.is_mock_setup(&line.text));
        if stubs && !method.name.starts_with(&rules.stub_prefix) {
            violations.push(Violation::MockingMethodNotStub {
                line: method.line,
                method: method.name.clone(),
            });
        }
    }
    violations
}
