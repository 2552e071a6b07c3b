use super::GroupContext;
use crate::types::facts::TestFileFacts;
use crate::types::rules::RuleSet;
use crate::types::violation::Violation;

/// Rule 2: the class body opens with `// Total Tests: N`, N matches the
/// number of test markers, and the marker appears once.
pub fn check(facts: &TestFileFacts, _ctx: &GroupContext, _rules: &RuleSet) -> Vec<Violation> {
    let mut violations = Vec::new();
    match facts.declared_count {
        None => violations.push(Violation::MissingOrMisplacedTotalTests {
            line: facts.first_statement_line,
        }),
        Some(declared) if declared as usize != facts.test_marker_count => {
            violations.push(Violation::CountMismatch {
                declared,
                actual: facts.test_marker_count,
                line: facts.first_statement_line,
            })
        }
        Some(_) => {}
    }
    if facts.count_markers.len() > 1 {
        violations.push(Violation::DuplicateDeclaration {
            lines: facts.count_markers.clone(),
        });
    }
    violations
}
