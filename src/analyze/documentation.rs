use super::GroupContext;
use crate::types::facts::TestFileFacts;
use crate::types::rules::RuleSet;
use crate::types::violation::{AaaFinding, MethodRef, Violation};

/// Rule 9: every test marker sits under a block comment.
pub fn check_doc_blocks(
    facts: &TestFileFacts,
    _ctx: &GroupContext,
    _rules: &RuleSet,
) -> Vec<Violation> {
    let items: Vec<MethodRef> = facts
        .tests
        .iter()
        .filter(|test| !test.documented)
        .map(|test| MethodRef {
            name: test.name.clone(),
            line: test.annotation_line,
        })
        .collect();
    if items.is_empty() {
        Vec::new()
    } else {
        vec![Violation::MissingDocBlock { items }]
    }
}

/// Rule 12: Arrange, Act and Assert comments in every test body.
/// `// Act & Assert` covers the last two.
pub fn check_arrange_act_assert(
    facts: &TestFileFacts,
    _ctx: &GroupContext,
    _rules: &RuleSet,
) -> Vec<Violation> {
    let mut items = Vec::new();
    for test in &facts.tests {
        let (mut arrange, mut act, mut assert) = (false, false, false);
        for line in &test.body.lines {
            let trimmed = line.trimmed();
            if !trimmed.starts_with("//") {
                continue;
            }
            if trimmed.contains("Arrange") {
                arrange = true;
            }
            if trimmed.contains("Act & Assert") {
                act = true;
                assert = true;
            } else {
                act |= trimmed.contains("Act");
                assert |= trimmed.contains("Assert");
            }
        }
        if !(arrange && act && assert) {
            items.push(AaaFinding {
                name: test.name.clone(),
                line: test.line,
                missing_arrange: !arrange,
                missing_act: !act,
                missing_assert: !assert,
            });
        }
    }
    if items.is_empty() {
        Vec::new()
    } else {
        vec![Violation::MissingAaaComments { items }]
    }
}
