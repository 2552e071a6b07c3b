use super::GroupContext;
use crate::types::facts::TestFileFacts;
use crate::types::rules::RuleSet;
use crate::types::violation::{NamingFinding, NamingIssue, Violation};

/// Rule 5: `<method>_<scenario>_<outcome>`.
pub fn check(facts: &TestFileFacts, ctx: &GroupContext, _rules: &RuleSet) -> Vec<Violation> {
    let expected = format!("{}_", ctx.method_prefix);
    let mut items = Vec::new();
    for test in &facts.tests {
        if !ctx.method_prefix.is_empty() && !test.name.starts_with(&expected) {
            items.push(NamingFinding {
                name: test.name.clone(),
                line: test.line,
                issue: NamingIssue::DoesNotStartWithMethod,
            });
        }
        if test.name.matches('_').count() < 2 {
            items.push(NamingFinding {
                name: test.name.clone(),
                line: test.line,
                issue: NamingIssue::NotThreeSegments,
            });
        }
    }
    if items.is_empty() {
        Vec::new()
    } else {
        vec![Violation::TestNaming { items }]
    }
}

/// Rename proposal for a test that breaks the naming convention.
pub fn suggest_rename(name: &str, method_prefix: &str, rules: &RuleSet) -> String {
    if !name.contains('_') {
        return format!("{method_prefix}_{name}_Success");
    }
    if name.matches('_').count() < 2 {
        let lowered = name.to_lowercase();
        let failing = rules
            .failure_keywords
            .iter()
            .any(|keyword| lowered.contains(&keyword.to_lowercase()));
        let outcome = if failing { "Failure" } else { "Success" };
        return format!("{name}_{outcome}");
    }
    if !name.starts_with(&format!("{method_prefix}_")) {
        if let Some((_, suffix)) = name.split_once('_') {
            return format!("{method_prefix}_{suffix}");
        }
    }
    name.to_string()
}
