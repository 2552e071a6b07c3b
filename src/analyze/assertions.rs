use super::GroupContext;
use crate::types::facts::TestFileFacts;
use crate::types::rules::RuleSet;
use crate::types::violation::{CodeLine, MethodRef, Violation};
use regex::Regex;
use std::sync::OnceLock;

fn string_literal() -> &'static Regex {
    static STRING_LITERAL: OnceLock<Regex> = OnceLock::new();
    STRING_LITERAL.get_or_init(|| Regex::new(r#""([^"]+)""#).expect("string literal pattern"))
}

/// First non-empty string literal on a line.
pub fn first_string_literal(code: &str) -> Option<&str> {
    string_literal()
        .captures(code)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Rule 7: a thrown exception's message is asserted, either through a
/// base-class helper or the message accessor.
pub fn check_exception_messages(
    facts: &TestFileFacts,
    ctx: &GroupContext,
    rules: &RuleSet,
) -> Vec<Violation> {
    let mut items = Vec::new();
    for test in &facts.tests {
        let Some(line) = test.body.first_line_containing(&rules.exception_call) else {
            continue;
        };
        let uses_helper = ctx
            .assertion_helpers
            .iter()
            .any(|helper| test.body.contains(&format!("{helper}(")));
        if !uses_helper && !test.body.contains(&rules.message_accessor) {
            items.push(MethodRef {
                name: test.name.clone(),
                line,
            });
        }
    }
    if items.is_empty() {
        Vec::new()
    } else {
        vec![Violation::MissingExceptionMessageAssert { items }]
    }
}

/// Rule 8: message assertions compare against the error-constant holder,
/// not a literal. A holder reference within the window around the line
/// exempts it.
pub fn check_error_constants(
    facts: &TestFileFacts,
    _ctx: &GroupContext,
    rules: &RuleSet,
) -> Vec<Violation> {
    let accessor_name = rules.message_accessor.trim_end_matches("()");
    let mut items = Vec::new();
    for (index, line) in facts.lines.iter().enumerate() {
        let text = &line.text;
        let inspects_message = text.contains(&rules.message_accessor)
            || (text.contains("contains(") && text.contains(accessor_name));
        if !inspects_message || first_string_literal(text).is_none() {
            continue;
        }
        let start = index.saturating_sub(rules.constant_window);
        let end = (index + rules.constant_window + 1).min(facts.lines.len());
        let near_constant = facts.lines[start..end]
            .iter()
            .any(|nearby| nearby.text.contains(&rules.error_holder));
        if !near_constant {
            items.push(CodeLine {
                line: line.number,
                code: line.trimmed().to_string(),
            });
        }
    }
    if items.is_empty() {
        Vec::new()
    } else {
        vec![Violation::HardcodedErrorStrings { items }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::fixtures::{facts_with, numbered, test_method};

    fn throwing_test(body: &[&str]) -> TestFileFacts {
        facts_with(vec![test_method("getTodo_missing_throwsNotFound", 30, body)])
    }

    #[test]
    fn bare_assert_throws_is_flagged_at_first_call() {
        let facts = throwing_test(&[
            "void getTodo_missing_throwsNotFound() {",
            "  // Act & Assert",
            "  assertThrows(NotFoundException.class, () -> todoService.getTodo(1L));",
            "}",
        ]);
        let violations =
            check_exception_messages(&facts, &GroupContext::default(), &RuleSet::default());
        assert_eq!(
            violations,
            vec![Violation::MissingExceptionMessageAssert {
                items: vec![MethodRef {
                    name: "getTodo_missing_throwsNotFound".to_string(),
                    line: 32,
                }]
            }]
        );
    }

    #[test]
    fn message_accessor_or_helper_satisfies_rule() {
        let with_accessor = throwing_test(&[
            "void getTodo_missing_throwsNotFound() {",
            "  NotFoundException ex = assertThrows(NotFoundException.class, () -> run());",
            "  assertEquals(ErrorMessages.TodoErrorMessages.NotFound, ex.getMessage());",
            "}",
        ]);
        let with_helper = throwing_test(&[
            "void getTodo_missing_throwsNotFound() {",
            "  assertThrows(NotFoundException.class, () -> run());",
            "  assertThrowsNotFound(ErrorMessages.TodoErrorMessages.NotFound, () -> run());",
            "}",
        ]);
        let ctx = GroupContext {
            method_prefix: "getTodo".to_string(),
            assertion_helpers: vec!["assertThrowsNotFound".to_string()],
        };
        let rules = RuleSet::default();
        assert!(check_exception_messages(&with_accessor, &ctx, &rules).is_empty());
        assert!(check_exception_messages(&with_helper, &ctx, &rules).is_empty());
    }

    #[test]
    fn literal_message_without_nearby_constant_is_flagged_once() {
        let mut facts = facts_with(Vec::new());
        facts.lines = numbered(&[
            "void a() {",
            "  assertTrue(ex.getMessage().contains(\"not found\"));",
            "  x();",
            "  y();",
            "  z();",
            "  assertEquals(ErrorMessages.TodoErrorMessages.NotFound, other);",
            "  w();",
            "  assertEquals(\"Todo not found.\", ex.getMessage());",
            "}",
        ]);
        let violations =
            check_error_constants(&facts, &GroupContext::default(), &RuleSet::default());
        match violations.as_slice() {
            [Violation::HardcodedErrorStrings { items }] => {
                let lines: Vec<usize> = items.iter().map(|item| item.line).collect();
                assert_eq!(lines, vec![2]);
            }
            other => panic!("unexpected violations: {other:?}"),
        }
    }

    #[test]
    fn extracts_first_literal() {
        assert_eq!(
            first_string_literal("assertEquals(\"Invalid id.\", ex.getMessage());"),
            Some("Invalid id.")
        );
        assert_eq!(first_string_literal("assertEquals(\"\", x);"), None);
    }
}
