use crate::analyze::assertions::first_string_literal;
use crate::analyze::naming::suggest_rename;
use crate::analyze::ordering::sorted_names;
use crate::analyze::{FileAudit, GroupAudit};
use crate::scan::error_index::ErrorConstantIndex;
use crate::types::facts::{upper_first, Section};
use crate::types::rules::RuleSet;
use crate::types::violation::Violation;

const BANNER_WIDTH: usize = 60;
const RULER_WIDTH: usize = 70;

/// Inputs the renderer needs beyond the audit itself.
pub struct RenderContext<'a> {
    pub rules: &'a RuleSet,
    pub constants: &'a ErrorConstantIndex,
    pub max_verification_commands: usize,
}

/// Renders one group's report. Output depends only on the audit and the
/// context, so unchanged inputs render byte-identical text.
pub fn to_markdown(audit: &GroupAudit, ctx: &RenderContext<'_>) -> String {
    let mut output = String::new();
    push_banner(&mut output, audit);
    push_rule_table(&mut output, audit);
    push_inventory(&mut output, audit);
    push_base_issues(&mut output, audit, ctx.rules);
    push_failures(&mut output, audit);
    push_breakdown(&mut output, audit, ctx);
    push_plan(&mut output, audit, ctx.max_verification_commands);
    output
}

fn banner_line(output: &mut String, content: &str) {
    output.push_str(&format!("║{:<width$}║\n", content, width = BANNER_WIDTH));
}

fn push_banner(output: &mut String, audit: &GroupAudit) {
    let methods = audit.methods.len();
    output.push_str(&format!(
        "# UNIT TEST VERIFICATION REPORT - {}\n\n",
        audit.group.name
    ));
    output.push_str("```\n");
    output.push_str(&format!("╔{}╗\n", "═".repeat(BANNER_WIDTH)));
    banner_line(output, "           UNIT TEST VERIFICATION REPORT");
    banner_line(output, "");
    banner_line(output, "  Status: ❌ RED");
    banner_line(output, "  Services Analyzed: 1");
    banner_line(output, &format!("  Public Methods Found: {methods}"));
    banner_line(output, &format!("  Test Files Expected: {methods}"));
    banner_line(
        output,
        &format!("  Test Files Found: {}", audit.test_files_found),
    );
    banner_line(
        output,
        &format!("  Total Violations: {}", audit.total_violations()),
    );
    output.push_str(&format!("╚{}╝\n", "═".repeat(BANNER_WIDTH)));
    output.push_str("```\n");
}

fn push_rule_table(output: &mut String, audit: &GroupAudit) {
    output.push_str("\nVIOLATIONS BY RULE:\n\n");
    output.push_str("| Rule | Description | Count |\n");
    output.push_str("| --- | --- | --- |\n");
    for (rule, count) in audit.rule_counts() {
        output.push_str(&format!(
            "| {} | {} | {} |\n",
            rule.number(),
            rule.description(),
            count
        ));
    }
}

fn push_inventory(output: &mut String, audit: &GroupAudit) {
    if audit.inventory.is_empty() {
        return;
    }
    output.push_str("\n\n**MISSING/EXTRA TEST FILES (RULE 1)**\n");
    for violation in &audit.inventory {
        match violation {
            Violation::MissingTestFile {
                method,
                expected_file,
            } => {
                output.push_str(&format!("\n{}\n", "═".repeat(RULER_WIDTH)));
                output.push_str(&format!("MISSING FILE: {expected_file}\n"));
                output.push_str(&format!("{}\n", "═".repeat(RULER_WIDTH)));
                output.push_str(&format!(
                    "Service: `{}`\n",
                    audit.group.service_path.display()
                ));
                output.push_str(&format!(
                    "Method: `{}` (line {})\n",
                    method.name, method.line
                ));
                output.push_str(&format!(
                    "Expected Test Path: `{}`\n",
                    audit.group.test_dir.join(expected_file).display()
                ));
                output.push_str("Required Minimum Tests:\n");
                output.push_str(&format!("- {}_success\n", method.name));
                output.push_str(&format!(
                    "- {}_controller_permission_forbidden\n",
                    method.name
                ));
                output.push_str(
                    "- Add failure tests for each validation/exception path in the service method body.\n",
                );
                output.push_str("Required Stubs:\n");
                output.push_str(
                    "- Add stub methods in the base test class for each repository/service interaction in the method.\n",
                );
            }
            Violation::ExtraTestFile { file } => {
                output.push_str(&format!(
                    "Extra test file with no matching public method: `{file}`. Either rename it to match a public method or remove it.\n"
                ));
            }
            _ => {}
        }
    }
}

fn push_base_issues(output: &mut String, audit: &GroupAudit, rules: &RuleSet) {
    if audit.base_violations.is_empty() {
        return;
    }
    output.push_str("\n\n**BASE TEST FILE ISSUES**\n");
    output.push_str(&format!(
        "Base Test: `{}`\n",
        audit.group.base_test_path.display()
    ));
    for violation in &audit.base_violations {
        let rule = violation.rule();
        match violation {
            Violation::InlineMockInSetup { line, code } => {
                output.push_str(&format!(
                    "- {} [{}]: inline mock in @BeforeEach at line {}: `{}`. Move this into a `{}...` method.\n",
                    rule,
                    rule.severity().as_str(),
                    line,
                    code,
                    rules.stub_prefix
                ));
            }
            Violation::MockingMethodNotStub { line, method } => {
                output.push_str(&format!(
                    "- {} [{}]: method `{}` at line {} performs mocking but does not start with `{}`. Rename to `{}{}` and update callers.\n",
                    rule,
                    rule.severity().as_str(),
                    method,
                    line,
                    rules.stub_prefix,
                    rules.stub_prefix,
                    upper_first(method)
                ));
            }
            _ => {}
        }
    }
}

fn push_failures(output: &mut String, audit: &GroupAudit) {
    if audit.failures.is_empty() {
        return;
    }
    output.push_str("\n\n**FILES THAT COULD NOT BE ANALYZED**\n");
    for failure in &audit.failures {
        output.push_str(&format!(
            "- `{}`: method body starting at line {} never closes (unbalanced braces). Fix the braces and re-run.\n",
            failure.path.display(),
            failure.line
        ));
    }
}

fn push_breakdown(output: &mut String, audit: &GroupAudit, ctx: &RenderContext<'_>) {
    output.push_str("\n\n**FILE-BY-FILE BREAKDOWN**\n");
    for file in audit.files_with_violations() {
        push_file(output, file, ctx);
    }
}

fn push_file(output: &mut String, file: &FileAudit, ctx: &RenderContext<'_>) {
    let facts = &file.facts;
    let method_prefix = facts.method_prefix();
    let actual = facts.test_marker_count;
    let first_marker = facts
        .first_count_marker()
        .map(|line| line.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let declared = facts
        .declared_count
        .map(|count| count.to_string())
        .unwrap_or_else(|| "MISSING/MISPLACED".to_string());

    output.push_str(&format!("\n{}\n", "=".repeat(RULER_WIDTH)));
    output.push_str(&format!("FILE: `{}`\n", facts.path.display()));
    output.push_str(&format!("{}\n", "=".repeat(RULER_WIDTH)));
    output.push_str(&format!(
        "Package: {}\n",
        facts.package.as_deref().unwrap_or("N/A")
    ));
    match &facts.class {
        Some(class) => output.push_str(&format!("Class: {} (line {})\n", class.text, class.line)),
        None => output.push_str("Class: N/A\n"),
    }
    output.push_str(&format!(
        "Extends: {}\n",
        facts
            .class
            .as_ref()
            .and_then(|class| class.extends.as_deref())
            .unwrap_or("N/A")
    ));
    output.push_str(&format!("Lines of Code: {}\n", facts.line_count));
    output.push_str(&format!(
        "Last Modified: {}\n",
        file.last_modified.as_deref().unwrap_or("N/A")
    ));
    output.push_str(&format!(
        "Declared Test Count: {declared} (first occurrence line {first_marker})\n"
    ));
    output.push_str(&format!("Actual @Test Count: {actual}\n"));
    output.push_str("\nVIOLATIONS FOUND:\n");

    for (index, violation) in file.violations.iter().enumerate() {
        let rule = violation.rule();
        output.push_str(&format!(
            "\nVIOLATION {}: {} - {}\n",
            index + 1,
            rule,
            rule.description()
        ));
        output.push_str(&format!("- Severity: {}\n", rule.severity().as_str()));
        push_guidance(output, violation, &method_prefix, actual, &first_marker, ctx);
    }

    output.push_str("\nREQUIRED FIXES SUMMARY:\n");
    for violation in &file.violations {
        output.push_str(&format!("- Fix {} issues above.\n", violation.rule()));
    }
}

fn push_guidance(
    output: &mut String,
    violation: &Violation,
    method_prefix: &str,
    actual: usize,
    first_marker: &str,
    ctx: &RenderContext<'_>,
) {
    let rules = ctx.rules;
    match violation {
        Violation::MissingOrMisplacedTotalTests { .. } => {
            output.push_str(&format!("- Line: {first_marker}\n"));
            output.push_str(
                "- Problem: `// Total Tests: X` is missing or not the first line inside class body.\n",
            );
            output.push_str(&format!(
                "- Required: Insert `// Total Tests: {actual}` immediately after the class opening brace.\n"
            ));
        }
        Violation::CountMismatch {
            declared,
            actual,
            line,
        } => {
            let line = line
                .map(|line| line.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            output.push_str(&format!("- Line: {line}\n"));
            output.push_str(&format!("- Current: {declared}\n"));
            output.push_str(&format!("- Required: {actual}\n"));
        }
        Violation::DuplicateDeclaration { lines } => {
            output.push_str(&format!("- Lines: {}\n", join_numbers(lines)));
            output.push_str(
                "- Required: Keep only the first declaration at the class start; remove duplicates.\n",
            );
        }
        Violation::MissingControllerPermissionTest => {
            output.push_str("- Problem: No controller permission test found.\n");
            output.push_str(&format!(
                "- Required: Add `{method_prefix}_controller_permission_forbidden` or `{method_prefix}_controller_permission_unauthorized` under the PERMISSION section. Ensure it calls controller and asserts HttpStatus 401/403.\n"
            ));
        }
        Violation::InvalidControllerPermissionTests { items } => {
            for item in items {
                output.push_str(&format!("- Line: {} ({})\n", item.line, item.name));
                output.push_str(&format!("- Problem: {}\n", item.issue.describe()));
                output.push_str("- Required: Call controller method and assert HTTP status.\n");
            }
        }
        Violation::DisallowedAnnotations { items } => {
            for item in items {
                output.push_str(&format!(
                    "- Line: {} has disallowed annotation @{}.\n",
                    item.line, item.name
                ));
                output.push_str("- Required: Remove or replace with allowed annotations only.\n");
            }
        }
        Violation::TestNaming { items } => {
            for item in items {
                output.push_str(&format!("- Line: {} method `{}`\n", item.line, item.name));
                output.push_str(&format!(
                    "- Required rename: `{}`\n",
                    suggest_rename(&item.name, method_prefix, rules)
                ));
            }
        }
        Violation::MockInTestFile { items } => {
            for item in items {
                output.push_str(&format!(
                    "- Line: {} has mock usage `{}`\n",
                    item.line, item.code
                ));
                output.push_str("- Required: Move mocks to base test file.\n");
            }
        }
        Violation::MissingExceptionMessageAssert { items } => {
            for item in items {
                output.push_str(&format!("- Line: {} in `{}`\n", item.line, item.name));
                output.push_str(&format!(
                    "- Required: Capture exception and assert exact message using {} constant.\n",
                    rules.error_holder
                ));
            }
        }
        Violation::HardcodedErrorStrings { items } => {
            for item in items {
                output.push_str(&format!(
                    "- Line: {} has hardcoded message: `{}`\n",
                    item.line, item.code
                ));
                match first_string_literal(&item.code).and_then(|lit| ctx.constants.suggest(lit)) {
                    Some(constant) => {
                        output.push_str(&format!("- Required: Replace with `{constant}`.\n"));
                    }
                    None => output.push_str(&format!(
                        "- Required: Replace with an {} constant (add one if missing).\n",
                        rules.error_holder
                    )),
                }
            }
        }
        Violation::MissingDocBlock { items } => {
            let names = items
                .iter()
                .map(|item| format!("{} (line {})", item.name, item.line))
                .collect::<Vec<_>>()
                .join(", ");
            output.push_str(&format!("- Missing documentation blocks for: {names}\n"));
            output.push_str(
                "- Required: Add /* Purpose / Expected Result / Assertions */ above each @Test.\n",
            );
        }
        Violation::MissingSections { missing } => {
            output.push_str(&format!("- Missing sections: {}\n", join_sections(missing)));
            output.push_str("- Required: Add Success, Failure, Permission section headers.\n");
        }
        Violation::SectionOrder { order } => {
            output.push_str(&format!("- Current order: [{}]\n", join_sections(order)));
            output.push_str("- Required: Success → Failure → Permission.\n");
        }
        Violation::NotAlphabetical { section, names } => {
            let current = names
                .iter()
                .map(|name| name.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            output.push_str(&format!(
                "- Section {} not alphabetical.\n",
                section.as_str()
            ));
            output.push_str(&format!("- Current order: {current}\n"));
            output.push_str(&format!(
                "- Required order: {}\n",
                sorted_names(names).join(", ")
            ));
        }
        Violation::CoverageByName {
            missing_success,
            missing_failure,
        } => {
            output.push_str("- Coverage by test names is incomplete.\n");
            if *missing_success {
                output.push_str("- Missing: at least one *_success test.\n");
            }
            if *missing_failure {
                output.push_str(
                    "- Missing: at least one failure/exception test (e.g., *_throws*, *_exception*, *_invalid*).\n",
                );
            }
        }
        Violation::MissingAaaComments { items } => {
            for item in items {
                output.push_str(&format!(
                    "- Line: {} in `{}` missing AAA comments: {}\n",
                    item.line,
                    item.name,
                    item.missing_labels().join(", ")
                ));
                output.push_str(
                    "- Required: Add `// Arrange`, `// Act`, `// Assert` (or `// Act & Assert`).\n",
                );
            }
        }
        Violation::InlineMocks { items } => {
            for item in items {
                output.push_str(&format!(
                    "- Line: {} inline mock in `{}`: `{}`\n",
                    item.line, item.name, item.code
                ));
                output.push_str("- Required: Move to base test stub method and call stub in test.\n");
            }
        }
        Violation::MissingTestFile { .. }
        | Violation::ExtraTestFile { .. }
        | Violation::InlineMockInSetup { .. }
        | Violation::MockingMethodNotStub { .. } => {}
    }
}

fn push_plan(output: &mut String, audit: &GroupAudit, max_commands: usize) {
    output.push_str("\n\n**IMPLEMENTATION PLAN (STEP-BY-STEP)**\n");
    let mut steps: Vec<String> = audit
        .files_with_violations()
        .map(|file| {
            format!(
                "Update `{}` using the violations listed above. Apply line-level fixes, rename methods, add missing sections/comments, remove inline mocks, and update test count declaration.",
                file.facts.path.display()
            )
        })
        .collect();
    for violation in &audit.inventory {
        match violation {
            Violation::MissingTestFile {
                method,
                expected_file,
            } => steps.push(format!(
                "Create `{}` for service method `{}` (line {} in `{}`). Include class header, `// Total Tests`, Success/Failure/Permission sections, and a controller permission test.",
                audit.group.test_dir.join(expected_file).display(),
                method.name,
                method.line,
                audit.group.service_path.display()
            )),
            Violation::ExtraTestFile { file } => steps.push(format!(
                "Resolve extra test file `{file}` by renaming it to match a public method or removing it."
            )),
            _ => {}
        }
    }
    for failure in &audit.failures {
        steps.push(format!(
            "Balance the braces in `{}` so it can be analyzed.",
            failure.path.display()
        ));
    }
    if !audit.base_violations.is_empty() {
        steps.push(format!(
            "Fix base test `{}` violations noted above.",
            audit.group.base_test_path.display()
        ));
    }
    for (index, step) in steps.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", index + 1, step));
    }

    output.push_str("\nVerification Commands (run after fixes):\n");
    for file in audit.files_with_violations().take(max_commands) {
        output.push_str(&format!("- mvn -Dtest={} test\n", file.facts.file_stem()));
    }
}

fn join_numbers(numbers: &[usize]) -> String {
    numbers
        .iter()
        .map(|number| number.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_sections(sections: &[Section]) -> String {
    sections
        .iter()
        .map(|section| section.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::fixtures::{facts_with, test_method};
    use crate::scan::{AnalysisFailure, ServiceGroup};
    use crate::types::config::LayoutConfig;
    use crate::types::facts::PublicMethod;
    use crate::types::violation::CodeLine;
    use std::path::{Path, PathBuf};

    fn group() -> ServiceGroup {
        ServiceGroup::new(Path::new("/repo"), &LayoutConfig::default(), "Todo")
    }

    fn audit_with(files: Vec<FileAudit>, inventory: Vec<Violation>) -> GroupAudit {
        GroupAudit {
            group: group(),
            methods: vec![PublicMethod {
                name: "getTodo".to_string(),
                line: 12,
            }],
            test_files_found: files.len(),
            inventory,
            files,
            base_violations: Vec::new(),
            failures: Vec::new(),
        }
    }

    fn render(audit: &GroupAudit, max: usize) -> String {
        let rules = RuleSet::default();
        let constants = ErrorConstantIndex::from_lines(
            "ErrorMessages",
            &[
                "public class ErrorMessages {".to_string(),
                "    public static class TodoErrorMessages {".to_string(),
                "        public static final String NotFound = \"Todo not found.\";".to_string(),
                "    }".to_string(),
                "}".to_string(),
            ],
        );
        to_markdown(
            audit,
            &RenderContext {
                rules: &rules,
                constants: &constants,
                max_verification_commands: max,
            },
        )
    }

    fn file_audit(violations: Vec<Violation>) -> FileAudit {
        FileAudit {
            facts: facts_with(vec![test_method("getTodo_valid_success", 10, &[])]),
            violations,
            last_modified: None,
        }
    }

    #[test]
    fn banner_table_and_plan_are_rendered() {
        let audit = audit_with(
            vec![file_audit(vec![Violation::SectionOrder {
                order: vec![Section::Failure, Section::Success, Section::Permission],
            }])],
            vec![Violation::MissingTestFile {
                method: PublicMethod {
                    name: "setBar".to_string(),
                    line: 40,
                },
                expected_file: "SetBarTest.java".to_string(),
            }],
        );
        let rendered = render(&audit, 6);
        assert!(rendered.starts_with("# UNIT TEST VERIFICATION REPORT - Todo\n"));
        assert!(rendered.contains("Status: ❌ RED"));
        assert!(rendered.contains("| 1 | One Test File per Method | 1 |"));
        assert!(rendered.contains("| 10 | Test Ordering | 1 |"));
        assert!(rendered.contains("MISSING FILE: SetBarTest.java"));
        assert!(rendered.contains("- setBar_controller_permission_forbidden"));
        assert!(rendered.contains("- Current order: [FAILURE, SUCCESS, PERMISSION]"));
        assert!(rendered.contains("1. Update `/repo/Todo/GetTodoTest.java`"));
        assert!(rendered.contains("2. Create `"));
        assert!(rendered.contains("- mvn -Dtest=GetTodoTest test"));
    }

    #[test]
    fn hardcoded_literal_gets_constant_suggestion() {
        let audit = audit_with(
            vec![file_audit(vec![Violation::HardcodedErrorStrings {
                items: vec![CodeLine {
                    line: 30,
                    code: "assertEquals(\"Todo not found.\", ex.getMessage());".to_string(),
                }],
            }])],
            Vec::new(),
        );
        let rendered = render(&audit, 6);
        assert!(rendered
            .contains("- Required: Replace with `ErrorMessages.TodoErrorMessages.NotFound`."));
    }

    #[test]
    fn verification_commands_are_capped() {
        let files = (0..4)
            .map(|index| {
                let mut file = file_audit(vec![Violation::MissingOrMisplacedTotalTests {
                    line: None,
                }]);
                file.facts.path = PathBuf::from(format!("/repo/Todo/Get{index}Test.java"));
                file
            })
            .collect();
        let rendered = render(&audit_with(files, Vec::new()), 2);
        assert_eq!(rendered.matches("- mvn -Dtest=").count(), 2);
        assert!(rendered.contains("Declared Test Count: MISSING/MISPLACED (first occurrence line N/A)"));
    }

    #[test]
    fn failures_get_their_own_section() {
        let mut audit = audit_with(Vec::new(), Vec::new());
        audit.failures.push(AnalysisFailure {
            path: PathBuf::from("/repo/Todo/BrokenTest.java"),
            line: 14,
        });
        let rendered = render(&audit, 6);
        assert!(rendered.contains("**FILES THAT COULD NOT BE ANALYZED**"));
        assert!(rendered.contains("`/repo/Todo/BrokenTest.java`: method body starting at line 14"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let audit = audit_with(
            vec![file_audit(vec![Violation::DuplicateDeclaration {
                lines: vec![3, 9],
            }])],
            vec![Violation::ExtraTestFile {
                file: "LegacyTest.java".to_string(),
            }],
        );
        assert_eq!(render(&audit, 6), render(&audit, 6));
    }
}
