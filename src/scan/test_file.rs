use super::braces::{extract_method_body, find_class_brace, find_class_line};
use crate::error::Result;
use crate::types::facts::{
    AnnotationUse, ClassDecl, Section, SectionHeader, SourceLine, TestFileFacts, TestMethod,
};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

pub const COUNT_MARKER: &str = "Total Tests:";

pub(crate) fn method_signature() -> &'static Regex {
    static METHOD_SIGNATURE: OnceLock<Regex> = OnceLock::new();
    METHOD_SIGNATURE.get_or_init(|| {
        Regex::new(r"^\s*(public|protected|private)?\s*(static\s+)?[\w<>\[\]]+\s+([A-Za-z0-9_]+)\s*\(")
            .expect("method signature pattern")
    })
}

fn test_marker() -> &'static Regex {
    static TEST_MARKER: OnceLock<Regex> = OnceLock::new();
    TEST_MARKER.get_or_init(|| Regex::new(r"^@Test\b").expect("test marker pattern"))
}

fn declared_count() -> &'static Regex {
    static DECLARED_COUNT: OnceLock<Regex> = OnceLock::new();
    DECLARED_COUNT.get_or_init(|| {
        Regex::new(r"^\s*//\s+Total Tests:\s+(\d+)\s*$").expect("declared count pattern")
    })
}

fn section_patterns() -> &'static [(Regex, Section); 3] {
    static SECTION_PATTERNS: OnceLock<[(Regex, Section); 3]> = OnceLock::new();
    SECTION_PATTERNS.get_or_init(|| {
        [
            (
                Regex::new(r"(?i)SUCCESS.*TESTS").expect("success header pattern"),
                Section::Success,
            ),
            (
                Regex::new(r"(?i)(FAILURE|EXCEPTION).*TESTS").expect("failure header pattern"),
                Section::Failure,
            ),
            (
                Regex::new(r"(?i)(PERMISSION|AUTHORIZATION).*TESTS")
                    .expect("permission header pattern"),
                Section::Permission,
            ),
        ]
    })
}

/// Classifies a line as a section header, if it is one.
pub fn classify_section(line: &str) -> Option<Section> {
    section_patterns()
        .iter()
        .find(|(pattern, _)| pattern.is_match(line))
        .map(|(_, section)| *section)
}

/// Extracts the structural facts of one test file.
pub fn extract_test_facts(path: &Path, lines: &[String]) -> Result<TestFileFacts> {
    let package = lines
        .iter()
        .map(|line| line.trim())
        .find(|line| line.starts_with("package "))
        .map(|line| line.replacen("package ", "", 1).replace(';', ""));

    let class = find_class_line(lines).map(|index| {
        let text = lines[index].trim().to_string();
        let extends = text.split_once("extends").and_then(|(_, rest)| {
            rest.split_whitespace()
                .next()
                .map(|name| name.trim_end_matches('{').to_string())
        });
        ClassDecl {
            line: index + 1,
            text,
            extends,
        }
    });

    let count_markers = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.contains(COUNT_MARKER))
        .map(|(index, _)| index + 1)
        .collect();

    let first_statement = find_class_brace(lines).and_then(|brace| {
        lines
            .iter()
            .enumerate()
            .skip(brace + 1)
            .find(|(_, line)| !line.trim().is_empty())
    });
    let declared_count = first_statement.and_then(|(_, line)| {
        declared_count()
            .captures(line)
            .and_then(|caps| caps[1].parse::<u32>().ok())
    });

    let marker_lines: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| test_marker().is_match(line.trim()))
        .map(|(index, _)| index)
        .collect();

    let mut tests = Vec::new();
    for &marker in &marker_lines {
        let Some((signature, name)) = signature_after(lines, marker) else {
            continue;
        };
        let body = extract_method_body(path, lines, signature + 1)?;
        tests.push(TestMethod {
            name,
            line: signature + 1,
            annotation_line: marker + 1,
            documented: has_doc_block(lines, marker),
            body,
        });
    }

    let annotations = lines
        .iter()
        .enumerate()
        .filter_map(|(index, line)| {
            let rest = line.trim().strip_prefix('@')?;
            let name: String = rest
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '.')
                .collect();
            Some(AnnotationUse {
                line: index + 1,
                name,
            })
        })
        .collect();

    let sections = lines
        .iter()
        .enumerate()
        .filter_map(|(index, line)| {
            classify_section(line).map(|section| SectionHeader {
                line: index + 1,
                section,
            })
        })
        .collect();

    tracing::debug!(
        path = %path.display(),
        tests = tests.len(),
        markers = marker_lines.len(),
        "extracted test file facts"
    );

    Ok(TestFileFacts {
        path: path.to_path_buf(),
        line_count: lines.len(),
        package,
        class,
        declared_count,
        first_statement_line: first_statement.map(|(index, _)| index + 1),
        count_markers,
        test_marker_count: marker_lines.len(),
        tests,
        annotations,
        sections,
        lines: lines
            .iter()
            .enumerate()
            .map(|(index, line)| SourceLine::new(index + 1, line.as_str()))
            .collect(),
    })
}

/// First signature after a test marker, skipping blank and annotation
/// lines. Returns its 0-based index and the method name.
fn signature_after(lines: &[String], marker: usize) -> Option<(usize, String)> {
    let (index, line) = lines
        .iter()
        .enumerate()
        .skip(marker + 1)
        .find(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('@')
        })?;
    let caps = method_signature().captures(line)?;
    Some((index, caps[3].to_string()))
}

/// True when the nearest non-blank line above `marker` closes a block
/// comment that opens before any other test or method signature.
pub(crate) fn has_doc_block(lines: &[String], marker: usize) -> bool {
    let Some(close) = lines[..marker]
        .iter()
        .rposition(|line| !line.trim().is_empty())
    else {
        return false;
    };
    let closing = lines[close].trim();
    if !closing.ends_with("*/") {
        return false;
    }
    if closing.starts_with("/*") {
        return true;
    }
    for line in lines[..close].iter().rev() {
        let trimmed = line.trim();
        if trimmed.starts_with("/*") {
            return true;
        }
        if trimmed.starts_with("@Test") || method_signature().is_match(line) {
            return false;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuditError;

    const SAMPLE: &str = r#"package com.example.SpringApi.ServiceTests.Todo;

import org.junit.jupiter.api.Test;

@DisplayName("Add Todo Tests")
class AddTodoTest extends TodoServiceTestBase {

  // Total Tests: 2
  /*
   * SUCCESS TESTS
   */

  /**
   * Purpose: Add a valid todo.
   */
  @Test
  @DisplayName("Add Todo - Valid - Success")
  void addTodo_valid_success() {
    // Arrange
    stubTodoRepositorySave(testTodo);

    // Act & Assert
    assertDoesNotThrow(() -> todoService.addTodo(testRequest));
  }

  // FAILURE TESTS

  @Test
  void addTodo_nullRequest_throwsBadRequest() {
    assertThrows(BadRequestException.class, () -> todoService.addTodo(null));
  }
}
"#;

    fn lines(src: &str) -> Vec<String> {
        src.lines().map(str::to_string).collect()
    }

    fn facts() -> TestFileFacts {
        extract_test_facts(Path::new("AddTodoTest.java"), &lines(SAMPLE))
            .expect("sample should extract")
    }

    #[test]
    fn extracts_package_class_and_superclass() {
        let facts = facts();
        assert_eq!(
            facts.package.as_deref(),
            Some("com.example.SpringApi.ServiceTests.Todo")
        );
        let class = facts.class.expect("class should be found");
        assert_eq!(class.line, 6);
        assert_eq!(class.extends.as_deref(), Some("TodoServiceTestBase"));
    }

    #[test]
    fn declared_count_comes_from_first_class_statement() {
        let facts = facts();
        assert_eq!(facts.declared_count, Some(2));
        assert_eq!(facts.first_statement_line, Some(8));
        assert_eq!(facts.count_markers, vec![8]);
    }

    #[test]
    fn misplaced_count_marker_is_not_declared() {
        let src = SAMPLE.replace(
            "  // Total Tests: 2\n",
            "  private int x;\n  // Total Tests: 2\n",
        );
        let facts = extract_test_facts(Path::new("AddTodoTest.java"), &lines(&src))
            .expect("extract should succeed");
        assert_eq!(facts.declared_count, None);
        assert_eq!(facts.count_markers.len(), 1);
    }

    #[test]
    fn unparsable_count_is_treated_as_absent() {
        let src = SAMPLE.replace("// Total Tests: 2", "// Total Tests: two");
        let facts = extract_test_facts(Path::new("AddTodoTest.java"), &lines(&src))
            .expect("extract should succeed");
        assert_eq!(facts.declared_count, None);
    }

    #[test]
    fn finds_test_methods_with_both_line_numbers() {
        let facts = facts();
        assert_eq!(facts.test_marker_count, 2);
        let names: Vec<&str> = facts.tests.iter().map(|test| test.name.as_str()).collect();
        assert_eq!(names, vec!["addTodo_valid_success", "addTodo_nullRequest_throwsBadRequest"]);
        assert_eq!(facts.tests[0].annotation_line, 16);
        assert_eq!(facts.tests[0].line, 18);
        assert!(facts.tests[0].documented);
        assert!(!facts.tests[1].documented);
    }

    #[test]
    fn method_body_spans_signature_to_closing_brace() {
        let facts = facts();
        let body = &facts.tests[0].body;
        assert_eq!(body.lines.first().map(|line| line.number), Some(18));
        assert_eq!(body.lines.last().map(|line| line.trimmed()), Some("}"));
        assert!(body.contains("stubTodoRepositorySave"));
        assert!(!body.contains("assertThrows"));
    }

    #[test]
    fn records_annotations_and_sections() {
        let facts = facts();
        let names: Vec<&str> = facts
            .annotations
            .iter()
            .map(|annotation| annotation.name.as_str())
            .collect();
        assert_eq!(names, vec!["DisplayName", "Test", "DisplayName", "Test"]);
        let sections: Vec<Section> = facts.sections.iter().map(|header| header.section).collect();
        assert_eq!(sections, vec![Section::Success, Section::Failure]);
    }

    #[test]
    fn unbalanced_test_body_fails_the_file() {
        let src = SAMPLE.replace(
            "assertThrows(BadRequestException.class",
            "String s = \"{{\"; assertThrows(BadRequestException.class",
        );
        let err = extract_test_facts(Path::new("AddTodoTest.java"), &lines(&src))
            .expect_err("body cannot balance");
        assert!(matches!(err, AuditError::UnbalancedBody { line: 29, .. }));
    }

    #[test]
    fn single_line_block_comment_counts_as_documentation() {
        let src = lines("class A {\n  /** Purpose: x */\n\n  @Test\n  void a_b_success() {\n  }\n}");
        assert!(has_doc_block(&src, 3));
    }

    #[test]
    fn section_classifier_is_case_insensitive() {
        assert_eq!(classify_section("// ==== success tests ===="), Some(Section::Success));
        assert_eq!(classify_section("* EXCEPTION TESTS"), Some(Section::Failure));
        assert_eq!(classify_section("// Authorization Tests"), Some(Section::Permission));
        assert_eq!(classify_section("// Total Tests: 3"), None);
    }
}
