//! Brace-depth scanning over raw lines.
//!
//! Braces are counted naively: braces inside string or character literals
//! and comments are counted too. A body whose count never returns to zero
//! is reported as [`AuditError::UnbalancedBody`] instead of being guessed at.

use crate::error::{AuditError, Result};
use crate::types::facts::{MethodBody, SourceLine};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

fn class_keyword() -> &'static Regex {
    static CLASS_KEYWORD: OnceLock<Regex> = OnceLock::new();
    CLASS_KEYWORD.get_or_init(|| Regex::new(r"\bclass\b").expect("class keyword pattern"))
}

/// Net brace change of one line.
pub fn brace_delta(line: &str) -> i64 {
    line.chars().fold(0, |depth, c| match c {
        '{' => depth + 1,
        '}' => depth - 1,
        _ => depth,
    })
}

/// 0-based index of the first line mentioning `class`.
pub fn find_class_line(lines: &[String]) -> Option<usize> {
    lines.iter().position(|line| class_keyword().is_match(line))
}

/// 0-based index of the line holding the opening brace of the first class
/// declaration.
pub fn find_class_brace(lines: &[String]) -> Option<usize> {
    let class_line = find_class_line(lines)?;
    lines[class_line..]
        .iter()
        .position(|line| line.contains('{'))
        .map(|offset| class_line + offset)
}

/// Collects the method starting at 1-based `signature_line`, from the
/// signature through the line where the brace count first returns to zero.
///
/// A declaration terminated by `;` before any `{` has no body; only the
/// signature lines are returned.
pub fn extract_method_body(
    path: &Path,
    lines: &[String],
    signature_line: usize,
) -> Result<MethodBody> {
    let start = signature_line.saturating_sub(1);
    let mut body = Vec::new();
    let mut depth: i64 = 0;
    let mut started = false;

    for (index, line) in lines.iter().enumerate().skip(start) {
        body.push(SourceLine::new(index + 1, line.as_str()));
        if !started {
            if line.contains('{') {
                started = true;
            } else if line.contains(';') {
                return Ok(MethodBody { lines: body });
            } else {
                continue;
            }
        }
        depth += brace_delta(line);
        if depth <= 0 {
            return Ok(MethodBody { lines: body });
        }
    }

    Err(AuditError::UnbalancedBody {
        path: path.to_path_buf(),
        line: signature_line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &str) -> Vec<String> {
        src.lines().map(str::to_string).collect()
    }

    #[test]
    fn body_stops_at_first_balanced_close() {
        let src = lines(
            "class A {\n  void first() {\n    if (x) {\n      y();\n    }\n  }\n  void second() {\n  }\n}",
        );
        let body = extract_method_body(Path::new("A.java"), &src, 2).expect("body should balance");
        let numbers: Vec<usize> = body.lines.iter().map(|line| line.number).collect();
        assert_eq!(numbers, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn signature_split_across_lines_is_included() {
        let src = lines("  void longName(\n      String a)\n  {\n    run();\n  }");
        let body = extract_method_body(Path::new("A.java"), &src, 1).expect("body should balance");
        assert_eq!(body.lines.len(), 5);
        assert_eq!(body.lines[0].number, 1);
        assert_eq!(body.lines[4].text, "  }");
    }

    #[test]
    fn single_line_body_closes_immediately() {
        let src = lines("  void noop() {}\n  void other() {}");
        let body = extract_method_body(Path::new("A.java"), &src, 1).expect("body should balance");
        assert_eq!(body.lines.len(), 1);
    }

    #[test]
    fn abstract_declaration_has_no_body() {
        let src = lines("  protected abstract void hook();\n  void other() {\n  }");
        let body = extract_method_body(Path::new("A.java"), &src, 1).expect("no body is fine");
        assert_eq!(body.lines.len(), 1);
    }

    #[test]
    fn unbalanced_body_is_an_error() {
        let src = lines("  void broken() {\n    String s = \"{\";\n  }");
        let err = extract_method_body(Path::new("Broken.java"), &src, 1)
            .expect_err("literal brace leaves the count open");
        match err {
            AuditError::UnbalancedBody { path, line } => {
                assert_eq!(path, Path::new("Broken.java"));
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn class_brace_may_sit_on_a_later_line() {
        let src = lines("package a;\n\npublic class Foo\n    extends Bar\n{\n}");
        assert_eq!(find_class_line(&src), Some(2));
        assert_eq!(find_class_brace(&src), Some(4));
    }

    #[test]
    fn class_keyword_requires_word_boundary() {
        let src = lines("import a.Subclassing;\nclass Real {");
        assert_eq!(find_class_line(&src), Some(1));
    }
}
