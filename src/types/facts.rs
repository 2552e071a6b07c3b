//! Structural facts extracted from source text. Rule functions only ever
//! look at these records, never at raw files.

use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicMethod {
    pub name: String,
    pub line: usize,
}

/// One numbered source line (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub number: usize,
    pub text: String,
}

impl SourceLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }

    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// `//` or `*` comment continuation lines.
    pub fn is_comment(&self) -> bool {
        let trimmed = self.trimmed();
        trimmed.starts_with("//") || trimmed.starts_with('*')
    }
}

/// Lines of a method from its signature through the closing brace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodBody {
    pub lines: Vec<SourceLine>,
}

impl MethodBody {
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.text.contains(needle))
    }

    pub fn first_line_containing(&self, needle: &str) -> Option<usize> {
        self.lines
            .iter()
            .find(|line| line.text.contains(needle))
            .map(|line| line.number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub line: usize,
    pub text: String,
    pub extends: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Section {
    Success,
    Failure,
    Permission,
}

impl Section {
    pub const REQUIRED_ORDER: [Section; 3] = [Section::Success, Section::Failure, Section::Permission];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Success => "SUCCESS",
            Section::Failure => "FAILURE",
            Section::Permission => "PERMISSION",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    pub line: usize,
    pub section: Section,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationUse {
    pub line: usize,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestMethod {
    pub name: String,
    /// Signature line.
    pub line: usize,
    /// Line of the `@Test` marker.
    pub annotation_line: usize,
    pub documented: bool,
    pub body: MethodBody,
}

/// Everything the rules need to know about one test file.
#[derive(Debug, Clone, Default)]
pub struct TestFileFacts {
    pub path: PathBuf,
    pub line_count: usize,
    pub package: Option<String>,
    pub class: Option<ClassDecl>,
    /// Value of `// Total Tests: N` when it is the first statement of the class body.
    pub declared_count: Option<u32>,
    /// Line of the first non-blank statement in the class body.
    pub first_statement_line: Option<usize>,
    /// Every line mentioning the test-count marker.
    pub count_markers: Vec<usize>,
    /// Number of lines that begin with the test marker.
    pub test_marker_count: usize,
    pub tests: Vec<TestMethod>,
    pub annotations: Vec<AnnotationUse>,
    pub sections: Vec<SectionHeader>,
    /// Full file text, numbered, for the line-window rules.
    pub lines: Vec<SourceLine>,
}

impl TestFileFacts {
    pub fn file_stem(&self) -> String {
        self.path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string()
    }

    /// Service method a test file targets: the stem minus `Test`, with a
    /// lower-case first letter.
    pub fn method_prefix(&self) -> String {
        let stem = self.file_stem();
        let base = stem.strip_suffix("Test").unwrap_or(&stem);
        lower_first(base)
    }

    pub fn first_count_marker(&self) -> Option<usize> {
        self.count_markers.first().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseMethod {
    pub name: String,
    pub line: usize,
    pub body: MethodBody,
}

/// Facts from a group's shared base-test file.
#[derive(Debug, Clone, Default)]
pub struct BaseTestFacts {
    pub path: PathBuf,
    pub assertion_helpers: Vec<String>,
    /// Bodies of methods marked with the setup hook.
    pub setup_bodies: Vec<MethodBody>,
    /// Non-constructor methods in declaration order.
    pub methods: Vec<BaseMethod>,
}

pub fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_prefix_strips_test_suffix() {
        let facts = TestFileFacts {
            path: PathBuf::from("/tmp/Todo/GetTodoItemsTest.java"),
            ..TestFileFacts::default()
        };
        assert_eq!(facts.method_prefix(), "getTodoItems");
    }

    #[test]
    fn case_helpers_touch_only_first_letter() {
        assert_eq!(upper_first("setBar"), "SetBar");
        assert_eq!(lower_first("URLLookup"), "uRLLookup");
        assert_eq!(upper_first(""), "");
    }

    #[test]
    fn comment_detection_covers_line_and_block_continuations() {
        assert!(SourceLine::new(1, "    // when(x)").is_comment());
        assert!(SourceLine::new(2, "   * when(x)").is_comment());
        assert!(!SourceLine::new(3, "    when(x).thenReturn(y);").is_comment());
    }
}
