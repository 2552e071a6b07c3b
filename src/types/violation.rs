use crate::types::facts::{AnnotationUse, PublicMethod, Section};
use crate::types::rules::Rule;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodRef {
    pub name: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeLine {
    pub line: usize,
    pub code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerIssue {
    NoControllerInvocation,
    NoHttpStatusAssertion,
}

impl ControllerIssue {
    pub fn describe(self) -> &'static str {
        match self {
            ControllerIssue::NoControllerInvocation => "no controller invocation detected",
            ControllerIssue::NoHttpStatusAssertion => "no http status assertion detected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerFinding {
    pub name: String,
    pub line: usize,
    pub issue: ControllerIssue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingIssue {
    DoesNotStartWithMethod,
    NotThreeSegments,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamingFinding {
    pub name: String,
    pub line: usize,
    pub issue: NamingIssue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AaaFinding {
    pub name: String,
    pub line: usize,
    pub missing_arrange: bool,
    pub missing_act: bool,
    pub missing_assert: bool,
}

impl AaaFinding {
    pub fn missing_labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.missing_arrange {
            labels.push("Arrange");
        }
        if self.missing_act {
            labels.push("Act");
        }
        if self.missing_assert {
            labels.push("Assert");
        }
        labels
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineMock {
    pub name: String,
    pub line: usize,
    pub code: String,
}

/// A single rule violation with its rule-specific evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Violation {
    MissingTestFile {
        method: PublicMethod,
        expected_file: String,
    },
    ExtraTestFile {
        file: String,
    },
    MissingOrMisplacedTotalTests {
        line: Option<usize>,
    },
    CountMismatch {
        declared: u32,
        actual: usize,
        line: Option<usize>,
    },
    DuplicateDeclaration {
        lines: Vec<usize>,
    },
    MissingControllerPermissionTest,
    InvalidControllerPermissionTests {
        items: Vec<ControllerFinding>,
    },
    DisallowedAnnotations {
        items: Vec<AnnotationUse>,
    },
    TestNaming {
        items: Vec<NamingFinding>,
    },
    MockInTestFile {
        items: Vec<CodeLine>,
    },
    MissingExceptionMessageAssert {
        items: Vec<MethodRef>,
    },
    HardcodedErrorStrings {
        items: Vec<CodeLine>,
    },
    MissingDocBlock {
        items: Vec<MethodRef>,
    },
    MissingSections {
        missing: Vec<Section>,
    },
    SectionOrder {
        order: Vec<Section>,
    },
    NotAlphabetical {
        section: Section,
        names: Vec<MethodRef>,
    },
    CoverageByName {
        missing_success: bool,
        missing_failure: bool,
    },
    MissingAaaComments {
        items: Vec<AaaFinding>,
    },
    InlineMocks {
        items: Vec<InlineMock>,
    },
    InlineMockInSetup {
        line: usize,
        code: String,
    },
    MockingMethodNotStub {
        line: usize,
        method: String,
    },
}

impl Violation {
    pub fn rule(&self) -> Rule {
        match self {
            Violation::MissingTestFile { .. } | Violation::ExtraTestFile { .. } => {
                Rule::OneFilePerMethod
            }
            Violation::MissingOrMisplacedTotalTests { .. }
            | Violation::CountMismatch { .. }
            | Violation::DuplicateDeclaration { .. } => Rule::TestCountDeclaration,
            Violation::MissingControllerPermissionTest
            | Violation::InvalidControllerPermissionTests { .. } => Rule::ControllerPermissionTest,
            Violation::DisallowedAnnotations { .. } => Rule::AnnotationAllowList,
            Violation::TestNaming { .. } => Rule::NamingConvention,
            Violation::MockInTestFile { .. } => Rule::CentralizedMocking,
            Violation::MissingExceptionMessageAssert { .. } => Rule::ExceptionMessageAssertion,
            Violation::HardcodedErrorStrings { .. } => Rule::ErrorConstantUsage,
            Violation::MissingDocBlock { .. } => Rule::DocumentationBlock,
            Violation::MissingSections { .. }
            | Violation::SectionOrder { .. }
            | Violation::NotAlphabetical { .. } => Rule::SectionOrdering,
            Violation::CoverageByName { .. } => Rule::NameBasedCoverage,
            Violation::MissingAaaComments { .. } => Rule::ArrangeActAssert,
            Violation::InlineMocks { .. } | Violation::InlineMockInSetup { .. } => {
                Rule::NoInlineMocks
            }
            Violation::MockingMethodNotStub { .. } => Rule::StubNaming,
        }
    }
}
