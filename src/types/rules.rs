//! Rule tables: numbering, severity, descriptions and the token lists the
//! rule functions match against.

use crate::types::config::RulesConfig;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rule {
    OneFilePerMethod,
    TestCountDeclaration,
    ControllerPermissionTest,
    AnnotationAllowList,
    NamingConvention,
    CentralizedMocking,
    ExceptionMessageAssertion,
    ErrorConstantUsage,
    DocumentationBlock,
    SectionOrdering,
    NameBasedCoverage,
    ArrangeActAssert,
    StubNaming,
    NoInlineMocks,
}

impl Rule {
    pub const ALL: [Rule; 14] = [
        Rule::OneFilePerMethod,
        Rule::TestCountDeclaration,
        Rule::ControllerPermissionTest,
        Rule::AnnotationAllowList,
        Rule::NamingConvention,
        Rule::CentralizedMocking,
        Rule::ExceptionMessageAssertion,
        Rule::ErrorConstantUsage,
        Rule::DocumentationBlock,
        Rule::SectionOrdering,
        Rule::NameBasedCoverage,
        Rule::ArrangeActAssert,
        Rule::StubNaming,
        Rule::NoInlineMocks,
    ];

    pub fn number(self) -> u8 {
        match self {
            Rule::OneFilePerMethod => 1,
            Rule::TestCountDeclaration => 2,
            Rule::ControllerPermissionTest => 3,
            Rule::AnnotationAllowList => 4,
            Rule::NamingConvention => 5,
            Rule::CentralizedMocking => 6,
            Rule::ExceptionMessageAssertion => 7,
            Rule::ErrorConstantUsage => 8,
            Rule::DocumentationBlock => 9,
            Rule::SectionOrdering => 10,
            Rule::NameBasedCoverage => 11,
            Rule::ArrangeActAssert => 12,
            Rule::StubNaming => 13,
            Rule::NoInlineMocks => 14,
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Rule::OneFilePerMethod
            | Rule::TestCountDeclaration
            | Rule::ControllerPermissionTest
            | Rule::NoInlineMocks => Severity::Critical,
            Rule::AnnotationAllowList
            | Rule::CentralizedMocking
            | Rule::ExceptionMessageAssertion
            | Rule::ErrorConstantUsage
            | Rule::NameBasedCoverage
            | Rule::StubNaming => Severity::High,
            Rule::NamingConvention
            | Rule::DocumentationBlock
            | Rule::SectionOrdering
            | Rule::ArrangeActAssert => Severity::Medium,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Rule::OneFilePerMethod => "One Test File per Method",
            Rule::TestCountDeclaration => "Test Count Declaration",
            Rule::ControllerPermissionTest => "Controller Permission Test",
            Rule::AnnotationAllowList => "Test Annotations",
            Rule::NamingConvention => "Test Naming Convention",
            Rule::CentralizedMocking => "Centralized Mocking",
            Rule::ExceptionMessageAssertion => "Exception Assertions",
            Rule::ErrorConstantUsage => "Error Constants",
            Rule::DocumentationBlock => "Test Documentation",
            Rule::SectionOrdering => "Test Ordering",
            Rule::NameBasedCoverage => "Complete Coverage",
            Rule::ArrangeActAssert => "Arrange/Act/Assert",
            Rule::StubNaming => "Stub Naming",
            Rule::NoInlineMocks => "No Inline Mocks",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rule {}", self.number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
        }
    }
}

/// Token tables consumed by the rule functions. Built once per run and
/// passed by reference, so tests can swap in alternate tables.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub allowed_annotations: BTreeSet<String>,
    pub mock_usage: Regex,
    pub mock_setup: Regex,
    pub controller_permission_token: String,
    pub controller_tokens: Vec<String>,
    pub status_tokens: Vec<String>,
    pub success_pattern: Regex,
    pub failure_pattern: Regex,
    /// Keywords used when suggesting an outcome segment for a rename.
    pub failure_keywords: Vec<String>,
    pub stub_prefix: String,
    pub error_holder: String,
    pub exception_call: String,
    pub message_accessor: String,
    pub constant_window: usize,
}

const DEFAULT_ALLOWED_ANNOTATIONS: [&str; 7] = [
    "Test",
    "DisplayName",
    "ExtendWith",
    "Mock",
    "Spy",
    "InjectMocks",
    "BeforeEach",
];

const MOCK_USAGE_PATTERN: &str = r"@Mock|@Spy|@InjectMocks|\bmock\(|Mockito\.mock";
const MOCK_SETUP_PATTERN: &str = r"\blenient\(\)\.when\(|\bwhen\(|\bdoReturn\(|\bdoThrow\(|\bdoAnswer\(|\bdoNothing\(\)\.when\(|\bdoCallRealMethod\(";
const SUCCESS_PATTERN: &str = r"(?i)_success";
const FAILURE_PATTERN: &str =
    r"(?i)_exception|_throws|_notFound|_invalid|_error|_unauthorized|_forbidden";

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            allowed_annotations: DEFAULT_ALLOWED_ANNOTATIONS
                .iter()
                .map(|name| name.to_string())
                .collect(),
            mock_usage: Regex::new(MOCK_USAGE_PATTERN).expect("mock usage pattern is valid"),
            mock_setup: Regex::new(MOCK_SETUP_PATTERN).expect("mock setup pattern is valid"),
            controller_permission_token: "_controller_permission_".to_string(),
            controller_tokens: vec!["Controller".to_string(), "controller".to_string()],
            status_tokens: vec!["HttpStatus".to_string(), "statusCode".to_string()],
            success_pattern: Regex::new(SUCCESS_PATTERN).expect("success pattern is valid"),
            failure_pattern: Regex::new(FAILURE_PATTERN).expect("failure pattern is valid"),
            failure_keywords: [
                "Throw",
                "Throws",
                "Exception",
                "Invalid",
                "NotFound",
                "Unauthorized",
                "Forbidden",
                "Fail",
                "Failure",
                "Error",
                "Denied",
            ]
            .iter()
            .map(|keyword| keyword.to_string())
            .collect(),
            stub_prefix: "stub".to_string(),
            error_holder: "ErrorMessages".to_string(),
            exception_call: "assertThrows(".to_string(),
            message_accessor: "getMessage()".to_string(),
            constant_window: 2,
        }
    }
}

impl RuleSet {
    pub fn from_config(config: &RulesConfig) -> Self {
        let mut rules = Self::default();
        if let Some(annotations) = &config.allowed_annotations {
            rules.allowed_annotations = annotations
                .iter()
                .map(|name| name.trim().trim_start_matches('@').to_string())
                .collect();
        }
        if let Some(prefix) = &config.stub_prefix {
            rules.stub_prefix = prefix.trim().to_string();
        }
        if let Some(holder) = &config.error_holder {
            rules.error_holder = holder.trim().to_string();
        }
        rules
    }

    pub fn is_mock_setup(&self, line: &str) -> bool {
        self.mock_setup.is_match(line)
    }
}
