//! Rule evaluation. Every rule is a pure function over extracted facts and
//! the group context; no rule looks at another rule's output.

pub mod annotations;
pub mod assertions;
pub mod controller;
pub mod count;
pub mod coverage;
pub mod documentation;
pub mod inventory;
pub mod mocking;
pub mod naming;
pub mod ordering;

use crate::scan::{AnalysisFailure, GroupScan, ServiceGroup};
use crate::types::facts::{PublicMethod, TestFileFacts};
use crate::types::rules::{Rule, RuleSet};
use crate::types::violation::Violation;
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::path::Path;

/// Group-level inputs shared by the rules of one test file.
#[derive(Debug, Clone, Default)]
pub struct GroupContext {
    /// Service method the file targets, e.g. `getTodoItems`.
    pub method_prefix: String,
    /// `assertThrows*` helpers declared in the base-test file.
    pub assertion_helpers: Vec<String>,
}

pub type FileRule = fn(&TestFileFacts, &GroupContext, &RuleSet) -> Vec<Violation>;

/// Per-file rules in rule-number order.
pub const FILE_RULES: [FileRule; 12] = [
    count::check,
    controller::check,
    annotations::check,
    naming::check,
    mocking::check_mock_usage,
    assertions::check_exception_messages,
    assertions::check_error_constants,
    documentation::check_doc_blocks,
    ordering::check,
    coverage::check,
    documentation::check_arrange_act_assert,
    mocking::check_inline_mocks,
];

pub fn evaluate_file(facts: &TestFileFacts, ctx: &GroupContext, rules: &RuleSet) -> Vec<Violation> {
    FILE_RULES
        .iter()
        .flat_map(|rule| rule(facts, ctx, rules))
        .collect()
}

#[derive(Debug, Clone)]
pub struct FileAudit {
    pub facts: TestFileFacts,
    pub violations: Vec<Violation>,
    pub last_modified: Option<String>,
}

/// Aggregated outcome of auditing one group.
#[derive(Debug, Clone)]
pub struct GroupAudit {
    pub group: ServiceGroup,
    pub methods: Vec<PublicMethod>,
    pub test_files_found: usize,
    /// Rule 1 findings: missing and extra test files.
    pub inventory: Vec<Violation>,
    pub files: Vec<FileAudit>,
    pub base_violations: Vec<Violation>,
    pub failures: Vec<AnalysisFailure>,
}

impl GroupAudit {
    pub fn has_issues(&self) -> bool {
        !self.inventory.is_empty()
            || !self.base_violations.is_empty()
            || !self.failures.is_empty()
            || self.files_with_violations().next().is_some()
    }

    pub fn files_with_violations(&self) -> impl Iterator<Item = &FileAudit> {
        self.files.iter().filter(|file| !file.violations.is_empty())
    }

    pub fn all_violations(&self) -> impl Iterator<Item = &Violation> {
        self.inventory
            .iter()
            .chain(self.files.iter().flat_map(|file| file.violations.iter()))
            .chain(self.base_violations.iter())
    }

    pub fn rule_counts(&self) -> BTreeMap<Rule, usize> {
        let mut counts = BTreeMap::new();
        for violation in self.all_violations() {
            *counts.entry(violation.rule()).or_insert(0) += 1;
        }
        counts
    }

    pub fn total_violations(&self) -> usize {
        self.all_violations().count()
    }
}

pub fn audit_group(group: &ServiceGroup, scan: GroupScan, rules: &RuleSet) -> GroupAudit {
    let inventory = inventory::check_inventory(&scan.methods, &scan.test_file_names);
    let assertion_helpers = scan.base.assertion_helpers.clone();

    let files = scan
        .files
        .into_iter()
        .map(|facts| {
            let ctx = GroupContext {
                method_prefix: facts.method_prefix(),
                assertion_helpers: assertion_helpers.clone(),
            };
            let violations = evaluate_file(&facts, &ctx, rules);
            tracing::debug!(
                path = %facts.path.display(),
                violations = violations.len(),
                "evaluated test file"
            );
            let last_modified = last_modified(&facts.path);
            FileAudit {
                facts,
                violations,
                last_modified,
            }
        })
        .collect();

    let base_violations = mocking::check_base_test(&scan.base, rules);
    tracing::debug!(
        path = %scan.base.path.display(),
        violations = base_violations.len(),
        "evaluated base test"
    );

    let audit = GroupAudit {
        group: group.clone(),
        methods: scan.methods,
        test_files_found: scan.test_file_names.len(),
        inventory,
        files,
        base_violations,
        failures: scan.failures,
    };
    tracing::info!(
        group = %group.name,
        violations = audit.total_violations(),
        failures = audit.failures.len(),
        "group audited"
    );
    audit
}

fn last_modified(path: &Path) -> Option<String> {
    let modified = std::fs::metadata(path).and_then(|meta| meta.modified()).ok()?;
    let local: DateTime<Local> = modified.into();
    Some(local.format("%Y-%m-%d %H:%M:%S").to_string())
}
