pub mod json;
pub mod md;

use crate::analyze::GroupAudit;
use crate::error::{AuditError, Result};
use crate::scan::AnalysisFailure;
use crate::types::rules::Severity;
use crate::types::violation::Violation;
use md::RenderContext;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// What happened to a group's report file on this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportOutcome {
    /// New or changed content was written.
    Written,
    /// Rendered content matched the file on disk; nothing was touched.
    Unchanged,
    /// The group is clean and its old report was deleted.
    Removed,
    /// The group is clean and had no report.
    Clean,
}

/// One violation in the JSON summary, tied to the file it concerns.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub file: PathBuf,
    pub rule: u8,
    pub severity: Severity,
    pub violation: Violation,
}

impl Finding {
    fn new(file: &Path, violation: &Violation) -> Self {
        let rule = violation.rule();
        Self {
            file: file.to_path_buf(),
            rule: rule.number(),
            severity: rule.severity(),
            violation: violation.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub group: String,
    pub report: PathBuf,
    pub outcome: ReportOutcome,
    pub violations: usize,
    pub rules: BTreeMap<u8, usize>,
    /// Digest of the rendered report, absent for clean groups.
    pub sha256: Option<String>,
    pub failed_files: Vec<AnalysisFailure>,
    /// Inventory findings point at the test directory, base-test findings
    /// at the base file.
    pub findings: Vec<Finding>,
}

/// Console summary of one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub created: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
    pub groups: Vec<GroupSummary>,
}

impl RunSummary {
    pub fn record(&mut self, summary: GroupSummary) {
        match summary.outcome {
            ReportOutcome::Written => self.created.push(summary.report.clone()),
            ReportOutcome::Unchanged => self.unchanged.push(summary.report.clone()),
            ReportOutcome::Removed => self.removed.push(summary.report.clone()),
            ReportOutcome::Clean => {}
        }
        self.groups.push(summary);
    }

    pub fn has_violations(&self) -> bool {
        self.groups.iter().any(|group| group.violations > 0)
    }

    pub fn has_failures(&self) -> bool {
        self.groups.iter().any(|group| !group.failed_files.is_empty())
    }

    pub fn to_text(&self) -> String {
        let mut output = String::new();
        push_paths(&mut output, "UPDATED/CREATED:", &self.created);
        output.push('\n');
        push_paths(&mut output, "UNCHANGED:", &self.unchanged);
        output.push('\n');
        push_paths(&mut output, "DELETED:", &self.removed);
        output
    }
}

fn push_paths(output: &mut String, heading: &str, paths: &[PathBuf]) {
    output.push_str(heading);
    output.push('\n');
    for path in paths {
        output.push_str(&format!("{}\n", path.display()));
    }
}

/// Writes the group's report when it has issues, otherwise removes any
/// stale one. A report whose bytes already match is left untouched.
pub fn write_or_remove(audit: &GroupAudit, ctx: &RenderContext<'_>) -> Result<GroupSummary> {
    let path = &audit.group.report_path;
    let mut summary = GroupSummary {
        group: audit.group.name.clone(),
        report: path.clone(),
        outcome: ReportOutcome::Clean,
        violations: audit.total_violations(),
        rules: audit
            .rule_counts()
            .into_iter()
            .map(|(rule, count)| (rule.number(), count))
            .collect(),
        sha256: None,
        failed_files: audit.failures.clone(),
        findings: findings(audit),
    };

    if !audit.has_issues() {
        if path.exists() {
            fs::remove_file(path).map_err(AuditError::Io)?;
            tracing::info!(report = %path.display(), "removed report for clean group");
            summary.outcome = ReportOutcome::Removed;
        }
        return Ok(summary);
    }

    let rendered = md::to_markdown(audit, ctx);
    summary.sha256 = Some(sha256_hex(rendered.as_bytes()));
    summary.outcome = if matches_on_disk(path, &rendered)? {
        tracing::debug!(report = %path.display(), "report unchanged");
        ReportOutcome::Unchanged
    } else {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(AuditError::Io)?;
        }
        fs::write(path, &rendered).map_err(AuditError::Io)?;
        tracing::info!(report = %path.display(), "wrote report");
        ReportOutcome::Written
    };
    Ok(summary)
}

fn findings(audit: &GroupAudit) -> Vec<Finding> {
    let group = &audit.group;
    let mut findings: Vec<Finding> = audit
        .inventory
        .iter()
        .map(|violation| Finding::new(&group.test_dir, violation))
        .collect();
    for file in &audit.files {
        findings.extend(
            file.violations
                .iter()
                .map(|violation| Finding::new(&file.facts.path, violation)),
        );
    }
    findings.extend(
        audit
            .base_violations
            .iter()
            .map(|violation| Finding::new(&group.base_test_path, violation)),
    );
    findings
}

fn matches_on_disk(path: &Path, rendered: &str) -> Result<bool> {
    match fs::read(path) {
        Ok(existing) => Ok(existing == rendered.as_bytes()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(AuditError::Io(err)),
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{digest:x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::error_index::ErrorConstantIndex;
    use crate::scan::ServiceGroup;
    use crate::types::config::LayoutConfig;
    use crate::types::facts::PublicMethod;
    use crate::types::rules::RuleSet;
    use crate::types::violation::Violation;
    use tempfile::TempDir;

    fn audit(root: &Path, inventory: Vec<Violation>) -> GroupAudit {
        GroupAudit {
            group: ServiceGroup::new(root, &LayoutConfig::default(), "Todo"),
            methods: vec![PublicMethod {
                name: "getTodo".to_string(),
                line: 5,
            }],
            test_files_found: 0,
            inventory,
            files: Vec::new(),
            base_violations: Vec::new(),
            failures: Vec::new(),
        }
    }

    fn missing_file() -> Vec<Violation> {
        vec![Violation::MissingTestFile {
            method: PublicMethod {
                name: "getTodo".to_string(),
                line: 5,
            },
            expected_file: "GetTodoTest.java".to_string(),
        }]
    }

    fn write(audit: &GroupAudit) -> GroupSummary {
        let rules = RuleSet::default();
        let constants = ErrorConstantIndex::default();
        let ctx = RenderContext {
            rules: &rules,
            constants: &constants,
            max_verification_commands: 6,
        };
        write_or_remove(audit, &ctx).expect("report write should succeed")
    }

    #[test]
    fn second_write_is_unchanged_with_same_digest() {
        let temp = TempDir::new().expect("tempdir");
        let audit = audit(temp.path(), missing_file());

        let first = write(&audit);
        assert_eq!(first.outcome, ReportOutcome::Written);
        let bytes = fs::read(&audit.group.report_path).expect("report exists");

        let second = write(&audit);
        assert_eq!(second.outcome, ReportOutcome::Unchanged);
        assert_eq!(first.sha256, second.sha256);
        assert_eq!(fs::read(&audit.group.report_path).expect("report exists"), bytes);
        assert_eq!(second.rules.get(&1), Some(&1));
    }

    #[test]
    fn findings_carry_rule_severity_and_evidence() {
        let temp = TempDir::new().expect("tempdir");
        let audit = audit(temp.path(), missing_file());
        let summary = write(&audit);

        assert_eq!(summary.findings.len(), 1);
        let finding = &summary.findings[0];
        assert_eq!(finding.file, audit.group.test_dir);
        assert_eq!(finding.rule, 1);
        assert_eq!(finding.severity, Severity::Critical);

        let value = serde_json::to_value(finding).expect("finding should serialize");
        assert_eq!(value["severity"], "CRITICAL");
        assert_eq!(value["violation"]["type"], "missing_test_file");
        assert_eq!(value["violation"]["expected_file"], "GetTodoTest.java");
        assert_eq!(value["violation"]["method"]["line"], 5);
    }

    #[test]
    fn clean_group_removes_stale_report() {
        let temp = TempDir::new().expect("tempdir");
        let dirty = audit(temp.path(), missing_file());
        write(&dirty);

        let clean = audit(temp.path(), Vec::new());
        let summary = write(&clean);
        assert_eq!(summary.outcome, ReportOutcome::Removed);
        assert!(!clean.group.report_path.exists());
        assert!(summary.sha256.is_none());

        assert_eq!(write(&clean).outcome, ReportOutcome::Clean);
    }

    #[test]
    fn text_summary_lists_each_bucket() {
        let mut run = RunSummary::default();
        run.record(GroupSummary {
            group: "Todo".to_string(),
            report: PathBuf::from("r/TODO_UNIT_TEST_VERIFICATION_REPORT.md"),
            outcome: ReportOutcome::Removed,
            violations: 0,
            rules: BTreeMap::new(),
            sha256: None,
            failed_files: Vec::new(),
            findings: Vec::new(),
        });
        assert_eq!(
            run.to_text(),
            "UPDATED/CREATED:\n\nUNCHANGED:\n\nDELETED:\nr/TODO_UNIT_TEST_VERIFICATION_REPORT.md\n"
        );
        assert!(!run.has_violations());
    }
}
