pub mod braces;
pub mod error_index;
pub mod filesystem;
pub mod service;
pub mod test_file;

use crate::error::{AuditError, Result};
use crate::types::config::LayoutConfig;
use crate::types::facts::{BaseTestFacts, PublicMethod, TestFileFacts};
use filesystem::{file_name, list_test_files, read_lines_if_exists};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One audited service domain and the paths derived from its name.
#[derive(Debug, Clone)]
pub struct ServiceGroup {
    pub name: String,
    pub service_path: PathBuf,
    pub test_dir: PathBuf,
    pub base_test_path: PathBuf,
    pub report_path: PathBuf,
}

impl ServiceGroup {
    pub fn new(root: &Path, layout: &LayoutConfig, name: &str) -> Self {
        let tests_root = root.join(&layout.tests_root);
        let test_dir = tests_root.join(name);
        Self {
            name: name.to_string(),
            service_path: root
                .join(&layout.service_dir)
                .join(format!("{name}Service.java")),
            base_test_path: test_dir.join(format!("{name}ServiceTestBase.java")),
            report_path: tests_root.join(format!(
                "{}_UNIT_TEST_VERIFICATION_REPORT.md",
                name.to_uppercase()
            )),
            test_dir,
        }
    }
}

/// A file whose analysis was abandoned because a body scan never balanced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisFailure {
    pub path: PathBuf,
    pub line: usize,
}

/// Raw inputs of one group after fact extraction.
#[derive(Debug, Clone)]
pub struct GroupScan {
    pub methods: Vec<PublicMethod>,
    /// Names of every test file found, including ones that failed analysis.
    pub test_file_names: Vec<String>,
    pub files: Vec<TestFileFacts>,
    /// Holds only the assertion helpers when the base-test file failed analysis.
    pub base: BaseTestFacts,
    pub failures: Vec<AnalysisFailure>,
}

pub fn scan_group(group: &ServiceGroup) -> Result<GroupScan> {
    let methods = service::parse_public_methods(&group.service_path)?;
    let paths = list_test_files(&group.test_dir);
    tracing::debug!(
        group = %group.name,
        methods = methods.len(),
        test_files = paths.len(),
        "scanning group"
    );

    let mut files = Vec::new();
    let mut failures = Vec::new();
    for path in &paths {
        let lines = read_lines_if_exists(path)?.unwrap_or_default();
        match test_file::extract_test_facts(path, &lines) {
            Ok(facts) => files.push(facts),
            Err(err) => failures.push(into_failure(err)?),
        }
    }

    let (base, base_failure) = base_test::load_base_test(&group.base_test_path)?;
    if let Some(err) = base_failure {
        failures.push(into_failure(err)?);
    }

    Ok(GroupScan {
        methods,
        test_file_names: paths.iter().map(|path| file_name(path)).collect(),
        files,
        base,
        failures,
    })
}

/// Unbalanced bodies become per-file failures; anything else propagates.
fn into_failure(err: AuditError) -> Result<AnalysisFailure> {
    match err {
        AuditError::UnbalancedBody { path, line } => {
            tracing::error!(
                path = %path.display(),
                line,
                "brace scan never balanced; skipping file"
            );
            Ok(AnalysisFailure { path, line })
        }
        other => Err(other),
    }
}
