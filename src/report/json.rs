use super::RunSummary;

pub fn to_json(summary: &RunSummary) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{GroupSummary, ReportOutcome};
    use crate::scan::AnalysisFailure;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    #[test]
    fn json_summary_carries_outcome_and_rule_counts() {
        let mut summary = RunSummary::default();
        summary.record(GroupSummary {
            group: "Todo".to_string(),
            report: PathBuf::from("TODO_UNIT_TEST_VERIFICATION_REPORT.md"),
            outcome: ReportOutcome::Written,
            violations: 2,
            rules: BTreeMap::from([(1, 1), (10, 1)]),
            sha256: Some("abc".to_string()),
            failed_files: vec![AnalysisFailure {
                path: PathBuf::from("AddTodoTest.java"),
                line: 3,
            }],
            findings: Vec::new(),
        });

        let rendered = to_json(&summary).expect("json should serialize");
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
        assert_eq!(
            value["created"][0],
            "TODO_UNIT_TEST_VERIFICATION_REPORT.md"
        );
        assert_eq!(value["groups"][0]["outcome"], "written");
        assert_eq!(value["groups"][0]["rules"]["10"], 1);
        assert_eq!(value["groups"][0]["sha256"], "abc");
        assert_eq!(value["groups"][0]["failed_files"][0]["line"], 3);
    }
}
