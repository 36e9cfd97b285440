//! Records produced by a scan and the report that aggregates them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One workflow-to-artifact fact, attributed to the file it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtractionRecord {
    pub source_file: PathBuf,
    pub workflow_name: String,
    pub artifact_path: String,
}

/// A file the scan could not analyze.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything a directory scan found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub root: PathBuf,
    pub records: Vec<ExtractionRecord>,
    pub files_scanned: usize,
    pub skipped: Vec<SkippedFile>,
    pub scan_time_ms: u64,
}

impl ScanReport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Artifact paths per workflow name, in first-seen order per workflow.
    pub fn workflows(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut workflows: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for record in &self.records {
            let paths = workflows.entry(record.workflow_name.as_str()).or_default();
            if !paths.contains(&record.artifact_path.as_str()) {
                paths.push(record.artifact_path.as_str());
            }
        }
        workflows
    }

    pub fn summary(&self) -> String {
        format!(
            "{} records from {} files, {} skipped",
            self.records.len(),
            self.files_scanned,
            self.skipped.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(file: &str, workflow: &str, path: &str) -> ExtractionRecord {
        ExtractionRecord {
            source_file: PathBuf::from(file),
            workflow_name: workflow.to_string(),
            artifact_path: path.to_string(),
        }
    }

    #[test]
    fn test_workflows_groups_and_dedups() {
        let mut report = ScanReport::new("/repo");
        report.records = vec![
            record("b.py", "orders", "etl/orders/load.py"),
            record("a.py", "billing", "etl/billing/run.py"),
            record("c.py", "orders", "etl/orders/extract.py"),
            record("d.py", "orders", "etl/orders/load.py"),
        ];

        let workflows = report.workflows();
        let names: Vec<&str> = workflows.keys().copied().collect();
        assert_eq!(names, vec!["billing", "orders"]);
        assert_eq!(
            workflows["orders"],
            vec!["etl/orders/load.py", "etl/orders/extract.py"]
        );
    }

    #[test]
    fn test_summary() {
        let mut report = ScanReport::new("/repo");
        report.records.push(record("a.py", "orders", "etl/x.py"));
        report.files_scanned = 2;
        report.skipped.push(SkippedFile {
            path: PathBuf::from("bad.py"),
            reason: "syntax error".to_string(),
        });

        assert_eq!(report.summary(), "1 records from 2 files, 1 skipped");
    }

    #[test]
    fn test_report_serializes() {
        let mut report = ScanReport::new("/repo");
        report.records.push(record("/repo/a.py", "orders", "etl/x.py"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["records"][0]["workflow_name"], "orders");
        assert_eq!(json["records"][0]["artifact_path"], "etl/x.py");
        assert_eq!(json["root"], "/repo");
    }
}
