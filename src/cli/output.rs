//! Output formatting for scan reports
//!
//! `tsv` and `csv` emit one line per extraction record; `json` and `yaml`
//! serialize the whole [`ScanReport`], including skipped files and timings.
//!
//! # Example
//!
//! ```
//! use dagscan::cli::output::{OutputFormat, OutputFormatter};
//! use dagscan::scan::ScanReport;
//!
//! let report = ScanReport::new("prod/dags");
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! let output = formatter.format(&report).unwrap();
//! assert!(output.contains("\"records\""));
//! ```

use anyhow::{Context, Result};
use std::borrow::Cow;
use std::fmt::Write;

use crate::scan::ScanReport;

const CSV_HEADER: &str = "source_file,workflow_name,artifact_path";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tab-separated `file, workflow, path`, no header
    Tsv,
    /// Comma-separated with a header row
    Csv,
    /// JSON report (machine-readable)
    Json,
    /// YAML report
    Yaml,
}

/// Output formatter for scan reports
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, report: &ScanReport) -> Result<String> {
        match self.format {
            OutputFormat::Tsv => Ok(self.format_tsv(report)),
            OutputFormat::Csv => Ok(self.format_csv(report)),
            OutputFormat::Json => self.format_json(report),
            OutputFormat::Yaml => self.format_yaml(report),
        }
    }

    fn format_tsv(&self, report: &ScanReport) -> String {
        let mut output = String::new();
        for record in &report.records {
            let _ = writeln!(
                output,
                "{}\t{}\t{}",
                record.source_file.display(),
                record.workflow_name,
                record.artifact_path
            );
        }
        output
    }

    fn format_csv(&self, report: &ScanReport) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "{}", CSV_HEADER);
        for record in &report.records {
            let source_file = record.source_file.display().to_string();
            let _ = writeln!(
                output,
                "{},{},{}",
                csv_field(&source_file),
                csv_field(&record.workflow_name),
                csv_field(&record.artifact_path)
            );
        }
        output
    }

    fn format_json(&self, report: &ScanReport) -> Result<String> {
        let mut json =
            serde_json::to_string_pretty(report).context("Failed to serialize scan report to JSON")?;
        json.push('\n');
        Ok(json)
    }

    fn format_yaml(&self, report: &ScanReport) -> Result<String> {
        serde_yaml::to_string(report).context("Failed to serialize scan report to YAML")
    }
}

/// Quotes a CSV field when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
