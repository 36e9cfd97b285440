//! dagscan - static inventory of Airflow DAG artifacts
//!
//! dagscan parses workflow definition files, finds variables bound to workflow
//! declarations (`dag = DAG("orders_etl", ...)`), and reports the artifact path
//! each remote task attached to those workflows runs
//! (`KubernetesPodOperator(dag=dag, arguments=[..., "etl/orders/load.py"])`).
//!
//! # Example Usage
//!
//! ```no_run
//! use dagscan::{FileScanner, ScanConfig};
//! use std::path::Path;
//!
//! let scanner = FileScanner::new(ScanConfig::default());
//! let report = scanner.scan_directory(Path::new("prod/dags")).unwrap();
//! for record in &report.records {
//!     println!(
//!         "{}\t{}\t{}",
//!         record.source_file.display(),
//!         record.workflow_name,
//!         record.artifact_path
//!     );
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`analyzer`]: syntax trees, literal reconstruction, bindings and task resolution
//! - [`scan`]: per-file and directory drivers, extraction records
//! - [`cli`]: argument parsing and output formatting
//! - [`config`]: analysis markers and environment configuration

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod fs;
pub mod scan;
pub mod util;

pub use analyzer::{analyze_source, AnalysisError, BindingTable, Literal, ParseError, TaskPath};
pub use config::{ConfigError, DagscanConfig, Markers};
pub use scan::{ExtractionRecord, FileScanner, ScanConfig, ScanReport, SkippedFile};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
