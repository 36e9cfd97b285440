//! Drives the analyzer over files and directory trees.

pub mod report;
pub mod scanner;

pub use report::{ExtractionRecord, ScanReport, SkippedFile};
pub use scanner::{FileScanner, ScanConfig};
