use super::report::{ExtractionRecord, ScanReport, SkippedFile};
use crate::analyzer::{build_bindings, resolve_task_paths, AnalysisError, SourceTree};
use crate::config::{DagscanConfig, Markers, DEFAULT_EXTENSION};
use crate::fs::{FileSystem, RealFileSystem};
use ignore::WalkBuilder;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub markers: Markers,
    pub extensions: Vec<String>,
    pub respect_gitignore: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            markers: Markers::default(),
            extensions: vec![DEFAULT_EXTENSION.to_string()],
            respect_gitignore: false,
        }
    }
}

impl From<&DagscanConfig> for ScanConfig {
    fn from(config: &DagscanConfig) -> Self {
        Self {
            markers: config.markers.clone(),
            extensions: config.extensions.clone(),
            respect_gitignore: config.respect_gitignore,
        }
    }
}

/// Runs the analyzer over single files or whole directory trees.
///
/// Nothing is shared between files: each file gets its own syntax tree and
/// binding table, both dropped once its records are built. Single files are
/// read through `F`; directory scans need [`RealFileSystem`].
pub struct FileScanner<F: FileSystem = RealFileSystem> {
    fs: F,
    config: ScanConfig,
}

impl<F: FileSystem> FileScanner<F> {
    pub fn with_fs(fs: F, config: ScanConfig) -> Self {
        Self { fs, config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Reads, parses and analyzes one file.
    pub fn scan_file(&self, path: &Path) -> Result<Vec<ExtractionRecord>, AnalysisError> {
        let source = self
            .fs
            .read_to_string(path)
            .map_err(|source| AnalysisError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        self.scan_source(path, &source)
    }

    /// Analyzes `source` as if it had been read from `path`.
    pub fn scan_source(&self, path: &Path, source: &str) -> Result<Vec<ExtractionRecord>, AnalysisError> {
        let tree = SourceTree::parse(source).map_err(|source| AnalysisError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let markers = &self.config.markers;
        let bindings = build_bindings(&tree, markers);
        let task_paths = resolve_task_paths(&tree, &bindings, markers);

        debug!(
            path = %path.display(),
            bindings = bindings.len(),
            records = task_paths.len(),
            "Scanned file"
        );

        Ok(task_paths
            .into_iter()
            .map(|task_path| ExtractionRecord {
                source_file: path.to_path_buf(),
                workflow_name: task_path.workflow_name,
                artifact_path: task_path.path,
            })
            .collect())
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.config.extensions.iter().any(|known| known == ext))
    }

    fn record_failure(&self, report: &mut ScanReport, path: &Path, err: AnalysisError) {
        warn!(path = %path.display(), error = %err, "Skipping file");
        report.skipped.push(SkippedFile {
            path: path.to_path_buf(),
            reason: err.to_string(),
        });
    }
}

/// Directory scans walk the disk with `ignore`, so they are only available
/// on the real file system.
impl FileScanner<RealFileSystem> {
    pub fn new(config: ScanConfig) -> Self {
        Self::with_fs(RealFileSystem::new(), config)
    }

    /// Scans every matching file under `root`, in lexicographic order.
    ///
    /// Files that cannot be read or parsed, and directory entries the walker
    /// cannot open, are logged and listed in [`ScanReport::skipped`]; only a
    /// missing root is fatal.
    pub fn scan_directory(&self, root: &Path) -> Result<ScanReport, AnalysisError> {
        if !self.fs.exists(root) {
            return Err(AnalysisError::PathNotFound(root.to_path_buf()));
        }

        let start = Instant::now();
        let mut report = ScanReport::new(root);

        info!(
            root = %root.display(),
            extensions = ?self.config.extensions,
            respect_gitignore = self.config.respect_gitignore,
            "Starting scan"
        );

        for result in WalkBuilder::new(root)
            .standard_filters(self.config.respect_gitignore)
            .hidden(false)
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build()
        {
            let entry = match result {
                Ok(e) => e,
                Err(err) => {
                    let path = walk_error_path(&err).unwrap_or(root).to_path_buf();
                    self.record_failure(&mut report, &path, AnalysisError::Walk(err.to_string()));
                    continue;
                }
            };
            let path = entry.path();

            if !self.fs.is_file(path) || !self.has_source_extension(path) {
                continue;
            }
            report.files_scanned += 1;

            match self.scan_file(path) {
                Ok(records) => report.records.extend(records),
                Err(err) if err.is_per_file() => self.record_failure(&mut report, path, err),
                Err(err) => return Err(err),
            }
        }

        report.scan_time_ms = start.elapsed().as_millis() as u64;

        info!(
            records = report.records.len(),
            files_scanned = report.files_scanned,
            skipped = report.skipped.len(),
            scan_time_ms = report.scan_time_ms,
            "Scan completed: {}",
            report.summary()
        );

        Ok(report)
    }
}

/// Path the walker was visiting when `err` occurred, if it recorded one.
fn walk_error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            walk_error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child),
        _ => None,
    }
}
