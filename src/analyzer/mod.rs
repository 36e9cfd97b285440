//! Static analysis of workflow definition files.
//!
//! A file is analyzed in two explicit phases over the same syntax tree:
//!
//! 1. [`build_bindings`] collects `variable → workflow name` from workflow
//!    declarations anywhere in the file.
//! 2. [`resolve_task_paths`] visits every task call, looks its workflow
//!    variable up in the finished table and reconstructs the artifact path.
//!
//! Collecting all bindings before resolving any reference keeps the
//! last-declaration-wins rule independent of where the task calls sit.

pub mod bindings;
pub mod error;
pub mod literal;
pub mod syntax;
pub mod tasks;

pub use bindings::{build_bindings, BindingTable};
pub use error::AnalysisError;
pub use literal::{reconstruct, Literal};
pub use syntax::{ParseError, SourceTree};
pub use tasks::{resolve_task_paths, TaskPath};

use crate::config::Markers;

/// Parses `source` and runs both analysis phases over it.
pub fn analyze_source(source: &str, markers: &Markers) -> Result<Vec<TaskPath>, ParseError> {
    let tree = SourceTree::parse(source)?;
    let bindings = build_bindings(&tree, markers);
    Ok(resolve_task_paths(&tree, &bindings, markers))
}
