//! Resolves remote task declarations to `(workflow, artifact path)` pairs.

use super::bindings::BindingTable;
use super::literal::{reconstruct, Literal};
use super::syntax::{significant_children, unwrap_parens, SourceTree};
use crate::config::Markers;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;
use tree_sitter::Node;

/// Artifact path found on one task call, attributed to its workflow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskPath {
    pub workflow_name: String,
    pub path: String,
}

/// Why a task call produced no [`TaskPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum Skip {
    NoWorkflowKeyword,
    WorkflowNotAName,
    UnboundWorkflow(String),
    NoArgumentsKeyword,
    ArgumentsNotAList,
    TooFewArguments(usize),
    DynamicPath,
    OutsidePrefix(String),
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skip::NoWorkflowKeyword => write!(f, "no workflow keyword"),
            Skip::WorkflowNotAName => write!(f, "workflow keyword is not a plain name"),
            Skip::UnboundWorkflow(name) => write!(f, "'{}' is not a known workflow", name),
            Skip::NoArgumentsKeyword => write!(f, "no arguments keyword"),
            Skip::ArgumentsNotAList => write!(f, "arguments keyword is not a list literal"),
            Skip::TooFewArguments(len) => write!(f, "argument list has only {} elements", len),
            Skip::DynamicPath => write!(f, "artifact path is not a literal"),
            Skip::OutsidePrefix(path) => write!(f, "'{}' is outside the artifact prefix", path),
        }
    }
}

/// Finds every task call bound to a known workflow and extracts its artifact path.
///
/// Calls are visited in source order, nested calls included. Calls that do not
/// fit the expected shape are skipped silently.
pub fn resolve_task_paths(tree: &SourceTree, bindings: &BindingTable, markers: &Markers) -> Vec<TaskPath> {
    tree.nodes_of_kind("call")
        .filter(|call| tree.callee_name(*call) == Some(markers.task_operator.as_str()))
        .filter_map(|call| match resolve_call(tree, call, bindings, markers) {
            Ok(task_path) => Some(task_path),
            Err(skip) => {
                trace!(
                    line = call.start_position().row + 1,
                    reason = %skip,
                    "Skipping task call"
                );
                None
            }
        })
        .collect()
}

fn resolve_call(
    tree: &SourceTree,
    call: Node<'_>,
    bindings: &BindingTable,
    markers: &Markers,
) -> Result<TaskPath, Skip> {
    let arguments = tree.call_arguments(call);

    let workflow_node = arguments
        .keyword(&markers.workflow_keyword)
        .ok_or(Skip::NoWorkflowKeyword)?;
    let variable = tree
        .identifier(unwrap_parens(workflow_node))
        .ok_or(Skip::WorkflowNotAName)?;
    let workflow_name = bindings
        .get(variable)
        .ok_or_else(|| Skip::UnboundWorkflow(variable.to_string()))?;

    let list = arguments
        .keyword(&markers.arguments_keyword)
        .map(unwrap_parens)
        .ok_or(Skip::NoArgumentsKeyword)?;
    if list.kind() != "list" {
        return Err(Skip::ArgumentsNotAList);
    }
    let elements = significant_children(list);
    let candidate = elements
        .get(markers.path_index)
        .copied()
        .ok_or(Skip::TooFewArguments(elements.len()))?;

    let path = match reconstruct(tree, candidate) {
        Literal::Value(path) => path,
        Literal::Dynamic => return Err(Skip::DynamicPath),
    };
    if !path.starts_with(&markers.path_prefix) {
        return Err(Skip::OutsidePrefix(path));
    }

    Ok(TaskPath {
        workflow_name: workflow_name.to_string(),
        path,
    })
}
