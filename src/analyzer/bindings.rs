//! File-local table of `variable → workflow name` bindings.

use super::literal::reconstruct;
use super::syntax::{unwrap_parens, SourceTree};
use crate::config::Markers;
use std::collections::HashMap;
use tracing::trace;
use tree_sitter::Node;

/// Workflow bindings declared in one file.
///
/// Holds at most one workflow name per variable; a later declaration
/// overwrites an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingTable {
    bindings: HashMap<String, String>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `variable` to `workflow`, returning the name it was bound to before.
    pub fn insert(&mut self, variable: impl Into<String>, workflow: impl Into<String>) -> Option<String> {
        self.bindings.insert(variable.into(), workflow.into())
    }

    pub fn get(&self, variable: &str) -> Option<&str> {
        self.bindings.get(variable).map(String::as_str)
    }

    pub fn contains(&self, variable: &str) -> bool {
        self.bindings.contains_key(variable)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Collects every `name = DAG("workflow", ...)` assignment in the file.
///
/// Assignments are visited in source order wherever they appear (module
/// level, function bodies, class bodies, ...), so the last declaration of a
/// variable is the one that sticks. Annotated assignments are not
/// declarations, and targets other than plain names are never bound.
pub fn build_bindings(tree: &SourceTree, markers: &Markers) -> BindingTable {
    let mut table = BindingTable::new();

    for statement in tree.nodes_of_kind("assignment") {
        // Inner links of `a = b = DAG(...)` are handled with their outermost assignment
        if statement
            .parent()
            .is_some_and(|parent| parent.kind() == "assignment")
        {
            continue;
        }

        let Some((targets, value)) = assignment_chain(statement) else {
            continue;
        };
        if tree.callee_name(value) != Some(markers.workflow_constructor.as_str()) {
            continue;
        }

        let arguments = tree.call_arguments(value);
        let Some(first) = arguments.positional.first() else {
            continue;
        };
        let Some(workflow) = reconstruct(tree, *first).into_value() else {
            trace!(
                line = statement.start_position().row + 1,
                "Ignoring workflow declaration with a dynamic name"
            );
            continue;
        };

        for target in targets {
            if let Some(variable) = tree.identifier(unwrap_parens(target)) {
                if let Some(previous) = table.insert(variable, workflow.as_str()) {
                    trace!(variable, previous = %previous, workflow = %workflow, "Rebinding workflow variable");
                }
            }
        }
    }

    table
}

/// Targets and assigned value of a plain (possibly chained) assignment.
fn assignment_chain(statement: Node<'_>) -> Option<(Vec<Node<'_>>, Node<'_>)> {
    let mut targets = Vec::new();
    let mut current = statement;

    loop {
        if current.child_by_field_name("type").is_some() {
            return None;
        }
        targets.push(current.child_by_field_name("left")?);

        let right = current.child_by_field_name("right")?;
        if right.kind() == "assignment" {
            current = right;
        } else {
            return Some((targets, unwrap_parens(right)));
        }
    }
}
