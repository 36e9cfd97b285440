//! Python syntax trees via tree-sitter-python.
//!
//! tree-sitter recovers from malformed input instead of failing, so a tree that
//! contains any `ERROR` or `MISSING` node is reported as a [`ParseError`].
//!
//! The grammar is also more permissive than CPython in a few places. These
//! are rejected after parsing:
//!
//! - Python 2 `print` and `exec` statements
//! - positional arguments after keyword arguments (`f(a=1, b)`)
//! - positional or `*` arguments after `**` unpacking (`f(**kw, *rest)`)
//!
//! Anything else the grammar accepts is analyzed, even where CPython's
//! compiler would reject it later (e.g. `return` outside a function).

use thiserror::Error;
use tree_sitter::{Node, Parser, Tree};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("failed to load Python grammar: {0}")]
    Language(String),

    #[error("parser produced no tree")]
    Aborted,

    #[error("syntax error at line {line}, column {column}")]
    Syntax { line: usize, column: usize },
}

/// A parsed source file together with the text its nodes point into.
#[derive(Debug)]
pub struct SourceTree {
    source: String,
    tree: Tree,
}

impl SourceTree {
    pub fn parse(source: impl Into<String>) -> Result<Self, ParseError> {
        let source = source.into();

        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| ParseError::Language(e.to_string()))?;

        let tree = parser.parse(&source, None).ok_or(ParseError::Aborted)?;

        let root = tree.root_node();
        let offending = if root.has_error() {
            Some(
                Preorder::new(root)
                    .find(|node| node.is_error() || node.is_missing())
                    .unwrap_or(root),
            )
        } else {
            Preorder::new(root).find(|node| !conforms(*node))
        };
        if let Some(node) = offending {
            let position = node.start_position();
            return Err(ParseError::Syntax {
                line: position.row + 1,
                column: position.column + 1,
            });
        }

        Ok(Self { source, tree })
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Source text spanned by `node`.
    pub fn text(&self, node: Node<'_>) -> &str {
        self.source.get(node.byte_range()).unwrap_or_default()
    }

    /// Every node of the file in source (pre-order) order.
    pub fn nodes(&self) -> Preorder<'_> {
        Preorder::new(self.root())
    }

    /// Every node of `kind`, in source order.
    pub fn nodes_of_kind<'t>(&'t self, kind: &'static str) -> impl Iterator<Item = Node<'t>> + 't {
        self.nodes().filter(move |node| node.kind() == kind)
    }

    /// Name of a bare identifier node (`ast.Name`), `None` for any other shape.
    pub fn identifier(&self, node: Node<'_>) -> Option<&str> {
        (node.kind() == "identifier").then(|| self.text(node))
    }

    /// Callee name of a `call` node whose function is a bare identifier.
    pub fn callee_name(&self, call: Node<'_>) -> Option<&str> {
        if call.kind() != "call" {
            return None;
        }
        self.identifier(unwrap_parens(call.child_by_field_name("function")?))
    }

    /// Splits a `call` node's arguments into positional and keyword arguments.
    pub fn call_arguments<'t>(&'t self, call: Node<'t>) -> CallArguments<'t> {
        let mut arguments = CallArguments::default();
        let Some(list) = call.child_by_field_name("arguments") else {
            return arguments;
        };

        // `f(x for x in xs)` carries a bare generator instead of an argument list
        if list.kind() == "generator_expression" {
            arguments.positional.push(list);
            return arguments;
        }

        for child in significant_children(list) {
            match child.kind() {
                "keyword_argument" => {
                    let name = child
                        .child_by_field_name("name")
                        .map(|name| self.text(name));
                    if let (Some(name), Some(value)) = (name, child.child_by_field_name("value")) {
                        arguments.keywords.push((name, value));
                    }
                }
                "dictionary_splat" => {}
                _ => arguments.positional.push(child),
            }
        }

        arguments
    }
}

/// Arguments of one call site, in source order.
#[derive(Debug, Default)]
pub struct CallArguments<'t> {
    pub positional: Vec<Node<'t>>,
    pub keywords: Vec<(&'t str, Node<'t>)>,
}

impl<'t> CallArguments<'t> {
    /// Value of keyword `name`; the last occurrence wins.
    pub fn keyword(&self, name: &str) -> Option<Node<'t>> {
        self.keywords
            .iter()
            .rev()
            .find(|(keyword, _)| *keyword == name)
            .map(|(_, value)| *value)
    }
}

/// Named children of `node`, minus comments.
pub fn significant_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let children = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect();
    children
}

/// Strips grouping parentheses: `((w))` is `w`.
///
/// A single-element `tuple_pattern` without a trailing comma is the same
/// grouping on the target side of an assignment (`(w) = ...`).
pub fn unwrap_parens(node: Node<'_>) -> Node<'_> {
    let mut current = node;
    loop {
        let grouped = match current.kind() {
            "parenthesized_expression" => true,
            "tuple_pattern" => !has_child_kind(current, ","),
            _ => false,
        };
        if !grouped {
            return current;
        }
        match significant_children(current).as_slice() {
            [inner] => current = *inner,
            _ => return current,
        }
    }
}

fn has_child_kind(node: Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|child| child.kind() == kind);
    found
}

/// Whether `node` is valid Python beyond what the grammar itself enforces.
fn conforms(node: Node<'_>) -> bool {
    match node.kind() {
        "print_statement" | "exec_statement" => false,
        "argument_list" => argument_order_is_valid(node),
        _ => true,
    }
}

/// CPython's ordering rules: no positional argument after a keyword
/// argument or `**`, and no `*` unpacking after `**`.
fn argument_order_is_valid(list: Node<'_>) -> bool {
    let mut seen_keyword = false;
    let mut seen_dictionary_splat = false;

    for child in significant_children(list) {
        match child.kind() {
            "keyword_argument" => seen_keyword = true,
            "dictionary_splat" => seen_dictionary_splat = true,
            "list_splat" if seen_dictionary_splat => return false,
            "list_splat" => {}
            _ if seen_keyword || seen_dictionary_splat => return false,
            _ => {}
        }
    }
    true
}

/// Explicit-stack pre-order traversal, so deeply nested files cannot exhaust
/// the call stack.
pub struct Preorder<'t> {
    stack: Vec<Node<'t>>,
}

impl<'t> Preorder<'t> {
    pub fn new(root: Node<'t>) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'t> Iterator for Preorder<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
        self.stack.extend(children.into_iter().rev());
        Some(node)
    }
}
