//! Literal reconstruction: folds string constants and `+` concatenations back
//! into a concrete string.
//!
//! Anything the analyzer cannot evaluate without running the program
//! (names, calls, f-strings, attribute access, numbers, ...) collapses to
//! [`Literal::Dynamic`]. Dynamic is an ordinary outcome, not an error.

use super::syntax::{significant_children, SourceTree};
use serde::{Deserialize, Serialize};
use std::fmt;
use tree_sitter::Node;

/// Result of reconstructing an expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Literal {
    /// The expression always evaluates to this string
    Value(String),
    /// Not statically determinable
    Dynamic,
}

impl Literal {
    pub fn value(value: impl Into<String>) -> Self {
        Literal::Value(value.into())
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Literal::Dynamic)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Value(value) => Some(value),
            Literal::Dynamic => None,
        }
    }

    pub fn into_value(self) -> Option<String> {
        match self {
            Literal::Value(value) => Some(value),
            Literal::Dynamic => None,
        }
    }

    /// `self + other`; dynamic on either side makes the whole thing dynamic.
    pub fn concat(self, other: Literal) -> Literal {
        match (self, other) {
            (Literal::Value(mut left), Literal::Value(right)) => {
                left.push_str(&right);
                Literal::Value(left)
            }
            _ => Literal::Dynamic,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Value(value) => write!(f, "{:?}", value),
            Literal::Dynamic => write!(f, "<dynamic>"),
        }
    }
}

/// Reconstructs the string value of `node`.
///
/// An expression built only from string literals, parentheses and `+` is a
/// left-to-right concatenation of its leaves, so the leaves are visited in
/// order with an explicit stack and the first non-literal leaf settles the
/// result as dynamic.
pub fn reconstruct(tree: &SourceTree, node: Node<'_>) -> Literal {
    let mut value = String::new();
    let mut pending = vec![node];

    while let Some(node) = pending.pop() {
        match node.kind() {
            "string" => match string_value(tree, node) {
                Some(part) => value.push_str(&part),
                None => return Literal::Dynamic,
            },
            // Adjacent literals ("a" "b") are a single constant in Python
            "concatenated_string" => {
                for part in significant_children(node) {
                    match string_value(tree, part) {
                        Some(part) => value.push_str(&part),
                        None => return Literal::Dynamic,
                    }
                }
            }
            "parenthesized_expression" => match significant_children(node).as_slice() {
                [inner] => pending.push(*inner),
                _ => return Literal::Dynamic,
            },
            "binary_operator" if is_addition(node) => {
                match (
                    node.child_by_field_name("left"),
                    node.child_by_field_name("right"),
                ) {
                    (Some(left), Some(right)) => {
                        pending.push(right);
                        pending.push(left);
                    }
                    _ => return Literal::Dynamic,
                }
            }
            _ => return Literal::Dynamic,
        }
    }

    Literal::Value(value)
}

fn is_addition(node: Node<'_>) -> bool {
    node.child_by_field_name("operator")
        .is_some_and(|operator| operator.kind() == "+")
}

/// Value of a single `string` node; `None` for f-strings, byte strings and
/// escapes that cannot be decoded statically.
fn string_value(tree: &SourceTree, node: Node<'_>) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }

    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    let start = children.first().filter(|c| c.kind() == "string_start")?;
    let end = children.last().filter(|c| c.kind() == "string_end")?;
    if children.iter().any(|c| c.kind() == "interpolation") {
        return None;
    }

    let prefix = tree
        .text(*start)
        .trim_end_matches(['"', '\''])
        .to_ascii_lowercase();
    if prefix.contains('f') || prefix.contains('b') {
        return None;
    }

    let raw = tree
        .source()
        .get(start.end_byte()..end.start_byte())?
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    if prefix.contains('r') {
        Some(raw)
    } else {
        decode_escapes(&raw)
    }
}

/// Decodes backslash escapes the way the Python tokenizer does for `str`
/// literals. Unknown escapes are kept verbatim.
///
/// Unlike Python, `\N{NAME}` is not decoded: no Unicode name table is
/// carried, so the literal is reported as dynamic (`None`).
fn decode_escapes(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some(escape) = chars.next() else {
            out.push('\\');
            break;
        };

        match escape {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut code = escape.to_digit(8)?;
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            code = code * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(code)?);
            }
            'x' => out.push(hex_escape(&mut chars, 2)?),
            'u' => out.push(hex_escape(&mut chars, 4)?),
            'U' => out.push(hex_escape(&mut chars, 8)?),
            'N' => return None,
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    Some(out)
}

fn hex_escape(chars: &mut impl Iterator<Item = char>, digits: usize) -> Option<char> {
    let mut code = 0u32;
    for _ in 0..digits {
        code = code * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(code)
}
