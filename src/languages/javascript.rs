//! `require` call detection for JavaScript trees.
//!
//! IO-free: the predicates inspect the owned tree only. A node counts as an
//! import call when it is a `call_expression` whose callee is the bare
//! identifier `require` and whose first argument is a string literal.
//! Member-expression callees (`foo.require(...)`), template literals, and
//! non-string first arguments are not import calls.

use crate::model::ast::{AstNode, DeepTree};

/// Extract the specifier if `node` is an import call.
///
/// String content is the concatenation of the literal's `string_fragment`
/// children; escape sequences are kept as written, and an empty literal
/// yields an empty specifier.
pub fn import_specifier(node: &AstNode) -> Option<String> {
    if node.kind != "call_expression" {
        return None;
    }

    let mut slots = significant_children(node);
    let callee = slots.next()?;
    if callee.kind != "identifier" || callee.text.as_deref() != Some("require") {
        return None;
    }

    let arguments = slots.next()?;
    if arguments.kind != "arguments" {
        return None;
    }

    let first = significant_children(arguments).next()?;
    if first.kind != "string" {
        return None;
    }
    Some(string_content(first))
}

/// Named children that carry structure; comments can appear anywhere in the
/// grammar and must not shift argument positions.
fn significant_children(node: &AstNode) -> impl Iterator<Item = &AstNode> {
    node.children
        .iter()
        .filter_map(DeepTree::as_node)
        .filter(|n| n.kind != "comment")
}

fn string_content(string: &AstNode) -> String {
    string
        .children
        .iter()
        .filter_map(DeepTree::as_node)
        .filter(|n| n.kind == "string_fragment")
        .filter_map(|n| n.text.as_deref())
        .collect()
}
