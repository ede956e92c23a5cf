//! Owned syntax tree model.
//!
//! The node keeps the grammar kind as a plain string together with the
//! source span and, for leaves, the source text. Children are stored as
//! [`DeepTree`] slots so that a failed sub-build can occupy a tree position
//! exactly the way a successful sub-tree does; visitors can tell the two
//! apart at every position.

use crate::errors::BuildError;
use crate::model::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Maximum leaf text length rendered by [`AstNode::to_sexp`].
const MAX_SEXP_TEXT: usize = 60;

/// A single syntax tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstNode {
    /// Grammar kind, e.g. `program`, `call_expression`, `identifier`.
    pub kind: String,

    /// Location within the file this node was parsed from.
    pub span: Span,

    /// Source text, captured for leaf nodes only (identifiers, literal
    /// fragments, operators surfaced as named nodes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Ordered named children, in document order.
    #[serde(default)]
    pub children: Vec<DeepTree>,
}

/// A built (sub-)tree: either a valid node or the failure value of the
/// build that should have produced one.
///
/// The builder returns this at its boundary, and every child slot of
/// [`AstNode`] has this type, so failures from nested imports are embedded
/// in place rather than short-circuiting the parent build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeepTree {
    Node(AstNode),
    Failure(BuildError),
}

impl AstNode {
    /// Render the tree as a compact s-expression for debugging and
    /// structural assertions. Leaves carry their source text, truncated to
    /// keep dumps readable; embedded failures render as `(failure ...)`.
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(&mut out);
        out
    }

    fn write_sexp(&self, out: &mut String) {
        out.push('(');
        out.push_str(&self.kind);
        if let Some(text) = &self.text {
            let _ = write!(out, " '{}'", escape_text(text));
        }
        for child in &self.children {
            out.push(' ');
            match child {
                DeepTree::Node(n) => n.write_sexp(out),
                DeepTree::Failure(e) => {
                    let _ = write!(out, "(failure '{}')", escape_text(&e.to_string()));
                }
            }
        }
        out.push(')');
    }
}

impl DeepTree {
    /// The contained node, if this position holds a valid sub-tree.
    pub fn as_node(&self) -> Option<&AstNode> {
        match self {
            DeepTree::Node(n) => Some(n),
            DeepTree::Failure(_) => None,
        }
    }

    /// Consume into the contained node, if any.
    pub fn into_node(self) -> Option<AstNode> {
        match self {
            DeepTree::Node(n) => Some(n),
            DeepTree::Failure(_) => None,
        }
    }

    /// The contained failure, if this position holds one.
    pub fn as_failure(&self) -> Option<&BuildError> {
        match self {
            DeepTree::Node(_) => None,
            DeepTree::Failure(e) => Some(e),
        }
    }

    /// Whether this position holds a failure (the root value itself; see
    /// [`DeepTree::failures`] for embedded ones).
    pub fn is_failure(&self) -> bool {
        matches!(self, DeepTree::Failure(_))
    }

    /// Collect every failure embedded anywhere in the tree, in document
    /// order. The builder never propagates nested failures upward; this
    /// lets the caller decide whether any embedded failure should count as
    /// overall failure.
    pub fn failures(&self) -> Vec<&BuildError> {
        let mut out = Vec::new();
        self.collect_failures(&mut out);
        out
    }

    fn collect_failures<'a>(&'a self, out: &mut Vec<&'a BuildError>) {
        match self {
            DeepTree::Failure(e) => out.push(e),
            DeepTree::Node(n) => {
                for child in &n.children {
                    child.collect_failures(out);
                }
            }
        }
    }
}

/// Escape and trim leaf text for s-expression dumps.
fn escape_text(text: &str) -> String {
    let mut t = text
        .replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
        .replace('\'', "\\'");
    if t.len() > MAX_SEXP_TEXT {
        let cut = (0..=MAX_SEXP_TEXT)
            .rev()
            .find(|&i| t.is_char_boundary(i))
            .unwrap_or(0);
        t.truncate(cut);
        t.push('…');
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(kind: &str, text: &str) -> DeepTree {
        DeepTree::Node(AstNode {
            kind: kind.to_string(),
            span: Span::new(1, 1, 0, text.len()),
            text: Some(text.to_string()),
            children: Vec::new(),
        })
    }

    #[test]
    fn sexp_renders_leaves_and_failures() {
        let tree = AstNode {
            kind: "program".into(),
            span: Span::new(1, 1, 0, 5),
            text: None,
            children: vec![
                leaf("identifier", "x"),
                DeepTree::Failure(BuildError::Io {
                    path: "a.js".into(),
                    message: "gone".into(),
                }),
            ],
        };
        let sexp = tree.to_sexp();
        assert!(sexp.starts_with("(program (identifier 'x') (failure "));
    }

    #[test]
    fn failures_scan_is_deep_and_ordered() {
        let inner = AstNode {
            kind: "program".into(),
            span: Span::new(1, 1, 0, 0),
            text: None,
            children: vec![DeepTree::Failure(BuildError::Cycle {
                path: "b.js".into(),
            })],
        };
        let root = DeepTree::Node(AstNode {
            kind: "program".into(),
            span: Span::new(1, 2, 0, 10),
            text: None,
            children: vec![
                DeepTree::Failure(BuildError::Io {
                    path: "a.js".into(),
                    message: "gone".into(),
                }),
                DeepTree::Node(inner),
            ],
        });
        let failures = root.failures();
        assert_eq!(failures.len(), 2);
        assert!(matches!(failures[0], BuildError::Io { .. }));
        assert!(matches!(failures[1], BuildError::Cycle { .. }));
    }

    #[test]
    fn root_failure_is_its_own_scan_result() {
        let root = DeepTree::Failure(BuildError::Parse {
            path: "x.js".into(),
            message: "syntax error at 1:1".into(),
        });
        assert!(root.is_failure());
        assert_eq!(root.failures().len(), 1);
    }
}
