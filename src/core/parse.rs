//! Parsing layer: tree-sitter orchestration and CST lowering.
//!
//! A fresh parser is constructed per call and nothing is cached between
//! invocations. The grammar is error-tolerant and never "throws" on bad
//! input, so syntactic failures are detected by scanning the parsed tree
//! for error/missing nodes and reported as [`BuildError::Parse`] with the
//! first offending `line:column` location.

use crate::errors::BuildError;
use crate::model::ast::{AstNode, DeepTree};
use crate::model::span::Span;
use std::fs;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};

/// Default source extension appended to extension-less paths.
pub const DEFAULT_EXTENSION: &str = "js";

/// Append the default extension when the filename has none.
pub fn with_default_extension(path: &Path) -> PathBuf {
    if path.extension().is_none() {
        let mut p = path.to_path_buf();
        p.set_extension(DEFAULT_EXTENSION);
        p
    } else {
        path.to_path_buf()
    }
}

/// Read file contents, converting any I/O failure into a value.
pub fn read_source(path: &Path) -> Result<String, BuildError> {
    fs::read_to_string(path).map_err(|e| BuildError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parse a single file into its (shallow) syntax tree: normalize the
/// extension, read, parse, lower.
pub fn parse_file(path: &Path) -> Result<AstNode, BuildError> {
    let path = with_default_extension(path);
    let code = read_source(&path)?;
    parse_source(&code, &path)
}

/// Parse source text into the owned node model. `path` is used for
/// diagnostics only.
pub fn parse_source(code: &str, path: &Path) -> Result<AstNode, BuildError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_javascript::LANGUAGE.into())
        .map_err(|e| BuildError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let Some(tree) = parser.parse(code, None) else {
        return Err(BuildError::Parse {
            path: path.to_path_buf(),
            message: "parser produced no tree".to_string(),
        });
    };

    let root = tree.root_node();
    if root.has_error() {
        return Err(BuildError::Parse {
            path: path.to_path_buf(),
            message: first_error_message(root),
        });
    }

    Ok(lower(root, code))
}

/// Lower a tree-sitter node into the owned model: named children only,
/// source text kept for leaves.
fn lower(node: Node, code: &str) -> AstNode {
    let mut children = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        children.push(DeepTree::Node(lower(child, code)));
    }

    let text = children
        .is_empty()
        .then(|| code[node.byte_range()].to_string());

    AstNode {
        kind: node.kind().to_string(),
        span: Span::new(
            node.start_position().row + 1,
            node.end_position().row + 1,
            node.start_byte(),
            node.end_byte(),
        ),
        text,
        children,
    }
}

/// Locate the first error or missing node in document order and describe
/// it. Sub-trees without errors are pruned from the walk.
fn first_error_message(root: Node) -> String {
    let mut stack = vec![root];
    while let Some(n) = stack.pop() {
        if n.is_error() || n.is_missing() {
            let pos = n.start_position();
            let what = if n.is_missing() {
                format!("missing {}", n.kind())
            } else {
                "syntax error".to_string()
            };
            return format!("{} at {}:{}", what, pos.row + 1, pos.column + 1);
        }
        if !n.has_error() {
            continue;
        }
        for i in (0..n.child_count()).rev() {
            if let Some(ch) = n.child(i) {
                stack.push(ch);
            }
        }
    }
    "syntax error".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_inference() {
        assert_eq!(
            with_default_extension(Path::new("nested/a")),
            PathBuf::from("nested/a.js")
        );
        assert_eq!(
            with_default_extension(Path::new("a.js")),
            PathBuf::from("a.js")
        );
        assert_eq!(
            with_default_extension(Path::new("a.config")),
            PathBuf::from("a.config")
        );
    }

    #[test]
    fn lowers_leaves_with_text() {
        let tree = parse_source("var x = 1;\n", Path::new("t.js")).unwrap();
        assert_eq!(tree.kind, "program");
        assert_eq!(
            tree.to_sexp(),
            "(program (variable_declaration (variable_declarator (identifier 'x') (number '1'))))"
        );
    }

    #[test]
    fn spans_are_one_based_lines() {
        let tree = parse_source("var x = 1;\nvar y = 2;\n", Path::new("t.js")).unwrap();
        let second = tree.children[1].as_node().unwrap();
        assert_eq!(second.span.start_line, 2);
        assert_eq!(second.span.line_count(), 1);
        assert_eq!(second.span.byte_len(), "var y = 2;".len());
    }

    #[test]
    fn malformed_source_is_a_parse_failure() {
        let err = parse_source("var x = ;\n", Path::new("bad.js")).unwrap_err();
        match err {
            BuildError::Parse { path, message } => {
                assert_eq!(path, PathBuf::from("bad.js"));
                assert!(message.contains(" at 1:"), "got: {message}");
            }
            other => panic!("expected parse failure, got {other:?}"),
        }
    }
}
