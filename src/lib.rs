//! Deep syntax trees for CommonJS modules.
//!
//! Builds a single "deep" syntax tree for a JavaScript source file by
//! recursively replacing `require('...')` call expressions with the parsed
//! trees of the files they import, producing one fully inlined
//! representation of a module and its dependency graph. Non-relative
//! (package) imports are expanded only when
//! [`BuildOptions::include_external_dependencies`] is set; otherwise they
//! are left untouched.
//!
//! Failures are ordinary values: the builder returns a [`DeepTree`] which
//! is either a node or a [`BuildError`], and failures from nested imports
//! are embedded in the tree at the import position rather than aborting the
//! whole build. Check [`DeepTree::failures`] if any embedded failure should
//! count as overall failure for your use case.

mod core;
pub mod errors;
mod languages;
pub mod model;
pub mod options;
mod resolve;

pub use crate::errors::BuildError;
pub use crate::model::ast::{AstNode, DeepTree};
pub use crate::model::span::Span;
pub use crate::options::BuildOptions;

use crate::core::builder::DeepAstBuilder;
use std::path::Path;

/// Build the deep syntax tree for the file at `path`.
///
/// Paths without an extension are treated as `.js`. Relative `require`
/// specifiers resolve against the directory of the importing file;
/// non-relative specifiers resolve through ancestor `node_modules`
/// directories when external-dependency inclusion is enabled.
///
/// # Example
/// ```no_run
/// use deep_ast::{BuildOptions, DeepTree, build_deep_ast};
///
/// let tree = build_deep_ast("src/main.js", &BuildOptions::default());
/// match tree {
///     DeepTree::Node(root) => println!("{}", root.to_sexp()),
///     DeepTree::Failure(e) => eprintln!("build failed: {e}"),
/// }
/// ```
pub fn build_deep_ast(path: impl AsRef<Path>, options: &BuildOptions) -> DeepTree {
    DeepAstBuilder::new(options).build(path.as_ref())
}

/// Parse a single file into its shallow (non-inlined) syntax tree.
///
/// Applies the same extension inference as [`build_deep_ast`] but performs
/// no import substitution.
///
/// # Errors
/// Returns [`BuildError::Io`] for unreadable files and
/// [`BuildError::Parse`] for syntactically invalid source.
pub fn parse_file(path: impl AsRef<Path>) -> Result<AstNode, BuildError> {
    crate::core::parse::parse_file(path.as_ref())
}
