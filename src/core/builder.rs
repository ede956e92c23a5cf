//! The recursive resolve-parse-substitute engine.
//!
//! Each invocation parses one file, walks its tree, and replaces every
//! eligible `require` call with the recursively built tree of the file it
//! names. Failures (unreadable files, bad syntax, unresolvable packages)
//! are spliced into the tree at the import position exactly like a
//! successful sub-tree; the parent build does not special-case them.
//!
//! Nothing is cached: a file imported from two sites is read and parsed
//! twice. The only state carried across recursion is the stack of files
//! currently being expanded, which turns cyclic relative-require graphs
//! into [`BuildError::Cycle`] values instead of unbounded recursion.

use crate::core::parse::{parse_source, read_source, with_default_extension};
use crate::core::walk::{Rewrite, rewrite};
use crate::errors::BuildError;
use crate::languages::javascript::import_specifier;
use crate::model::ast::{AstNode, DeepTree};
use crate::options::BuildOptions;
use crate::resolve::node_modules::resolve_module;
use crate::resolve::{is_relative, resolve_relative};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct DeepAstBuilder<'a> {
    options: &'a BuildOptions,
    /// Canonical paths of the files on the active expansion path.
    in_flight: Vec<PathBuf>,
}

impl<'a> DeepAstBuilder<'a> {
    pub fn new(options: &'a BuildOptions) -> Self {
        Self {
            options,
            in_flight: Vec::new(),
        }
    }

    /// Build the deep tree for `file`. Failures are returned as values,
    /// never raised.
    #[tracing::instrument(level = "debug", skip_all, fields(path = %file.display()))]
    pub fn build(&mut self, file: &Path) -> DeepTree {
        let path = with_default_extension(file);
        let canonical = canonicalize_or_keep(&path);

        if self.in_flight.contains(&canonical) {
            debug!("cycle detected at {}", canonical.display());
            return DeepTree::Failure(BuildError::Cycle { path: canonical });
        }

        let code = match read_source(&path) {
            Ok(c) => c,
            Err(e) => return DeepTree::Failure(e),
        };
        let mut root = match parse_source(&code, &path) {
            Ok(t) => t,
            Err(e) => return DeepTree::Failure(e),
        };

        // Resolution context: the directory of the file being parsed.
        let base = canonical
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        self.in_flight.push(canonical);
        rewrite(&mut root, &mut |node| self.expand_import(node, &base));
        self.in_flight.pop();

        DeepTree::Node(root)
    }

    fn expand_import(&mut self, node: &AstNode, base: &Path) -> Rewrite {
        let Some(specifier) = import_specifier(node) else {
            return Rewrite::Keep;
        };

        if is_relative(&specifier) {
            let target = resolve_relative(base, &specifier);
            debug!("inlining '{}' -> {}", specifier, target.display());
            return Rewrite::Replace(self.build(&target));
        }

        if self.options.include_external_dependencies {
            return match resolve_module(&specifier, base) {
                Ok(target) => {
                    debug!("inlining package '{}' -> {}", specifier, target.display());
                    Rewrite::Replace(self.build(&target))
                }
                Err(e) => {
                    warn!("{e}");
                    Rewrite::Replace(DeepTree::Failure(e))
                }
            };
        }

        Rewrite::Keep
    }
}

/// Stable identity for the cycle guard. Falls back to the un-canonicalized
/// path when canonicalization fails (e.g. the file does not exist; the read
/// will surface that).
fn canonicalize_or_keep(path: &Path) -> PathBuf {
    match dunce::canonicalize(path) {
        Ok(p) => p,
        Err(e) => {
            debug!("canonicalize failed for {}: {}", path.display(), e);
            path.to_path_buf()
        }
    }
}
