//! Explicit tree rewriting.
//!
//! The visitor is deliberately minimal: per node it answers "keep" or
//! "replace with this sub-tree", and the walker applies replacements by
//! structural substitution. Replaced positions are not descended into;
//! failure slots are never visited.

use crate::model::ast::{AstNode, DeepTree};

/// Decision returned by a rewrite callback for one node.
pub enum Rewrite {
    /// Leave the node in place and descend into its children.
    Keep,
    /// Substitute the node's slot with the given tree; do not descend.
    Replace(DeepTree),
}

/// Depth-first pre-order walk over every node slot below `root`,
/// substituting slots as directed by `f`.
pub fn rewrite<F>(root: &mut AstNode, f: &mut F)
where
    F: FnMut(&AstNode) -> Rewrite,
{
    for slot in root.children.iter_mut() {
        if let DeepTree::Node(child) = slot {
            match f(child) {
                Rewrite::Replace(tree) => *slot = tree,
                Rewrite::Keep => rewrite(child, f),
            }
        }
    }
}
