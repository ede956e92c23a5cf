//! Build options for deep tree construction.
//!
//! The struct is `serde`-friendly: every field carries `#[serde(default)]`,
//! so options loaded from JSON merge over the documented defaults and
//! unknown keys are ignored.

use serde::{Deserialize, Serialize};

/// Options controlling how far import expansion reaches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Whether to expand non-relative (bare package) specifiers through
    /// node_modules resolution. When `false`, such import calls are left
    /// untouched in the output tree.
    #[serde(default)]
    pub include_external_dependencies: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            include_external_dependencies: false,
        }
    }
}
