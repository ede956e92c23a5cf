use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Failure produced while building a deep tree.
///
/// These are ordinary values: the builder never raises them across its
/// boundary, and a failure from a nested import is stored inside the parent
/// tree at the position of the import call. They therefore carry owned
/// strings instead of wrapping `std::io::Error` and friends, so trees that
/// contain them stay `Clone`, `PartialEq`, and serializable.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BuildError {
    #[error("io error reading {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },

    #[error("parse error in {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("cannot resolve module '{specifier}' from {}", .from_dir.display())]
    Resolution {
        specifier: String,
        from_dir: PathBuf,
    },

    #[error("cyclic import of {}", .path.display())]
    Cycle { path: PathBuf },
}
