//! node_modules package resolution.
//!
//! Walks the importing directory and its ancestors looking for
//! `node_modules/<package>`. Bare specifiers resolve to the package's entry
//! point (the `main` field of its `package.json`, `index.js` when absent);
//! specifiers with a subpath (`pkg/lib/util`) resolve to that file inside
//! the package directory. Scoped names (`@scope/pkg`) keep both segments as
//! the package name.

use crate::errors::BuildError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Entry file used when `package.json` is absent or names none.
const DEFAULT_ENTRY: &str = "index.js";

#[derive(Debug, Default, Deserialize)]
struct PackageManifest {
    main: Option<String>,
}

/// Resolve a bare package specifier from `from_dir`.
///
/// # Errors
/// Returns [`BuildError::Resolution`] when no ancestor `node_modules`
/// directory contains the package, or the specifier has no valid package
/// name.
pub fn resolve_module(specifier: &str, from_dir: &Path) -> Result<PathBuf, BuildError> {
    let Some((name, subpath)) = split_specifier(specifier) else {
        return Err(not_found(specifier, from_dir));
    };

    for dir in from_dir.ancestors() {
        let pkg_dir = dir.join("node_modules").join(name);
        if !pkg_dir.is_dir() {
            continue;
        }
        let resolved = match subpath {
            Some(rest) => pkg_dir.join(rest),
            None => pkg_dir.join(entry_point(&pkg_dir)),
        };
        debug!("resolved package '{}' -> {}", specifier, resolved.display());
        return Ok(resolved);
    }

    Err(not_found(specifier, from_dir))
}

fn not_found(specifier: &str, from_dir: &Path) -> BuildError {
    BuildError::Resolution {
        specifier: specifier.to_string(),
        from_dir: from_dir.to_path_buf(),
    }
}

/// Split a bare specifier into package name and optional subpath.
/// `pkg` -> (`pkg`, None); `pkg/lib/util` -> (`pkg`, `lib/util`);
/// `@scope/pkg/util` -> (`@scope/pkg`, `util`).
fn split_specifier(specifier: &str) -> Option<(&str, Option<&str>)> {
    if specifier.is_empty() || specifier.starts_with('/') {
        return None;
    }
    let name_segments = if specifier.starts_with('@') { 2 } else { 1 };

    let mut seen = 0usize;
    for (i, c) in specifier.char_indices() {
        if c == '/' {
            seen += 1;
            if seen == name_segments {
                let name = &specifier[..i];
                let rest = &specifier[i + 1..];
                return Some((name, (!rest.is_empty()).then_some(rest)));
            }
        }
    }

    // A scoped name without its package segment is not resolvable.
    if specifier.starts_with('@') && seen == 0 {
        return None;
    }
    Some((specifier, None))
}

/// Entry file named by the package's manifest, with warn-and-fallback on
/// unreadable or malformed manifests.
fn entry_point(pkg_dir: &Path) -> String {
    let manifest_path = pkg_dir.join("package.json");
    let content = match fs::read_to_string(&manifest_path) {
        Ok(c) => c,
        Err(e) => {
            debug!("no readable manifest in {}: {}", pkg_dir.display(), e);
            return DEFAULT_ENTRY.to_string();
        }
    };

    match serde_json::from_str::<PackageManifest>(&content) {
        Ok(PackageManifest { main: Some(main) }) if !main.trim().is_empty() => main,
        Ok(_) => DEFAULT_ENTRY.to_string(),
        Err(e) => {
            warn!("failed to parse {}: {}", manifest_path.display(), e);
            DEFAULT_ENTRY.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn specifier_splitting() {
        assert_eq!(split_specifier("pkg"), Some(("pkg", None)));
        assert_eq!(split_specifier("pkg/lib/util"), Some(("pkg", Some("lib/util"))));
        assert_eq!(split_specifier("@scope/pkg"), Some(("@scope/pkg", None)));
        assert_eq!(
            split_specifier("@scope/pkg/util"),
            Some(("@scope/pkg", Some("util")))
        );
        assert_eq!(split_specifier("pkg/"), Some(("pkg", None)));
        assert_eq!(split_specifier(""), None);
        assert_eq!(split_specifier("@scope"), None);
        assert_eq!(split_specifier("/abs"), None);
    }

    #[test]
    fn honors_main_field() {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("node_modules/xtend");
        touch(&pkg.join("package.json"), r#"{"name":"xtend","main":"immutable.js"}"#);
        touch(&pkg.join("immutable.js"), "module.exports = {};\n");

        let resolved = resolve_module("xtend", dir.path()).unwrap();
        assert_eq!(resolved, pkg.join("immutable.js"));
    }

    #[test]
    fn defaults_to_index_without_manifest() {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("node_modules/plain");
        touch(&pkg.join("index.js"), "module.exports = 1;\n");

        let resolved = resolve_module("plain", dir.path()).unwrap();
        assert_eq!(resolved, pkg.join("index.js"));
    }

    #[test]
    fn walks_ancestor_directories() {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("node_modules/up");
        touch(&pkg.join("index.js"), "module.exports = 1;\n");
        let nested = dir.path().join("src/deeply/nested");
        fs::create_dir_all(&nested).unwrap();

        let resolved = resolve_module("up", &nested).unwrap();
        assert_eq!(resolved, pkg.join("index.js"));
    }

    #[test]
    fn subpath_bypasses_entry_point() {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("node_modules/pkg");
        touch(&pkg.join("package.json"), r#"{"main":"entry.js"}"#);
        touch(&pkg.join("lib/util.js"), "module.exports = 2;\n");

        let resolved = resolve_module("pkg/lib/util", dir.path()).unwrap();
        assert_eq!(resolved, pkg.join("lib/util"));
    }

    #[test]
    fn unknown_package_is_a_resolution_error() {
        let dir = TempDir::new().unwrap();
        let err = resolve_module("ghost", dir.path()).unwrap_err();
        assert_eq!(
            err,
            BuildError::Resolution {
                specifier: "ghost".into(),
                from_dir: dir.path().to_path_buf(),
            }
        );
    }
}
