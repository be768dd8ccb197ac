//! Path normalization utilities
//!
//! All paths handed to the matching rules and the report are relative to the
//! scan root and use '/' as separator.

use std::path::Path;

/// Normalize a path to use '/' as separator
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the scan root
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(|rel| normalize_path(rel))
}

/// Relative path of the directory containing a relative file path.
/// Files directly under the root live in the literal directory `"."`.
pub fn containing_dir(rel_path: &str) -> &str {
    match rel_path.rsplit_once('/') {
        Some((dir, _)) => dir,
        None => ".",
    }
}
