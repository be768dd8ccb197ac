//! File matching rules
//!
//! Two deliberately different semantics coexist here: include-directory
//! fragments match as *substrings* of the containing directory's relative
//! path, while exclude fragments match whole path *segments* exactly.
//! Unifying them would silently change which files are collected.

use crate::core::config::MatchConfig;

/// True iff any exclude fragment equals one of the path's `/`-separated
/// segments exactly.
pub fn is_excluded(path: &str, exclude: &[String]) -> bool {
    if exclude.is_empty() {
        return false;
    }
    path.split('/')
        .any(|segment| exclude.iter().any(|ex| ex == segment))
}

/// Decide inclusion for a single file. Any one of the three rules matches:
/// literal file name, extension, or an include-directory fragment appearing
/// as a substring of the containing directory's relative path.
pub fn matches(file_name: &str, extension: &str, dir_rel: &str, config: &MatchConfig) -> bool {
    if config.include_files.contains(file_name) {
        return true;
    }
    if config.extensions.contains(extension) {
        return true;
    }
    config
        .include_dirs
        .iter()
        .any(|fragment| dir_rel.contains(fragment.as_str()))
}

/// Extension of a file name: the suffix after the last dot, empty when there
/// is none. A lone leading dot is part of the name, not a separator, so
/// `.gitignore` has no extension.
pub fn extension_of(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext,
        _ => "",
    }
}
