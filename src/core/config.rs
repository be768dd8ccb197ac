//! Run configuration
//!
//! A run is described by a `MatchConfig` (which files to collect) and
//! `Limits` (how to bound the output). Both are built once from CLI input
//! and consumed read-only by the engine.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::core::presets::StackPreset;

/// Word count above which a file gets the long-content advisory
pub const DEFAULT_WORD_LIMIT: usize = 3000;

/// Maximum byte size for a single output artifact (100 MiB)
pub const DEFAULT_MAX_PART_BYTES: usize = 100 * 1024 * 1024;

/// File selection rules for a run.
///
/// Include-directory fragments match as substrings of the containing
/// directory's relative path; exclude fragments match whole path segments
/// exactly. The two semantics are intentionally different.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchConfig {
    /// Extensions to include (no leading dot, case-sensitive)
    pub extensions: BTreeSet<String>,
    /// Exact file names to include
    pub include_files: BTreeSet<String>,
    /// Directory-path fragments to include
    pub include_dirs: Vec<String>,
    /// Path segments to exclude
    pub exclude: Vec<String>,
}

impl MatchConfig {
    /// Build a config from an optional stack preset plus raw CLI
    /// `--include`/`--exclude` values.
    ///
    /// A preset contributes its extensions and exclude list. Include items
    /// are comma-separated and classified by shape: a leading dot marks an
    /// extension, an interior dot marks a file name, anything else is a
    /// directory fragment.
    pub fn from_parts(
        preset: Option<&StackPreset>,
        include: Option<&str>,
        exclude: Option<&str>,
    ) -> Self {
        let mut config = MatchConfig::default();

        if let Some(preset) = preset {
            config
                .extensions
                .extend(preset.extensions.iter().map(|ext| ext.to_string()));
            config
                .exclude
                .extend(preset.exclude.iter().map(|ex| ex.to_string()));
        }

        if let Some(include) = include {
            for item in split_items(include) {
                if let Some(ext) = item.strip_prefix('.') {
                    config.extensions.insert(ext.to_string());
                } else if item.contains('.') {
                    config.include_files.insert(item.to_string());
                } else {
                    config.include_dirs.push(item.to_string());
                }
            }
        }

        if let Some(exclude) = exclude {
            config
                .exclude
                .extend(split_items(exclude).map(|item| item.to_string()));
        }

        config
    }
}

/// Output sizing limits
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Limits {
    /// Word count above which the long-content advisory is emitted
    pub word_limit: usize,
    /// Byte ceiling for any single output artifact
    pub max_part_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            word_limit: DEFAULT_WORD_LIMIT,
            max_part_bytes: DEFAULT_MAX_PART_BYTES,
        }
    }
}

fn split_items(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|item| !item.is_empty())
}
