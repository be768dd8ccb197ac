//! Content collection
//!
//! Walks the scan root in sorted order, applies the matching rules, reads
//! each matched file and renders its report entry. Per-file read failures
//! are recorded as diagnostics and never stop the run.

use ignore::WalkBuilder;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::Path;

use crate::core::config::{Limits, MatchConfig};
use crate::core::matcher::{extension_of, is_excluded, matches};
use crate::core::paths::{containing_dir, make_relative};

/// Placeholder written into each entry before part numbers are known
pub const PART_REF_PLACEHOLDER: &str = "Part ? (assigned below)";

/// Separator line between report entries (80 '=')
pub const ENTRY_SEPARATOR: &str =
    "================================================================================";

/// One matched file, ready for partitioning.
///
/// `entry` is the self-contained report block for the file, still carrying
/// the unresolved part-reference placeholder. Records are ordered by
/// traversal order and immutable once collected.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Path relative to the scan root, '/'-separated
    pub rel_path: String,
    /// Size on disk, from filesystem metadata
    pub byte_size: u64,
    /// Whitespace-delimited token count of the decoded content
    pub word_count: usize,
    /// Rendered report block
    pub entry: String,
}

/// A per-file failure that did not stop the run
#[derive(Debug, Clone, Serialize)]
pub struct ScanDiagnostic {
    pub path: String,
    pub message: String,
}

/// End-of-run counters and bookkeeping
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanSummary {
    /// Matched, readable, non-empty files collected
    pub matched_files: usize,
    /// Files collected per extension (the empty string buckets files
    /// without one)
    pub extension_counts: BTreeMap<String, usize>,
    /// Requested include-file names that matched at least one file
    pub include_matches: BTreeSet<String>,
    /// Requested include-file names that matched nothing
    pub unmatched_includes: Vec<String>,
    /// Per-file read failures
    pub diagnostics: Vec<ScanDiagnostic>,
}

/// Receives progress notifications while the collector runs.
///
/// The engine never prints; the CLI installs a colored console observer and
/// tests use [`NullObserver`].
pub trait ScanObserver {
    fn on_file(&mut self, _record: &FileRecord) {}
    fn on_read_error(&mut self, _path: &str, _err: &io::Error) {}
}

/// Observer that ignores every notification
#[derive(Debug, Default)]
pub struct NullObserver;

impl ScanObserver for NullObserver {}

/// Collect every matched, non-excluded, non-empty, readable file under
/// `root`, in sorted depth-first traversal order.
pub fn collect_entries(
    root: &Path,
    config: &MatchConfig,
    limits: &Limits,
    use_gitignore: bool,
    observer: &mut dyn ScanObserver,
) -> (Vec<FileRecord>, ScanSummary) {
    let mut records = Vec::new();
    let mut summary = ScanSummary::default();

    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .git_ignore(use_gitignore)
        .git_global(use_gitignore)
        .git_exclude(use_gitignore)
        .sort_by_file_name(|a, b| a.cmp(b));

    // Excluded directories are pruned before descent, excluded files skipped.
    let exclude = config.exclude.clone();
    let walk_root = root.to_path_buf();
    builder.filter_entry(move |entry| match make_relative(entry.path(), &walk_root) {
        Some(rel) => !is_excluded(&rel, &exclude),
        None => true,
    });

    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let rel_path = match make_relative(path, root) {
            Some(rel) if !rel.is_empty() => rel,
            _ => continue,
        };

        let file_name = entry.file_name().to_string_lossy();
        let ext = extension_of(&file_name);
        if !matches(&file_name, ext, containing_dir(&rel_path), config) {
            continue;
        }

        let byte_size = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(err) => {
                observer.on_read_error(&rel_path, &err);
                summary.diagnostics.push(ScanDiagnostic {
                    path: rel_path,
                    message: err.to_string(),
                });
                continue;
            }
        };
        if byte_size == 0 {
            continue;
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                observer.on_read_error(&rel_path, &err);
                summary.diagnostics.push(ScanDiagnostic {
                    path: rel_path,
                    message: err.to_string(),
                });
                continue;
            }
        };

        let word_count = content.split_whitespace().count();
        let record = FileRecord {
            entry: render_entry(&rel_path, byte_size, word_count, &content, limits),
            rel_path: rel_path.clone(),
            byte_size,
            word_count,
        };

        observer.on_file(&record);
        summary.matched_files += 1;
        *summary
            .extension_counts
            .entry(ext.to_string())
            .or_insert(0) += 1;
        if config.include_files.contains(file_name.as_ref()) {
            summary.include_matches.insert(file_name.into_owned());
        }

        records.push(record);
    }

    summary.unmatched_includes = config
        .include_files
        .iter()
        .filter(|name| !summary.include_matches.contains(*name))
        .cloned()
        .collect();

    (records, summary)
}

fn render_entry(
    rel_path: &str,
    byte_size: u64,
    word_count: usize,
    content: &str,
    limits: &Limits,
) -> String {
    let mut entry = format!(
        "[FILE]: {}\n[SIZE]: {} bytes\n[WORDS]: {}\n",
        rel_path, byte_size, word_count
    );
    if word_count > limits.word_limit {
        entry.push_str("[NOTE]: Too long for direct prompt input.\n");
        entry.push_str("[OK]: Uploading as a file is fully supported and preferred.\n");
    }
    entry.push_str(&format!(
        "[PART REF]: Will appear in {}\n",
        PART_REF_PLACEHOLDER
    ));
    entry.push_str(content);
    entry.push_str("\n\n");
    entry.push_str(ENTRY_SEPARATOR);
    entry.push_str("\n\n");
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn config_with_extensions(extensions: &[&str]) -> MatchConfig {
        MatchConfig {
            extensions: extensions.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn collect(root: &Path, config: &MatchConfig) -> (Vec<FileRecord>, ScanSummary) {
        collect_entries(root, config, &Limits::default(), false, &mut NullObserver)
    }

    #[test]
    fn test_collects_matched_files_in_sorted_order() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("b.py"), "two words").unwrap();
        fs::write(temp.path().join("a.py"), "one").unwrap();
        fs::write(temp.path().join("ignored.txt"), "nope").unwrap();

        let (records, summary) = collect(temp.path(), &config_with_extensions(&["py"]));

        let paths: Vec<_> = records.iter().map(|r| r.rel_path.as_str()).collect();
        assert_eq!(paths, vec!["a.py", "b.py"]);
        assert_eq!(summary.matched_files, 2);
        assert_eq!(summary.extension_counts.get("py"), Some(&2));
        assert_eq!(records[1].word_count, 2);
    }

    #[test]
    fn test_excluded_directory_is_never_entered() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("build")).unwrap();
        fs::write(temp.path().join("build/x.py"), "skip me").unwrap();
        fs::write(temp.path().join("keep.py"), "keep").unwrap();

        let mut config = config_with_extensions(&["py"]);
        config.exclude.push("build".to_string());

        let (records, _) = collect(temp.path(), &config);
        let paths: Vec<_> = records.iter().map(|r| r.rel_path.as_str()).collect();
        assert_eq!(paths, vec!["keep.py"]);
    }

    #[test]
    fn test_empty_files_are_skipped_silently() {
        let temp = tempdir().unwrap();
        File::create(temp.path().join("empty.py")).unwrap();
        fs::write(temp.path().join("full.py"), "x").unwrap();

        let (records, summary) = collect(temp.path(), &config_with_extensions(&["py"]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].rel_path, "full.py");
        assert!(summary.diagnostics.is_empty());
    }

    #[test]
    fn test_unreadable_file_becomes_diagnostic() {
        let temp = tempdir().unwrap();
        let mut file = File::create(temp.path().join("bad.py")).unwrap();
        file.write_all(&[0xFF, 0xFE, 0x48, 0x65]).unwrap();
        fs::write(temp.path().join("good.py"), "fine").unwrap();

        let (records, summary) = collect(temp.path(), &config_with_extensions(&["py"]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].rel_path, "good.py");
        assert_eq!(summary.diagnostics.len(), 1);
        assert_eq!(summary.diagnostics[0].path, "bad.py");
        assert_eq!(summary.matched_files, 1);
    }

    #[test]
    fn test_include_dir_substring_matches_src2() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("lib/src2")).unwrap();
        fs::write(temp.path().join("lib/src2/z.py"), "match via dir").unwrap();
        fs::write(temp.path().join("lib/other.py"), "no rule").unwrap();

        let config = MatchConfig {
            include_dirs: vec!["src".to_string()],
            ..Default::default()
        };

        let (records, _) = collect(temp.path(), &config);
        let paths: Vec<_> = records.iter().map(|r| r.rel_path.as_str()).collect();
        assert_eq!(paths, vec!["lib/src2/z.py"]);
    }

    #[test]
    fn test_include_file_tracking() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("package.json"), "{}").unwrap();

        let config = MatchConfig {
            include_files: ["package.json", "missing.toml"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ..Default::default()
        };

        let (_, summary) = collect(temp.path(), &config);
        assert!(summary.include_matches.contains("package.json"));
        assert_eq!(summary.unmatched_includes, vec!["missing.toml"]);
    }

    #[test]
    fn test_entry_layout_with_advisory() {
        let limits = Limits {
            word_limit: 2,
            max_part_bytes: 1024,
        };
        let entry = render_entry("a.py", 17, 3, "one two three", &limits);

        assert!(entry.starts_with("[FILE]: a.py\n[SIZE]: 17 bytes\n[WORDS]: 3\n"));
        assert!(entry.contains("[NOTE]: Too long for direct prompt input.\n"));
        assert!(entry.contains(PART_REF_PLACEHOLDER));
        assert!(entry.contains("one two three"));
        assert!(entry.ends_with(&format!("\n\n{}\n\n", ENTRY_SEPARATOR)));
    }

    #[test]
    fn test_entry_layout_without_advisory() {
        let entry = render_entry("a.py", 3, 1, "hi", &Limits::default());
        assert!(!entry.contains("[NOTE]"));
        assert!(!entry.contains("[OK]"));
    }
}
