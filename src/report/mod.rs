//! Report generation pipeline
//!
//! Collector -> Partitioner -> Structure Renderer -> Output Writer, run
//! synchronously in a single pass. The engine reports progress through
//! [`collect::ScanObserver`] and returns everything else as data; it never
//! prints.

use serde::Serialize;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::config::{Limits, MatchConfig};

pub mod collect;
pub mod partition;
pub mod structure;
pub mod write;

use self::collect::{ScanObserver, ScanSummary};

/// Fatal failures while producing the report. Per-file read problems are
/// diagnostics in the summary, not errors.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to create split directory {}: {source}", .path.display())]
    CreateSplitDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Everything a finished run produced
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    /// Report files written, in creation order
    pub written: Vec<PathBuf>,
    /// Whether split mode was taken
    pub split: bool,
    pub summary: ScanSummary,
    /// Relative path -> part number
    pub assignments: HashMap<String, usize>,
}

/// Run the whole pipeline for one scan root.
pub fn generate(
    root: &Path,
    config: &MatchConfig,
    limits: &Limits,
    output: &Path,
    use_gitignore: bool,
    observer: &mut dyn ScanObserver,
) -> Result<ReportOutcome, ReportError> {
    let (records, summary) = collect::collect_entries(root, config, limits, use_gitignore, observer);
    let partitioned = partition::partition(&records, limits.max_part_bytes);
    let full_text = partitioned.full_text();

    let written = write::write_report(
        root,
        output,
        &full_text,
        &partitioned.assignments,
        &config.exclude,
        limits.max_part_bytes,
    )?;

    Ok(ReportOutcome {
        written: written.files,
        split: written.split,
        summary,
        assignments: partitioned.assignments,
    })
}
