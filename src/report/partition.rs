//! Entry partitioning
//!
//! Assigns each collected entry to a part so that the cumulative entry size
//! per part stays within the byte ceiling, then resolves the part-reference
//! placeholder in every entry. Assignment is greedy and order-preserving:
//! part numbers are contiguous from 1 and non-decreasing in traversal order.
//!
//! An entry larger than the ceiling occupies a part by itself; splitting
//! below file granularity only happens later, in the writer, and only when
//! the total output exceeds the ceiling.

use std::collections::HashMap;
use std::mem;

use crate::report::collect::{FileRecord, PART_REF_PLACEHOLDER};

/// One bounded unit of report output
#[derive(Debug, Clone)]
pub struct Part {
    pub number: usize,
    /// Concatenated entries with resolved part references
    pub text: String,
    /// Member paths in assignment order
    pub members: Vec<String>,
}

/// Result of partitioning the ordered entry list
#[derive(Debug, Clone, Default)]
pub struct PartitionOutcome {
    /// Relative path -> part number
    pub assignments: HashMap<String, usize>,
    pub parts: Vec<Part>,
}

impl PartitionOutcome {
    /// Concatenation of every part in order
    pub fn full_text(&self) -> String {
        self.parts.iter().map(|part| part.text.as_str()).collect()
    }
}

/// Partition records in order against the given ceiling.
///
/// Entry sizes are measured on the unresolved entry text; the placeholder
/// is substituted only after the entry's part is known.
pub fn partition(records: &[FileRecord], max_part_bytes: usize) -> PartitionOutcome {
    let mut outcome = PartitionOutcome::default();
    if records.is_empty() {
        return outcome;
    }

    let mut part_number = 1usize;
    let mut current_size = 0usize;
    let mut text = String::new();
    let mut members: Vec<String> = Vec::new();

    for record in records {
        let entry_size = record.entry.len();
        if current_size > 0 && current_size + entry_size > max_part_bytes {
            outcome.parts.push(Part {
                number: part_number,
                text: mem::take(&mut text),
                members: mem::take(&mut members),
            });
            part_number += 1;
            current_size = 0;
        }

        outcome
            .assignments
            .insert(record.rel_path.clone(), part_number);
        current_size += entry_size;
        text.push_str(
            &record
                .entry
                .replace(PART_REF_PLACEHOLDER, &format!("Part {}", part_number)),
        );
        members.push(record.rel_path.clone());
    }

    outcome.parts.push(Part {
        number: part_number,
        text,
        members,
    });
    outcome
}
