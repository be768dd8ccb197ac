//! Report writing
//!
//! Writes either a single report file or, when the rendered output exceeds
//! the byte ceiling, a set of fixed-size split files under the scan root.
//! The split slices the raw byte stream without regard for file boundaries;
//! only the first-pass partitioning (the part mapping) is file-granular.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::report::collect::ENTRY_SEPARATOR;
use crate::report::structure::{render_structure, RenderedStructure, TOC_HEADER};
use crate::report::ReportError;

/// Directory created under the scan root for split output
pub const SPLIT_DIR_NAME: &str = "splits";

/// Paths produced by a write, in creation order
#[derive(Debug, Clone)]
pub struct WrittenReport {
    pub files: Vec<PathBuf>,
    pub split: bool,
}

/// Write the report for `full_text`. A single file is written at `output`
/// when the whole text fits the ceiling; otherwise the byte stream is
/// sliced into ceiling-sized chunks under `{root}/splits/`.
pub fn write_report(
    root: &Path,
    output: &Path,
    full_text: &str,
    assignments: &HashMap<String, usize>,
    exclude: &[String],
    max_part_bytes: usize,
) -> Result<WrittenReport, ReportError> {
    if full_text.len() <= max_part_bytes {
        write_single(root, output, full_text, assignments, exclude)
    } else {
        write_split(root, output, full_text, assignments, max_part_bytes)
    }
}

fn write_single(
    root: &Path,
    output: &Path,
    full_text: &str,
    assignments: &HashMap<String, usize>,
    exclude: &[String],
) -> Result<WrittenReport, ReportError> {
    let rendered = render_structure(root, assignments, exclude);

    let mut body = header_block(&rendered);
    body.push_str(full_text);

    fs::write(output, body).map_err(|source| ReportError::WriteOutput {
        path: output.to_path_buf(),
        source,
    })?;

    let written = output
        .canonicalize()
        .unwrap_or_else(|_| output.to_path_buf());
    Ok(WrittenReport {
        files: vec![written],
        split: false,
    })
}

fn write_split(
    root: &Path,
    output: &Path,
    full_text: &str,
    assignments: &HashMap<String, usize>,
    max_part_bytes: usize,
) -> Result<WrittenReport, ReportError> {
    let split_dir = root.join(SPLIT_DIR_NAME);
    fs::create_dir_all(&split_dir).map_err(|source| ReportError::CreateSplitDir {
        path: split_dir.clone(),
        source,
    })?;

    let encoded = full_text.as_bytes();
    // Integer division plus one: an exact multiple of the ceiling still gets
    // a trailing (empty) part file.
    let total_parts = encoded.len() / max_part_bytes + 1;

    // The structure shown in split mode is unfiltered: exclusion was already
    // applied while collecting, and this render sees an empty exclude set.
    let rendered = render_structure(root, assignments, &[]);

    let stem = output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());

    let mut files = Vec::new();
    for index in 0..total_parts {
        let start = usize::min(index * max_part_bytes, encoded.len());
        let end = usize::min(start + max_part_bytes, encoded.len());
        let chunk = &encoded[start..end];

        let mut body = format!(
            "[Split File {} of {}]\nPlease wait until all parts are uploaded before analyzing.\n\n",
            index + 1,
            total_parts
        );
        if index == 0 {
            body.push_str(&header_block(&rendered));
        }
        body.push_str(&decode_dropping_invalid(chunk));

        let part_path = split_dir.join(format!("{}_part_{:02}.txt", stem, index + 1));
        fs::write(&part_path, body).map_err(|source| ReportError::WriteOutput {
            path: part_path.clone(),
            source,
        })?;
        files.push(part_path);
    }

    Ok(WrittenReport { files, split: true })
}

/// TOC, structure tree and the separator that precedes the report body
fn header_block(rendered: &RenderedStructure) -> String {
    let mut block = String::from(TOC_HEADER);
    for line in &rendered.toc_lines {
        block.push('\n');
        block.push_str(line);
    }
    block.push_str("\n\n");
    block.push_str(&rendered.tree);
    block.push('\n');
    block.push_str(ENTRY_SEPARATOR);
    block.push_str("\n\n");
    block
}

/// Decode a byte slice as UTF-8, dropping invalid sequences. A cut in the
/// middle of a multi-byte character loses that character rather than
/// substituting a replacement.
fn decode_dropping_invalid(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                break;
            }
            Err(err) => {
                let valid_up_to = err.valid_up_to();
                if let Ok(valid) = std::str::from_utf8(&bytes[..valid_up_to]) {
                    out.push_str(valid);
                }
                let skip = match err.error_len() {
                    Some(len) => len,
                    None => bytes.len() - valid_up_to,
                };
                bytes = &bytes[valid_up_to + skip..];
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn assignments(pairs: &[(&str, usize)]) -> HashMap<String, usize> {
        pairs
            .iter()
            .map(|(path, part)| (path.to_string(), *part))
            .collect()
    }

    #[test]
    fn test_single_file_layout() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.py"), "hello").unwrap();
        let output = temp.path().join("report.txt");

        let map = assignments(&[("a.py", 1)]);
        let written =
            write_report(temp.path(), &output, "BODY", &map, &[], 1024).unwrap();

        assert!(!written.split);
        assert_eq!(written.files.len(), 1);

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.starts_with(TOC_HEADER));
        assert!(text.contains("  • a.py → Part 1"));
        assert!(text.contains("[Project Structure with File Mapping]"));
        assert!(text.ends_with("BODY"));
    }

    #[test]
    fn test_single_file_respects_exclude_set() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("build")).unwrap();
        fs::write(temp.path().join("build/x.py"), "x").unwrap();
        fs::write(temp.path().join("a.py"), "a").unwrap();
        let output = temp.path().join("report.txt");

        let exclude = vec!["build".to_string()];
        write_report(temp.path(), &output, "BODY", &HashMap::new(), &exclude, 1024).unwrap();

        let text = fs::read_to_string(&output).unwrap();
        assert!(!text.contains("build"));
    }

    #[test]
    fn test_split_files_reassemble_to_original_bytes() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.py"), "a").unwrap();
        let output = temp.path().join("report.txt");

        let body: String = "0123456789".repeat(10);
        let written =
            write_report(temp.path(), &output, &body, &HashMap::new(), &[], 30).unwrap();

        assert!(written.split);
        // 100 bytes at a 30-byte ceiling: 100 / 30 + 1 = 4 parts.
        assert_eq!(written.files.len(), 4);

        let mut reassembled = String::new();
        for (index, path) in written.files.iter().enumerate() {
            let text = fs::read_to_string(path).unwrap();
            let banner_end = text.find("\n\n").unwrap() + 2;
            let payload = if index == 0 {
                // Part one also carries the TOC/structure header.
                let after_header =
                    text.find(&format!("{}\n\n", ENTRY_SEPARATOR)).unwrap()
                        + ENTRY_SEPARATOR.len()
                        + 2;
                &text[after_header..]
            } else {
                &text[banner_end..]
            };
            reassembled.push_str(payload);
        }
        assert_eq!(reassembled, body);
    }

    #[test]
    fn test_split_file_names_are_numbered_under_splits_dir() {
        let temp = tempdir().unwrap();
        let output = temp.path().join("report.txt");

        let body = "x".repeat(50);
        let written =
            write_report(temp.path(), &output, &body, &HashMap::new(), &[], 20).unwrap();

        let names: Vec<_> = written
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "report_part_01.txt",
                "report_part_02.txt",
                "report_part_03.txt"
            ]
        );
        for path in &written.files {
            assert!(path.starts_with(temp.path().join(SPLIT_DIR_NAME)));
        }
    }

    #[test]
    fn test_split_banner_counts_parts() {
        let temp = tempdir().unwrap();
        let output = temp.path().join("report.txt");

        let body = "x".repeat(50);
        let written =
            write_report(temp.path(), &output, &body, &HashMap::new(), &[], 20).unwrap();

        let first = fs::read_to_string(&written.files[0]).unwrap();
        assert!(first.starts_with("[Split File 1 of 3]\n"));
        assert!(first.contains("Please wait until all parts are uploaded"));

        let last = fs::read_to_string(&written.files[2]).unwrap();
        assert!(last.starts_with("[Split File 3 of 3]\n"));
        assert!(!last.contains(TOC_HEADER));
    }

    #[test]
    fn test_exact_multiple_writes_empty_trailing_part() {
        let temp = tempdir().unwrap();
        let output = temp.path().join("report.txt");

        let body = "x".repeat(40);
        let written =
            write_report(temp.path(), &output, &body, &HashMap::new(), &[], 20).unwrap();

        assert_eq!(written.files.len(), 3);
        let last = fs::read_to_string(&written.files[2]).unwrap();
        assert!(last.starts_with("[Split File 3 of 3]\n"));
        assert!(last.ends_with("\n\n"));
    }

    #[test]
    fn test_decode_dropping_invalid_drops_cut_character() {
        // "你" is three bytes; cutting after two leaves an invalid tail.
        let bytes = "ab你".as_bytes();
        assert_eq!(decode_dropping_invalid(&bytes[..4]), "ab");
        assert_eq!(decode_dropping_invalid(bytes), "ab你");
    }

    #[test]
    fn test_decode_dropping_invalid_skips_interior_garbage() {
        let bytes = [b'a', 0xFF, 0xFE, b'b'];
        assert_eq!(decode_dropping_invalid(&bytes), "ab");
    }
}
