//! Structure rendering
//!
//! Renders the directory tree as indented text with part annotations and
//! collects the flat path -> part table of contents along the way. The tree
//! is produced by re-walking the filesystem, independently of the
//! collector's traversal, so it reflects everything visible under the root
//! minus the exclude set it is given.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::core::matcher::is_excluded;
use crate::core::paths::make_relative;

/// Header line of the mini table of contents
pub const TOC_HEADER: &str = "[Mini Table of Contents: File → Part]";

/// Rendered tree plus the TOC lines gathered while rendering it
#[derive(Debug, Clone)]
pub struct RenderedStructure {
    pub tree: String,
    pub toc_lines: Vec<String>,
}

/// Render the tree under `root`, annotating files present in `assignments`
/// with their part number. Excluded entries are filtered out before sibling
/// counting so connector glyphs stay correct.
pub fn render_structure(
    root: &Path,
    assignments: &HashMap<String, usize>,
    exclude: &[String],
) -> RenderedStructure {
    let mut lines = Vec::new();
    lines.push("[Project Structure with File Mapping]\n".to_string());

    let root_name = root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());
    lines.push(format!("{}/", root_name));

    let mut toc_lines = Vec::new();
    walk(root, root, "", assignments, exclude, &mut lines, &mut toc_lines);

    lines.push("\n(End of structure. Parts follow below.)\n".to_string());

    RenderedStructure {
        tree: lines.join("\n"),
        toc_lines,
    }
}

fn walk(
    dir: &Path,
    root: &Path,
    prefix: &str,
    assignments: &HashMap<String, usize>,
    exclude: &[String],
    lines: &mut Vec<String>,
    toc_lines: &mut Vec<String>,
) {
    // Unreadable directories simply produce no children.
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    let names: Vec<String> = names
        .into_iter()
        .filter(|name| match make_relative(&dir.join(name), root) {
            Some(rel) => !is_excluded(&rel, exclude),
            None => true,
        })
        .collect();

    for (index, name) in names.iter().enumerate() {
        let full = dir.join(name);
        let is_last = index == names.len() - 1;
        let connector = if is_last { "└── " } else { "├── " };
        let mut line = format!("{}{}{}", prefix, connector, name);

        if full.is_file() {
            if let Some(rel) = make_relative(&full, root) {
                if let Some(part) = assignments.get(&rel) {
                    line.push_str(&format!("    → Part {}", part));
                    toc_lines.push(format!("  • {} → Part {}", rel, part));
                }
            }
        }
        lines.push(line);

        if full.is_dir() {
            let extension = if is_last { "    " } else { "│   " };
            walk(
                &full,
                root,
                &format!("{}{}", prefix, extension),
                assignments,
                exclude,
                lines,
                toc_lines,
            );
        }
    }
}
