//! CLI module - Command-line interface definitions and handlers

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io;
use std::path::PathBuf;

use crate::core::config::{Limits, MatchConfig, DEFAULT_MAX_PART_BYTES, DEFAULT_WORD_LIMIT};
use crate::core::presets::PresetRegistry;
use crate::report;
use crate::report::collect::{FileRecord, NullObserver, ScanObserver, ScanSummary};
use crate::report::write::SPLIT_DIR_NAME;

/// projector - crawl a project folder and bundle matched file contents into
/// size-bounded text reports.
#[derive(Parser, Debug)]
#[command(name = "projector")]
#[command(
    author,
    version,
    about,
    long_about = r#"projector recursively analyzes the structure and contents of a project
folder, filters relevant files by tech stack, and saves a report containing
a tree map, a table of contents and every matched file's content.

Reports are partitioned so that no single output file exceeds the byte
ceiling; oversized runs are split into numbered files under <root>/splits/.

Examples:
    projector report --path ./my-java-project --stack java --output report.txt
    projector report --path ./my-py-project --stack python --include yaml,txt --output result.txt
    projector report --path ./my-js-project --include package.json,src --output report.txt
    projector report --path ./my-cpp-code --include .hpp --exclude .git,build --output out.txt
    projector stacks rust
"#
)]
pub struct Cli {
    /// Disable colored output.
    #[arg(
        long,
        global = true,
        long_help = "Disable colored output. Useful when piping to files or when your\n\
terminal does not support ANSI colors."
    )]
    pub no_color: bool,

    /// Quiet mode (suppress per-file progress and the text summary).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Suppress per-file progress lines and the end-of-run text summary.\n\
Machine-readable output (--summary-format json) is still printed."
    )]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a project and write the bundled report.
    #[command(
        long_about = "Crawl the project under --path, collect every file matched by the\n\
active filters, and write a report to --output.\n\n\
Filters come from an optional --stack preset (extensions plus excluded\n\
folders) layered with --include and --exclude items. Include items are\n\
classified by shape: '.ext' adds an extension, 'name.ext' adds a literal\n\
file name, anything else adds a folder-path fragment matched as a\n\
substring.\n\n\
Examples:\n\
  projector report --path . --stack rust --output report.txt\n\
  projector report --path . --include src,Cargo.toml --output report.txt\n"
    )]
    Report {
        /// Root folder to crawl.
        #[arg(long, value_name = "ROOT")]
        path: PathBuf,

        /// Output .txt file for the report.
        #[arg(long, value_name = "FILE")]
        output: PathBuf,

        /// Technology stack preset (see `projector stacks`).
        #[arg(long, value_name = "NAME")]
        stack: Option<String>,

        /// Comma-separated extensions, file names or folders to include.
        #[arg(
            long,
            value_name = "ITEMS",
            long_help = "Comma-separated list of extensions, specific files, or folders to\n\
include, classified by shape:\n\
- '.yaml'        -> include the extension\n\
- 'package.json' -> include the literal file name\n\
- 'src'          -> include files whose folder path contains 'src'"
        )]
        include: Option<String>,

        /// Comma-separated folder or file names to exclude.
        #[arg(
            long,
            value_name = "ITEMS",
            long_help = "Comma-separated folder or file names to exclude. Each item must\n\
match a whole path segment exactly; excluded folders are never entered."
        )]
        exclude: Option<String>,

        /// Word count above which a file gets the long-content advisory.
        #[arg(long, default_value_t = DEFAULT_WORD_LIMIT, value_name = "N")]
        word_limit: usize,

        /// Byte ceiling for a single output artifact.
        #[arg(
            long,
            default_value_t = DEFAULT_MAX_PART_BYTES,
            value_name = "BYTES",
            long_help = "Byte ceiling for a single output artifact. Runs whose rendered\n\
output exceeds this are split into numbered files under <root>/splits/."
        )]
        max_part_bytes: usize,

        /// Respect .gitignore and related ignore files while crawling.
        #[arg(long)]
        use_gitignore: bool,

        /// Summary format (text/json).
        #[arg(
            long,
            default_value = "text",
            value_parser = ["text", "json"],
            value_name = "FORMAT",
            long_help = "Select the end-of-run summary format.\n\n\
Supported values:\n\
- text (default): colored console summary\n\
- json: the run summary as a JSON object on stdout"
        )]
        summary_format: String,
    },

    /// List stack presets, or show one preset's filter tables.
    #[command(
        long_about = "Without a NAME, lists every builtin stack preset. With a NAME, shows\n\
the preset's extensions, conventional source folders, and excluded\n\
folders.\n\n\
Examples:\n\
  projector stacks\n\
  projector stacks java\n"
    )]
    Stacks {
        /// Preset name (omit to list all).
        #[arg(value_name = "NAME")]
        name: Option<String>,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Report {
            path,
            output,
            stack,
            include,
            exclude,
            word_limit,
            max_part_bytes,
            use_gitignore,
            summary_format,
        } => run_report(ReportArgs {
            path,
            output,
            stack,
            include,
            exclude,
            word_limit,
            max_part_bytes,
            use_gitignore,
            summary_format,
            quiet: cli.quiet,
        }),

        Commands::Stacks { name } => run_stacks(name.as_deref()),
    }
}

struct ReportArgs {
    path: PathBuf,
    output: PathBuf,
    stack: Option<String>,
    include: Option<String>,
    exclude: Option<String>,
    word_limit: usize,
    max_part_bytes: usize,
    use_gitignore: bool,
    summary_format: String,
    quiet: bool,
}

fn run_report(args: ReportArgs) -> Result<()> {
    let registry = PresetRegistry::builtin();
    let preset = match args.stack.as_deref() {
        Some(name) => Some(registry.get(name).with_context(|| {
            format!("unknown stack '{}'; run `projector stacks` to list presets", name)
        })?),
        None => None,
    };

    let config = MatchConfig::from_parts(preset, args.include.as_deref(), args.exclude.as_deref());
    let limits = Limits {
        word_limit: args.word_limit,
        max_part_bytes: args.max_part_bytes,
    };

    let root = args.path.canonicalize().unwrap_or(args.path);
    ensure!(root.is_dir(), "--path {} is not a directory", root.display());

    let mut console = ConsoleObserver {
        word_limit: limits.word_limit,
    };
    let mut null = NullObserver;
    let observer: &mut dyn ScanObserver = if args.quiet { &mut null } else { &mut console };

    let outcome = report::generate(
        &root,
        &config,
        &limits,
        &args.output,
        args.use_gitignore,
        observer,
    )?;

    if !args.quiet {
        if outcome.split {
            println!(
                "\n{}",
                format!(
                    "[!] Output exceeded {} bytes and was split into {} parts in '{}'",
                    limits.max_part_bytes,
                    outcome.written.len(),
                    root.join(SPLIT_DIR_NAME).display()
                )
                .yellow()
                .bold()
            );
        } else if let Some(path) = outcome.written.first() {
            println!("\n{}", format!("Output saved to: {}", path.display()).yellow());
        }
    }

    if args.summary_format == "json" {
        println!("{}", serde_json::to_string_pretty(&outcome.summary)?);
    } else if !args.quiet {
        print_text_summary(&outcome.summary, &config);
    }

    Ok(())
}

fn print_text_summary(summary: &ScanSummary, config: &MatchConfig) {
    println!(
        "\n{}",
        format!("Done. Total files processed: {}", summary.matched_files)
            .yellow()
            .bold()
    );

    if !summary.extension_counts.is_empty() {
        println!("\n{}", "Processed by extension:".magenta());
        for (ext, count) in &summary.extension_counts {
            println!("  .{}: {} file(s)", ext, count);
        }
    }

    if !summary.diagnostics.is_empty() {
        println!("\n{}", "Skipped files:".magenta());
        for diagnostic in &summary.diagnostics {
            println!("  {}: {}", diagnostic.path, diagnostic.message);
        }
    }

    if !config.include_files.is_empty() {
        println!("\n{}", "Included files summary:".magenta());
        for name in &summary.include_matches {
            println!("  {} Matched: {}", "✔".green(), name);
        }
        for name in &summary.unmatched_includes {
            println!("  {} No match: {}", "✖".red(), name);
        }
        if summary.include_matches.is_empty() {
            println!(
                "  {}",
                "No provided --include file matched any file in the project.".yellow()
            );
        }
    }
}

fn run_stacks(name: Option<&str>) -> Result<()> {
    let registry = PresetRegistry::builtin();

    match name {
        Some(name) => {
            let preset = registry.get(name).with_context(|| {
                format!("unknown stack '{}'; run `projector stacks` to list presets", name)
            })?;
            println!("{}", format!("Stack details for: {}", name).yellow().bold());
            println!("  - Extensions: .{}", preset.extensions.join(", ."));
            println!("  - Include folders: {}", preset.include_dirs.join(", "));
            println!("  - Exclude folders: {}", preset.exclude.join(", "));
        }
        None => {
            println!("{}", "Available stacks:".blue().bold());
            for (name, preset) in registry.iter() {
                println!("  {:<10} .{}", name, preset.extensions.join(", ."));
            }
        }
    }

    Ok(())
}

/// Prints per-file progress the way the engine's observer seam expects:
/// green for found files, cyan for metadata, yellow for advisories, red for
/// read failures.
struct ConsoleObserver {
    word_limit: usize,
}

impl ScanObserver for ConsoleObserver {
    fn on_file(&mut self, record: &FileRecord) {
        println!(
            "\n{}",
            format!("[+] Found file: {}", record.rel_path).green()
        );
        println!("{}", format!("    - Size: {} bytes", record.byte_size).cyan());
        println!(
            "{}",
            format!("    - Word count: {}", record.word_count).cyan()
        );
        if record.word_count > self.word_limit {
            println!(
                "{}",
                "    - [Note]: File is too long for direct prompt input.".yellow()
            );
            println!(
                "{}",
                "      You can still upload it as a file and it will be processed correctly."
                    .green()
            );
        }
    }

    fn on_read_error(&mut self, path: &str, err: &io::Error) {
        eprintln!(
            "{}",
            format!("[!] Failed to read file: {} | Error: {}", path, err).red()
        );
    }
}
