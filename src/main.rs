//! projector - recursively analyzes the structure and contents of a project
//! folder, filters relevant files by tech stack, and bundles them into
//! size-bounded text reports.

use anyhow::Result;
use clap::Parser;

mod cli;
mod core;
mod report;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
