//! Bookstage CLI — stage pinned upstream documentation into an mdBook tree.
//!
//! Downloads a fixed set of markdown files from pinned repository revisions
//! and generates the book's `SUMMARY.md` and `meta.json`.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
