//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::info;

use bookstage_core::{plan, stage};
use bookstage_shared::{default_config_path, load_config_from, resolve_versions, write_default_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Bookstage — stage pinned upstream docs into an mdBook source tree.
#[derive(Parser)]
#[command(
    name = "bookstage",
    version,
    about = "Download pinned upstream documentation and generate SUMMARY.md and meta.json.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch all pinned documents and write SUMMARY.md and meta.json.
    Fetch {
        /// Book root directory (contains README.md and bookstage.toml).
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Config file path (defaults to <root>/bookstage.toml).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a default bookstage.toml in the book root.
    Init {
        /// Book root directory.
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Show the resolved configuration.
    Show {
        /// Book root directory.
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "bookstage=info",
        1 => "bookstage=debug",
        _ => "bookstage=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Fetch { root, config } => cmd_fetch(&root, config.as_deref()).await,
        Command::Config { action } => match action {
            ConfigAction::Init { root } => cmd_config_init(&root),
            ConfigAction::Show { root } => cmd_config_show(&root),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_fetch(root: &Path, config: Option<&Path>) -> Result<()> {
    let config_path = config
        .map(PathBuf::from)
        .unwrap_or_else(|| default_config_path(root));

    info!(config = %config_path.display(), "loading config");
    let book_config = load_config_from(&config_path)?;
    let versions = resolve_versions(&book_config)?;

    let report = stage::stage(&versions, plan::DEFAULT_PLAN, root).await?;

    println!(
        "Staged {} documents into {} in {:.1?}",
        report.documents,
        report.src_dir.display(),
        report.elapsed
    );
    Ok(())
}

fn cmd_config_init(root: &Path) -> Result<()> {
    let path = default_config_path(root);
    write_default_config(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn cmd_config_show(root: &Path) -> Result<()> {
    let config = load_config_from(&default_config_path(root))?;
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
