//! # Proposal Mirror CLI (`pmirror`)
//!
//! ## Usage
//!
//! ```bash
//! pmirror --config ./config/pmirror.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `pmirror sync` | Mirror every item from the index into the docs tree |
//! | `pmirror list` | Print the item ids referenced by the index |
//! | `pmirror render <file> --item <id>` | Render a local file to stdout |
//! | `pmirror init` | Write the default configuration file |
//!
//! Without a config file the built-in defaults mirror the Cardano CIP
//! repository.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use proposal_mirror::config;
use proposal_mirror::logging;
use proposal_mirror::progress::ProgressMode;
use proposal_mirror::render_cmd;
use proposal_mirror::sync::{self, SyncOptions};

/// Proposal Mirror — copy remote markdown proposals into a static-site docs tree.
#[derive(Parser)]
#[command(
    name = "pmirror",
    about = "Mirror remote markdown proposals into a static-site documentation tree",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/pmirror.toml`. When the file does not exist the
    /// built-in defaults are used.
    #[arg(long, global = true, default_value = "./config/pmirror.toml")]
    config: PathBuf,

    /// Progress output on stderr. Defaults to `human` on a TTY, else `off`.
    #[arg(long, global = true, value_enum)]
    progress: Option<ProgressMode>,

    /// Increase log verbosity (`-v` info, `-vv` debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Mirror proposals from the source repository.
    ///
    /// Fetches the index, every referenced item and its assets, rewrites
    /// links, injects front matter, and writes the docs tree. A full run
    /// clears the docs directory first.
    Sync {
        /// Only read the index and list what would be mirrored.
        #[arg(long)]
        dry_run: bool,

        /// Mirror only this item (repeatable). Other pages are kept.
        #[arg(long = "item")]
        items: Vec<String>,

        /// Maximum number of items to mirror. Other pages are kept.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the item ids referenced by the index.
    List,

    /// Render a local markdown file through the substitution pipeline.
    ///
    /// Prints the result on stdout. Asset links are not rewritten.
    Render {
        /// Markdown file to render.
        path: PathBuf,

        /// Item id the file belongs to (e.g. `CIP-0001`).
        #[arg(long)]
        item: String,
    },

    /// Write the default configuration to `--config`.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Commands::Init { force } = cli.command {
        config::write_default_config(&cli.config, force)?;
        println!("Wrote {}", cli.config.display());
        return Ok(());
    }

    let cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Sync {
            dry_run,
            items,
            limit,
        } => {
            let reporter = cli
                .progress
                .unwrap_or_else(ProgressMode::default_for_tty)
                .reporter();
            let options = SyncOptions {
                dry_run,
                items,
                limit,
            };
            sync::run_sync(&cfg, &options, reporter.as_ref()).await?;
        }
        Commands::List => {
            sync::run_list(&cfg).await?;
        }
        Commands::Render { path, item } => {
            render_cmd::run_render(&cfg, &path, &item)?;
        }
        Commands::Init { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
