//! Command-line interface for relsync.
//!
//! The CLI is a thin embedding of the library: flags map onto the
//! [`SyncConfig`] builder, the engine runs once, and the outcome is printed.
//! Logging goes to stderr and honors `RUST_LOG` when set.
//!
//! ```bash
//! # Mirror the agents/ directory of the latest release into ~/.claude/agents
//! relsync sync --owner acme --repo prompt-pack \
//!     --dest ~/.claude/agents --subdir agents --ext .md
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use crate::constants::{DEFAULT_DOWNLOAD_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
use crate::github::GitHubClient;
use crate::router::PathRouter;
use crate::sync::{SyncConfig, SyncStatus, Synchronizer};

/// Top-level argument parser.
#[derive(Parser)]
#[command(
    name = "relsync",
    version,
    about = "Keep local directories in step with a repository's latest GitHub release"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug output
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Synchronize a destination directory with the latest release
    Sync(SyncArgs),
}

#[derive(Args)]
struct SyncArgs {
    /// Repository owner (user or organization)
    #[arg(long)]
    owner: String,

    /// Repository name
    #[arg(long)]
    repo: String,

    /// Destination directory for extracted files
    #[arg(long)]
    dest: PathBuf,

    /// Only extract entries under this top-level archive directory,
    /// rebasing them onto the destination root
    #[arg(long)]
    subdir: Option<String>,

    /// Only extract entries with this exact suffix (e.g. ".md")
    #[arg(long)]
    ext: Option<String>,

    /// Where the version record is kept; defaults under the home directory
    #[arg(long)]
    metadata_path: Option<PathBuf>,

    /// Release metadata query timeout in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    request_timeout: u64,

    /// Archive download timeout in seconds
    #[arg(long, default_value_t = DEFAULT_DOWNLOAD_TIMEOUT.as_secs())]
    download_timeout: u64,
}

impl Cli {
    /// Run the selected command.
    pub async fn execute(self) -> Result<()> {
        init_logging(self.verbose, self.quiet);
        match self.command {
            Command::Sync(args) => run_sync(args, self.quiet).await,
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_filter = if verbose {
        "relsync=debug"
    } else if quiet {
        "relsync=error"
    } else {
        "relsync=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run_sync(args: SyncArgs, quiet: bool) -> Result<()> {
    let router = match (args.subdir, args.ext) {
        (Some(subdir), extension) => PathRouter::SubdirRebase { subdir, extension },
        (None, Some(extension)) => PathRouter::ExtensionFilter { extension },
        (None, None) => PathRouter::KeepAll,
    };

    // The extractor insists on absolute destinations; resolve relative
    // flags against the working directory up front.
    let dest = std::path::absolute(&args.dest)
        .with_context(|| format!("cannot resolve destination {}", args.dest.display()))?;

    let mut builder = SyncConfig::builder(args.owner, args.repo)
        .target(router, dest)
        .request_timeout(Duration::from_secs(args.request_timeout))
        .download_timeout(Duration::from_secs(args.download_timeout));
    if let Some(path) = args.metadata_path {
        builder = builder.metadata_path(path);
    }
    let config = builder.build().context("invalid sync configuration")?;

    let client = GitHubClient::new().context("failed to construct HTTP client")?;
    let status = Synchronizer::new(config, client).synchronize().await?;

    if !quiet {
        match status {
            SyncStatus::Refreshed { version } => {
                println!("{} synchronized to {}", "✓".green(), version.bold());
            }
            SyncStatus::Current { version } => {
                println!("{} already up to date ({version})", "✓".green());
            }
        }
    }
    Ok(())
}
