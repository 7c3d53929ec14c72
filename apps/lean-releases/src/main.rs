#![warn(clippy::pedantic)]

//! # lean-releases
//!
//! Discovers and downloads Lean 4 toolchain releases published on GitHub.
//!
//! ## Subcommands
//!
//! - `discover` - Compose the CI toolchain matrix (the default)
//! - `download` - Download the Linux tarball for one release tag
//!
//! ## Examples
//!
//! Publish the toolchain matrix to `$GITHUB_OUTPUT`:
//! ```bash
//! lean-releases discover
//! ```
//!
//! Download the latest nightly build for the host architecture:
//! ```bash
//! lean-releases download nightly ./toolchains
//! ```

mod commands;
mod config;
mod errors;
mod releases;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{discover, download};
use config::Config;
use errors::ReleaseError;
use log::error;
use releases::{GitHubClient, Repository};

/// Version string shown by `--version`, including the build commit.
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("LEAN_RELEASES_GIT_COMMIT"),
    ")"
);

/// Lean toolchain release discovery and download.
#[derive(Parser)]
#[command(
    name = "lean-releases",
    author,
    version = LONG_VERSION,
    about = "Discover and download Lean toolchain releases",
    after_help = "\
ENVIRONMENT VARIABLES:
    GITHUB_TOKEN            Bearer token for the GitHub API
    GITHUB_OUTPUT           File the discover matrix is appended to
    LEAN_RELEASES_API_URL   API base URL (default: https://api.github.com)
    RUST_LOG                Log filter (default: info)"
)]
pub struct Cli {
    /// Repository publishing versioned releases.
    #[clap(long, global = true, default_value = "leanprover/lean4")]
    pub stable_repo: Repository,

    /// Repository publishing nightly builds.
    #[clap(long, global = true, default_value = "leanprover/lean4-nightly")]
    pub nightly_repo: Repository,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the lean-releases CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Compose the CI toolchain matrix.
    ///
    /// Lists the most recent stable and nightly releases, adds the channel
    /// names, and writes `matrix={"toolchain":[...]}` to `GITHUB_OUTPUT`
    /// (or stdout when it is unset).
    Discover(discover::DiscoverArgs),

    /// Download the toolchain tarball for a release tag.
    ///
    /// Accepts a literal tag, or `stable` / `nightly` for the latest release
    /// of each channel. Prints the path of the downloaded file.
    Download(download::DownloadArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = i32::from(e.use_stderr());
            // Printing only fails when the terminal is gone.
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if let Err(e) = run(cli).await {
        std::process::exit(handle_error(&e));
    }
}

/// Logs an error with its cause chain and returns the exit code.
fn handle_error(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<ReleaseError>() {
        Some(release_error) => error!("{} error: {e:#}", release_error.kind()),
        None => error!("{e:#}"),
    }
    1
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env();
    let client = GitHubClient::new(&config)?;

    match cli.command {
        Some(Commands::Download(args)) => {
            download::execute(&args, &client, &cli.stable_repo, &cli.nightly_repo).await
        }
        Some(Commands::Discover(args)) => {
            discover::execute(&args, &config, &client, cli.stable_repo, cli.nightly_repo).await
        }
        None => {
            let args = discover::DiscoverArgs::default();
            discover::execute(&args, &config, &client, cli.stable_repo, cli.nightly_repo).await
        }
    }
}
