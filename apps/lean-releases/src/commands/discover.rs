//! Discover command for the lean-releases CLI.
//!
//! Lists recent stable and nightly releases and publishes the toolchain
//! matrix for CI.
//!
//! ## Usage
//!
//! ```bash
//! lean-releases discover                       # Defaults: 30 stable, 10 nightly
//! lean-releases discover --limit 5 --exclude v4.0.0
//! ```

use anyhow::Result;
use clap::Args;
use log::info;

use crate::config::Config;
use crate::releases::matrix::{KEEP_RECENT_NIGHTLY_RELEASES, KEEP_RECENT_RELEASES};
use crate::releases::{GitHubClient, MatrixBuilder, Repository, append_output, matrix_output_line};

/// Arguments for the discover command.
#[derive(Args, Debug, Clone)]
pub struct DiscoverArgs {
    /// Number of recent stable releases to consider.
    #[clap(long, default_value_t = KEEP_RECENT_RELEASES)]
    pub limit: usize,

    /// Number of recent nightly builds to consider.
    #[clap(long, default_value_t = KEEP_RECENT_NIGHTLY_RELEASES)]
    pub nightly_limit: usize,

    /// Extra tag to add to the matrix (repeatable).
    #[clap(long = "include", value_name = "TAG")]
    pub include: Vec<String>,

    /// Tag to remove from the matrix (repeatable).
    #[clap(long = "exclude", value_name = "TAG")]
    pub exclude: Vec<String>,
}

impl Default for DiscoverArgs {
    fn default() -> Self {
        Self {
            limit: KEEP_RECENT_RELEASES,
            nightly_limit: KEEP_RECENT_NIGHTLY_RELEASES,
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl DiscoverArgs {
    /// Builds the matrix builder for the given repositories.
    #[must_use]
    pub fn builder(&self, stable_repo: Repository, nightly_repo: Repository) -> MatrixBuilder {
        let mut builder = MatrixBuilder::new(stable_repo, nightly_repo);
        builder.stable_limit = self.limit;
        builder.nightly_limit = self.nightly_limit;
        builder.extra.extend(self.include.iter().cloned());
        builder.skipped.extend(self.exclude.iter().cloned());
        builder
    }
}

/// Executes the discover command.
///
/// The matrix line is appended to `GITHUB_OUTPUT` when it is set and
/// printed to stdout otherwise.
///
/// # Errors
///
/// Returns an error if any release listing fails or the output file cannot
/// be written.
pub async fn execute(
    args: &DiscoverArgs,
    config: &Config,
    client: &GitHubClient,
    stable_repo: Repository,
    nightly_repo: Repository,
) -> Result<()> {
    let tags = args.builder(stable_repo, nightly_repo).build(client).await?;
    info!("Toolchain matrix: {tags:?}");

    match &config.output_path {
        Some(path) => {
            append_output(path, &tags).await?;
            info!("Matrix written to {}", path.display());
        }
        None => print!("{}", matrix_output_line(&tags)),
    }
    Ok(())
}
