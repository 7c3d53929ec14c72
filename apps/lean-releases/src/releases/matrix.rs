//! Toolchain matrix composition.
//!
//! The matrix is the union of
//!
//! 1. the most recent versioned releases (`v*`) of the stable repository,
//! 2. the most recent nightly builds (`nightly*`) of the nightly repository,
//! 3. a fixed list of extra entries (by default the `stable` and `nightly`
//!    channel names),
//!
//! minus every tag on the skip list. The result is ordered by plain string
//! comparison, so `v10.0.0` sorts before `v2.0.0`; CI only needs a stable
//! order, not a semantic one.

use std::collections::BTreeSet;
use std::path::Path;

use log::info;
use serde_json::json;
use tokio::io::AsyncWriteExt;

use super::model::{NIGHTLY_PREFIX, VERSION_PREFIX};
use super::{GitHubClient, Repository, list_releases};
use crate::errors::ReleaseError;

/// Number of recent stable releases kept in the matrix.
pub const KEEP_RECENT_RELEASES: usize = 30;

/// Number of recent nightly builds kept in the matrix.
pub const KEEP_RECENT_NIGHTLY_RELEASES: usize = 10;

/// Entries always added to the matrix.
pub const EXTRA_RELEASES: &[&str] = &["stable", "nightly"];

/// Entries never allowed in the matrix.
pub const SKIPPED_RELEASES: &[&str] = &[];

/// Builds the deduplicated, sorted toolchain matrix.
#[derive(Debug, Clone)]
pub struct MatrixBuilder {
    /// Repository with versioned releases.
    pub stable_repo: Repository,
    /// Repository with nightly builds.
    pub nightly_repo: Repository,
    /// How many recent stable releases to consider.
    pub stable_limit: usize,
    /// How many recent nightly builds to consider.
    pub nightly_limit: usize,
    /// Entries added regardless of what the repositories return.
    pub extra: Vec<String>,
    /// Entries removed from the final set.
    pub skipped: Vec<String>,
}

impl MatrixBuilder {
    /// Creates a builder with the default limits and lists.
    #[must_use]
    pub fn new(stable_repo: Repository, nightly_repo: Repository) -> Self {
        Self {
            stable_repo,
            nightly_repo,
            stable_limit: KEEP_RECENT_RELEASES,
            nightly_limit: KEEP_RECENT_NIGHTLY_RELEASES,
            extra: EXTRA_RELEASES.iter().map(ToString::to_string).collect(),
            skipped: SKIPPED_RELEASES.iter().map(ToString::to_string).collect(),
        }
    }

    /// Fetches both repositories and composes the matrix.
    ///
    /// The stable repository is listed before the nightly one; neither
    /// request is issued concurrently.
    ///
    /// # Errors
    ///
    /// Propagates the first listing failure.
    pub async fn build(&self, client: &GitHubClient) -> Result<Vec<String>, ReleaseError> {
        let stable: Vec<String> =
            list_releases(client, &self.stable_repo, Some(self.stable_limit))
                .await?
                .into_iter()
                .filter(|tag| tag.starts_with(VERSION_PREFIX))
                .collect();
        info!("Following toolchain releases will be used: {stable:?}");

        let nightly: Vec<String> =
            list_releases(client, &self.nightly_repo, Some(self.nightly_limit))
                .await?
                .into_iter()
                .filter(|tag| tag.starts_with(NIGHTLY_PREFIX))
                .collect();
        info!("Following nightly toolchain releases will be used: {nightly:?}");

        Ok(self.compose(stable, nightly))
    }

    /// Merges fetched tags with the extra list and removes skipped entries.
    fn compose(&self, stable: Vec<String>, nightly: Vec<String>) -> Vec<String> {
        let tags: BTreeSet<String> = stable
            .into_iter()
            .chain(nightly)
            .chain(self.extra.iter().cloned())
            .filter(|tag| !self.skipped.contains(tag))
            .collect();
        tags.into_iter().collect()
    }
}

/// Renders the CI output line, e.g. `matrix={"toolchain":["nightly","stable"]}\n`.
#[must_use]
pub fn matrix_output_line(tags: &[String]) -> String {
    format!("matrix={}\n", json!({ "toolchain": tags }))
}

/// Appends the matrix line to the CI output file, creating it if needed.
///
/// # Errors
///
/// Returns an `Io` error naming `path` if the file cannot be opened or
/// written.
pub async fn append_output(path: &Path, tags: &[String]) -> Result<(), ReleaseError> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|source| ReleaseError::io("open", path, source))?;

    file.write_all(matrix_output_line(tags).as_bytes())
        .await
        .map_err(|source| ReleaseError::io("write", path, source))?;
    file.flush()
        .await
        .map_err(|source| ReleaseError::io("flush", path, source))
}
