//! Download command for the lean-releases CLI.
//!
//! ## Usage
//!
//! ```bash
//! lean-releases download stable                # Latest stable release
//! lean-releases download nightly ./toolchains  # Latest nightly build
//! lean-releases download v4.9.0 --arch arm64
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::releases::{
    Arch, ArtifactResolver, GitHubClient, ReleaseTag, Repository, download_asset,
};

/// Arguments for the download command.
#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Release tag, or `stable` / `nightly` for the latest of each channel.
    pub tag: String,

    /// Directory the tarball is written to.
    #[clap(default_value = ".")]
    pub output_dir: PathBuf,

    /// Target architecture: x86, x64 or arm64 (defaults to the host's).
    #[clap(long)]
    pub arch: Option<Arch>,
}

/// Executes the download command.
///
/// Prints the absolute path of the downloaded file on success.
///
/// # Errors
///
/// Returns an error if:
/// - The host is not a supported Linux platform
/// - The release or a matching asset cannot be found
/// - The download or the file write fails
pub async fn execute(
    args: &DownloadArgs,
    client: &GitHubClient,
    stable_repo: &Repository,
    nightly_repo: &Repository,
) -> Result<()> {
    let tag = ReleaseTag::from(args.tag.as_str());
    let resolver = ArtifactResolver::new(client, stable_repo, nightly_repo);
    let (_release, asset) = resolver.resolve(&tag, args.arch).await?;

    let path = download_asset(client, &asset, &args.output_dir).await?;
    println!("{}", path.display());
    Ok(())
}
