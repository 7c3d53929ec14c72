//! Resolution of a requested tag to a single downloadable asset.
//!
//! Resolution happens in three steps:
//!
//! 1. Check the host: only Linux builds are published, and the architecture
//!    must be one of [`Arch`]'s variants. Both checks run before any request.
//! 2. Turn the [`ReleaseTag`] into a release record:
//!    - `stable` asks for the stable repository's latest release,
//!    - `nightly` lists the nightly repository (limit 1) and asks for that tag,
//!    - anything else is fetched by tag, from the nightly repository when it
//!      starts with `nightly` and from the stable repository otherwise.
//! 3. Pick the first tarball in the release whose name carries the
//!    architecture marker.

use log::info;

use super::{
    Arch, Asset, Channel, GitHubClient, Host, Release, ReleaseTag, Repository, list_releases,
};
use crate::errors::ReleaseError;

/// Resolves tags against a stable and a nightly repository.
#[derive(Debug)]
pub struct ArtifactResolver<'a> {
    client: &'a GitHubClient,
    stable_repo: &'a Repository,
    nightly_repo: &'a Repository,
    host: Host,
}

impl<'a> ArtifactResolver<'a> {
    /// Creates a resolver for the current host.
    #[must_use]
    pub fn new(
        client: &'a GitHubClient,
        stable_repo: &'a Repository,
        nightly_repo: &'a Repository,
    ) -> Self {
        Self {
            client,
            stable_repo,
            nightly_repo,
            host: Host::current(),
        }
    }

    /// Replaces the host the resolver checks against.
    #[must_use]
    pub fn with_host(mut self, host: Host) -> Self {
        self.host = host;
        self
    }

    /// Returns the repository that publishes `tag`.
    #[must_use]
    pub fn repository_for(&self, tag: &ReleaseTag) -> &'a Repository {
        if tag.is_nightly() {
            self.nightly_repo
        } else {
            self.stable_repo
        }
    }

    /// Resolves `tag` to a release and the asset built for `arch`.
    ///
    /// Without an explicit `arch`, the host's native architecture is used.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The host is not Linux, or its architecture is unsupported
    /// - Any release request fails
    /// - The nightly repository has no releases
    /// - The release has no tarball for the architecture
    pub async fn resolve(
        &self,
        tag: &ReleaseTag,
        arch: Option<Arch>,
    ) -> Result<(Release, Asset), ReleaseError> {
        self.host.ensure_supported()?;
        let arch = match arch {
            Some(arch) => arch,
            None => self.host.native_arch()?,
        };

        let repo = self.repository_for(tag);
        let url = match tag {
            ReleaseTag::Channel(Channel::Stable) => self.client.latest_release_url(repo),
            ReleaseTag::Channel(Channel::Nightly) => {
                let latest = list_releases(self.client, repo, Some(1))
                    .await?
                    .into_iter()
                    .next()
                    .ok_or_else(|| ReleaseError::NoReleases {
                        repo: repo.to_string(),
                    })?;
                self.client.tagged_release_url(repo, &latest)
            }
            ReleaseTag::Literal(tag) => self.client.tagged_release_url(repo, tag),
        };

        let release: Release = self
            .client
            .get_json(url, || format!("failed to fetch release from {repo}"))
            .await?;

        let asset = release
            .find_asset(arch)
            .cloned()
            .ok_or_else(|| ReleaseError::AssetNotFound {
                arch,
                tag: release.tag_name.clone(),
            })?;
        info!(
            "Found asset {} for {arch} in {}",
            asset.name, release.tag_name
        );

        Ok((release, asset))
    }
}
