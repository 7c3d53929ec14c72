//! Paginated release listing.
//!
//! The release collection is read one page at a time (pages are 1-based)
//! until the API returns an empty page or enough releases have been
//! accumulated to satisfy the limit. Only then is the whole accumulated set
//! sorted, most recently published first, and cut to the limit.

use log::info;

use super::{GitHubClient, Release, Repository};
use crate::errors::ReleaseError;

/// Lists the tags of a repository's releases, newest first.
///
/// With `limit` set, pagination stops as soon as at least `limit` releases
/// have been fetched and the result holds at most `limit` tags. Releases
/// without a publication time sort last; ties keep the order the API
/// returned them in.
///
/// # Errors
///
/// Fails on the first page that cannot be fetched. Tags gathered from
/// earlier pages are discarded.
pub async fn list_releases(
    client: &GitHubClient,
    repo: &Repository,
    limit: Option<usize>,
) -> Result<Vec<String>, ReleaseError> {
    let mut releases: Vec<Release> = Vec::new();

    for page in 1.. {
        let url = client.releases_page_url(repo, page);
        let batch: Vec<Release> = client
            .get_json(url, || format!("failed to fetch releases from {repo}"))
            .await?;
        info!("Got {} releases from {repo}", batch.len());

        let exhausted = batch.is_empty();
        releases.extend(batch);
        if exhausted || limit.is_some_and(|limit| releases.len() >= limit) {
            break;
        }
    }

    releases.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    if let Some(limit) = limit {
        releases.truncate(limit);
    }

    Ok(releases
        .into_iter()
        .map(|release| release.tag_name)
        .collect())
}
