//! Streaming asset downloads.
//!
//! The response body is written to disk chunk by chunk, so archives of any
//! size are never held in memory. The destination file is only created once
//! the server has answered with a success status; an error response leaves
//! any existing file untouched.
//!
//! There is no retry, resume, or checksum step: the first failure is
//! returned to the caller.

use std::path::{Path, PathBuf};
use std::time::Instant;

use futures_util::StreamExt;
use log::info;
use reqwest::header::CONTENT_LENGTH;
use tokio::io::AsyncWriteExt;

use super::{Asset, GitHubClient};
use crate::errors::ReleaseError;

/// Downloads `asset` into `output_dir` and returns the absolute file path.
///
/// The file is named after the last path component of the asset name and
/// is truncated if it already exists.
///
/// # Errors
///
/// Returns an error if:
/// - The download request fails or answers with a non-success status
/// - The destination file cannot be created
/// - Reading the body or writing the file fails
pub async fn download_asset(
    client: &GitHubClient,
    asset: &Asset,
    output_dir: &Path,
) -> Result<PathBuf, ReleaseError> {
    let url = asset.download_url.as_str();
    let response = client.get_stream(url).await?;

    let content_length = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let dest = destination(output_dir, &asset.name);
    let start = Instant::now();

    {
        let mut file = tokio::fs::File::create(&dest)
            .await
            .map_err(|source| ReleaseError::io("create", &dest, source))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| ReleaseError::request(url, source))?;
            file.write_all(&chunk)
                .await
                .map_err(|source| ReleaseError::io("write", &dest, source))?;
        }

        file.flush()
            .await
            .map_err(|source| ReleaseError::io("flush", &dest, source))?;
    }

    info!(
        "Downloaded {url} ({content_length} bytes) in {}ms",
        start.elapsed().as_millis()
    );

    std::path::absolute(&dest).map_err(|source| ReleaseError::io("resolve", &dest, source))
}

/// Joins `output_dir` with the file-name part of `asset_name`.
fn destination(output_dir: &Path, asset_name: &str) -> PathBuf {
    let file_name = Path::new(asset_name)
        .file_name()
        .map_or_else(|| asset_name.into(), ToOwned::to_owned);
    output_dir.join(file_name)
}
