//! HTTP access to the GitHub Releases API.
//!
//! [`GitHubClient`] wraps a `reqwest::Client` whose default headers are fixed
//! when it is built: the API version marker, the release media type, a user
//! agent, and the bearer token when one is configured. Nothing mutates them
//! afterwards.
//!
//! ## Endpoints
//!
//! - `GET /repos/{owner}/{name}/releases?page=N`
//! - `GET /repos/{owner}/{name}/releases/latest`
//! - `GET /repos/{owner}/{name}/releases/tags/{tag}`
//! - `GET {browser_download_url}` for asset bytes

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use url::Url;

use super::Repository;
use crate::config::Config;
use crate::errors::ReleaseError;

/// Media type requested from the API.
pub const ACCEPT_RELEASES: &str = "application/vnd.github.v3+json";

/// Header carrying the API version.
pub const API_VERSION_HEADER: &str = "x-github-api-version";

/// API version the release payloads are parsed against.
pub const API_VERSION: &str = "2022-11-28";

/// Timeout for metadata requests in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Timeout for establishing a connection in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Returns the `User-Agent` sent with every request.
#[must_use]
pub fn user_agent() -> String {
    format!(
        "lean-releases/{} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("LEAN_RELEASES_GIT_COMMIT")
    )
}

/// Client for release metadata and asset downloads.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: Url,
}

impl GitHubClient {
    /// Builds a client from the runtime configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The API URL cannot be parsed or cannot carry a path
    /// - The token is not a valid header value
    /// - The HTTP client cannot be created
    pub fn new(config: &Config) -> Result<Self, ReleaseError> {
        let api_url = Url::parse(&config.api_url).map_err(|source| ReleaseError::InvalidUrl {
            url: config.api_url.clone(),
            source,
        })?;
        if api_url.cannot_be_a_base() {
            return Err(ReleaseError::InvalidUrl {
                url: config.api_url.clone(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            });
        }

        let http = reqwest::Client::builder()
            .default_headers(default_headers(config.token.as_deref())?)
            .user_agent(user_agent())
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|source| ReleaseError::request(&api_url, source))?;

        Ok(Self { http, api_url })
    }

    /// Returns the URL of one page of a repository's release collection.
    #[must_use]
    pub fn releases_page_url(&self, repo: &Repository, page: u32) -> Url {
        let mut url = self.releases_url(repo, &[]);
        url.query_pairs_mut().append_pair("page", &page.to_string());
        url
    }

    /// Returns the URL of a repository's latest release.
    #[must_use]
    pub fn latest_release_url(&self, repo: &Repository) -> Url {
        self.releases_url(repo, &["latest"])
    }

    /// Returns the URL of the release cut from `tag`.
    #[must_use]
    pub fn tagged_release_url(&self, repo: &Repository, tag: &str) -> Url {
        self.releases_url(repo, &["tags", tag])
    }

    fn releases_url(&self, repo: &Repository, tail: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        // `new` rejects cannot-be-a-base URLs, so segments are always editable.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", repo.owner.as_str(), repo.name.as_str(), "releases"])
                .extend(tail);
        }
        url
    }

    /// Fetches `url` and decodes the JSON body.
    ///
    /// `context` describes the request for the error raised on a non-success
    /// status, e.g. `failed to fetch releases from leanprover/lean4`.
    ///
    /// # Errors
    ///
    /// Returns `HttpStatus` on a non-success response, `Request` when the
    /// exchange fails, and `InvalidResponse` when the body is not valid JSON
    /// for `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: impl FnOnce() -> String,
    ) -> Result<T, ReleaseError> {
        let response = self
            .http
            .get(url.clone())
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|source| ReleaseError::request(&url, source))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReleaseError::http_status(context(), status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ReleaseError::request(&url, source))?;

        serde_json::from_slice(&body).map_err(|source| ReleaseError::InvalidResponse {
            url: url.to_string(),
            source,
        })
    }

    /// Starts a streaming download of `url`.
    ///
    /// The returned response has a success status; its body has not been read.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl` for a malformed URL, `Request` when the exchange
    /// fails, and `HttpStatus` naming the URL on a non-success response.
    pub async fn get_stream(&self, url: &str) -> Result<reqwest::Response, ReleaseError> {
        let parsed = Url::parse(url).map_err(|source| ReleaseError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let response = self
            .http
            .get(parsed)
            .send()
            .await
            .map_err(|source| ReleaseError::request(url, source))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReleaseError::http_status(
                format!("failed to download asset from {url}"),
                status,
            ));
        }
        Ok(response)
    }
}

/// Builds the headers sent with every request.
fn default_headers(token: Option<&str>) -> Result<HeaderMap, ReleaseError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_RELEASES));
    headers.insert(
        HeaderName::from_static(API_VERSION_HEADER),
        HeaderValue::from_static(API_VERSION),
    );
    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ReleaseError::InvalidToken)?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}
