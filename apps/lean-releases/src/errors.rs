//! Error types for lean-releases.
//!
//! Every release operation returns [`ReleaseError`]. None of them are recovered
//! locally: they travel up to `main`, which logs them and exits with status 1.

use std::fmt;
use std::path::Path;

use reqwest::StatusCode;
use thiserror::Error;

use crate::releases::Arch;

/// Broad classification of a [`ReleaseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An HTTP exchange failed or returned a non-success status.
    Transport,
    /// A call succeeded but the required entity could not be determined.
    Resolution,
    /// The assembled configuration could not be used.
    Configuration,
    /// Reading or writing local files failed.
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Transport => "transport",
            Self::Resolution => "resolution",
            Self::Configuration => "configuration",
            Self::Io => "I/O",
        };
        f.write_str(name)
    }
}

/// Errors raised while discovering, resolving, or downloading releases.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// The server answered with a non-success status.
    #[error("{context}: {status}")]
    HttpStatus {
        /// What was being fetched and from where.
        context: String,
        /// The status returned by the server.
        status: StatusCode,
    },

    /// The request could not be sent or its body could not be read.
    #[error("request to {url} failed")]
    Request {
        /// The URL being requested.
        url: String,
        /// The underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the expected JSON document.
    #[error("invalid response from {url}")]
    InvalidResponse {
        /// The URL that produced the body.
        url: String,
        /// The decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// A URL could not be assembled or parsed.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The offending URL text.
        url: String,
        /// The parse error.
        #[source]
        source: url::ParseError,
    },

    /// Release artifacts only exist for Linux hosts.
    #[error("unsupported platform: {os} (only Linux is supported)")]
    UnsupportedPlatform {
        /// The host operating system.
        os: String,
    },

    /// The architecture is not one of `x86`, `x64`, `arm64`.
    #[error("unsupported architecture: {arch}")]
    UnsupportedArchitecture {
        /// The architecture that was requested or detected.
        arch: String,
    },

    /// No tarball in the release matches the architecture.
    #[error("failed to find asset for {arch} in {tag}")]
    AssetNotFound {
        /// The requested architecture.
        arch: Arch,
        /// The resolved release tag.
        tag: String,
    },

    /// The repository has no releases at all.
    #[error("no releases found in {repo}")]
    NoReleases {
        /// The repository that was listed.
        repo: String,
    },

    /// A repository identifier was not of the form `owner/name`.
    #[error("invalid repository '{value}': expected owner/name")]
    InvalidRepository {
        /// The rejected value.
        value: String,
    },

    /// The API token cannot be sent as an HTTP header.
    #[error("GITHUB_TOKEN contains characters that are not valid in an HTTP header")]
    InvalidToken,

    /// Local file operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// What was being done, including the path.
        message: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ReleaseError {
    /// Creates an `HttpStatus` error.
    #[must_use]
    pub fn http_status(context: impl Into<String>, status: StatusCode) -> Self {
        Self::HttpStatus {
            context: context.into(),
            status,
        }
    }

    /// Creates a `Request` error for `url`.
    #[must_use]
    pub fn request(url: impl fmt::Display, source: reqwest::Error) -> Self {
        Self::Request {
            url: url.to_string(),
            source,
        }
    }

    /// Creates an `Io` error describing an operation on `path`.
    #[must_use]
    pub fn io(action: &str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            message: format!("failed to {action} {}", path.display()),
            source,
        }
    }

    /// Creates an `UnsupportedArchitecture` error.
    #[must_use]
    pub fn unsupported_architecture(arch: impl Into<String>) -> Self {
        Self::UnsupportedArchitecture { arch: arch.into() }
    }

    /// Returns the broad category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::HttpStatus { .. }
            | Self::Request { .. }
            | Self::InvalidResponse { .. }
            | Self::InvalidUrl { .. } => ErrorKind::Transport,
            Self::UnsupportedPlatform { .. }
            | Self::UnsupportedArchitecture { .. }
            | Self::AssetNotFound { .. }
            | Self::NoReleases { .. }
            | Self::InvalidRepository { .. } => ErrorKind::Resolution,
            Self::InvalidToken => ErrorKind::Configuration,
            Self::Io { .. } => ErrorKind::Io,
        }
    }
}
