//! Release data as returned by the GitHub Releases API.
//!
//! Only the fields the tool needs are deserialized; everything else in the
//! API payload is ignored:
//!
//! ```json
//! {
//!   "tag_name": "v4.9.0",
//!   "published_at": "2024-07-01T09:26:03Z",
//!   "assets": [
//!     {
//!       "name": "lean-4.9.0-linux.tar.zst",
//!       "browser_download_url": "https://github.com/leanprover/lean4/releases/download/v4.9.0/lean-4.9.0-linux.tar.zst"
//!     }
//!   ]
//! }
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Arch;
use crate::errors::ReleaseError;

/// Tag prefix shared by every nightly build.
pub const NIGHTLY_PREFIX: &str = "nightly";

/// Tag prefix of versioned stable releases.
pub const VERSION_PREFIX: &str = "v";

static TARBALL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.tar\.\w+$").expect("tarball pattern is a valid regex"));

/// A downloadable file attached to a release.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Asset {
    /// File name, e.g. `lean-4.9.0-linux.tar.zst`.
    pub name: String,
    /// Direct download URL.
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
}

impl Asset {
    /// Returns whether the asset is a compressed tarball (`*.tar.<ext>`).
    #[must_use]
    pub fn is_tarball(&self) -> bool {
        TARBALL_PATTERN.is_match(&self.name)
    }
}

/// A published release of a repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Release {
    /// The git tag the release was cut from.
    pub tag_name: String,
    /// Publication time; `null` for drafts.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Attached files in the order the API lists them.
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl Release {
    /// Returns the first tarball asset built for `arch`.
    #[must_use = "returns asset info without side effects"]
    pub fn find_asset(&self, arch: Arch) -> Option<&Asset> {
        self.assets
            .iter()
            .find(|asset| arch.matches(&asset.name) && asset.is_tarball())
    }
}

/// A GitHub repository identified as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    /// Account or organisation that owns the repository.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl Repository {
    /// Creates a repository identifier.
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for Repository {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ReleaseError::InvalidRepository {
            value: s.to_string(),
        };
        let (owner, name) = s.split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        Ok(Self::new(owner, name))
    }
}

/// Release channel addressed by a sentinel tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// The repository's latest stable release.
    Stable,
    /// The most recently published nightly build.
    Nightly,
}

/// A requested release: either a channel sentinel or a literal tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseTag {
    /// `stable` or `nightly`.
    Channel(Channel),
    /// Any other tag, used verbatim.
    Literal(String),
}

impl ReleaseTag {
    /// Returns whether this tag lives in the nightly repository.
    #[must_use]
    pub fn is_nightly(&self) -> bool {
        match self {
            Self::Channel(channel) => *channel == Channel::Nightly,
            Self::Literal(tag) => tag.starts_with(NIGHTLY_PREFIX),
        }
    }
}

impl From<&str> for ReleaseTag {
    fn from(tag: &str) -> Self {
        match tag {
            "stable" => Self::Channel(Channel::Stable),
            "nightly" => Self::Channel(Channel::Nightly),
            other => Self::Literal(other.to_string()),
        }
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Channel(Channel::Stable) => f.write_str("stable"),
            Self::Channel(Channel::Nightly) => f.write_str("nightly"),
            Self::Literal(tag) => f.write_str(tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str) -> Asset {
        Asset {
            name: name.to_string(),
            download_url: format!("https://example.com/{name}"),
        }
    }

    fn release_with(names: &[&str]) -> Release {
        Release {
            tag_name: "v4.0.0".to_string(),
            published_at: None,
            assets: names.iter().map(|n| asset(n)).collect(),
        }
    }

    #[test]
    fn release_deserializes_api_payload() {
        let json = r#"{
            "url": "https://api.github.com/repos/leanprover/lean4/releases/1",
            "tag_name": "v4.9.0",
            "draft": false,
            "published_at": "2024-07-01T09:26:03Z",
            "assets": [
                {
                    "id": 7,
                    "name": "lean-4.9.0-linux.tar.zst",
                    "browser_download_url": "https://github.com/leanprover/lean4/releases/download/v4.9.0/lean-4.9.0-linux.tar.zst"
                }
            ]
        }"#;
        let release: Release = serde_json::from_str(json).unwrap();
        assert_eq!(release.tag_name, "v4.9.0");
        assert_eq!(
            release.published_at.unwrap().to_rfc3339(),
            "2024-07-01T09:26:03+00:00"
        );
        assert_eq!(release.assets.len(), 1);
        assert!(release.assets[0].download_url.ends_with("linux.tar.zst"));
    }

    #[test]
    fn release_tolerates_null_published_at_and_missing_assets() {
        let release: Release =
            serde_json::from_str(r#"{"tag_name": "draft", "published_at": null}"#).unwrap();
        assert!(release.published_at.is_none());
        assert!(release.assets.is_empty());
    }

    #[test]
    fn tarball_pattern_requires_tar_extension_at_end() {
        assert!(asset("lean-4.0.0-linux.tar.gz").is_tarball());
        assert!(asset("lean-4.0.0-linux.tar.zst").is_tarball());
        assert!(!asset("lean-4.0.0-linux.zip").is_tarball());
        assert!(!asset("lean-4.0.0-linux.tar").is_tarball());
        assert!(!asset("lean-4.0.0-linux.tar.gz.sha256").is_tarball());
    }

    #[test]
    fn find_asset_skips_zip_and_other_architectures() {
        let release = release_with(&[
            "lean-4.0.0-linux.tar.gz",
            "lean-4.0.0-linux_aarch64.tar.gz",
            "lean-4.0.0-linux.zip",
        ]);
        assert_eq!(
            release.find_asset(Arch::X64).unwrap().name,
            "lean-4.0.0-linux.tar.gz"
        );
        assert_eq!(
            release.find_asset(Arch::Arm64).unwrap().name,
            "lean-4.0.0-linux_aarch64.tar.gz"
        );
        assert!(release.find_asset(Arch::X86).is_none());
    }

    #[test]
    fn find_asset_for_x64_ignores_earlier_aarch64_asset() {
        let release = release_with(&[
            "lean-4.0.0-linux_aarch64.tar.zst",
            "lean-4.0.0-linux_x86.tar.zst",
            "lean-4.0.0-linux.tar.zst",
        ]);
        assert_eq!(
            release.find_asset(Arch::X64).unwrap().name,
            "lean-4.0.0-linux.tar.zst"
        );
    }

    #[test]
    fn find_asset_returns_first_match_in_listed_order() {
        let release = release_with(&["lean-a-linux.tar.zst", "lean-b-linux.tar.gz"]);
        assert_eq!(
            release.find_asset(Arch::X64).unwrap().name,
            "lean-a-linux.tar.zst"
        );
    }

    #[test]
    fn repository_parses_owner_and_name() {
        let repo: Repository = "leanprover/lean4-nightly".parse().unwrap();
        assert_eq!(repo.owner, "leanprover");
        assert_eq!(repo.name, "lean4-nightly");
        assert_eq!(repo.to_string(), "leanprover/lean4-nightly");
    }

    #[test]
    fn repository_rejects_malformed_values() {
        for value in ["lean4", "/lean4", "leanprover/", "a/b/c", ""] {
            assert!(
                value.parse::<Repository>().is_err(),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn release_tag_recognises_sentinels() {
        assert_eq!(ReleaseTag::from("stable"), ReleaseTag::Channel(Channel::Stable));
        assert_eq!(
            ReleaseTag::from("nightly"),
            ReleaseTag::Channel(Channel::Nightly)
        );
        assert_eq!(
            ReleaseTag::from("v4.0.0"),
            ReleaseTag::Literal("v4.0.0".to_string())
        );
    }

    #[test]
    fn release_tag_routes_nightly_prefix() {
        assert!(ReleaseTag::from("nightly").is_nightly());
        assert!(ReleaseTag::from("nightly-2024-01-10").is_nightly());
        assert!(!ReleaseTag::from("stable").is_nightly());
        assert!(!ReleaseTag::from("v4.0.0").is_nightly());
    }

    #[test]
    fn release_tag_display_round_trips_input() {
        for tag in ["stable", "nightly", "v4.1.0-rc1"] {
            assert_eq!(ReleaseTag::from(tag).to_string(), tag);
        }
    }
}
