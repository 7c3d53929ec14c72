//! Release discovery and artifact download for the Lean toolchain.
//!
//! ## Module Structure
//!
//! - [`client`] - GitHub API transport and endpoint URLs
//! - [`model`] - Release, asset, repository and tag types
//! - [`platform`] - Host and architecture detection
//! - [`lister`] - Paginated release listing
//! - [`matrix`] - CI toolchain matrix composition
//! - [`resolver`] - Tag to asset resolution
//! - [`download`] - Streaming asset download

pub mod client;
pub mod download;
pub mod lister;
pub mod matrix;
pub mod model;
pub mod platform;
pub mod resolver;

pub use client::GitHubClient;
pub use download::download_asset;
pub use lister::list_releases;
pub use matrix::{MatrixBuilder, append_output, matrix_output_line};
pub use model::{Asset, Channel, Release, ReleaseTag, Repository};
pub use platform::{Arch, Host};
pub use resolver::ArtifactResolver;
