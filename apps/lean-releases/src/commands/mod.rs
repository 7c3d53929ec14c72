//! Subcommand implementations for the lean-releases CLI.
//!
//! - [`discover`] - Compose the CI toolchain matrix
//! - [`download`] - Download the toolchain tarball for one tag

pub mod discover;
pub mod download;
