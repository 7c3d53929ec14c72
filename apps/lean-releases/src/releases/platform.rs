//! Host and architecture detection for release artifacts.
//!
//! Lean publishes Linux tarballs for three architectures, told apart by a
//! marker in the asset name:
//!
//! | [`Arch`]  | Marker           | Example asset                       |
//! |-----------|------------------|-------------------------------------|
//! | `x86`     | `linux_x86`      | `lean-4.0.0-linux_x86.tar.zst`      |
//! | `x64`     | `linux`          | `lean-4.0.0-linux.tar.zst`          |
//! | `arm64`   | `linux_aarch64`  | `lean-4.0.0-linux_aarch64.tar.zst`  |
//!
//! The `x64` marker is a prefix of the other two, so [`Arch::matches`] only
//! accepts a marker occurrence that is not followed by more identifier
//! characters.

use std::fmt;
use std::str::FromStr;

use crate::errors::ReleaseError;

/// Operating system name that release artifacts are published for.
pub const SUPPORTED_OS: &str = "linux";

/// A release architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    /// 32-bit x86.
    X86,
    /// `x86_64`.
    X64,
    /// 64-bit ARM.
    Arm64,
}

impl Arch {
    /// Maps a Rust target architecture name (`std::env::consts::ARCH`) to an
    /// [`Arch`].
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedArchitecture` for anything other than `x86`,
    /// `x86_64`, or `aarch64`.
    pub fn from_target(arch: &str) -> Result<Self, ReleaseError> {
        match arch {
            "x86" => Ok(Self::X86),
            "x86_64" => Ok(Self::X64),
            "aarch64" => Ok(Self::Arm64),
            other => Err(ReleaseError::unsupported_architecture(other)),
        }
    }

    /// Returns the CLI name of this architecture.
    #[must_use = "returns the architecture name without side effects"]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::X64 => "x64",
            Self::Arm64 => "arm64",
        }
    }

    /// Returns the substring that identifies this architecture in asset names.
    #[must_use = "returns the marker without side effects"]
    pub fn asset_marker(self) -> &'static str {
        match self {
            Self::X86 => "linux_x86",
            Self::X64 => "linux",
            Self::Arm64 => "linux_aarch64",
        }
    }

    /// Returns whether `asset_name` carries this architecture's marker.
    ///
    /// The marker may appear anywhere, but the character right after it must
    /// not be `_` or alphanumeric.
    #[must_use]
    pub fn matches(self, asset_name: &str) -> bool {
        let marker = self.asset_marker();
        asset_name.match_indices(marker).any(|(start, _)| {
            asset_name[start + marker.len()..]
                .chars()
                .next()
                .is_none_or(|c| c != '_' && !c.is_alphanumeric())
        })
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Arch {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x86" => Ok(Self::X86),
            "x64" => Ok(Self::X64),
            "arm64" => Ok(Self::Arm64),
            other => Err(ReleaseError::unsupported_architecture(other)),
        }
    }
}

/// The operating system and architecture of the running process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Host {
    /// OS name as reported by `std::env::consts::OS`.
    pub os: &'static str,
    /// Architecture name as reported by `std::env::consts::ARCH`.
    pub arch: &'static str,
}

impl Host {
    /// Describes the current process.
    #[must_use]
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
        }
    }

    /// Fails unless this host runs Linux.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedPlatform` on any other OS.
    pub fn ensure_supported(self) -> Result<(), ReleaseError> {
        if self.os == SUPPORTED_OS {
            Ok(())
        } else {
            Err(ReleaseError::UnsupportedPlatform {
                os: self.os.to_string(),
            })
        }
    }

    /// Returns the host's native [`Arch`].
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedArchitecture` when the host architecture has no
    /// published artifacts.
    pub fn native_arch(self) -> Result<Arch, ReleaseError> {
        Arch::from_target(self.arch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arch_parses_cli_names() {
        assert_eq!("x86".parse::<Arch>().unwrap(), Arch::X86);
        assert_eq!("x64".parse::<Arch>().unwrap(), Arch::X64);
        assert_eq!("arm64".parse::<Arch>().unwrap(), Arch::Arm64);
    }

    #[test]
    fn arch_rejects_unknown_names() {
        for name in ["x86_64", "aarch64", "riscv64", "", "X64"] {
            let err = name.parse::<Arch>().unwrap_err();
            assert!(matches!(err, ReleaseError::UnsupportedArchitecture { .. }));
        }
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(Arch::X86.to_string(), "x86");
        assert_eq!(Arch::X64.to_string(), "x64");
        assert_eq!(Arch::Arm64.to_string(), "arm64");
    }

    #[test]
    fn from_target_maps_rust_arch_names() {
        assert_eq!(Arch::from_target("x86").unwrap(), Arch::X86);
        assert_eq!(Arch::from_target("x86_64").unwrap(), Arch::X64);
        assert_eq!(Arch::from_target("aarch64").unwrap(), Arch::Arm64);
        assert!(Arch::from_target("powerpc64").is_err());
    }

    #[test]
    fn x64_marker_does_not_match_other_linux_suffixes() {
        assert!(Arch::X64.matches("lean-4.0.0-linux.tar.zst"));
        assert!(!Arch::X64.matches("lean-4.0.0-linux_aarch64.tar.zst"));
        assert!(!Arch::X64.matches("lean-4.0.0-linux_x86.tar.zst"));
    }

    #[test]
    fn specific_markers_match_only_their_asset() {
        assert!(Arch::Arm64.matches("lean-4.0.0-linux_aarch64.tar.zst"));
        assert!(!Arch::Arm64.matches("lean-4.0.0-linux.tar.zst"));
        assert!(Arch::X86.matches("lean-4.0.0-linux_x86.tar.gz"));
        assert!(!Arch::X86.matches("lean-4.0.0-linux_x86_64.tar.gz"));
    }

    #[test]
    fn marker_at_end_of_name_matches() {
        assert!(Arch::X64.matches("lean-linux"));
        assert!(!Arch::X64.matches("lean-darwin.tar.zst"));
    }

    #[test]
    fn marker_matches_later_occurrence() {
        assert!(Arch::X64.matches("linux_tools-lean-linux.tar.gz"));
    }

    #[test]
    fn host_on_linux_is_supported() {
        let host = Host {
            os: "linux",
            arch: "x86_64",
        };
        assert!(host.ensure_supported().is_ok());
        assert_eq!(host.native_arch().unwrap(), Arch::X64);
    }

    #[test]
    fn host_on_other_os_is_rejected() {
        let host = Host {
            os: "macos",
            arch: "aarch64",
        };
        let err = host.ensure_supported().unwrap_err();
        assert!(matches!(err, ReleaseError::UnsupportedPlatform { ref os } if os == "macos"));
    }

    #[test]
    fn current_host_reports_compile_target() {
        let host = Host::current();
        assert_eq!(host.os, std::env::consts::OS);
        assert_eq!(host.arch, std::env::consts::ARCH);
    }
}
