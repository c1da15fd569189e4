//! Optional-capability detection for external tools.
//!
//! Installers run on whatever distribution the user has; the engine treats
//! every external tool as an optional capability and degrades gracefully
//! when one is absent.

use std::fmt;

use crate::exec::Executor;

/// Supported package managers for before/after package snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    /// Arch Linux and derivatives (pacman).
    Pacman,
    /// Debian and derivatives (dpkg).
    Dpkg,
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pacman => write!(f, "pacman"),
            Self::Dpkg => write!(f, "dpkg"),
        }
    }
}

impl PackageManager {
    /// Binary probed on PATH to detect this manager.
    #[must_use]
    pub const fn binary(self) -> &'static str {
        match self {
            Self::Pacman => "pacman",
            Self::Dpkg => "dpkg-query",
        }
    }

    /// Command line that lists every installed package, one per line with
    /// the package name as the first whitespace-delimited token.
    #[must_use]
    pub const fn list_command(self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Pacman => ("pacman", &["-Q"]),
            Self::Dpkg => ("dpkg-query", &["-f", "${binary:Package}\\n", "-W"]),
        }
    }
}

/// Detect an available package manager, preferring pacman.
///
/// Returns `None` when no supported manager is on PATH; callers skip the
/// package snapshot in that case rather than failing.
pub fn detect_package_manager(executor: &dyn Executor) -> Option<PackageManager> {
    [PackageManager::Pacman, PackageManager::Dpkg]
        .into_iter()
        .find(|mgr| executor.which(mgr.binary()))
}

/// Check whether a `git` binary is available for the snapshot helper.
///
/// Source-repository sync does not need this (it links libgit2), but the
/// thin snapshot helper shells out.
pub fn git_available(executor: &dyn Executor) -> bool {
    executor.which("git")
}
