//! Domain-specific error types for the fake-home provisioning engine.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors (e.g., [`RegistryError`],
//! [`ReconcileError`]) while command handlers at the CLI boundary convert
//! them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! RiceboxError
//! ├── Registry(RegistryError)   — profile names, URLs, persistence
//! ├── Provision(ProvisionError) — clone failures, installer exit codes
//! ├── Reconcile(ReconcileError) — link/adopt state-machine guards
//! └── Launch(LaunchError)       — launch-script and session-file glue
//! ```
//!
//! Guard errors abort only the offending operation. Audit and diagnostic
//! steps never produce errors at all; they degrade to warnings inside the
//! change-tracking engine so the primary provisioning outcome is never
//! masked by an auditing failure.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the provisioning engine.
///
/// Aggregates domain-specific sub-errors and is convertible to
/// [`anyhow::Error`] for use at CLI command boundaries.
#[derive(Error, Debug)]
pub enum RiceboxError {
    /// Profile registry error (validation, lookup, persistence).
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Provisioning error (source sync, installer execution).
    #[error("provisioning error: {0}")]
    Provision(#[from] ProvisionError),

    /// Dotfiles reconciliation error (link/adopt guards).
    #[error("reconcile error: {0}")]
    Reconcile(#[from] ReconcileError),

    /// Launch-script or session-file generation error.
    #[error("launch error: {0}")]
    Launch(#[from] LaunchError),
}

/// Errors that arise from the profile registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The profile name is empty or contains characters outside the
    /// restricted set. Rejected before any I/O.
    #[error("invalid profile name '{0}': names must match [A-Za-z0-9._-]+")]
    InvalidName(String),

    /// The source URL has no scheme separator and is not an absolute path.
    /// Rejected before any I/O.
    #[error("invalid source URL '{0}': expected scheme:// or an absolute path")]
    InvalidUrl(String),

    /// Registry lookup miss. Fatal to the calling operation.
    #[error("unknown profile '{0}': run `ricebox add {0} <url>` or `ricebox list`")]
    UnknownProfile(String),

    /// The registry file could not be read or appended to.
    #[error("registry file {}: {source}", .path.display())]
    Io {
        /// Path to the registry file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise during a provisioning run.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// The initial clone of the source repository failed. There is no
    /// existing checkout to fall back to, so the run is aborted.
    #[error("clone of {url} failed: {reason}")]
    CloneFailed {
        /// URL that could not be cloned.
        url: String,
        /// Reason reported by git.
        reason: String,
    },

    /// The installer subprocess exited unsuccessfully. All diff and log
    /// artifacts have already been written when this is raised.
    #[error("installer exited with {}", .code.map_or_else(|| "signal".to_string(), |c| format!("status {c}")))]
    InstallerFailed {
        /// Exit code, or `None` when the process was killed by a signal.
        code: Option<i32>,
    },

    /// The isolated environment could not be created.
    #[error("creating {}: {source}", .path.display())]
    Io {
        /// Path that could not be created or written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Guard errors from the dotfiles reconciler.
///
/// Every variant is recoverable by operator action; the reconciler never
/// silently resolves any of these.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// The isolated `.config` is already a symlink. Warning-level: the
    /// filesystem is exactly as a successful `link-config` leaves it.
    #[error("{} is already linked", .path.display())]
    AlreadyLinked {
        /// The isolated `.config` path.
        path: PathBuf,
    },

    /// The isolated `.config` is a real directory with live data.
    /// Linking over it would discard that data.
    #[error("{} is a real directory: run `ricebox adopt-config {profile}` to migrate it", .path.display())]
    UnsafeOverwrite {
        /// The isolated `.config` path.
        path: PathBuf,
        /// Profile name, for the remedial command.
        profile: String,
    },

    /// The dotfiles `.config` already contains entries. Adopting into it
    /// would silently merge two unrelated configuration sets.
    #[error("destination {} is not empty: move its contents aside before adopting", .path.display())]
    DestinationNotEmpty {
        /// The dotfiles `.config` path.
        path: PathBuf,
    },

    /// Some entries could not be moved out of the isolated `.config`.
    /// The symlink was not created; nothing has been lost.
    #[error("adopt left {} residual entries in {}", .residual.len(), .path.display())]
    PartialAdopt {
        /// The isolated `.config` path.
        path: PathBuf,
        /// Names of the entries that could not be moved.
        residual: Vec<String>,
    },

    /// There is no isolated `.config` directory to adopt from.
    #[error("{} does not exist: run `ricebox link-config {profile}` instead", .path.display())]
    NothingToAdopt {
        /// The isolated `.config` path.
        path: PathBuf,
        /// Profile name, for the remedial command.
        profile: String,
    },

    /// An I/O error occurred while inspecting or mutating the trees.
    #[error("reconcile I/O at {}: {source}", .path.display())]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors from the launch-script / session-file generators.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// Session files point at a launch script that must already exist and
    /// be executable.
    #[error("launch script {} missing or not executable: run `ricebox launch-script` first", .path.display())]
    LaunchScriptMissing {
        /// Expected launch-script path.
        path: PathBuf,
    },

    /// A generated file could not be written.
    #[error("writing {}: {source}", .path.display())]
    Io {
        /// Path that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io;

    // -----------------------------------------------------------------------
    // RegistryError
    // -----------------------------------------------------------------------

    #[test]
    fn registry_invalid_name_display() {
        let e = RegistryError::InvalidName("../escape".to_string());
        assert_eq!(
            e.to_string(),
            "invalid profile name '../escape': names must match [A-Za-z0-9._-]+"
        );
    }

    #[test]
    fn registry_invalid_url_display() {
        let e = RegistryError::InvalidUrl("bad-url".to_string());
        assert!(e.to_string().contains("bad-url"));
        assert!(e.to_string().contains("scheme"));
    }

    #[test]
    fn registry_unknown_profile_names_remedial_command() {
        let e = RegistryError::UnknownProfile("omarchy".to_string());
        assert!(e.to_string().contains("ricebox add omarchy"));
    }

    #[test]
    fn registry_io_has_source() {
        use std::error::Error as StdError;
        let e = RegistryError::Io {
            path: PathBuf::from("/cfg/profiles.list"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("/cfg/profiles.list"));
    }

    // -----------------------------------------------------------------------
    // ProvisionError
    // -----------------------------------------------------------------------

    #[test]
    fn installer_failed_with_code_display() {
        let e = ProvisionError::InstallerFailed { code: Some(2) };
        assert_eq!(e.to_string(), "installer exited with status 2");
    }

    #[test]
    fn installer_failed_by_signal_display() {
        let e = ProvisionError::InstallerFailed { code: None };
        assert_eq!(e.to_string(), "installer exited with signal");
    }

    #[test]
    fn clone_failed_display() {
        let e = ProvisionError::CloneFailed {
            url: "https://example.test/repo.git".to_string(),
            reason: "could not resolve host".to_string(),
        };
        assert!(e.to_string().contains("https://example.test/repo.git"));
        assert!(e.to_string().contains("could not resolve host"));
    }

    // -----------------------------------------------------------------------
    // ReconcileError
    // -----------------------------------------------------------------------

    #[test]
    fn unsafe_overwrite_names_remedial_command() {
        let e = ReconcileError::UnsafeOverwrite {
            path: PathBuf::from("/fake/.config"),
            profile: "omarchy".to_string(),
        };
        assert!(e.to_string().contains("ricebox adopt-config omarchy"));
    }

    #[test]
    fn nothing_to_adopt_names_remedial_command() {
        let e = ReconcileError::NothingToAdopt {
            path: PathBuf::from("/fake/.config"),
            profile: "omarchy".to_string(),
        };
        assert!(e.to_string().contains("ricebox link-config omarchy"));
    }

    #[test]
    fn partial_adopt_counts_residuals() {
        let e = ReconcileError::PartialAdopt {
            path: PathBuf::from("/fake/.config"),
            residual: vec!["hypr".to_string(), "waybar".to_string()],
        };
        assert!(e.to_string().contains("2 residual entries"));

        let one = ReconcileError::PartialAdopt {
            path: PathBuf::from("/fake/.config"),
            residual: vec!["hypr".to_string()],
        };
        assert!(one.to_string().contains("1 residual entries"));
    }

    // -----------------------------------------------------------------------
    // LaunchError
    // -----------------------------------------------------------------------

    #[test]
    fn launch_script_missing_display() {
        let e = LaunchError::LaunchScriptMissing {
            path: PathBuf::from("/bin/start-omarchy"),
        };
        assert!(e.to_string().contains("/bin/start-omarchy"));
        assert!(e.to_string().contains("launch-script"));
    }

    // -----------------------------------------------------------------------
    // RiceboxError conversions
    // -----------------------------------------------------------------------

    #[test]
    fn ricebox_error_from_registry_error() {
        let e: RiceboxError = RegistryError::UnknownProfile("x".to_string()).into();
        assert!(e.to_string().contains("registry error"));
    }

    #[test]
    fn ricebox_error_from_reconcile_error() {
        let e: RiceboxError = ReconcileError::AlreadyLinked {
            path: PathBuf::from("/fake/.config"),
        }
        .into();
        assert!(e.to_string().contains("reconcile error"));
    }

    #[test]
    fn ricebox_error_from_provision_error() {
        let e: RiceboxError = ProvisionError::InstallerFailed { code: Some(1) }.into();
        assert!(e.to_string().contains("provisioning error"));
    }

    #[test]
    fn ricebox_error_from_launch_error() {
        let e: RiceboxError = LaunchError::LaunchScriptMissing {
            path: PathBuf::from("/x"),
        }
        .into();
        assert!(e.to_string().contains("launch error"));
    }

    // -----------------------------------------------------------------------
    // Send + Sync bounds
    // -----------------------------------------------------------------------

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<RiceboxError>();
        assert_send_sync::<RegistryError>();
        assert_send_sync::<ProvisionError>();
        assert_send_sync::<ReconcileError>();
        assert_send_sync::<LaunchError>();
    }

    #[test]
    fn reconcile_error_converts_to_anyhow() {
        let e = ReconcileError::DestinationNotEmpty {
            path: PathBuf::from("/dots/.config"),
        };
        let _anyhow_err: anyhow::Error = e.into();
    }
}
