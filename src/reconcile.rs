//! Dotfiles reconciler: the link/adopt state machine.
//!
//! Each operation re-inspects the filesystem at its start and decides from
//! the observed state alone. The state is never cached across operations,
//! so a concurrent `rm -rf` or manual symlink between two calls is seen by
//! the next call. The guard rules:
//!
//! - `link_config` only creates a symlink where *nothing* exists;
//! - `adopt_config` only migrates a *real* directory, and only into an
//!   empty destination;
//! - neither ever deletes user data.

use std::path::Path;

use crate::error::ReconcileError;
use crate::fsutil;
use crate::paths::DotfilesTree;

/// Observed state of a profile's isolated `.config` path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigDirState {
    /// Nothing exists at the path.
    Absent,
    /// An ordinary directory (or file) with live data.
    RealDirectory,
    /// A symbolic link.
    Linked,
}

/// Inspect the isolated `.config` path.
///
/// Uses `symlink_metadata` so a symlink is reported as [`Linked`]
/// regardless of whether its target still exists.
///
/// [`Linked`]: ConfigDirState::Linked
#[must_use]
pub fn inspect(path: &Path) -> ConfigDirState {
    match path.symlink_metadata() {
        Err(_) => ConfigDirState::Absent,
        Ok(meta) if meta.is_symlink() => ConfigDirState::Linked,
        Ok(_) => ConfigDirState::RealDirectory,
    }
}

/// Ensure the dotfiles tree's `.config` and `.local/share` exist.
///
/// Never touches the isolated environment; always safe to re-run.
///
/// # Errors
///
/// Returns an error if the directories cannot be created.
pub fn prepare(tree: &DotfilesTree) -> Result<(), ReconcileError> {
    for dir in [&tree.config, &tree.data] {
        std::fs::create_dir_all(dir).map_err(|source| ReconcileError::Io {
            path: dir.clone(),
            source,
        })?;
    }
    Ok(())
}

/// Link the isolated `.config` to the dotfiles tree's `.config`.
///
/// Valid only when nothing exists at the isolated path. Creates the
/// dotfiles `.config` if missing, then the symlink.
///
/// # Errors
///
/// - [`ReconcileError::AlreadyLinked`] when the path is already a symlink;
///   the filesystem is left exactly as a successful call leaves it.
/// - [`ReconcileError::UnsafeOverwrite`] when a real directory or file is
///   in the way; `adopt_config` migrates it instead.
pub fn link_config(
    isolated_config: &Path,
    tree: &DotfilesTree,
    profile: &str,
) -> Result<(), ReconcileError> {
    match inspect(isolated_config) {
        ConfigDirState::Linked => Err(ReconcileError::AlreadyLinked {
            path: isolated_config.to_path_buf(),
        }),
        ConfigDirState::RealDirectory => Err(ReconcileError::UnsafeOverwrite {
            path: isolated_config.to_path_buf(),
            profile: profile.to_string(),
        }),
        ConfigDirState::Absent => {
            std::fs::create_dir_all(&tree.config).map_err(|source| ReconcileError::Io {
                path: tree.config.clone(),
                source,
            })?;
            make_symlink(&tree.config, isolated_config)
        }
    }
}

/// Migrate a real isolated `.config` into the dotfiles tree, then link.
///
/// Moves every entry (hidden ones included) into the dotfiles `.config`,
/// removes the then-empty isolated directory and replaces it with a
/// symlink. On success returns the moved entry names.
///
/// # Errors
///
/// - [`ReconcileError::NothingToAdopt`] when the isolated path is absent.
/// - [`ReconcileError::AlreadyLinked`] when it is already a symlink.
/// - [`ReconcileError::DestinationNotEmpty`] when the dotfiles `.config`
///   already has entries; both sides are left completely untouched.
/// - [`ReconcileError::PartialAdopt`] when some entries could not be
///   moved; the symlink is not created and nothing is lost.
pub fn adopt_config(
    isolated_config: &Path,
    tree: &DotfilesTree,
    profile: &str,
) -> Result<Vec<String>, ReconcileError> {
    match inspect(isolated_config) {
        ConfigDirState::Absent => {
            return Err(ReconcileError::NothingToAdopt {
                path: isolated_config.to_path_buf(),
                profile: profile.to_string(),
            });
        }
        ConfigDirState::Linked => {
            return Err(ReconcileError::AlreadyLinked {
                path: isolated_config.to_path_buf(),
            });
        }
        ConfigDirState::RealDirectory => {}
    }

    if dir_has_entries(&tree.config)? {
        return Err(ReconcileError::DestinationNotEmpty {
            path: tree.config.clone(),
        });
    }
    std::fs::create_dir_all(&tree.config).map_err(|source| ReconcileError::Io {
        path: tree.config.clone(),
        source,
    })?;

    let entries = read_entry_names(isolated_config)?;
    let mut moved = Vec::new();
    let mut residual = Vec::new();
    for name in entries {
        let src = isolated_config.join(&name);
        let dst = tree.config.join(&name);
        match fsutil::move_entry(&src, &dst) {
            Ok(()) => moved.push(name),
            Err(e) => {
                tracing::warn!("could not move {}: {e:#}", src.display());
                residual.push(name);
            }
        }
    }

    // Anything that appeared mid-operation counts as residual too; the
    // directory must be verifiably empty before it is removed.
    for name in read_entry_names(isolated_config)? {
        if !residual.contains(&name) {
            residual.push(name);
        }
    }
    if !residual.is_empty() {
        residual.sort();
        return Err(ReconcileError::PartialAdopt {
            path: isolated_config.to_path_buf(),
            residual,
        });
    }

    std::fs::remove_dir(isolated_config).map_err(|source| ReconcileError::Io {
        path: isolated_config.to_path_buf(),
        source,
    })?;
    make_symlink(&tree.config, isolated_config)?;
    moved.sort();
    Ok(moved)
}

/// Whether `dir` exists and contains at least one entry.
fn dir_has_entries(dir: &Path) -> Result<bool, ReconcileError> {
    if !dir.exists() {
        return Ok(false);
    }
    let mut entries = std::fs::read_dir(dir).map_err(|source| ReconcileError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(entries.next().is_some())
}

fn read_entry_names(dir: &Path) -> Result<Vec<String>, ReconcileError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ReconcileError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ReconcileError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

#[cfg(unix)]
fn make_symlink(target: &Path, link: &Path) -> Result<(), ReconcileError> {
    fsutil::ensure_parent_dir(link).map_err(|e| ReconcileError::Io {
        path: link.to_path_buf(),
        source: std::io::Error::other(format!("{e:#}")),
    })?;
    std::os::unix::fs::symlink(target, link).map_err(|source| ReconcileError::Io {
        path: link.to_path_buf(),
        source,
    })
}

#[cfg(not(unix))]
fn make_symlink(_target: &Path, link: &Path) -> Result<(), ReconcileError> {
    Err(ReconcileError::Io {
        path: link.to_path_buf(),
        source: std::io::Error::other("symbolic links are only supported on unix"),
    })
}
