//! Pure path derivation for isolated environments and dotfiles trees.
//!
//! Everything here is deterministic arithmetic on paths: no filesystem
//! access, no validation (profile-name validation belongs to the registry).
//! Generated launch scripts embed the same derivation, so the formula
//! `prefix + name` is a shared contract: change it here and the script
//! template must change with it.

use std::path::{Path, PathBuf};

/// Name of the per-profile log directory, relative to the isolated home.
pub const LOG_SUBDIR: &str = ".local/state/ricebox";

/// Fixed subpath of the isolated home that holds the source checkout.
pub const SOURCE_SUBDIR: &str = "source";

/// The isolated home of one profile and its XDG subpaths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentPaths {
    /// Isolated home root: `prefix` + profile name.
    pub home: PathBuf,
    /// `$XDG_CONFIG_HOME`, i.e. `home/.config`.
    pub config: PathBuf,
    /// `$XDG_DATA_HOME`, i.e. `home/.local/share`.
    pub data: PathBuf,
    /// `$XDG_CACHE_HOME`, i.e. `home/.cache`.
    pub cache: PathBuf,
    /// `$XDG_STATE_HOME`, i.e. `home/.local/state`.
    pub state: PathBuf,
    /// Source repository checkout.
    pub source: PathBuf,
    /// Per-profile provisioning logs and change reports.
    pub log_dir: PathBuf,
}

impl EnvironmentPaths {
    /// Derive every path for `name` under `prefix`.
    #[must_use]
    pub fn resolve(prefix: &Path, name: &str) -> Self {
        let home = prefix.join(name);
        Self {
            config: home.join(".config"),
            data: home.join(".local/share"),
            cache: home.join(".cache"),
            state: home.join(".local/state"),
            source: home.join(SOURCE_SUBDIR),
            log_dir: home.join(LOG_SUBDIR),
            home,
        }
    }

    /// The environment variable overrides handed to installer subprocesses
    /// and embedded into launch scripts, in a stable order.
    #[must_use]
    pub fn env_overrides(&self) -> [(&'static str, &Path); 5] {
        [
            ("HOME", self.home.as_path()),
            ("XDG_CONFIG_HOME", self.config.as_path()),
            ("XDG_DATA_HOME", self.data.as_path()),
            ("XDG_CACHE_HOME", self.cache.as_path()),
            ("XDG_STATE_HOME", self.state.as_path()),
        ]
    }

    /// Directories that must exist before any installer runs.
    #[must_use]
    pub fn required_dirs(&self) -> [&Path; 6] {
        [
            self.home.as_path(),
            self.config.as_path(),
            self.data.as_path(),
            self.cache.as_path(),
            self.state.as_path(),
            self.log_dir.as_path(),
        ]
    }
}

/// The canonical, version-controllable dotfiles tree of one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotfilesTree {
    /// Tree root: `dotfiles_root` + profile name.
    pub root: PathBuf,
    /// `.config` subtree, the symlink target once a profile is linked.
    pub config: PathBuf,
    /// `.local/share` subtree.
    pub data: PathBuf,
}

impl DotfilesTree {
    /// Derive the tree paths for `name` under `dotfiles_root`.
    #[must_use]
    pub fn resolve(dotfiles_root: &Path, name: &str) -> Self {
        let root = dotfiles_root.join(name);
        Self {
            config: root.join(".config"),
            data: root.join(".local/share"),
            root,
        }
    }
}
