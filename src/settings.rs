//! User settings loaded from `~/.config/ricebox/config.toml`.
//!
//! Every field has a default so a missing file is not an error; a malformed
//! file is, since silently ignoring a typo would mask the user's intent.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use serde::Deserialize;

/// Settings file contents.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Prefix under which isolated homes are created. Defaults to the real
    /// home directory, so profile `omarchy` lives at `~/omarchy`.
    pub prefix: Option<PathBuf>,
    /// Root directory holding per-profile dotfiles trees. Defaults to
    /// `~/ricebox-dotfiles`.
    pub dotfiles_root: Option<PathBuf>,
    /// Whether `provision` also scans system paths for changed files.
    pub system_scan: bool,
    /// System paths scanned when `system_scan` is enabled.
    pub system_scan_paths: Vec<PathBuf>,
}

impl Settings {
    /// Load settings from `path`. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing settings file {}", path.display()))
    }

    /// Load settings from the default per-user location.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_default() -> Result<Self> {
        Self::load(&config_dir().join("config.toml"))
    }

    /// Effective isolated-home prefix.
    #[must_use]
    pub fn prefix(&self) -> PathBuf {
        self.prefix.clone().unwrap_or_else(real_home)
    }

    /// Effective dotfiles root.
    #[must_use]
    pub fn dotfiles_root(&self) -> PathBuf {
        self.dotfiles_root
            .clone()
            .unwrap_or_else(|| real_home().join("ricebox-dotfiles"))
    }

    /// Effective system-scan path list.
    #[must_use]
    pub fn system_scan_paths(&self) -> Vec<PathBuf> {
        if self.system_scan_paths.is_empty() {
            vec![
                PathBuf::from("/etc"),
                PathBuf::from("/usr/share/applications"),
                PathBuf::from("/usr/share/wayland-sessions"),
            ]
        } else {
            self.system_scan_paths.clone()
        }
    }
}

/// Per-user configuration directory (`~/.config/ricebox`).
#[must_use]
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| real_home().join(".config"))
        .join("ricebox")
}

/// Registry override file (`~/.config/ricebox/profiles.list`).
#[must_use]
pub fn registry_file() -> PathBuf {
    config_dir().join("profiles.list")
}

/// Global cross-profile log file (`~/.local/state/ricebox/global.log`).
#[must_use]
pub fn global_log_file() -> PathBuf {
    dirs::state_dir()
        .unwrap_or_else(|| real_home().join(".local/state"))
        .join("ricebox")
        .join("global.log")
}

/// The user's real home directory.
///
/// Falls back to the current directory when the home cannot be determined;
/// that only happens in stripped-down environments where any prefix choice
/// is equally arbitrary.
#[must_use]
pub fn real_home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}
