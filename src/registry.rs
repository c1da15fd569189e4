//! Profile registry: name → source-repository URL.
//!
//! The registry is an explicit value loaded once at process start: built-in
//! defaults first, then the persisted override file in file order, with
//! later records overriding earlier ones. Persistence is append-only: every
//! `add` appends one record, and replaying the file reproduces the same
//! effective map.

use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::error::RegistryError;

/// Built-in profiles, loaded before the override file.
///
/// These are the upstream installer repositories the tool exists to try out;
/// a user `add` with the same name overrides the URL without editing this
/// table.
const BUILTINS: &[(&str, &str)] = &[
    ("end4", "https://github.com/end-4/dots-hyprland.git"),
    ("hyde", "https://github.com/HyDE-Project/HyDE.git"),
    ("jakoolit", "https://github.com/JaKooLit/Arch-Hyprland.git"),
    ("ml4w", "https://github.com/mylinuxforwork/dotfiles.git"),
    ("omarchy", "https://github.com/basecamp/omarchy.git"),
];

/// Where a registry entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Shipped with the tool.
    BuiltIn,
    /// Added (or overridden) through the persisted file.
    User,
}

#[derive(Debug, Clone)]
struct Entry {
    url: String,
    origin: Origin,
}

/// Profile name → URL mapping with append-only persistence.
#[derive(Debug)]
pub struct Registry {
    entries: BTreeMap<String, Entry>,
    file: PathBuf,
}

impl Registry {
    /// Load the registry: built-ins first, then `file` in file order.
    ///
    /// Lines are `name url` records; blank lines and `#` comments are
    /// ignored. A malformed or invalid record is skipped with a warning so
    /// one bad append never locks the user out of the registry.
    ///
    /// # Errors
    ///
    /// Returns an error if `file` exists but cannot be read.
    pub fn load(file: &Path) -> Result<Self, RegistryError> {
        let mut registry = Self {
            entries: BTreeMap::new(),
            file: file.to_path_buf(),
        };
        for (name, url) in BUILTINS {
            registry.entries.insert(
                (*name).to_string(),
                Entry {
                    url: (*url).to_string(),
                    origin: Origin::BuiltIn,
                },
            );
        }

        if !file.exists() {
            return Ok(registry);
        }
        let raw = std::fs::read_to_string(file).map_err(|source| RegistryError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        for (lineno, line) in raw.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((name, url)) = line.split_once(char::is_whitespace) else {
                tracing::warn!(
                    "{}:{}: malformed record, expected 'name url'",
                    file.display(),
                    lineno + 1
                );
                continue;
            };
            let url = url.trim();
            if let Err(e) = validate(name, url) {
                tracing::warn!("{}:{}: {e}", file.display(), lineno + 1);
                continue;
            }
            registry.entries.insert(
                name.to_string(),
                Entry {
                    url: url.to_string(),
                    origin: Origin::User,
                },
            );
        }
        Ok(registry)
    }

    /// Whether a profile with this name is registered.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Resolve a profile name to its source URL.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownProfile`] when the name is absent.
    pub fn resolve(&self, name: &str) -> Result<&str, RegistryError> {
        self.entries
            .get(name)
            .map(|e| e.url.as_str())
            .ok_or_else(|| RegistryError::UnknownProfile(name.to_string()))
    }

    /// Register `name` → `url`, appending one record to the persisted file.
    ///
    /// Overwriting an existing name is allowed and logs a warning; the
    /// appended record wins on the next load exactly as it does in memory.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidName`] or
    /// [`RegistryError::InvalidUrl`] before any I/O, and
    /// [`RegistryError::Io`] if the append itself fails; in every error
    /// case the persisted file is untouched byte-for-byte.
    pub fn add(&mut self, name: &str, url: &str) -> Result<(), RegistryError> {
        validate(name, url)?;

        if let Some(existing) = self.entries.get(name) {
            tracing::warn!(
                "profile '{name}' already maps to {}, overriding with {url}",
                existing.url
            );
        }

        if let Some(parent) = self.file.parent() {
            std::fs::create_dir_all(parent).map_err(|source| RegistryError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let mut handle = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file)
            .map_err(|source| RegistryError::Io {
                path: self.file.clone(),
                source,
            })?;
        writeln!(handle, "{name} {url}").map_err(|source| RegistryError::Io {
            path: self.file.clone(),
            source,
        })?;

        self.entries.insert(
            name.to_string(),
            Entry {
                url: url.to_string(),
                origin: Origin::User,
            },
        );
        Ok(())
    }

    /// All profiles ordered by name.
    pub fn list(&self) -> impl Iterator<Item = (&str, &str, Origin)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.url.as_str(), entry.origin))
    }
}

/// Validate a profile name and source URL. No I/O.
fn validate(name: &str, url: &str) -> Result<(), RegistryError> {
    validate_name(name)?;
    validate_url(url)
}

/// Validate a profile name against the restricted character set.
///
/// The name doubles as a filesystem path component, so `.` and `..` are
/// rejected along with anything outside `[A-Za-z0-9._-]`.
///
/// # Errors
///
/// Returns [`RegistryError::InvalidName`] for an unusable name.
pub fn validate_name(name: &str) -> Result<(), RegistryError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || !name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'_' || b == b'-')
    {
        return Err(RegistryError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Validate a source URL: scheme'd URLs and absolute local paths are
/// accepted; anything else (including scp-style git syntax) is rejected
/// before persistence.
///
/// # Errors
///
/// Returns [`RegistryError::InvalidUrl`] for an unusable URL.
pub fn validate_url(url: &str) -> Result<(), RegistryError> {
    if !url.contains("://") && !url.starts_with('/') {
        return Err(RegistryError::InvalidUrl(url.to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn scratch_registry() -> (tempfile::TempDir, Registry) {
        let tmp = tempfile::tempdir().unwrap();
        let registry = Registry::load(&tmp.path().join("profiles.list")).unwrap();
        (tmp, registry)
    }

    #[test]
    fn builtins_present_without_file() {
        let (_tmp, registry) = scratch_registry();
        assert!(registry.has("omarchy"));
        assert!(registry.has("jakoolit"));
        assert_eq!(
            registry.resolve("jakoolit").unwrap(),
            "https://github.com/JaKooLit/Arch-Hyprland.git"
        );
    }

    #[test]
    fn resolve_unknown_profile() {
        let (_tmp, registry) = scratch_registry();
        let err = registry.resolve("nope").unwrap_err();
        assert!(matches!(err, RegistryError::UnknownProfile(n) if n == "nope"));
    }

    #[test]
    fn add_persists_and_reloads() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("profiles.list");

        let mut registry = Registry::load(&file).unwrap();
        registry
            .add("mine", "https://example.test/mine.git")
            .unwrap();
        assert_eq!(
            registry.resolve("mine").unwrap(),
            "https://example.test/mine.git"
        );

        let reloaded = Registry::load(&file).unwrap();
        assert_eq!(
            reloaded.resolve("mine").unwrap(),
            "https://example.test/mine.git"
        );
    }

    #[test]
    fn add_overrides_builtin_and_marks_user_origin() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("profiles.list");

        let mut registry = Registry::load(&file).unwrap();
        registry
            .add("omarchy", "https://example.test/fork.git")
            .unwrap();

        let reloaded = Registry::load(&file).unwrap();
        assert_eq!(
            reloaded.resolve("omarchy").unwrap(),
            "https://example.test/fork.git"
        );
        let (_, _, origin) = reloaded
            .list()
            .find(|(name, _, _)| *name == "omarchy")
            .unwrap();
        assert_eq!(origin, Origin::User);
    }

    #[test]
    fn last_appended_record_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("profiles.list");
        std::fs::write(
            &file,
            "mine https://example.test/first.git\nmine https://example.test/second.git\n",
        )
        .unwrap();

        let registry = Registry::load(&file).unwrap();
        assert_eq!(
            registry.resolve("mine").unwrap(),
            "https://example.test/second.git"
        );
    }

    #[test]
    fn comments_and_blank_lines_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("profiles.list");
        std::fs::write(&file, "# comment\n\nmine https://example.test/m.git\n").unwrap();

        let registry = Registry::load(&file).unwrap();
        assert!(registry.has("mine"));
    }

    #[test]
    fn malformed_line_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("profiles.list");
        std::fs::write(&file, "just-a-name-no-url\nmine https://example.test/m.git\n").unwrap();

        let registry = Registry::load(&file).unwrap();
        assert!(!registry.has("just-a-name-no-url"));
        assert!(registry.has("mine"));
    }

    #[test]
    fn invalid_url_rejected_and_file_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("profiles.list");
        std::fs::write(&file, "seed https://example.test/seed.git\n").unwrap();
        let before = std::fs::read(&file).unwrap();

        let mut registry = Registry::load(&file).unwrap();
        let err = registry.add("omarchy", "bad-url").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidUrl(_)));

        let after = std::fs::read(&file).unwrap();
        assert_eq!(before, after, "failed add must not modify the file");
    }

    #[test]
    fn invalid_names_rejected() {
        let (_tmp, mut registry) = scratch_registry();
        for bad in ["", "..", ".", "has space", "slash/name", "semi;colon"] {
            let err = registry.add(bad, "https://example.test/x.git").unwrap_err();
            assert!(
                matches!(err, RegistryError::InvalidName(_)),
                "expected InvalidName for {bad:?}"
            );
        }
    }

    #[test]
    fn valid_names_accepted() {
        let (_tmp, mut registry) = scratch_registry();
        for good in ["a", "end-4", "My.Profile_2"] {
            registry.add(good, "https://example.test/x.git").unwrap();
            assert!(registry.has(good));
        }
    }

    #[test]
    fn absolute_path_urls_accepted() {
        let (_tmp, mut registry) = scratch_registry();
        registry.add("local", "/srv/repos/rice.git").unwrap();
        assert_eq!(registry.resolve("local").unwrap(), "/srv/repos/rice.git");
    }

    #[test]
    fn list_is_ordered_by_name() {
        let (_tmp, registry) = scratch_registry();
        let names: Vec<&str> = registry.list().map(|(name, _, _)| name).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn invalid_record_in_file_skipped_on_load() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("profiles.list");
        std::fs::write(&file, "bad;name https://example.test/x.git\nok /srv/x\n").unwrap();

        let registry = Registry::load(&file).unwrap();
        assert!(!registry.has("bad;name"));
        assert!(registry.has("ok"));
    }
}
