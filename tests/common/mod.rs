// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed environment (isolated prefix,
// registry file, dotfiles root) and a fixture git repository builder so
// each integration test can run without touching the real user profile.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use git2::{Repository, Signature};

use ricebox_cli::registry::Registry;
use ricebox_cli::settings::Settings;

/// An isolated test environment backed by a [`tempfile::TempDir`].
///
/// The directory is deleted when dropped.
pub struct TestEnvironment {
    /// Owns every path below.
    pub tmp: tempfile::TempDir,
    /// Prefix under which isolated homes are created.
    pub prefix: PathBuf,
    /// Dotfiles root for reconciler tests.
    pub dotfiles_root: PathBuf,
    /// Registry override file.
    pub registry_file: PathBuf,
    /// Global cross-profile log file.
    pub global_log: PathBuf,
}

impl TestEnvironment {
    /// Create a fresh environment with nothing provisioned.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let prefix = tmp.path().join("homes");
        let dotfiles_root = tmp.path().join("dotfiles");
        let registry_file = tmp.path().join("profiles.list");
        let global_log = tmp.path().join("global.log");
        Self {
            tmp,
            prefix,
            dotfiles_root,
            registry_file,
            global_log,
        }
    }

    /// Settings pointing every path into this environment.
    pub fn settings(&self) -> Settings {
        Settings {
            prefix: Some(self.prefix.clone()),
            dotfiles_root: Some(self.dotfiles_root.clone()),
            ..Settings::default()
        }
    }

    /// Load the registry backed by this environment's override file.
    pub fn registry(&self) -> Registry {
        Registry::load(&self.registry_file).expect("load registry")
    }

    /// Create a fixture source repository under the temp dir and register
    /// it as `profile`.
    pub fn register_fixture_repo(&self, profile: &str, installer: Option<&str>) -> PathBuf {
        let upstream = self.tmp.path().join(format!("upstream-{profile}"));
        fixture_repo(&upstream, installer);
        let mut registry = self.registry();
        registry
            .add(profile, upstream.to_str().expect("utf-8 path"))
            .expect("register fixture");
        upstream
    }
}

/// Build a one-commit git repository at `dir`.
///
/// `installer`, when given, becomes the content of a root-level
/// `install.sh`.
pub fn fixture_repo(dir: &Path, installer: Option<&str>) {
    let repo = Repository::init(dir).expect("init fixture repo");
    std::fs::write(dir.join("README.md"), "# fixture rice\n").expect("write README");
    if let Some(script) = installer {
        std::fs::write(dir.join("install.sh"), script).expect("write installer");
    }
    commit_all(&repo, "initial");
}

/// Stage everything in `repo`'s work tree and commit it.
pub fn commit_all(repo: &Repository, message: &str) {
    let mut index = repo.index().expect("repo index");
    index
        .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
        .expect("stage files");
    index.write().expect("write index");
    let tree_id = index.write_tree().expect("write tree");
    let tree = repo.find_tree(tree_id).expect("find tree");
    let sig = Signature::now("Tester", "tester@example.test").expect("signature");
    let parent = repo
        .head()
        .ok()
        .and_then(|h| h.target())
        .map(|oid| repo.find_commit(oid).expect("parent commit"));
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("commit");
}
