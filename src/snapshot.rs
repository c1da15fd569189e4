//! Git-snapshot helper for dotfiles trees.
//!
//! Strictly downstream of the reconciler: the tree already exists, this
//! just versions it. Commit when dirty, push when asked. Runs `git`
//! through the [`Executor`] so tests can assert the exact command lines.

use std::path::Path;

use anyhow::Result;

use crate::exec::Executor;
use crate::logging::Logger;
use crate::platform;

/// What the snapshot helper did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// `git` is not on PATH; nothing was done.
    NoGit,
    /// Working tree was clean; nothing to commit.
    Clean,
    /// Changes committed locally.
    Committed,
    /// Changes committed (or already clean) and pushed to the remote.
    Pushed,
}

/// Snapshot `tree_root`: init if needed, commit if dirty, push if asked.
///
/// `remote`, when given, is written to the `origin` remote before any
/// push. `push` without a configured or given remote fails.
///
/// # Errors
///
/// Returns an error if a git command fails. A missing `git` binary is not
/// an error; the helper degrades to [`SnapshotOutcome::NoGit`] with a
/// warning.
pub fn snapshot(
    tree_root: &Path,
    remote: Option<&str>,
    push: bool,
    executor: &dyn Executor,
    log: &Logger,
) -> Result<SnapshotOutcome> {
    if !platform::git_available(executor) {
        log.warn("git not found on PATH, dotfiles snapshot skipped");
        return Ok(SnapshotOutcome::NoGit);
    }

    if !tree_root.join(".git").exists() {
        log.info("initialising dotfiles repository");
        executor.run_in(tree_root, "git", &["init"])?;
    }

    if let Some(url) = remote {
        // set-url fails when origin does not exist yet; add it then.
        let set = executor.run_unchecked("git", &["-C", &tree_root.to_string_lossy(), "remote", "set-url", "origin", url])?;
        if !set.success {
            executor.run_in(tree_root, "git", &["remote", "add", "origin", url])?;
        }
    }

    let status = executor.run_in(tree_root, "git", &["status", "--porcelain"])?;
    let dirty = !status.stdout.trim().is_empty();
    if dirty {
        executor.run_in(tree_root, "git", &["add", "-A"])?;
        let message = format!("snapshot {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
        executor.run_in(tree_root, "git", &["commit", "-m", &message])?;
        log.info("committed dotfiles changes");
    } else {
        log.info("dotfiles tree is clean");
    }

    if push {
        executor.run_in(tree_root, "git", &["push", "-u", "origin", "HEAD"])?;
        log.info("pushed to origin");
        return Ok(SnapshotOutcome::Pushed);
    }
    Ok(if dirty {
        SnapshotOutcome::Committed
    } else {
        SnapshotOutcome::Clean
    })
}
