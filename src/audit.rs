//! Change-tracking engine: before/after differential snapshots.
//!
//! Installers are opaque third-party scripts, so the only tractable audit
//! is differential: snapshot the package set and a reference timestamp
//! before the installer runs, then diff the package set and walk the
//! isolated tree for newer modification times afterwards. Every step in
//! here degrades to a warning: an auditing failure must never mask the
//! primary provisioning outcome.

use std::collections::BTreeSet;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context as _, Result};
use walkdir::WalkDir;

use crate::exec::Executor;
use crate::logging::Logger;
use crate::platform::{self, PackageManager};

/// Timestamp file recorded in the log directory before installer execution.
pub const REFERENCE_STAMP: &str = "reference-stamp";
/// Report: full package set before the run (overwritten each run).
pub const PACKAGES_BEFORE: &str = "packages-before.txt";
/// Report: full package set after the run (overwritten each run).
pub const PACKAGES_AFTER: &str = "packages-after.txt";
/// Report: packages present after but not before (overwritten each run).
pub const PACKAGES_ADDED: &str = "packages-added.txt";
/// Report: files under the isolated home modified during the run
/// (overwritten each run).
pub const CHANGED_FILES: &str = "changed-files.txt";

/// State captured before installer execution.
#[derive(Debug)]
pub struct ChangeTracker {
    manager: Option<PackageManager>,
    packages_before: Option<BTreeSet<String>>,
    stamp: SystemTime,
    log_dir: PathBuf,
}

/// What a provisioning run changed, as far as differential snapshots can
/// tell.
#[derive(Debug)]
pub struct AuditSummary {
    /// Newly installed packages; `None` when no package manager was found.
    pub packages_added: Option<Vec<String>>,
    /// Files under the isolated home modified after the reference stamp.
    pub changed_files: Vec<PathBuf>,
    /// Files under the configured system paths modified after the stamp;
    /// `None` when the system scan is disabled.
    pub system_changes: Option<Vec<PathBuf>>,
}

impl ChangeTracker {
    /// Capture the before-state: package snapshot (when a manager is
    /// available) and a reference timestamp file inside `log_dir`.
    ///
    /// Never fails; sub-steps that cannot run are logged and skipped.
    pub fn begin(log_dir: &Path, executor: &dyn Executor, log: &Logger) -> Self {
        let stamp = SystemTime::now();
        if let Err(e) = write_stamp(log_dir, stamp) {
            log.warn(&format!("could not record reference timestamp: {e:#}"));
        }

        let manager = platform::detect_package_manager(executor);
        let packages_before = match manager {
            None => {
                log.info("no supported package manager found, skipping package snapshot");
                None
            }
            Some(mgr) => match installed_packages(mgr, executor) {
                Ok(set) => {
                    if let Err(e) = write_package_report(log_dir, PACKAGES_BEFORE, &set) {
                        log.warn(&format!("could not write {PACKAGES_BEFORE}: {e:#}"));
                    }
                    Some(set)
                }
                Err(e) => {
                    log.warn(&format!("package snapshot via {mgr} failed: {e:#}"));
                    None
                }
            },
        };

        Self {
            manager,
            packages_before,
            stamp,
            log_dir: log_dir.to_path_buf(),
        }
    }

    /// Capture the after-state and write the diff reports.
    ///
    /// `home` is walked for files newer than the reference stamp, excluding
    /// the log directory itself (the in-flight run log would otherwise
    /// always show up in its own report). `system_paths`, when given,
    /// triggers the best-effort system-wide scan.
    pub fn finish(
        &self,
        home: &Path,
        system_paths: Option<&[PathBuf]>,
        executor: &dyn Executor,
        log: &Logger,
    ) -> AuditSummary {
        let packages_added = self.diff_packages(executor, log);
        if let Some(added) = &packages_added {
            let set: BTreeSet<String> = added.iter().cloned().collect();
            if let Err(e) = write_package_report(&self.log_dir, PACKAGES_ADDED, &set) {
                log.warn(&format!("could not write {PACKAGES_ADDED}: {e:#}"));
            }
        }

        let (changed_files, denied) = changed_since(home, self.stamp, &[&self.log_dir]);
        if denied > 0 {
            log.warn(&format!("{denied} entries under {} were unreadable", home.display()));
        }

        let system_changes = system_paths.map(|paths| {
            let mut all = Vec::new();
            for root in paths {
                if !root.exists() {
                    continue;
                }
                if std::fs::read_dir(root).is_err() {
                    // Privilege unavailable: skipped, never fatal.
                    log.warn(&format!(
                        "cannot read {} without elevated privilege, system scan skipped for it",
                        root.display()
                    ));
                    continue;
                }
                let (mut changed, denied) = changed_since(root, self.stamp, &[]);
                if denied > 0 {
                    log.warn(&format!(
                        "{denied} entries under {} were unreadable during the system scan",
                        root.display()
                    ));
                }
                all.append(&mut changed);
            }
            all
        });

        if let Err(e) =
            write_changed_report(&self.log_dir, &changed_files, system_changes.as_deref())
        {
            log.warn(&format!("could not write {CHANGED_FILES}: {e:#}"));
        }

        AuditSummary {
            packages_added,
            changed_files,
            system_changes,
        }
    }

    fn diff_packages(&self, executor: &dyn Executor, log: &Logger) -> Option<Vec<String>> {
        let mgr = self.manager?;
        let before = self.packages_before.as_ref()?;
        match installed_packages(mgr, executor) {
            Ok(after) => {
                if let Err(e) = write_package_report(&self.log_dir, PACKAGES_AFTER, &after) {
                    log.warn(&format!("could not write {PACKAGES_AFTER}: {e:#}"));
                }
                Some(after.difference(before).cloned().collect())
            }
            Err(e) => {
                log.warn(&format!("post-run package snapshot via {mgr} failed: {e:#}"));
                None
            }
        }
    }
}

/// Query the full set of installed package names.
///
/// Runs a single list command regardless of package count; the package name
/// is the first whitespace-delimited token of each output line.
///
/// # Errors
///
/// Returns an error if the package manager cannot be executed or exits
/// unsuccessfully.
pub fn installed_packages(
    manager: PackageManager,
    executor: &dyn Executor,
) -> Result<BTreeSet<String>> {
    let (program, args) = manager.list_command();
    let result = executor.run_unchecked(program, args)?;
    if !result.success {
        anyhow::bail!("{program} exited with {}", result.code.unwrap_or(-1));
    }
    let mut set = BTreeSet::new();
    for line in result.stdout.lines() {
        if let Some(name) = line.split_whitespace().next() {
            set.insert(name.to_string());
        }
    }
    Ok(set)
}

/// Walk `root` and collect files modified strictly after `since`.
///
/// Returns the sorted list plus the number of entries that could not be
/// read (permissions, races with deletion). Paths under any of `exclude`
/// are skipped entirely.
#[must_use]
pub fn changed_since(root: &Path, since: SystemTime, exclude: &[&Path]) -> (Vec<PathBuf>, usize) {
    let mut changed = Vec::new();
    let mut denied = 0usize;
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !exclude.iter().any(|ex| entry.path().starts_with(ex)));
    for entry in walker {
        let Ok(entry) = entry else {
            denied += 1;
            continue;
        };
        if entry.file_type().is_dir() {
            continue;
        }
        match entry.metadata().ok().and_then(|m| m.modified().ok()) {
            Some(modified) if modified > since => changed.push(entry.into_path()),
            Some(_) => {}
            None => denied += 1,
        }
    }
    changed.sort();
    (changed, denied)
}

fn write_stamp(log_dir: &Path, stamp: SystemTime) -> Result<()> {
    let seconds = stamp
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    let path = log_dir.join(REFERENCE_STAMP);
    std::fs::write(&path, format!("{seconds}\n"))
        .with_context(|| format!("writing {}", path.display()))
}

fn write_package_report(log_dir: &Path, name: &str, packages: &BTreeSet<String>) -> Result<()> {
    let path = log_dir.join(name);
    let mut body = String::new();
    for package in packages {
        body.push_str(package);
        body.push('\n');
    }
    std::fs::write(&path, body).with_context(|| format!("writing {}", path.display()))
}

fn write_changed_report(
    log_dir: &Path,
    changed: &[PathBuf],
    system: Option<&[PathBuf]>,
) -> Result<()> {
    let path = log_dir.join(CHANGED_FILES);
    let mut handle = std::fs::File::create(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    for file in changed {
        writeln!(handle, "{}", file.display())?;
    }
    if let Some(system) = system {
        writeln!(handle, "# system")?;
        for file in system {
            writeln!(handle, "{}", file.display())?;
        }
    }
    Ok(())
}
