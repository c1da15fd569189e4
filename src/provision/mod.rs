//! Provisioning runs: environment creation, source sync, installer
//! execution, change auditing.

pub mod installer;
pub mod repo;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::audit::{AuditSummary, ChangeTracker};
use crate::error::ProvisionError;
use crate::exec::Executor;
use crate::logging::{Logger, StepStatus};
use crate::paths::EnvironmentPaths;
use crate::registry::Registry;
use crate::settings::Settings;

pub use installer::InstallerOutput;
pub use repo::RepoSync;

/// What happened to the installer step of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallerOutcome {
    /// Installer ran and exited successfully.
    Ran,
    /// No installer entrypoint found (config-only repository).
    NoInstaller,
    /// Installer ran and exited unsuccessfully. Reports were still written.
    Failed {
        /// Raw exit code, `None` when killed by a signal.
        code: Option<i32>,
    },
}

/// Everything one provisioning run produced.
#[derive(Debug)]
pub struct ProvisionOutcome {
    /// Paths of the isolated environment.
    pub env: EnvironmentPaths,
    /// How the source checkout was synced.
    pub repo: RepoSync,
    /// Installer step result.
    pub installer: InstallerOutcome,
    /// Change-tracking reports.
    pub audit: AuditSummary,
    /// The timestamped combined log of this run.
    pub run_log: PathBuf,
}

/// Provision the isolated environment for `name` and run its installer.
///
/// Safe to repeat: directories are created idempotently, the checkout is
/// refreshed rather than duplicated, and every run gets a fresh
/// timestamped log. Note that an unsuccessful installer does **not** make
/// this function fail; the outcome carries the exit status so the caller
/// can surface [`ProvisionError::InstallerFailed`] after reading the
/// reports.
///
/// # Errors
///
/// Returns an error for an unknown profile, an environment that cannot be
/// created, a failed *initial* clone, or an installer that cannot be
/// spawned at all.
pub fn provision(
    name: &str,
    registry: &Registry,
    settings: &Settings,
    global_log: &Path,
    executor: &dyn Executor,
    log: &Logger,
) -> Result<ProvisionOutcome> {
    let url = registry.resolve(name)?;
    let env = EnvironmentPaths::resolve(&settings.prefix(), name);
    log.stage(&format!("Provisioning '{name}' from {url}"));

    for dir in env.required_dirs() {
        std::fs::create_dir_all(dir).map_err(|source| ProvisionError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    log.record_step("create environment", StepStatus::Ok, None);

    log.stage("Syncing source repository");
    let repo = repo::sync(url, &env.source)?;
    match &repo {
        RepoSync::Cloned => {
            log.info("cloned");
            log.record_step("sync source", StepStatus::Ok, Some("cloned"));
        }
        RepoSync::FastForwarded => {
            log.info("fast-forwarded to upstream");
            log.record_step("sync source", StepStatus::Ok, Some("fast-forwarded"));
        }
        RepoSync::UpToDate => {
            log.info("already up to date");
            log.record_step("sync source", StepStatus::Ok, Some("up to date"));
        }
        RepoSync::KeptExisting { reason } => {
            log.warn(&format!("update failed, using existing checkout: {reason}"));
            log.record_step("sync source", StepStatus::Warned, Some("kept existing"));
        }
    }

    log.stage("Recording pre-install snapshots");
    let tracker = ChangeTracker::begin(&env.log_dir, executor, log);

    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let run_log = env.log_dir.join(format!("run-{stamp}.log"));

    log.stage("Running installer");
    let installer_outcome = match installer::discover(&env.source)? {
        None => {
            log.info("no installer entrypoint found, treating as a config-only repository");
            log.record_step("run installer", StepStatus::Skipped, Some("config-only"));
            InstallerOutcome::NoInstaller
        }
        Some(entry) => {
            log.info(&format!("running {}", entry.display()));
            let output = installer::execute(&entry, &env.source, &env, &run_log, global_log)?;
            if output.success {
                log.record_step("run installer", StepStatus::Ok, None);
                InstallerOutcome::Ran
            } else {
                log.error(&format!(
                    "{}",
                    ProvisionError::InstallerFailed { code: output.code }
                ));
                log.record_step("run installer", StepStatus::Failed, Some("non-zero exit"));
                InstallerOutcome::Failed { code: output.code }
            }
        }
    };

    log.stage("Computing change reports");
    let system_paths = settings.system_scan.then(|| settings.system_scan_paths());
    let audit = tracker.finish(&env.home, system_paths.as_deref(), executor, log);
    if let Some(added) = &audit.packages_added {
        log.info(&format!("{} new packages", added.len()));
    }
    log.info(&format!(
        "{} changed files under {}",
        audit.changed_files.len(),
        env.home.display()
    ));
    log.record_step("change reports", StepStatus::Ok, None);

    Ok(ProvisionOutcome {
        env,
        repo,
        installer: installer_outcome,
        audit,
        run_log,
    })
}
