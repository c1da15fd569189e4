//! Installer discovery and execution inside the isolated environment.
//!
//! The installer is a third-party script; the engine's job is to find it,
//! point its idea of "home" into the isolated tree, and capture everything
//! it prints. Output is teed line-by-line to the per-profile run log, the
//! global cross-profile log, and the console, so a hung installer is
//! visible while it hangs.

use std::io::{BufRead as _, BufReader, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Mutex;

use anyhow::{Context as _, Result};

use crate::fsutil;
use crate::paths::EnvironmentPaths;

/// Canonical installer names probed at the repository root, in order.
pub const INSTALLER_CANDIDATES: &[&str] = &["install.sh", "setup.sh", "install"];

/// Result of one installer execution.
#[derive(Debug, Clone, Copy)]
pub struct InstallerOutput {
    /// Whether the installer exited successfully.
    pub success: bool,
    /// Raw exit code, `None` when killed by a signal.
    pub code: Option<i32>,
}

/// Find the installer entrypoint for a checked-out source repository.
///
/// Probes the canonical names first; falls back to the alphabetically
/// first root-level file with an executable bit. `None` means a
/// config-only repository, which is not an error.
///
/// # Errors
///
/// Returns an error if the repository root cannot be read.
pub fn discover(repo_root: &Path) -> Result<Option<PathBuf>> {
    for candidate in INSTALLER_CANDIDATES {
        let path = repo_root.join(candidate);
        if path.is_file() {
            return Ok(Some(path));
        }
    }

    let mut executables: Vec<PathBuf> = std::fs::read_dir(repo_root)
        .with_context(|| format!("reading repository root {}", repo_root.display()))?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| fsutil::is_executable(path))
        .collect();
    executables.sort();
    Ok(executables.into_iter().next())
}

/// Run `installer` with its home and XDG variables pointing into the
/// isolated tree, teeing combined stdout/stderr to `run_log` and
/// `global_log`.
///
/// The subprocess blocks the caller and has no timeout; cancellation is
/// external process termination, after which a re-provision recovers.
///
/// # Errors
///
/// Returns an error if the log files cannot be opened or the process
/// cannot be spawned. A non-zero installer exit is *not* an error here;
/// it is reported through [`InstallerOutput`] so the caller can finish
/// writing the change reports first.
pub fn execute(
    installer: &Path,
    repo_root: &Path,
    env: &EnvironmentPaths,
    run_log: &Path,
    global_log: &Path,
) -> Result<InstallerOutput> {
    let mut tee = Tee::open(run_log, global_log)?;
    tee.line(&format!("=== installer: {}", installer.display()));

    // Scripts without an executable bit are common in config repos; hand
    // those to sh instead of failing the spawn.
    let mut cmd = if fsutil::is_executable(installer) {
        Command::new(installer)
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg(installer);
        cmd
    };
    cmd.current_dir(repo_root)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in env.env_overrides() {
        cmd.env(key, value);
    }

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning installer {}", installer.display()))?;
    let stdout = child.stdout.take().context("installer stdout missing")?;
    let stderr = child.stderr.take().context("installer stderr missing")?;

    let tee = Mutex::new(tee);
    std::thread::scope(|scope| {
        scope.spawn(|| drain(stderr, &tee));
        drain(stdout, &tee);
    });

    let status = child.wait().context("waiting for installer")?;
    let mut tee = tee.into_inner().unwrap_or_else(std::sync::PoisonError::into_inner);
    tee.line(&format!("=== installer exit: {status}"));

    Ok(InstallerOutput {
        success: status.success(),
        code: status.code(),
    })
}

fn drain<R: std::io::Read>(reader: R, tee: &Mutex<Tee>) {
    let reader = BufReader::new(reader);
    for line in reader.lines() {
        let Ok(line) = line else { break };
        let mut guard = tee
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.line(&line);
    }
}

/// Simultaneous writer to the per-profile run log, the global log, and
/// the console.
struct Tee {
    run: std::fs::File,
    global: std::fs::File,
}

impl Tee {
    fn open(run_log: &Path, global_log: &Path) -> Result<Self> {
        fsutil::ensure_parent_dir(run_log)?;
        fsutil::ensure_parent_dir(global_log)?;
        let run = std::fs::File::create(run_log)
            .with_context(|| format!("creating run log {}", run_log.display()))?;
        let global = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(global_log)
            .with_context(|| format!("opening global log {}", global_log.display()))?;
        Ok(Self { run, global })
    }

    fn line(&mut self, line: &str) {
        let _ = writeln!(self.run, "{line}");
        let _ = writeln!(self.global, "{line}");
        println!("{line}");
    }
}
