//! Structured logger with step recording and a run summary.

use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Outcome of one recorded step, shown in the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Step completed.
    Ok,
    /// Step did not apply (e.g. no installer in a config-only repository).
    Skipped,
    /// Step degraded to a warning (e.g. fast-forward refused, scan denied).
    Warned,
    /// Step failed.
    Failed,
}

/// One recorded step.
#[derive(Debug, Clone)]
pub struct StepEntry {
    /// Step name.
    pub name: String,
    /// Outcome.
    pub status: StepStatus,
    /// Optional detail shown next to the name.
    pub message: Option<String>,
}

/// Install the global tracing subscriber for console output.
///
/// Honours `RUST_LOG` when set; otherwise `debug` level with `--verbose`
/// and `info` without. Safe to call once per process; later calls are
/// ignored (relevant when tests run commands in-process).
pub fn init(verbose: bool) {
    use std::io::IsTerminal as _;
    let default = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Diagnostics go to stderr so stdout stays parseable (list, version).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}

/// Step-recording logger shared by every command.
///
/// Console and file output go through `tracing`; the logger itself only
/// accumulates step outcomes so a command can print a summary at the end
/// and decide its exit status.
#[derive(Debug, Default)]
pub struct Logger {
    steps: Mutex<Vec<StepEntry>>,
}

impl Logger {
    /// Create a new logger with no recorded steps.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section of a run).
    pub fn stage(&self, msg: &str) {
        tracing::info!("==> {msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Record a step result for the summary.
    pub fn record_step(&self, name: &str, status: StepStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.steps.lock() {
            guard.push(StepEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Return a clone of all recorded steps.
    #[must_use]
    pub fn steps(&self) -> Vec<StepEntry> {
        self.steps.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Count the number of failed steps.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.steps.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|s| s.status == StepStatus::Failed)
                .count()
        })
    }

    /// Return `true` if any recorded step has failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// Print the summary of all recorded steps.
    pub fn print_summary(&self) {
        let steps = self.steps();
        if steps.is_empty() {
            return;
        }

        self.stage("Summary");
        for step in &steps {
            let icon = match step.status {
                StepStatus::Ok => "✓",
                StepStatus::Skipped => "·",
                StepStatus::Warned => "!",
                StepStatus::Failed => "✗",
            };
            let suffix = step
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            self.info(&format!("{icon} {}{suffix}", step.name));
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn logger_new_has_no_steps() {
        let log = Logger::new();
        assert!(log.steps().is_empty());
    }

    #[test]
    fn record_step_ok() {
        let log = Logger::new();
        log.record_step("sync source", StepStatus::Ok, None);
        let steps = log.steps();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name, "sync source");
        assert_eq!(steps[0].status, StepStatus::Ok);
    }

    #[test]
    fn record_step_with_message() {
        let log = Logger::new();
        log.record_step("package diff", StepStatus::Skipped, Some("no package manager"));
        assert_eq!(
            log.steps()[0].message,
            Some("no package manager".to_string())
        );
    }

    #[test]
    fn failure_count_counts_only_failures() {
        let log = Logger::new();
        assert_eq!(log.failure_count(), 0);
        log.record_step("a", StepStatus::Ok, None);
        log.record_step("b", StepStatus::Failed, Some("boom"));
        log.record_step("c", StepStatus::Warned, None);
        log.record_step("d", StepStatus::Failed, None);
        assert_eq!(log.failure_count(), 2);
        assert!(log.has_failures());
    }

    #[test]
    fn has_failures_false_for_warnings() {
        let log = Logger::new();
        log.record_step("scan", StepStatus::Warned, Some("permission denied"));
        assert!(!log.has_failures());
    }
}
