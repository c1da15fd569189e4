use anyhow::Result;

use crate::cli::{GlobalOpts, ProvisionOpts};
use crate::error::ProvisionError;
use crate::exec::SystemExecutor;
use crate::logging::Logger;
use crate::provision::{self, InstallerOutcome};
use crate::registry::Registry;
use crate::settings;

/// Run the provision command.
///
/// # Errors
///
/// Returns an error for an unknown profile, a failed initial clone, or an
/// installer that exited unsuccessfully (reports are written regardless).
pub fn run(global: &GlobalOpts, opts: &ProvisionOpts, log: &Logger) -> Result<()> {
    let mut settings = super::load_settings(global)?;
    if opts.system_scan {
        settings.system_scan = true;
    }
    let registry = Registry::load(&settings::registry_file())?;
    let executor = SystemExecutor;

    let outcome = provision::provision(
        &opts.name,
        &registry,
        &settings,
        &settings::global_log_file(),
        &executor,
        log,
    )?;

    log.info(&format!("run log: {}", outcome.run_log.display()));
    log.print_summary();

    if let InstallerOutcome::Failed { code } = outcome.installer {
        return Err(ProvisionError::InstallerFailed { code }.into());
    }
    Ok(())
}
