use anyhow::Result;

use crate::cli::{GlobalOpts, LaunchScriptOpts, SessionFileOpts};
use crate::launch;
use crate::logging::Logger;
use crate::paths::EnvironmentPaths;
use crate::registry;

/// Run the launch-script command.
///
/// # Errors
///
/// Returns an error for an invalid profile name or when the script cannot
/// be written. A not-yet-provisioned isolated home only warns.
pub fn launch_script(global: &GlobalOpts, opts: &LaunchScriptOpts, log: &Logger) -> Result<()> {
    registry::validate_name(&opts.name)?;
    let settings = super::load_settings(global)?;
    let env = EnvironmentPaths::resolve(&settings.prefix(), &opts.name);

    if !env.home.exists() {
        log.warn(&format!(
            "{} does not exist yet, run `ricebox provision {}` before launching",
            env.home.display(),
            opts.name
        ));
    }

    let path = opts
        .output
        .clone()
        .unwrap_or_else(|| launch::default_script_path(&opts.name));
    launch::write_launch_script(&path, &env, &opts.command)?;
    log.info(&format!("wrote {}", path.display()));
    Ok(())
}

/// Run the session-file command.
///
/// # Errors
///
/// Returns an error for an invalid profile name, a missing or
/// non-executable launch script, or when the descriptor cannot be
/// written.
pub fn session_file(opts: &SessionFileOpts, log: &Logger) -> Result<()> {
    registry::validate_name(&opts.name)?;
    let script = opts
        .script
        .clone()
        .unwrap_or_else(|| launch::default_script_path(&opts.name));
    let sessions_dir = opts
        .sessions_dir
        .clone()
        .unwrap_or_else(launch::default_sessions_dir);

    let written = launch::write_session_file(&sessions_dir, &script, &opts.display_name)?;
    log.info(&format!("wrote {}", written.display()));
    Ok(())
}
