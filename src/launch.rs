//! Launch-script and session-file generation.
//!
//! Thin text templating over the path-derivation contract: a generated
//! script embeds the isolated home computed by
//! [`EnvironmentPaths::resolve`] and re-derives the four XDG paths from it
//! at run time, so the script and the engine can never disagree about
//! where a profile lives.

use std::path::{Path, PathBuf};

use crate::error::LaunchError;
use crate::fsutil;
use crate::paths::EnvironmentPaths;

/// Default launch-script location for a profile (`~/.local/bin/start-<name>`).
#[must_use]
pub fn default_script_path(name: &str) -> PathBuf {
    dirs::executable_dir()
        .unwrap_or_else(|| crate::settings::real_home().join(".local/bin"))
        .join(format!("start-{name}"))
}

/// Default session-file directory (`~/.local/share/wayland-sessions`).
#[must_use]
pub fn default_sessions_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| crate::settings::real_home().join(".local/share"))
        .join("wayland-sessions")
}

/// Write an executable script that runs `command` inside the isolated home.
///
/// The isolated home does not have to exist at generation time; callers
/// warn about that, nothing more.
///
/// # Errors
///
/// Returns an error if the script cannot be written or marked executable.
pub fn write_launch_script(
    path: &Path,
    env: &EnvironmentPaths,
    command: &str,
) -> Result<(), LaunchError> {
    let body = render_script(env, command);
    fsutil::ensure_parent_dir(path).map_err(|e| LaunchError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::other(format!("{e:#}")),
    })?;
    std::fs::write(path, body).map_err(|source| LaunchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).map_err(
            |source| LaunchError::Io {
                path: path.to_path_buf(),
                source,
            },
        )?;
    }
    Ok(())
}

fn render_script(env: &EnvironmentPaths, command: &str) -> String {
    format!(
        "#!/bin/sh\n\
         # Generated by ricebox. Edit the registry, not this file.\n\
         HOME='{home}'\n\
         XDG_CONFIG_HOME=\"$HOME/.config\"\n\
         XDG_DATA_HOME=\"$HOME/.local/share\"\n\
         XDG_CACHE_HOME=\"$HOME/.cache\"\n\
         XDG_STATE_HOME=\"$HOME/.local/state\"\n\
         export HOME XDG_CONFIG_HOME XDG_DATA_HOME XDG_CACHE_HOME XDG_STATE_HOME\n\
         exec {command} \"$@\"\n",
        home = env.home.display()
    )
}

/// Write a display-manager session descriptor pointing at `script`.
///
/// Returns the path of the written `.desktop` file.
///
/// # Errors
///
/// Returns [`LaunchError::LaunchScriptMissing`] unless `script` exists and
/// is executable, and an I/O error if the descriptor cannot be written.
pub fn write_session_file(
    sessions_dir: &Path,
    script: &Path,
    display_name: &str,
) -> Result<PathBuf, LaunchError> {
    if !fsutil::is_executable(script) {
        return Err(LaunchError::LaunchScriptMissing {
            path: script.to_path_buf(),
        });
    }

    let stem = script
        .file_stem()
        .map_or_else(|| "session".to_string(), |s| s.to_string_lossy().into_owned());
    let path = sessions_dir.join(format!("{stem}.desktop"));
    let body = format!(
        "[Desktop Entry]\n\
         Name={display_name}\n\
         Comment=Launch {display_name} in an isolated ricebox home\n\
         Exec={script}\n\
         Type=Application\n",
        script = script.display()
    );

    std::fs::create_dir_all(sessions_dir).map_err(|source| LaunchError::Io {
        path: sessions_dir.to_path_buf(),
        source,
    })?;
    std::fs::write(&path, body).map_err(|source| LaunchError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
