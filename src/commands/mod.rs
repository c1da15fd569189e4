//! Top-level subcommand orchestration.
pub mod launch;
pub mod provision;
pub mod reconcile;
pub mod registry;
pub mod snapshot;
pub mod version;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::settings::Settings;

/// Load user settings and apply global CLI overrides.
pub(crate) fn load_settings(global: &GlobalOpts) -> Result<Settings> {
    let mut settings = Settings::load_default()?;
    if let Some(prefix) = &global.prefix {
        settings.prefix = Some(prefix.clone());
    }
    Ok(settings)
}
