use anyhow::Result;

use crate::cli::AddOpts;
use crate::logging::Logger;
use crate::registry::{Origin, Registry};
use crate::settings;

/// Run the add command.
///
/// # Errors
///
/// Returns an error for an invalid name or URL (nothing is persisted) or
/// when the registry file cannot be appended to.
pub fn add(opts: &AddOpts, log: &Logger) -> Result<()> {
    let mut registry = Registry::load(&settings::registry_file())?;
    registry.add(&opts.name, &opts.url)?;
    log.info(&format!("registered {} -> {}", opts.name, opts.url));
    Ok(())
}

/// Run the list command.
///
/// # Errors
///
/// Returns an error when the registry file cannot be read.
pub fn list() -> Result<()> {
    let registry = Registry::load(&settings::registry_file())?;
    for (name, url, origin) in registry.list() {
        let marker = match origin {
            Origin::BuiltIn => "builtin",
            Origin::User => "user",
        };
        println!("{name:<16} {marker:<8} {url}");
    }
    Ok(())
}
