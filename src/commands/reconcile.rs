use anyhow::Result;

use crate::cli::{GlobalOpts, ProfileOpts};
use crate::error::ReconcileError;
use crate::logging::Logger;
use crate::paths::{DotfilesTree, EnvironmentPaths};
use crate::reconcile;
use crate::registry;

/// Run the prepare command.
///
/// # Errors
///
/// Returns an error for an invalid profile name or when the dotfiles tree
/// skeleton cannot be created.
pub fn prepare(global: &GlobalOpts, opts: &ProfileOpts, log: &Logger) -> Result<()> {
    registry::validate_name(&opts.name)?;
    let settings = super::load_settings(global)?;
    let tree = DotfilesTree::resolve(&settings.dotfiles_root(), &opts.name);
    reconcile::prepare(&tree)?;
    log.info(&format!("dotfiles tree ready at {}", tree.root.display()));
    Ok(())
}

/// Run the link-config command.
///
/// An already-linked profile is reported as a warning, not a failure: the
/// filesystem is exactly what a successful link produces.
///
/// # Errors
///
/// Returns an error for an invalid name, a real directory in the way
/// (`adopt-config` is the remedial command), or an I/O failure.
pub fn link_config(global: &GlobalOpts, opts: &ProfileOpts, log: &Logger) -> Result<()> {
    registry::validate_name(&opts.name)?;
    let settings = super::load_settings(global)?;
    let env = EnvironmentPaths::resolve(&settings.prefix(), &opts.name);
    let tree = DotfilesTree::resolve(&settings.dotfiles_root(), &opts.name);

    match reconcile::link_config(&env.config, &tree, &opts.name) {
        Ok(()) => {
            log.info(&format!(
                "{} -> {}",
                env.config.display(),
                tree.config.display()
            ));
            Ok(())
        }
        Err(e @ ReconcileError::AlreadyLinked { .. }) => {
            log.warn(&format!("{e}"));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Run the adopt-config command.
///
/// Asks for confirmation before the destructive move unless `--yes` was
/// given.
///
/// # Errors
///
/// Returns an error for an invalid name or any reconciler guard:
/// nothing to adopt, a non-empty destination, or a partial move.
pub fn adopt_config(global: &GlobalOpts, opts: &ProfileOpts, log: &Logger) -> Result<()> {
    registry::validate_name(&opts.name)?;
    let settings = super::load_settings(global)?;
    let env = EnvironmentPaths::resolve(&settings.prefix(), &opts.name);
    let tree = DotfilesTree::resolve(&settings.dotfiles_root(), &opts.name);

    if !global.yes {
        let question = format!(
            "Move everything from {} into {} and replace it with a symlink?",
            env.config.display(),
            tree.config.display()
        );
        let confirmed = inquire::Confirm::new(&question)
            .with_default(false)
            .with_help_message("This relocates your live configuration; nothing is deleted")
            .prompt()?;
        if !confirmed {
            log.info("adopt cancelled");
            return Ok(());
        }
    }

    let moved = reconcile::adopt_config(&env.config, &tree, &opts.name)?;
    log.info(&format!(
        "adopted {} entr{} into {}",
        moved.len(),
        if moved.len() == 1 { "y" } else { "ies" },
        tree.config.display()
    ));
    Ok(())
}
