use anyhow::Result;

use crate::cli::{GlobalOpts, SnapshotOpts};
use crate::exec::SystemExecutor;
use crate::logging::Logger;
use crate::paths::DotfilesTree;
use crate::registry;
use crate::snapshot;

/// Run the snapshot command.
///
/// # Errors
///
/// Returns an error for an invalid profile name, a missing dotfiles tree,
/// or a failed git command. A missing `git` binary is only a warning.
pub fn run(global: &GlobalOpts, opts: &SnapshotOpts, log: &Logger) -> Result<()> {
    registry::validate_name(&opts.name)?;
    let settings = super::load_settings(global)?;
    let tree = DotfilesTree::resolve(&settings.dotfiles_root(), &opts.name);

    if !tree.root.exists() {
        anyhow::bail!(
            "dotfiles tree {} does not exist, run `ricebox prepare {}` first",
            tree.root.display(),
            opts.name
        );
    }

    snapshot::snapshot(
        &tree.root,
        opts.remote.as_deref(),
        opts.push,
        &SystemExecutor,
        log,
    )?;
    Ok(())
}
