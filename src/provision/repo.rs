//! Source-repository sync: clone on first provision, fast-forward after.
//!
//! Update failures are never fatal: the existing checkout is used as-is
//! with a warning. Only the *initial* clone failing aborts a run, because
//! there is nothing to fall back to.

use std::path::Path;

use git2::Repository;
use git2::build::{CheckoutBuilder, RepoBuilder};

use crate::error::ProvisionError;

/// How the source checkout was brought up to date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoSync {
    /// Fresh clone into an empty target.
    Cloned,
    /// Existing checkout advanced to the fetched tip.
    FastForwarded,
    /// Existing checkout already at the fetched tip.
    UpToDate,
    /// Update failed (non-fast-forward, network, …); existing checkout kept.
    KeptExisting {
        /// Reason reported by git.
        reason: String,
    },
}

/// Ensure `target` holds an up-to-date checkout of `url`.
///
/// # Errors
///
/// Returns [`ProvisionError::CloneFailed`] only when no checkout exists yet
/// and the initial clone fails. Update failures degrade to
/// [`RepoSync::KeptExisting`].
pub fn sync(url: &str, target: &Path) -> Result<RepoSync, ProvisionError> {
    if target.join(".git").exists() {
        Ok(fast_forward(target).unwrap_or_else(|e| RepoSync::KeptExisting {
            reason: e.message().to_string(),
        }))
    } else {
        RepoBuilder::new()
            .clone(url, target)
            .map(|_| RepoSync::Cloned)
            .map_err(|e| ProvisionError::CloneFailed {
                url: url.to_string(),
                reason: e.message().to_string(),
            })
    }
}

/// Fetch from `origin` and advance the current branch if the merge
/// analysis allows a fast-forward.
fn fast_forward(target: &Path) -> Result<RepoSync, git2::Error> {
    let repo = Repository::open(target)?;
    let mut remote = repo.find_remote("origin")?;
    remote.fetch(&[] as &[&str], None, None)?;

    let fetch_head = repo.find_reference("FETCH_HEAD")?;
    let fetched = repo.reference_to_annotated_commit(&fetch_head)?;
    let (analysis, _) = repo.merge_analysis(&[&fetched])?;

    if analysis.is_up_to_date() {
        return Ok(RepoSync::UpToDate);
    }
    if !analysis.is_fast_forward() {
        return Err(git2::Error::from_str(
            "local checkout has diverged from upstream (not a fast-forward)",
        ));
    }

    let refname = repo
        .head()?
        .name()
        .map(String::from)
        .ok_or_else(|| git2::Error::from_str("HEAD is not a named reference"))?;
    let mut reference = repo.find_reference(&refname)?;
    reference.set_target(fetched.id(), "ricebox: fast-forward")?;
    repo.set_head(&refname)?;
    let mut checkout = CheckoutBuilder::new();
    checkout.force();
    repo.checkout_head(Some(&mut checkout))?;
    Ok(RepoSync::FastForwarded)
}
