//! Fake-home provisioning engine.
//!
//! Provisions isolated, per-profile home directory trees so that multiple
//! third-party desktop-environment installers can be tried on one machine
//! without touching each other's configuration or the real user profile.
//! Installers run with their home and XDG variables redirected into the
//! isolated tree; before/after snapshots report what each run changed.
//!
//! The public API is organised into layers:
//!
//! - **[`registry`]** — profile name → source-repository URL, persisted
//! - **[`paths`]** — pure isolated-home and dotfiles-tree path derivation
//! - **[`provision`]** / **[`audit`]** — environment creation, installer
//!   execution, change tracking
//! - **[`reconcile`]** — the link/adopt dotfiles state machine
//! - **[`launch`]** / **[`snapshot`]** — launch-script, session-file and
//!   git-snapshot glue
//! - **[`commands`]** — top-level subcommand orchestration

pub mod audit;
pub mod cli;
pub mod commands;
pub mod error;
pub mod exec;
pub mod fsutil;
pub mod launch;
pub mod logging;
pub mod paths;
pub mod platform;
pub mod provision;
pub mod reconcile;
pub mod registry;
pub mod settings;
pub mod snapshot;
