use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the fake-home provisioning engine.
#[derive(Parser, Debug)]
#[command(
    name = "ricebox",
    about = "Isolated fake-home provisioning for desktop environment installers",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Override the prefix under which isolated homes are created
    #[arg(long, global = true)]
    pub prefix: Option<PathBuf>,

    /// Assume yes for interactive confirmations
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create or refresh a profile's isolated home and run its installer
    Provision(ProvisionOpts),
    /// Register a profile name and source repository URL
    Add(AddOpts),
    /// List registered profiles
    List,
    /// Create a profile's dotfiles tree skeleton
    Prepare(ProfileOpts),
    /// Link a profile's isolated .config into its dotfiles tree
    LinkConfig(ProfileOpts),
    /// Migrate a profile's isolated .config into its dotfiles tree, then link
    AdoptConfig(ProfileOpts),
    /// Generate a launch script for a profile
    LaunchScript(LaunchScriptOpts),
    /// Generate a display-manager session file for a profile
    SessionFile(SessionFileOpts),
    /// Commit (and optionally push) a profile's dotfiles tree
    Snapshot(SnapshotOpts),
    /// Print version information
    Version,
}

/// Options for the `provision` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ProvisionOpts {
    /// Profile to provision
    pub name: String,

    /// Also scan system paths for changed files (best-effort)
    #[arg(long)]
    pub system_scan: bool,
}

/// Options for the `add` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct AddOpts {
    /// Profile name ([A-Za-z0-9._-]+)
    pub name: String,

    /// Source repository URL
    pub url: String,
}

/// Options naming a single profile.
#[derive(Parser, Debug, Clone)]
pub struct ProfileOpts {
    /// Profile name
    pub name: String,
}

/// Options for the `launch-script` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct LaunchScriptOpts {
    /// Profile name
    pub name: String,

    /// Command the script execs inside the isolated home
    pub command: String,

    /// Where to write the script (default: ~/.local/bin/start-<name>)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Options for the `session-file` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct SessionFileOpts {
    /// Profile name
    pub name: String,

    /// Display name shown by the display manager
    pub display_name: String,

    /// Launch script consumed by the session (default: ~/.local/bin/start-<name>)
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Sessions directory (default: ~/.local/share/wayland-sessions)
    #[arg(long)]
    pub sessions_dir: Option<PathBuf>,
}

/// Options for the `snapshot` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct SnapshotOpts {
    /// Profile name
    pub name: String,

    /// Remote URL written to `origin` before pushing
    #[arg(long)]
    pub remote: Option<String>,

    /// Push to `origin` after committing
    #[arg(long)]
    pub push: bool,
}
