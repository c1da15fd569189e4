use anyhow::Result;
use clap::Parser;

use ricebox_cli::cli;
use ricebox_cli::commands;
use ricebox_cli::logging;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    logging::init(args.verbose);
    let log = logging::Logger::new();

    match args.command {
        cli::Command::Provision(opts) => commands::provision::run(&args.global, &opts, &log),
        cli::Command::Add(opts) => commands::registry::add(&opts, &log),
        cli::Command::List => commands::registry::list(),
        cli::Command::Prepare(opts) => commands::reconcile::prepare(&args.global, &opts, &log),
        cli::Command::LinkConfig(opts) => {
            commands::reconcile::link_config(&args.global, &opts, &log)
        }
        cli::Command::AdoptConfig(opts) => {
            commands::reconcile::adopt_config(&args.global, &opts, &log)
        }
        cli::Command::LaunchScript(opts) => {
            commands::launch::launch_script(&args.global, &opts, &log)
        }
        cli::Command::SessionFile(opts) => commands::launch::session_file(&opts, &log),
        cli::Command::Snapshot(opts) => commands::snapshot::run(&args.global, &opts, &log),
        cli::Command::Version => commands::version::run(),
    }
}
