//! Quay CLI - dependency-aware release packaging

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use quay::util::shell::Shell;

fn main() {
    let cli = Cli::parse();
    let shell = Shell::from_flags(
        commands::verbosity(&cli.global),
        cli.global.color.unwrap_or_default(),
        false,
    );

    if let Err(e) = run(cli) {
        commands::report_error(&e, shell.use_color());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Logs go to stderr so stdout stays clean for listings and JSON events.
    let filter = if cli.global.verbose {
        EnvFilter::new("quay=debug")
    } else {
        EnvFilter::new("quay=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let global = &cli.global;
    match cli.command {
        Commands::Dist(args) => commands::dist::execute(args, global),
        Commands::Build(args) => commands::build::execute(args, global),
        Commands::Docker(args) => commands::docker::execute(args, global),
        Commands::Products(args) => commands::products::execute(args, global),
        Commands::ProjectVersion => commands::project_version::execute(global),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
