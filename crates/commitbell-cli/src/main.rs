//! commitbell CLI - announce new GitHub commits in a Discord channel.

use clap::Parser;

mod commands;
mod logging;
mod output;

use commands::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Commands::Run { interval: None }) {
        Commands::Run { interval } => commands::run::run(&cli.config, interval, cli.verbose),
        Commands::Check => commands::check::run(&cli.config, cli.verbose),
    };

    if let Err(e) = result {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
