//! Command dispatch for muslix

mod locations;
mod similar;

use muslix_core::error::Result;

use crate::cli::{Cli, Commands, LocationCommands};

pub fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Similar {
            file_a,
            file_b,
            algorithm,
            all,
        } => similar::execute(cli, file_a, file_b, *algorithm, *all),

        Commands::Locations { command } => match command {
            LocationCommands::Analyze { ids } => locations::analyze(cli, ids),
            LocationCommands::Apply {
                ids,
                choose,
                dry_run,
            } => locations::apply(cli, ids, choose, *dry_run),
        },
    }
}
