//! Main entry point for the kiosk CLI.
//!
//! This is the command-line interface for the kiosk listing reservation
//! system. It provides commands for stocking the shelf and driving
//! listings through their reservation lifecycle:
//! - `add`: Create a new listing (admin)
//! - `list` / `show` / `mine`: Inspect the shelf
//! - `book` / `cancel` / `pay`: Buyer actions on a hold
//! - `resolve`: Admin verdict on submitted payment proof
//! - `sweep`: Release all expired holds

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;

use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let _logger = kiosk::init_logger(cli.verbose, cli.quiet);

    // Convert CLI args to GlobalOptions
    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Add(cmd) => cmd.execute(&global),
        cli::Command::List(cmd) => cmd.execute(&global),
        cli::Command::Show(cmd) => cmd.execute(&global),
        cli::Command::Book(cmd) => cmd.execute(&global),
        cli::Command::Cancel(cmd) => cmd.execute(&global),
        cli::Command::Pay(cmd) => cmd.execute(&global),
        cli::Command::Resolve(cmd) => cmd.execute(&global),
        cli::Command::Sweep(cmd) => cmd.execute(&global),
        cli::Command::Mine(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
