//! Sweep command implementation.
//!
//! This module implements the `sweep` command, which releases every
//! expired hold in the store. Intended for cron or manual housekeeping;
//! the transition guards recover lazily even if it never runs.

use clap::Args;
use serde_json::json;

use kiosk::{SweepOperations, SystemClock};

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};

/// Release all expired holds.
#[derive(Args)]
pub struct SweepCommand {
    /// Scan and report without releasing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Output the sweep result as JSON
    #[arg(long)]
    pub json: bool,
}

impl SweepCommand {
    /// Execute the sweep command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global)?;

        let result = SweepOperations::release_expired(&mut db, &config, &SystemClock, self.dry_run)
            .map_err(CliError::from)?;

        if self.json {
            let ids: Vec<i64> = result.released.iter().map(|l| l.id().value()).collect();
            let output = json!({
                "dry_run": result.dry_run,
                "released_count": result.released_count,
                "released": ids,
            });
            println!("{}", serde_json::to_string_pretty(&output).map_err(|e| {
                CliError::InvalidArguments(format!("failed to serialize output: {e}"))
            })?);
        } else if !global.quiet {
            if result.dry_run {
                println!("Dry run - would release {} hold(s)", result.released_count);
            } else {
                println!("Released {} hold(s)", result.released_count);
            }
            for listing in &result.released {
                println!("  {} {}", listing.id(), listing.model());
            }
        }

        Ok(())
    }
}
