//! Mine command implementation.
//!
//! This module implements the `mine` command, the per-buyer view of
//! currently held and already purchased listings.

use clap::Args;

use kiosk::Database;

use crate::error::CliError;
use crate::utils::{open_database, print_listing_table, to_json, GlobalOptions};

/// List listings held or purchased by a buyer.
#[derive(Args)]
pub struct MineCommand {
    /// Buyer email
    #[arg(long, value_name = "EMAIL", env = "KIOSK_EMAIL")]
    pub email: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl MineCommand {
    /// Execute the mine command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let db = open_database(global)?;
        let listings =
            Database::listings_for_buyer(db.connection(), &self.email).map_err(CliError::from)?;

        if self.json {
            println!("{}", to_json(&listings)?);
        } else {
            print_listing_table(&listings);
        }

        Ok(())
    }
}
