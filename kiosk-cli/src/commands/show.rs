//! Show command implementation.

use clap::Args;

use kiosk::{Database, ListingId};

use crate::error::CliError;
use crate::utils::{open_database, print_listing_details, to_json, GlobalOptions};

/// Show one listing by id.
#[derive(Args)]
pub struct ShowCommand {
    /// The listing id
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ShowCommand {
    /// Execute the show command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let db = open_database(global)?;
        let listing = Database::require_listing(db.connection(), ListingId::new(self.id))
            .map_err(CliError::from)?;

        if self.json {
            println!("{}", to_json(&listing)?);
        } else {
            print_listing_details(&listing);
        }

        Ok(())
    }
}
