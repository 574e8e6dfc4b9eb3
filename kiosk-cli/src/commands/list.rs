//! List command implementation.
//!
//! This module implements the `list` command, which shows the shelf
//! optionally filtered by lifecycle status.

use clap::{Args, ValueEnum};

use kiosk::{Database, ListingStatus, StatusFilter};

use crate::error::CliError;
use crate::utils::{open_database, print_listing_table, to_json, GlobalOptions};

/// Status filter accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// All listings regardless of status.
    All,
    /// Open for booking.
    Available,
    /// Held by a buyer.
    Booked,
    /// Awaiting admin review of payment proof.
    VerificationPending,
    /// Sale completed.
    Sold,
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::All => StatusFilter::All,
            StatusArg::Available => StatusFilter::Only(ListingStatus::Available),
            StatusArg::Booked => StatusFilter::Only(ListingStatus::Booked),
            StatusArg::VerificationPending => {
                StatusFilter::Only(ListingStatus::VerificationPending)
            }
            StatusArg::Sold => StatusFilter::Only(ListingStatus::Sold),
        }
    }
}

/// List listings, optionally filtered by status.
#[derive(Args)]
pub struct ListCommand {
    /// Only show listings in this status
    #[arg(long, value_enum, default_value_t = StatusArg::All)]
    pub status: StatusArg,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let db = open_database(global)?;
        let listings = Database::list_listings(db.connection(), self.status.into())
            .map_err(CliError::from)?;

        if self.json {
            println!("{}", to_json(&listings)?);
        } else {
            print_listing_table(&listings);
        }

        Ok(())
    }
}
