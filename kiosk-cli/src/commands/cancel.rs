//! Cancel command implementation.

use clap::Args;

use kiosk::{CancelOptions, CancelPlan, ListingId, PlanExecutor};

use crate::error::CliError;
use crate::utils::{open_database, print_dry_run, shopper_caller, to_json, GlobalOptions};

/// Cancel your hold on a listing.
#[derive(Args)]
pub struct CancelCommand {
    /// The listing id
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Buyer email
    #[arg(long, value_name = "EMAIL", env = "KIOSK_EMAIL")]
    pub email: String,

    /// Buyer phone number
    #[arg(long, value_name = "PHONE", env = "KIOSK_PHONE")]
    pub phone: String,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,

    /// Output the released listing as JSON
    #[arg(long)]
    pub json: bool,
}

impl CancelCommand {
    /// Execute the cancel command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let caller = shopper_caller(&self.email, &self.phone)?;
        let mut db = open_database(global)?;

        let plan = CancelPlan::new(CancelOptions::new(ListingId::new(self.id), caller))
            .build_plan(&db)
            .map_err(CliError::from)?;

        if self.dry_run {
            if !global.quiet {
                print_dry_run(&plan);
            }
            return Ok(());
        }

        let result = PlanExecutor::new(&mut db)
            .execute(&plan)
            .map_err(CliError::from)?;

        if self.json {
            println!("{}", to_json(&result.listing)?);
        } else if !global.quiet {
            println!("Cancelled hold on listing {}", self.id);
        }

        Ok(())
    }
}
