//! Pay command implementation.
//!
//! This module implements the `pay` command, which records that the buyer
//! submitted payment proof and moves the listing into verification.

use clap::Args;

use kiosk::{ListingId, PaymentOptions, PaymentPlan, PlanExecutor, SystemClock};

use crate::error::CliError;
use crate::utils::{
    load_configuration, open_database, print_dry_run, shopper_caller, to_json, GlobalOptions,
};

/// Submit payment proof for a booked listing.
#[derive(Args)]
pub struct PayCommand {
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

    /// Output the updated listing as JSON
    #[arg(long)]
    pub json: bool,
}

impl PayCommand {
    /// Execute the pay command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let caller = shopper_caller(&self.email, &self.phone)?;
        let config = load_configuration(global)?;
        let mut db = open_database(global)?;

        let plan = PaymentPlan::new(PaymentOptions::new(ListingId::new(self.id), caller))
            .build_plan(&db, &config, &SystemClock)
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
            println!("Payment submitted for listing {}; awaiting verification", self.id);
        }

        Ok(())
    }
}
