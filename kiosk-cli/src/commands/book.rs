//! Book command implementation.
//!
//! This module implements the `book` command, which places a hold on an
//! available listing for the calling buyer.

use clap::Args;

use kiosk::{BookOptions, BookPlan, ListingId, PlanExecutor, SystemClock};

use crate::error::CliError;
use crate::utils::{
    load_configuration, open_database, print_dry_run, print_warnings, shopper_caller, to_json,
    GlobalOptions,
};

/// Book an available listing.
#[derive(Args)]
pub struct BookCommand {
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

    /// Output the booked listing as JSON
    #[arg(long)]
    pub json: bool,
}

impl BookCommand {
    /// Execute the book command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let caller = shopper_caller(&self.email, &self.phone)?;
        let config = load_configuration(global)?;
        let mut db = open_database(global)?;

        let plan = BookPlan::new(BookOptions::new(ListingId::new(self.id), caller))
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
        print_warnings(&result.warnings, global.quiet);

        if self.json {
            println!("{}", to_json(&result.listing)?);
        } else if !global.quiet {
            println!("Booked listing {}", self.id);
            println!(
                "Pay the {} {} deposit within {} seconds to confirm",
                config.deposit, config.currency, config.hold_window_secs
            );
        }

        Ok(())
    }
}
