//! Add command implementation.
//!
//! This module implements the `add` command, which creates a new listing
//! on the shelf. Creation is an admin action.

use clap::Args;

use kiosk::{AddListingOptions, AddListingPlan, NewListing, PlanExecutor, Price, SystemClock};

use crate::error::CliError;
use crate::utils::{admin_caller, open_database, print_dry_run, to_json, GlobalOptions};

/// Create a new listing (admin).
#[derive(Args)]
pub struct AddCommand {
    /// Phone model name
    #[arg(long, value_name = "MODEL")]
    pub model: String,

    /// Hardware specs description
    #[arg(long, value_name = "SPECS", default_value = "")]
    pub specs: String,

    /// Condition description
    #[arg(long, value_name = "CONDITION", default_value = "")]
    pub condition: String,

    /// Asking price in whole currency units
    #[arg(long, value_name = "PRICE")]
    pub price: i64,

    /// URL of the listing photo
    #[arg(long, value_name = "URL", default_value = "")]
    pub media_url: String,

    /// Admin email
    #[arg(long, value_name = "EMAIL", default_value = "admin", env = "KIOSK_ADMIN_EMAIL")]
    pub email: String,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,

    /// Output the created listing as JSON
    #[arg(long)]
    pub json: bool,
}

impl AddCommand {
    /// Execute the add command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let price =
            Price::try_from(self.price).map_err(|e| CliError::InvalidArguments(e.to_string()))?;
        let details = NewListing::new(
            self.model,
            self.specs,
            self.condition,
            price,
            self.media_url,
        )
        .map_err(|e| CliError::InvalidArguments(e.to_string()))?;

        let caller = admin_caller(&self.email)?;
        let plan = AddListingPlan::new(AddListingOptions::new(details, caller))
            .build_plan(&SystemClock)
            .map_err(CliError::from)?;

        if self.dry_run {
            if !global.quiet {
                print_dry_run(&plan);
            }
            return Ok(());
        }

        let mut db = open_database(global)?;
        let result = PlanExecutor::new(&mut db)
            .execute(&plan)
            .map_err(CliError::from)?;

        if self.json {
            println!("{}", to_json(&result.listing)?);
        } else if let Some(id) = result.created {
            println!("{id}");
        }

        Ok(())
    }
}
