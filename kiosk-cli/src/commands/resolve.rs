//! Resolve command implementation.
//!
//! This module implements the `resolve` command, the admin verdict on a
//! listing awaiting payment verification.

use clap::{Args, ValueEnum};

use kiosk::{ListingId, PlanExecutor, Resolution, ResolveOptions, ResolvePlan, SystemClock};

use crate::error::CliError;
use crate::utils::{
    admin_caller, open_database, print_dry_run, print_warnings, to_json, GlobalOptions,
};

/// Verdict accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VerdictArg {
    /// Payment verified; complete the sale.
    Sold,
    /// Payment rejected; return the listing to the shelf.
    Rejected,
    /// Defer the decision; no changes.
    Pending,
}

impl From<VerdictArg> for Resolution {
    fn from(arg: VerdictArg) -> Self {
        match arg {
            VerdictArg::Sold => Resolution::Sold,
            VerdictArg::Rejected => Resolution::Rejected,
            VerdictArg::Pending => Resolution::Pending,
        }
    }
}

/// Resolve a pending payment verification (admin).
#[derive(Args)]
pub struct ResolveCommand {
    /// The listing id
    #[arg(value_name = "ID")]
    pub id: i64,

    /// The verdict
    #[arg(value_enum, value_name = "VERDICT")]
    pub verdict: VerdictArg,

    /// Admin email
    #[arg(long, value_name = "EMAIL", default_value = "admin", env = "KIOSK_ADMIN_EMAIL")]
    pub email: String,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,

    /// Output the resolved listing as JSON
    #[arg(long)]
    pub json: bool,
}

impl ResolveCommand {
    /// Execute the resolve command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let caller = admin_caller(&self.email)?;
        let mut db = open_database(global)?;

        let plan = ResolvePlan::new(ResolveOptions::new(
            ListingId::new(self.id),
            caller,
            self.verdict.into(),
        ))
        .build_plan(&db, &SystemClock)
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
        } else if !global.quiet && !plan.is_empty() {
            println!("Resolved listing {} as {}", self.id, Resolution::from(self.verdict));
        }

        Ok(())
    }
}
