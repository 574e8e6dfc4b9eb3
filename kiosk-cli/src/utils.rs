//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands:
//! configuration loading, database management, caller construction, and
//! output formatting.

use std::path::PathBuf;

use kiosk::database::{default_data_dir, DatabaseConfig};
use kiosk::{Caller, Config, Database, Listing};

use crate::error::CliError;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds).
    pub busy_timeout: Option<u32>,
}

/// Resolve the data directory from global options.
///
/// Priority: `--data-dir` (or its env fallback, handled by clap) over the
/// default `~/.kiosk`.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match &global.data_dir {
        Some(dir) => Ok(dir.clone()),
        None => default_data_dir().map_err(CliError::from),
    }
}

/// Load configuration from the data directory and environment.
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let data_dir = resolve_data_dir(global)?;
    kiosk::load_config(&data_dir).map_err(|e| CliError::Config(e.to_string()))
}

/// Open the database under the resolved data directory.
pub fn open_database(global: &GlobalOptions) -> Result<Database, CliError> {
    let db_path = resolve_data_dir(global)?.join("kiosk.db");
    let mut db_config = DatabaseConfig::new(db_path);

    if let Some(timeout_seconds) = global.busy_timeout {
        db_config =
            db_config.with_busy_timeout(std::time::Duration::from_secs(timeout_seconds.into()));
    }

    Database::open(db_config).map_err(CliError::from)
}

/// Build a shopper identity from `--email` and `--phone`.
pub fn shopper_caller(email: &str, phone: &str) -> Result<Caller, CliError> {
    Caller::shopper(email, phone).map_err(|e| CliError::InvalidArguments(e.to_string()))
}

/// Build an admin identity from `--email`.
pub fn admin_caller(email: &str) -> Result<Caller, CliError> {
    Caller::admin(email).map_err(|e| CliError::InvalidArguments(e.to_string()))
}

/// Serialize a value as pretty JSON for `--json` output.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::InvalidArguments(format!("failed to serialize output: {e}")))
}

/// Format a timestamp for display.
pub fn format_timestamp(ts: chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Print a table of listings to stdout.
pub fn print_listing_table(listings: &[Listing]) {
    if listings.is_empty() {
        println!("No listings found");
        return;
    }

    println!(
        "{:<6} {:<24} {:>10} {:<22} {:<28}",
        "ID", "MODEL", "PRICE", "STATUS", "BUYER"
    );
    for listing in listings {
        let buyer = listing
            .hold()
            .map_or(String::new(), |h| h.buyer().email().to_string());
        println!(
            "{:<6} {:<24} {:>10} {:<22} {:<28}",
            listing.id(),
            listing.model(),
            listing.price(),
            listing.status(),
            buyer
        );
    }
}

/// Print the full details of one listing to stdout.
pub fn print_listing_details(listing: &Listing) {
    println!("Listing {}", listing.id());
    println!("  Model:      {}", listing.model());
    println!("  Specs:      {}", listing.details().specs());
    println!("  Condition:  {}", listing.details().condition());
    println!("  Price:      {}", listing.price());
    if !listing.details().media_url().is_empty() {
        println!("  Media:      {}", listing.details().media_url());
    }
    println!("  Status:     {}", listing.status());
    if let Some(hold) = listing.hold() {
        println!("  Buyer:      {} ({})", hold.buyer().email(), hold.buyer().phone());
        println!("  Booked at:  {}", format_timestamp(hold.booked_at()));
    }
    if listing.payment_status() != kiosk::PaymentStatus::None {
        println!("  Payment:    {}", listing.payment_status().as_str());
    }
    if let Some(sold_at) = listing.selling_time() {
        println!("  Sold at:    {}", format_timestamp(sold_at));
    }
    println!("  Created at: {}", format_timestamp(listing.created_at()));
}

/// Print a plan's actions and warnings for a dry run.
pub fn print_dry_run(plan: &kiosk::OperationPlan) {
    eprintln!("Dry run - would perform the following actions:");
    for (i, action) in plan.actions.iter().enumerate() {
        eprintln!("  {}. {}", i + 1, action.description());
    }
    if !plan.warnings.is_empty() {
        eprintln!("Warnings:");
        for warning in &plan.warnings {
            eprintln!("  - {warning}");
        }
    }
}

/// Print any warnings from an executed plan.
pub fn print_warnings(warnings: &[String], quiet: bool) {
    if quiet {
        return;
    }
    for warning in warnings {
        eprintln!("Warning: {warning}");
    }
}
