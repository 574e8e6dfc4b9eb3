//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{
    AddCommand, BookCommand, CancelCommand, ListCommand, MineCommand, PayCommand, ResolveCommand,
    ShowCommand, SweepCommand,
};

/// Command-line tool for the second-hand phone storefront.
#[derive(Parser)]
#[command(name = "kiosk")]
#[command(version, about = "Manage phone listings and their holds", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "KIOSK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "KIOSK_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create a new listing (admin)
    Add(AddCommand),

    /// List listings, optionally filtered by status
    List(ListCommand),

    /// Show one listing by id
    Show(ShowCommand),

    /// Book an available listing
    Book(BookCommand),

    /// Cancel your hold on a listing
    Cancel(CancelCommand),

    /// Submit payment proof for a booked listing
    Pay(PayCommand),

    /// Resolve a pending payment verification (admin)
    Resolve(ResolveCommand),

    /// Release all expired holds
    Sweep(SweepCommand),

    /// List listings held or purchased by a buyer
    Mine(MineCommand),
}
