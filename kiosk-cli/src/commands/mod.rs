//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `add`: Create a new listing (admin)
//! - `list`: List listings, optionally filtered by status
//! - `show`: Show one listing by id
//! - `book`: Book an available listing
//! - `cancel`: Cancel your hold on a listing
//! - `pay`: Submit payment proof for a booked listing
//! - `resolve`: Resolve a pending payment verification (admin)
//! - `sweep`: Release all expired holds
//! - `mine`: List listings held or purchased by a buyer

pub mod add;
pub mod book;
pub mod cancel;
pub mod list;
pub mod mine;
pub mod pay;
pub mod resolve;
pub mod show;
pub mod sweep;

pub use add::AddCommand;
pub use book::BookCommand;
pub use cancel::CancelCommand;
pub use list::ListCommand;
pub use mine::MineCommand;
pub use pay::PayCommand;
pub use resolve::ResolveCommand;
pub use show::ShowCommand;
pub use sweep::SweepCommand;
