#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # kiosk
//!
//! A library for managing second-hand phone listings and their
//! reservation lifecycle.
//!
//! Listings move through a small state machine: available, booked under a
//! time-limited hold, awaiting payment verification, and sold. Every
//! transition is applied through a conditional update keyed on the current
//! status, so concurrent callers racing for the same phone serialize
//! cleanly and exactly one wins.
//!
//! ## Core Types
//!
//! - [`Listing`], [`ListingId`], and [`ListingStatus`]: the catalog entries
//!   and their lifecycle
//! - [`Hold`] and [`Buyer`]: the reservation a booking places
//! - [`Caller`] and [`Role`]: who is asking, and with what authority
//! - [`Error`] and [`Result`]: error handling types
//! - [`Logger`] and [`LogLevel`]: logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use kiosk::{ListingStatus, Price};
//!
//! // Prices are validated on construction
//! let price = Price::try_from(85_000).unwrap();
//! assert_eq!(price.value(), 85_000);
//!
//! // Statuses have a canonical stored form
//! let status: ListingStatus = "booked".parse().unwrap();
//! assert_eq!(status, ListingStatus::Booked);
//! ```

pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod identity;
pub mod listing;
pub mod logging;
pub mod operations;

// Re-export key types at crate root for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{load_config, Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig, ListingUpdate, StatusFilter};
pub use error::{Error, Result};
pub use identity::{Caller, Role};
pub use listing::{
    Buyer, Event, Hold, Listing, ListingId, ListingStatus, NewListing, PaymentStatus, Price,
    Resolution, ValidationError,
};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{
    AddListingOptions, AddListingPlan, BookOptions, BookPlan, CancelOptions, CancelPlan,
    ExecutionResult, ExpiryCheckPlan, OperationPlan, PaymentOptions, PaymentPlan, PlanAction,
    PlanExecutor, ResolveOptions, ResolvePlan, SweepOperations, SweepResult,
};
