//! Database layer for persistent storage of listings.
//!
//! This module provides a SQLite-based storage layer for the storefront,
//! including connection management, schema versioning, and the conditional
//! update primitive that serializes concurrent transitions.
//!
//! # Examples
//!
//! ```no_run
//! use chrono::Utc;
//! use kiosk::database::{Database, DatabaseConfig, StatusFilter};
//! use kiosk::{NewListing, Price};
//!
//! // Open a database
//! let config = DatabaseConfig::new("/tmp/kiosk.db");
//! let mut db = Database::open(config).unwrap();
//!
//! // Create a listing
//! let details = NewListing::new(
//!     "Pixel 7", "8GB/128GB", "Good",
//!     Price::try_from(85_000).unwrap(), "",
//! ).unwrap();
//! let id = db.create_listing(&details, Utc::now()).unwrap();
//!
//! // List all listings
//! let all = Database::list_listings(db.connection(), StatusFilter::All).unwrap();
//! for listing in all {
//!     println!("{:?}", listing);
//! }
//! ```

mod config;
mod connection;
pub mod migrations;
mod operations;
mod schema;

#[cfg(test)]
pub(crate) mod test_util;

// Re-export public API
pub use config::{default_data_dir, resolve_database_path, DatabaseConfig};
pub use connection::Database;
pub use operations::{ListingUpdate, StatusFilter};

// Re-export migration functions for advanced use cases
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
