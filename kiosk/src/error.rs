//! Error types for the kiosk library.
//!
//! This module provides the error hierarchy for all operations in the
//! kiosk library, using `thiserror` for ergonomic error handling.

use std::path::PathBuf;

use thiserror::Error;

use crate::listing::{Event, ListingId, ListingStatus};

/// Result type alias for operations that may fail with a kiosk error.
///
/// # Examples
///
/// ```
/// use kiosk::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(4200)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the kiosk library.
///
/// The first three variants form the domain taxonomy: a guard rejected the
/// transition, a concurrent transition won the race, or the listing does
/// not exist. All three are recoverable at the caller, which should
/// re-fetch the listing and re-render rather than trust its stale copy.
#[derive(Debug, Error)]
pub enum Error {
    /// A transition guard failed: wrong state or wrong caller.
    #[error("invalid transition: {event} not permitted while listing is {status}: {reason}")]
    InvalidTransition {
        /// The event that was attempted.
        event: Event,
        /// The listing's status at the time of the attempt.
        status: ListingStatus,
        /// Why the guard rejected the event.
        reason: String,
    },

    /// A concurrent transition changed the listing first.
    #[error("conflict: listing {listing} was transitioned by another caller during {event}")]
    Conflict {
        /// The event that lost the race.
        event: Event,
        /// The listing that was contended.
        listing: ListingId,
    },

    /// The requested listing does not exist.
    #[error("listing not found: {listing}")]
    NotFound {
        /// The unknown listing id.
        listing: ListingId,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// Database corruption was detected.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: i32,
        /// The schema version found in the database.
        found: i32,
    },
}

impl From<crate::listing::ValidationError> for Error {
    fn from(err: crate::listing::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl Error {
    /// Check if this error means the listing does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use kiosk::{Error, ListingId};
    ///
    /// let err = Error::NotFound { listing: ListingId::new(7) };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error means a concurrent transition won the race.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Check if this error is a guard rejection.
    #[must_use]
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }
}
