//! Common test utilities for integration tests.
//!
//! This module provides helper functions and fixtures for testing the
//! kiosk library end to end against a real on-disk database.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use kiosk::database::{Database, DatabaseConfig};
use kiosk::{Caller, NewListing, Price};

/// Creates a temporary data directory and returns it together with the
/// database path inside it.
///
/// Keeping the `TempDir` alive for the duration of the test lets multiple
/// connections open the same file, which is how the concurrency tests
/// simulate independent callers.
#[allow(dead_code)]
pub fn create_data_dir() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kiosk.db");
    (dir, path)
}

/// Opens a database connection at the given path.
#[allow(dead_code)]
pub fn open_db(path: &Path) -> Database {
    Database::open(DatabaseConfig::new(path)).unwrap()
}

/// Creates a temporary test database that will be cleaned up automatically.
#[allow(dead_code)]
pub fn create_test_database() -> Database {
    let (dir, path) = create_data_dir();
    let db = open_db(&path);
    std::mem::forget(dir);
    db
}

/// Creates test listing details with the given model name.
#[allow(dead_code)]
pub fn test_details(model: &str) -> NewListing {
    NewListing::new(
        model,
        "8GB/128GB",
        "Good",
        Price::try_from(85_000).unwrap(),
        "https://img.example.com/phone.jpg",
    )
    .unwrap()
}

/// Creates a shopper caller with the given email.
#[allow(dead_code)]
pub fn shopper(email: &str) -> Caller {
    Caller::shopper(email, "923001112233").unwrap()
}

/// Creates an admin caller.
#[allow(dead_code)]
pub fn admin() -> Caller {
    Caller::admin("admin").unwrap()
}
