//! Database schema definitions and SQL constants.
//!
//! This module contains all SQL table definitions, indices, and constants
//! related to the database schema for the kiosk storefront.

/// Current schema version for the database.
///
/// This version is stored in the metadata table and is used to ensure
/// compatibility between the database and the application.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
///
/// The metadata table stores key-value pairs for database configuration
/// and versioning information.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the listings table.
///
/// One row per phone listing. The hold columns (`buyer_email`,
/// `buyer_phone`, `booked_at`) are all NULL or all set; the application
/// enforces the coupling. Rows are never deleted; lifecycle is tracked
/// through the `status` column alone.
pub const CREATE_LISTINGS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS listings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        model TEXT NOT NULL,
        specs TEXT NOT NULL,
        condition TEXT NOT NULL,
        price INTEGER NOT NULL,
        media_url TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'available',
        buyer_email TEXT,
        buyer_phone TEXT,
        booked_at INTEGER,
        payment_status TEXT NOT NULL DEFAULT '',
        selling_time INTEGER,
        created_at INTEGER NOT NULL
    )";

/// SQL statement to create an index on the status column.
///
/// This index speeds up shelf queries and the expiry sweep's candidate scan.
pub const CREATE_STATUS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_listings_status ON listings(status)";

/// SQL statement to create an index on the `buyer_email` column.
///
/// This index speeds up per-buyer views (held and purchased listings).
pub const CREATE_BUYER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_listings_buyer_email ON listings(buyer_email)";

/// SQL statement to create an index on the `booked_at` column.
///
/// This index speeds up expiry sweeps that search for lapsed holds.
pub const CREATE_BOOKED_AT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_listings_booked_at ON listings(booked_at)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// SQL statement to insert a new listing.
///
/// New listings always start on the shelf: available, no hold, no payment
/// activity.
pub const INSERT_LISTING: &str = r"
    INSERT INTO listings
    (model, specs, condition, price, media_url, status, payment_status, created_at)
    VALUES (?, ?, ?, ?, ?, 'available', '', ?)
";

/// SQL statement for the conditional transition update.
///
/// The `WHERE id = ? AND status = ?` clause is the compare-and-set that
/// serializes concurrent transitions: zero rows affected means another
/// actor moved the listing first.
pub const CONDITIONAL_UPDATE_LISTING: &str = r"
    UPDATE listings
    SET status = ?,
        buyer_email = ?,
        buyer_phone = ?,
        booked_at = ?,
        payment_status = ?,
        selling_time = ?
    WHERE id = ? AND status = ?
";

/// SQL statement to release one specific expired hold.
///
/// Matching on `booked_at` as well as the status pins the update to the
/// exact hold the caller observed: if a new buyer booked in the meantime,
/// the fresh hold has a different `booked_at` and the update affects zero
/// rows instead of releasing it.
pub const RELEASE_EXPIRED_HOLD: &str = r"
    UPDATE listings
    SET status = 'available',
        buyer_email = NULL,
        buyer_phone = NULL,
        booked_at = NULL,
        payment_status = '',
        selling_time = NULL
    WHERE id = ? AND status = 'booked' AND booked_at = ?
";
