//! Database CRUD operations for listings.
//!
//! This module implements all create, read, and update operations for
//! listings. The only write primitive for lifecycle changes is
//! [`Database::conditional_update`], the compare-and-set that serializes
//! concurrent transitions.

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, TransactionBehavior};

use crate::error::{Error, Result};
use crate::listing::{
    Buyer, Hold, Listing, ListingId, ListingStatus, NewListing, PaymentStatus, Price,
};

use super::connection::Database;
use super::schema::{CONDITIONAL_UPDATE_LISTING, INSERT_LISTING, RELEASE_EXPIRED_HOLD};

/// Converts Unix epoch seconds from the database to a UTC timestamp.
fn unix_secs_to_datetime(id: i64, secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| Error::DatabaseCorruption {
        details: format!("listing {id} has a timestamp out of range: {secs}"),
    })
}

/// Filter for listing queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    /// All listings regardless of status.
    All,
    /// Only listings in the given status.
    Only(ListingStatus),
}

/// The mutable columns written by a conditional update.
///
/// A transition replaces the full reservation state in one statement, so
/// retained fields (the hold on a payment submission, for instance) must
/// be carried through explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingUpdate {
    /// The status the listing transitions to.
    pub status: ListingStatus,
    /// The hold after the transition, if any.
    pub hold: Option<Hold>,
    /// The payment flag after the transition.
    pub payment_status: PaymentStatus,
    /// The selling time after the transition, if any.
    pub selling_time: Option<DateTime<Utc>>,
}

impl ListingUpdate {
    /// An update that returns a listing to the shelf with everything
    /// cleared: no hold, no payment activity, no selling time.
    #[must_use]
    pub const fn released() -> Self {
        Self {
            status: ListingStatus::Available,
            hold: None,
            payment_status: PaymentStatus::None,
            selling_time: None,
        }
    }

    /// An update that places a hold for the given buyer.
    #[must_use]
    pub const fn booked(hold: Hold) -> Self {
        Self {
            status: ListingStatus::Booked,
            hold: Some(hold),
            payment_status: PaymentStatus::None,
            selling_time: None,
        }
    }
}

// SQL statements for read operations
const SELECT_LISTING_COLUMNS: &str = r"
    SELECT id, model, specs, condition, price, media_url,
           status, buyer_email, buyer_phone, booked_at,
           payment_status, selling_time, created_at
    FROM listings
";

const SELECT_LISTING: &str = r"
    SELECT id, model, specs, condition, price, media_url,
           status, buyer_email, buyer_phone, booked_at,
           payment_status, selling_time, created_at
    FROM listings
    WHERE id = ?
";

const SELECT_EXPIRED_HOLDS: &str = r"
    SELECT id, model, specs, condition, price, media_url,
           status, buyer_email, buyer_phone, booked_at,
           payment_status, selling_time, created_at
    FROM listings
    WHERE status = 'booked' AND booked_at < ?
    ORDER BY booked_at
";

const SELECT_FOR_BUYER: &str = r"
    SELECT id, model, specs, condition, price, media_url,
           status, buyer_email, buyer_phone, booked_at,
           payment_status, selling_time, created_at
    FROM listings
    WHERE buyer_email = ?
    ORDER BY id
";

/// The raw column values of one listings row, read before any domain
/// validation.
///
/// Splitting the read from the conversion keeps row extraction inside
/// rusqlite's error type while letting validation failures surface as
/// [`Error::DatabaseCorruption`].
struct RawListingRow {
    id: i64,
    model: String,
    specs: String,
    condition: String,
    price: i64,
    media_url: String,
    status: String,
    buyer_email: Option<String>,
    buyer_phone: Option<String>,
    booked_secs: Option<i64>,
    payment: String,
    selling_secs: Option<i64>,
    created_secs: i64,
}

/// Reads the raw column values of a row in `SELECT_LISTING_COLUMNS` order.
fn read_listing_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawListingRow> {
    Ok(RawListingRow {
        id: row.get(0)?,
        model: row.get(1)?,
        specs: row.get(2)?,
        condition: row.get(3)?,
        price: row.get(4)?,
        media_url: row.get(5)?,
        status: row.get(6)?,
        buyer_email: row.get(7)?,
        buyer_phone: row.get(8)?,
        booked_secs: row.get(9)?,
        payment: row.get(10)?,
        selling_secs: row.get(11)?,
        created_secs: row.get(12)?,
    })
}

/// Converts a raw row into a listing.
///
/// The three hold columns must be all present or all NULL; a partial hold
/// means the row was written outside this crate. Any row that fails domain
/// validation is reported as [`Error::DatabaseCorruption`].
fn listing_from_row(raw: RawListingRow) -> Result<Listing> {
    let id = raw.id;
    let corruption = |details: String| Error::DatabaseCorruption { details };

    let price = Price::try_from(raw.price)
        .map_err(|e| corruption(format!("listing {id}: {e}")))?;

    let details = NewListing::new(raw.model, raw.specs, raw.condition, price, raw.media_url)
        .map_err(|e| corruption(format!("listing {id}: {e}")))?;

    let status: ListingStatus = raw
        .status
        .parse()
        .map_err(|e| corruption(format!("listing {id}: {e}")))?;

    let hold = match (raw.buyer_email, raw.buyer_phone, raw.booked_secs) {
        (Some(email), Some(phone), Some(secs)) => {
            let buyer =
                Buyer::new(email, phone).map_err(|e| corruption(format!("listing {id}: {e}")))?;
            Some(Hold::new(buyer, unix_secs_to_datetime(id, secs)?))
        }
        (None, None, None) => None,
        _ => {
            return Err(corruption(format!(
                "listing {id} has partially set hold columns"
            )))
        }
    };

    let selling_time = raw
        .selling_secs
        .map(|secs| unix_secs_to_datetime(id, secs))
        .transpose()?;
    let created_at = unix_secs_to_datetime(id, raw.created_secs)?;

    Listing::builder(ListingId::new(id), details, created_at)
        .status(status)
        .hold(hold)
        .payment_status(PaymentStatus::parse(&raw.payment))
        .selling_time(selling_time)
        .build()
        .map_err(|e| corruption(format!("listing {id}: {e}")))
}

impl Database {
    /// Inserts a new listing and returns its assigned id.
    ///
    /// New listings always start available with no hold.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or insert fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use chrono::Utc;
    /// use kiosk::database::{Database, DatabaseConfig};
    /// use kiosk::{NewListing, Price};
    ///
    /// let config = DatabaseConfig::new("/tmp/kiosk.db");
    /// let mut db = Database::open(config).unwrap();
    ///
    /// let details = NewListing::new(
    ///     "Pixel 7", "8GB/128GB", "Good",
    ///     Price::try_from(85_000).unwrap(), "",
    /// ).unwrap();
    /// let id = db.create_listing(&details, Utc::now()).unwrap();
    /// println!("created listing {id}");
    /// ```
    pub fn create_listing(
        &mut self,
        details: &NewListing,
        created_at: DateTime<Utc>,
    ) -> Result<ListingId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            INSERT_LISTING,
            params![
                details.model(),
                details.specs(),
                details.condition(),
                details.price().value(),
                details.media_url(),
                created_at.timestamp(),
            ],
        )?;
        let id = tx.last_insert_rowid();

        tx.commit()?;
        Ok(ListingId::new(id))
    }

    /// Retrieves a listing by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails (other than "not found").
    ///
    /// # Returns
    ///
    /// - `Ok(Some(listing))` if the listing exists
    /// - `Ok(None)` if the listing doesn't exist
    /// - `Err(_)` if a database error occurs
    pub fn get_listing(conn: &Connection, id: ListingId) -> Result<Option<Listing>> {
        let mut stmt = conn.prepare(SELECT_LISTING)?;
        match stmt.query_row(params![id.value()], read_listing_row) {
            Ok(raw) => Ok(Some(listing_from_row(raw)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Retrieves a listing by id, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the listing does not exist, or a
    /// database error if the query fails.
    pub fn require_listing(conn: &Connection, id: ListingId) -> Result<Listing> {
        Self::get_listing(conn, id)?.ok_or(Error::NotFound { listing: id })
    }

    /// Lists listings, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_listings(conn: &Connection, filter: StatusFilter) -> Result<Vec<Listing>> {
        let (sql, status_param) = match filter {
            StatusFilter::All => (
                format!("{SELECT_LISTING_COLUMNS} ORDER BY id"),
                None,
            ),
            StatusFilter::Only(status) => (
                format!("{SELECT_LISTING_COLUMNS} WHERE status = ? ORDER BY id"),
                Some(status.as_str()),
            ),
        };

        let mut stmt = conn.prepare(&sql)?;
        let rows = match status_param {
            Some(status) => stmt.query_map(params![status], read_listing_row)?,
            None => stmt.query_map([], read_listing_row)?,
        };

        let mut listings = Vec::new();
        for row in rows {
            listings.push(listing_from_row(row?)?);
        }
        Ok(listings)
    }

    /// Lists the listings currently held or already purchased by a buyer.
    ///
    /// The email is normalized the same way buyer constructors normalize
    /// it, so callers can pass raw input.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn listings_for_buyer(conn: &Connection, email: &str) -> Result<Vec<Listing>> {
        let email = email.trim().to_lowercase();
        let mut stmt = conn.prepare(SELECT_FOR_BUYER)?;
        let rows = stmt.query_map(params![email], read_listing_row)?;

        let mut listings = Vec::new();
        for row in rows {
            listings.push(listing_from_row(row?)?);
        }
        Ok(listings)
    }

    /// Applies a transition if the listing is still in the expected status.
    ///
    /// This is the compare-and-set at the heart of the reservation state
    /// machine: the UPDATE is keyed on `(id, expected_status)`, so a
    /// concurrent transition makes it affect zero rows instead of silently
    /// overwriting.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or update fails.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the listing transitioned
    /// - `Ok(false)` if the listing was not in `expected` status (or does
    ///   not exist); the caller must re-fetch to tell which
    pub fn conditional_update(
        &mut self,
        id: ListingId,
        expected: ListingStatus,
        update: &ListingUpdate,
    ) -> Result<bool> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let updated = Self::conditional_update_simple(&tx, id, expected, update)?;

        tx.commit()?;
        Ok(updated)
    }

    /// Applies a conditional transition using an existing connection or
    /// transaction.
    ///
    /// This method is intended for use within an existing transaction
    /// context. Unlike `conditional_update`, it does not create its own
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn conditional_update_simple(
        conn: &Connection,
        id: ListingId,
        expected: ListingStatus,
        update: &ListingUpdate,
    ) -> Result<bool> {
        let (buyer_email, buyer_phone, booked_secs) = match &update.hold {
            Some(hold) => (
                Some(hold.buyer().email()),
                Some(hold.buyer().phone()),
                Some(hold.booked_at().timestamp()),
            ),
            None => (None, None, None),
        };

        let rows_affected = conn.execute(
            CONDITIONAL_UPDATE_LISTING,
            params![
                update.status.as_str(),
                buyer_email,
                buyer_phone,
                booked_secs,
                update.payment_status.as_str(),
                update.selling_time.map(|t| t.timestamp()),
                id.value(),
                expected.as_str(),
            ],
        )?;

        Ok(rows_affected > 0)
    }

    /// Releases one specific expired hold.
    ///
    /// The update is keyed on `(id, booked, booked_at)` rather than status
    /// alone, so it releases exactly the hold the caller observed. A hold
    /// placed by a new buyer in the meantime carries a different
    /// `booked_at` and is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or update fails.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the hold was released
    /// - `Ok(false)` if the listing no longer carries that exact hold
    pub fn release_expired_hold(
        &mut self,
        id: ListingId,
        booked_at: DateTime<Utc>,
    ) -> Result<bool> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let rows_affected = tx.execute(
            RELEASE_EXPIRED_HOLD,
            params![id.value(), booked_at.timestamp()],
        )?;

        tx.commit()?;
        Ok(rows_affected > 0)
    }

    /// Finds all booked listings whose hold has lapsed at `now`.
    ///
    /// A hold is expired strictly after `booked_at + window`, matching
    /// [`Hold::is_expired`].
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_expired_holds(
        conn: &Connection,
        window: Duration,
        now: DateTime<Utc>,
    ) -> Result<Vec<Listing>> {
        let cutoff = (now - window).timestamp();

        let mut stmt = conn.prepare(SELECT_EXPIRED_HOLDS)?;
        let rows = stmt.query_map(params![cutoff], read_listing_row)?;

        let mut listings = Vec::new();
        for row in rows {
            listings.push(listing_from_row(row?)?);
        }
        Ok(listings)
    }
}
