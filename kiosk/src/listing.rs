//! Listing types for the second-hand phone storefront.
//!
//! This module provides the core domain types: listings, their lifecycle
//! status, the hold placed by a booking, and the events that drive the
//! reservation state machine.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A unique identifier for a listing.
///
/// Listing ids are assigned by the store on insert and never reused.
///
/// # Examples
///
/// ```
/// use kiosk::ListingId;
///
/// let id = ListingId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(format!("{id}"), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(i64);

impl ListingId {
    /// Creates a listing id from its raw value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying id value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A positive asking price, in whole currency units.
///
/// Zero is rejected: a free listing is always an entry mistake.
///
/// # Examples
///
/// ```
/// use kiosk::Price;
///
/// let price = Price::try_from(45_000).unwrap();
/// assert_eq!(price.value(), 45_000);
///
/// assert!(Price::try_from(0).is_err());
/// assert!(Price::try_from(-100).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Returns the underlying price value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Price {
    type Error = InvalidPriceError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value <= 0 {
            Err(InvalidPriceError {
                value,
                reason: "price must be positive".into(),
            })
        } else {
            Ok(Self(value))
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for invalid prices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPriceError {
    /// The invalid price value.
    pub value: i64,
    /// The reason the price is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidPriceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid price {}: {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidPriceError {}

/// The lifecycle status of a listing.
///
/// Exactly one status holds at any time, and all transition logic keys on
/// it. Listings are never deleted; `Sold` is terminal.
///
/// # Examples
///
/// ```
/// use kiosk::ListingStatus;
///
/// assert_eq!(ListingStatus::Available.as_str(), "available");
/// assert_eq!(
///     "verification_pending".parse::<ListingStatus>().unwrap(),
///     ListingStatus::VerificationPending
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    /// Open for booking by any shopper.
    Available,
    /// Held by a buyer; the hold lapses after the hold window.
    Booked,
    /// The buyer submitted payment proof; awaiting admin review.
    VerificationPending,
    /// Sale completed. Terminal.
    Sold,
}

impl ListingStatus {
    /// Returns the canonical string form used in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Booked => "booked",
            Self::VerificationPending => "verification_pending",
            Self::Sold => "sold",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ListingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "booked" => Ok(Self::Booked),
            "verification_pending" => Ok(Self::VerificationPending),
            "sold" => Ok(Self::Sold),
            other => Err(format!("unknown listing status: '{other}'")),
        }
    }
}

/// The payment flag attached to a listing.
///
/// Informational only. Transitions key on [`ListingStatus`], never on this
/// flag; it exists so the storefront can show "payment under review" and so
/// a completed sale records that the deposit was verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// No payment activity on the current hold.
    #[default]
    None,
    /// The buyer claims to have paid; awaiting admin verification.
    Pending,
    /// An admin verified the payment.
    Paid,
}

impl PaymentStatus {
    /// Returns the string form stored in the database.
    ///
    /// `None` persists as the empty string for compatibility with records
    /// written before the flag existed.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Pending => "Pending",
            Self::Paid => "Paid",
        }
    }

    /// Parses the stored string form.
    ///
    /// Unrecognized values map to `None` rather than failing, matching how
    /// the flag is treated everywhere else: advisory, never authoritative.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "Pending" => Self::Pending,
            "Paid" => Self::Paid,
            _ => Self::None,
        }
    }
}

/// An event that drives the reservation state machine.
///
/// Used in error reporting to name the transition that was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// A shopper books an available listing.
    Book,
    /// The current buyer cancels their hold.
    CancelByUser,
    /// The current buyer submits payment proof.
    SubmitPayment,
    /// An admin resolves a pending verification.
    AdminResolve,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Book => "book",
            Self::CancelByUser => "cancel",
            Self::SubmitPayment => "submit payment",
            Self::AdminResolve => "admin resolve",
        };
        f.write_str(name)
    }
}

/// The outcome an admin assigns to a pending verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Payment verified; the sale completes.
    Sold,
    /// Payment rejected; the listing returns to the shelf.
    Rejected,
    /// Review deferred; the listing stays in verification. A no-op.
    Pending,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sold => "sold",
            Self::Rejected => "rejected",
            Self::Pending => "pending",
        };
        f.write_str(name)
    }
}

/// The buyer behind a hold.
///
/// Emails are compared after lowercase normalization, which the
/// constructor applies.
///
/// # Examples
///
/// ```
/// use kiosk::Buyer;
///
/// let buyer = Buyer::new("Ali@Example.com", "923001112233").unwrap();
/// assert_eq!(buyer.email(), "ali@example.com");
/// assert_eq!(buyer.phone(), "923001112233");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buyer {
    email: String,
    phone: String,
}

impl Buyer {
    /// Creates a buyer, normalizing the email to trimmed lowercase.
    ///
    /// # Errors
    ///
    /// Returns an error if the email or phone is empty after trimming.
    pub fn new(
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let email = email.into().trim().to_lowercase();
        if email.is_empty() {
            return Err(ValidationError {
                field: "email".into(),
                message: "email must be non-empty after trimming whitespace".into(),
            });
        }
        let phone = phone.into().trim().to_string();
        if phone.is_empty() {
            return Err(ValidationError {
                field: "phone".into(),
                message: "phone must be non-empty after trimming whitespace".into(),
            });
        }
        Ok(Self { email, phone })
    }

    /// Returns the buyer's normalized email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the buyer's phone number.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }
}

/// The hold a booking places on a listing.
///
/// Buyer identity and booking time are one value: a listing either has a
/// complete hold or none at all.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use kiosk::{Buyer, Hold};
///
/// let booked_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
/// let buyer = Buyer::new("ali@example.com", "923001112233").unwrap();
/// let hold = Hold::new(buyer, booked_at);
///
/// let window = Duration::seconds(300);
/// assert!(!hold.is_expired(window, booked_at + Duration::seconds(300)));
/// assert!(hold.is_expired(window, booked_at + Duration::seconds(301)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hold {
    buyer: Buyer,
    booked_at: DateTime<Utc>,
}

impl Hold {
    /// Creates a hold for the given buyer at the given booking time.
    #[must_use]
    pub const fn new(buyer: Buyer, booked_at: DateTime<Utc>) -> Self {
        Self { buyer, booked_at }
    }

    /// Returns the buyer holding the listing.
    #[must_use]
    pub const fn buyer(&self) -> &Buyer {
        &self.buyer
    }

    /// Returns when the hold was placed.
    #[must_use]
    pub const fn booked_at(&self) -> DateTime<Utc> {
        self.booked_at
    }

    /// Checks whether the hold has lapsed at the given instant.
    ///
    /// Expiry is strict: a hold evaluated exactly at the end of the window
    /// is still live. No expiry flag is ever persisted; this is recomputed
    /// on every evaluation.
    #[must_use]
    pub fn is_expired(&self, window: Duration, now: DateTime<Utc>) -> bool {
        now > self.booked_at + window
    }

    /// Returns whether the given email matches the holding buyer.
    #[must_use]
    pub fn is_held_by(&self, email: &str) -> bool {
        self.buyer.email == email.trim().to_lowercase()
    }
}

/// The descriptive fields of a listing, as supplied at creation.
///
/// # Examples
///
/// ```
/// use kiosk::{NewListing, Price};
///
/// let details = NewListing::new(
///     "Pixel 7",
///     "8GB/128GB, Obsidian",
///     "Good, minor scratches",
///     Price::try_from(85_000).unwrap(),
///     "https://img.example.com/pixel7.jpg",
/// )
/// .unwrap();
/// assert_eq!(details.model(), "Pixel 7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewListing {
    model: String,
    specs: String,
    condition: String,
    price: Price,
    media_url: String,
}

impl NewListing {
    /// Creates the details for a new listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is empty after trimming whitespace.
    pub fn new(
        model: impl Into<String>,
        specs: impl Into<String>,
        condition: impl Into<String>,
        price: Price,
        media_url: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let model = model.into().trim().to_string();
        if model.is_empty() {
            return Err(ValidationError {
                field: "model".into(),
                message: "model must be non-empty after trimming whitespace".into(),
            });
        }
        Ok(Self {
            model,
            specs: specs.into().trim().to_string(),
            condition: condition.into().trim().to_string(),
            price,
            media_url: media_url.into().trim().to_string(),
        })
    }

    /// Returns the phone model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the hardware specs description.
    #[must_use]
    pub fn specs(&self) -> &str {
        &self.specs
    }

    /// Returns the condition description.
    #[must_use]
    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// Returns the asking price.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    /// Returns the media URL for the listing photo.
    #[must_use]
    pub fn media_url(&self) -> &str {
        &self.media_url
    }
}

/// A phone listing with its reservation state.
///
/// Constructed through [`Listing::builder`], which enforces the coupling
/// between status and hold: `Available` listings carry no hold, `Booked`
/// and `VerificationPending` listings always do, and `Sold` listings have
/// a selling time.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use kiosk::{Listing, ListingId, ListingStatus, NewListing, Price};
///
/// let details = NewListing::new(
///     "iPhone 12",
///     "4GB/64GB",
///     "Fair",
///     Price::try_from(60_000).unwrap(),
///     "",
/// )
/// .unwrap();
/// let created_at = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
///
/// let listing = Listing::builder(ListingId::new(1), details, created_at)
///     .build()
///     .unwrap();
/// assert_eq!(listing.status(), ListingStatus::Available);
/// assert!(listing.hold().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    id: ListingId,
    #[serde(flatten)]
    details: NewListing,
    status: ListingStatus,
    hold: Option<Hold>,
    payment_status: PaymentStatus,
    selling_time: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl Listing {
    /// Creates a new listing builder.
    ///
    /// The builder defaults to `Available` with no hold and no payment
    /// activity.
    #[must_use]
    pub fn builder(id: ListingId, details: NewListing, created_at: DateTime<Utc>) -> ListingBuilder {
        ListingBuilder {
            id,
            details,
            status: ListingStatus::Available,
            hold: None,
            payment_status: PaymentStatus::None,
            selling_time: None,
            created_at,
        }
    }

    /// Returns the listing id.
    #[must_use]
    pub const fn id(&self) -> ListingId {
        self.id
    }

    /// Returns the descriptive fields.
    #[must_use]
    pub const fn details(&self) -> &NewListing {
        &self.details
    }

    /// Returns the phone model name.
    #[must_use]
    pub fn model(&self) -> &str {
        self.details.model()
    }

    /// Returns the asking price.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.details.price()
    }

    /// Returns the current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ListingStatus {
        self.status
    }

    /// Returns the active hold, if any.
    #[must_use]
    pub const fn hold(&self) -> Option<&Hold> {
        self.hold.as_ref()
    }

    /// Returns the payment flag.
    #[must_use]
    pub const fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    /// Returns when the sale completed, if it did.
    #[must_use]
    pub const fn selling_time(&self) -> Option<DateTime<Utc>> {
        self.selling_time
    }

    /// Returns when the listing was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Checks whether the listing's hold has lapsed at the given instant.
    ///
    /// Only meaningful for `Booked` listings; returns `false` when there
    /// is no hold. `VerificationPending` holds do not lapse: once payment
    /// proof is in, the clock stops and resolution is the admin's.
    #[must_use]
    pub fn hold_expired(&self, window: Duration, now: DateTime<Utc>) -> bool {
        match (self.status, &self.hold) {
            (ListingStatus::Booked, Some(hold)) => hold.is_expired(window, now),
            _ => false,
        }
    }
}

/// Builder for creating `Listing` instances.
///
/// Validates the status/hold coupling on [`build`](ListingBuilder::build).
#[derive(Debug)]
pub struct ListingBuilder {
    id: ListingId,
    details: NewListing,
    status: ListingStatus,
    hold: Option<Hold>,
    payment_status: PaymentStatus,
    selling_time: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl ListingBuilder {
    /// Sets the lifecycle status.
    #[must_use]
    pub const fn status(mut self, status: ListingStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the hold.
    #[must_use]
    pub fn hold(mut self, hold: Option<Hold>) -> Self {
        self.hold = hold;
        self
    }

    /// Sets the payment flag.
    #[must_use]
    pub const fn payment_status(mut self, payment_status: PaymentStatus) -> Self {
        self.payment_status = payment_status;
        self
    }

    /// Sets the selling time.
    #[must_use]
    pub const fn selling_time(mut self, selling_time: Option<DateTime<Utc>>) -> Self {
        self.selling_time = selling_time;
        self
    }

    /// Builds the listing.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The status is `Available` but a hold is set
    /// - The status is `Booked` or `VerificationPending` without a hold
    /// - The status is `Sold` without a selling time
    pub fn build(self) -> Result<Listing, ValidationError> {
        match self.status {
            ListingStatus::Available => {
                if self.hold.is_some() {
                    return Err(ValidationError {
                        field: "hold".into(),
                        message: "an available listing cannot carry a hold".into(),
                    });
                }
            }
            ListingStatus::Booked | ListingStatus::VerificationPending => {
                if self.hold.is_none() {
                    return Err(ValidationError {
                        field: "hold".into(),
                        message: format!("a {} listing requires a hold", self.status),
                    });
                }
            }
            ListingStatus::Sold => {
                if self.selling_time.is_none() {
                    return Err(ValidationError {
                        field: "selling_time".into(),
                        message: "a sold listing requires a selling time".into(),
                    });
                }
            }
        }

        Ok(Listing {
            id: self.id,
            details: self.details,
            status: self.status,
            hold: self.hold,
            payment_status: self.payment_status,
            selling_time: self.selling_time,
            created_at: self.created_at,
        })
    }
}

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn details() -> NewListing {
        NewListing::new(
            "Galaxy S21",
            "8GB/256GB",
            "Excellent",
            Price::try_from(95_000).unwrap(),
            "https://img.example.com/s21.jpg",
        )
        .unwrap()
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn buyer() -> Buyer {
        Buyer::new("buyer@example.com", "923001112233").unwrap()
    }

    #[test]
    fn test_price_validation() {
        assert!(Price::try_from(1).is_ok());
        assert!(Price::try_from(95_000).is_ok());
        assert!(Price::try_from(0).is_err());
        assert!(Price::try_from(-5_000).is_err());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            ListingStatus::Available,
            ListingStatus::Booked,
            ListingStatus::VerificationPending,
            ListingStatus::Sold,
        ] {
            let parsed: ListingStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("pending".parse::<ListingStatus>().is_err());
    }

    #[test]
    fn test_payment_status_strings() {
        assert_eq!(PaymentStatus::None.as_str(), "");
        assert_eq!(PaymentStatus::Pending.as_str(), "Pending");
        assert_eq!(PaymentStatus::Paid.as_str(), "Paid");

        assert_eq!(PaymentStatus::parse(""), PaymentStatus::None);
        assert_eq!(PaymentStatus::parse("Pending"), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::parse("Paid"), PaymentStatus::Paid);
        // Unrecognized values degrade to None rather than failing.
        assert_eq!(PaymentStatus::parse("garbage"), PaymentStatus::None);
    }

    #[test]
    fn test_buyer_normalizes_email() {
        let buyer = Buyer::new("  Buyer@Example.COM ", "923001112233").unwrap();
        assert_eq!(buyer.email(), "buyer@example.com");
    }

    #[test]
    fn test_buyer_rejects_empty_fields() {
        assert!(Buyer::new("", "923001112233").is_err());
        assert!(Buyer::new("buyer@example.com", "  ").is_err());
    }

    #[test]
    fn test_hold_expiry_boundary() {
        let hold = Hold::new(buyer(), t0());
        let window = Duration::seconds(300);

        // Live strictly up to and including the boundary.
        assert!(!hold.is_expired(window, t0()));
        assert!(!hold.is_expired(window, t0() + Duration::seconds(300)));
        assert!(hold.is_expired(window, t0() + Duration::seconds(301)));
    }

    #[test]
    fn test_hold_is_held_by_normalizes() {
        let hold = Hold::new(buyer(), t0());
        assert!(hold.is_held_by("buyer@example.com"));
        assert!(hold.is_held_by("  BUYER@example.COM "));
        assert!(!hold.is_held_by("other@example.com"));
    }

    #[test]
    fn test_new_listing_requires_model() {
        let result = NewListing::new("  ", "", "", Price::try_from(100).unwrap(), "");
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().field, "model");
    }

    #[test]
    fn test_builder_default_is_available() {
        let listing = Listing::builder(ListingId::new(1), details(), t0())
            .build()
            .unwrap();
        assert_eq!(listing.status(), ListingStatus::Available);
        assert!(listing.hold().is_none());
        assert_eq!(listing.payment_status(), PaymentStatus::None);
        assert!(listing.selling_time().is_none());
        assert_eq!(listing.created_at(), t0());
    }

    #[test]
    fn test_builder_rejects_available_with_hold() {
        let result = Listing::builder(ListingId::new(1), details(), t0())
            .hold(Some(Hold::new(buyer(), t0())))
            .build();
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().field, "hold");
    }

    #[test]
    fn test_builder_rejects_booked_without_hold() {
        let result = Listing::builder(ListingId::new(1), details(), t0())
            .status(ListingStatus::Booked)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_rejects_sold_without_selling_time() {
        let result = Listing::builder(ListingId::new(1), details(), t0())
            .status(ListingStatus::Sold)
            .build();
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().field, "selling_time");
    }

    #[test]
    fn test_builder_booked_listing() {
        let listing = Listing::builder(ListingId::new(1), details(), t0())
            .status(ListingStatus::Booked)
            .hold(Some(Hold::new(buyer(), t0())))
            .build()
            .unwrap();

        assert_eq!(listing.status(), ListingStatus::Booked);
        assert!(listing.hold().unwrap().is_held_by("buyer@example.com"));
    }

    #[test]
    fn test_builder_sold_retains_hold() {
        let sold_at = t0() + Duration::minutes(2);
        let listing = Listing::builder(ListingId::new(1), details(), t0())
            .status(ListingStatus::Sold)
            .hold(Some(Hold::new(buyer(), t0())))
            .payment_status(PaymentStatus::Paid)
            .selling_time(Some(sold_at))
            .build()
            .unwrap();

        assert_eq!(listing.status(), ListingStatus::Sold);
        assert_eq!(listing.selling_time(), Some(sold_at));
        // The buyer stays on record after the sale completes.
        assert!(listing.hold().is_some());
    }

    #[test]
    fn test_hold_expired_only_applies_to_booked() {
        let window = Duration::seconds(300);
        let late = t0() + Duration::seconds(600);

        let available = Listing::builder(ListingId::new(1), details(), t0())
            .build()
            .unwrap();
        assert!(!available.hold_expired(window, late));

        let booked = Listing::builder(ListingId::new(2), details(), t0())
            .status(ListingStatus::Booked)
            .hold(Some(Hold::new(buyer(), t0())))
            .build()
            .unwrap();
        assert!(booked.hold_expired(window, late));

        // Once in verification the clock stops.
        let pending = Listing::builder(ListingId::new(3), details(), t0())
            .status(ListingStatus::VerificationPending)
            .hold(Some(Hold::new(buyer(), t0())))
            .payment_status(PaymentStatus::Pending)
            .build()
            .unwrap();
        assert!(!pending.hold_expired(window, late));
    }

    #[cfg(feature = "property-tests")]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
            // Seconds across a few decades around the epoch of interest.
            (1_500_000_000i64..1_900_000_000).prop_map(|secs| {
                Utc.timestamp_opt(secs, 0).unwrap()
            })
        }

        proptest! {
            // Expiry is strict: lapsed iff now is past booked_at + window.
            #[test]
            fn prop_hold_expiry_matches_arithmetic(
                booked_secs in 1_500_000_000i64..1_900_000_000,
                window_secs in 1i64..1_000_000,
                offset_secs in 0i64..2_000_000,
            ) {
                let booked_at = Utc.timestamp_opt(booked_secs, 0).unwrap();
                let hold = Hold::new(buyer(), booked_at);
                let window = Duration::seconds(window_secs);
                let now = booked_at + Duration::seconds(offset_secs);

                prop_assert_eq!(hold.is_expired(window, now), offset_secs > window_secs);
            }

            // Buyer email normalization is idempotent.
            #[test]
            fn prop_buyer_email_normalization_idempotent(raw in "[ ]{0,2}[A-Za-z0-9.]{1,20}@[A-Za-z]{1,10}\\.com[ ]{0,2}") {
                let first = Buyer::new(raw, "923001112233").unwrap();
                let second = Buyer::new(first.email(), "923001112233").unwrap();
                prop_assert_eq!(first.email(), second.email());
                prop_assert!(Hold::new(second, t0()).is_held_by(first.email()));
            }

            // Status survives its stored string form.
            #[test]
            fn prop_status_string_round_trip(idx in 0usize..4) {
                let status = [
                    ListingStatus::Available,
                    ListingStatus::Booked,
                    ListingStatus::VerificationPending,
                    ListingStatus::Sold,
                ][idx];
                let parsed: ListingStatus = status.as_str().parse().unwrap();
                prop_assert_eq!(parsed, status);
            }

            // Price accepts exactly the positive integers.
            #[test]
            fn prop_price_accepts_positive_only(value in i64::MIN..i64::MAX) {
                prop_assert_eq!(Price::try_from(value).is_ok(), value > 0);
            }

            // A built listing never violates the status/hold coupling.
            #[test]
            fn prop_builder_output_is_coherent(
                booked_at in instant_strategy(),
                booked in any::<bool>(),
            ) {
                let listing = if booked {
                    Listing::builder(ListingId::new(1), details(), booked_at)
                        .status(ListingStatus::Booked)
                        .hold(Some(Hold::new(buyer(), booked_at)))
                        .build()
                        .unwrap()
                } else {
                    Listing::builder(ListingId::new(1), details(), booked_at)
                        .build()
                        .unwrap()
                };

                match listing.status() {
                    ListingStatus::Available => prop_assert!(listing.hold().is_none()),
                    ListingStatus::Booked | ListingStatus::VerificationPending => {
                        prop_assert!(listing.hold().is_some());
                    }
                    ListingStatus::Sold => prop_assert!(listing.selling_time().is_some()),
                }
            }
        }
    }

    #[test]
    fn test_listing_serde_round_trip() {
        let listing = Listing::builder(ListingId::new(7), details(), t0())
            .status(ListingStatus::Booked)
            .hold(Some(Hold::new(buyer(), t0())))
            .build()
            .unwrap();

        let json = serde_json::to_string(&listing).unwrap();
        let deserialized: Listing = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, listing);
    }
}
