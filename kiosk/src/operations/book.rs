//! Booking operation planning.
//!
//! Booking places a hold on an available listing for the calling buyer.
//! If the listing carries an expired hold from an earlier buyer, the plan
//! releases that hold and books in the same execution, each step guarded
//! by its own conditional update.

use crate::clock::Clock;
use crate::config::Config;
use crate::database::{Database, ListingUpdate};
use crate::error::{Error, Result};
use crate::identity::Caller;
use crate::listing::{Buyer, Event, Hold, ListingId, ListingStatus};

use super::plan::{OperationPlan, PlanAction};

/// Options for a booking operation.
#[derive(Debug, Clone)]
pub struct BookOptions {
    /// The listing to book.
    pub listing: ListingId,

    /// The caller placing the hold.
    pub caller: Caller,
}

impl BookOptions {
    /// Creates new `BookOptions`.
    #[must_use]
    pub const fn new(listing: ListingId, caller: Caller) -> Self {
        Self { listing, caller }
    }
}

/// A booking plan generator.
///
/// This struct is responsible for analyzing a booking request and
/// generating a plan that describes what actions to take.
pub struct BookPlan {
    options: BookOptions,
}

impl BookPlan {
    /// Creates a new booking plan with the given options.
    #[must_use]
    pub const fn new(options: BookOptions) -> Self {
        Self { options }
    }

    /// Builds an operation plan for this booking request.
    ///
    /// This method evaluates the guards against the injected clock and
    /// does NOT modify the database. The emitted transitions re-check the
    /// status at execution time via conditional update.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The listing does not exist
    /// - The caller has no phone number on record
    /// - The listing is not bookable (booked with a live hold, in
    ///   verification, or sold)
    pub fn build_plan(
        &self,
        db: &Database,
        config: &Config,
        clock: &dyn Clock,
    ) -> Result<OperationPlan> {
        let listing = Database::require_listing(db.connection(), self.options.listing)?;
        let now = clock.now();

        let phone = self.options.caller.phone().ok_or_else(|| Error::Validation {
            field: "phone".into(),
            message: "booking requires a phone number on the caller".into(),
        })?;
        let buyer = Buyer::new(self.options.caller.email(), phone)?;

        let mut plan = OperationPlan::new(format!(
            "Book listing {} for {}",
            listing.id(),
            buyer.email()
        ));

        match listing.status() {
            ListingStatus::Available => {
                plan = plan.add_action(PlanAction::Transition {
                    listing: listing.id(),
                    event: Event::Book,
                    expected: ListingStatus::Available,
                    update: ListingUpdate::booked(Hold::new(buyer, now)),
                });
            }
            ListingStatus::Booked => {
                let hold = listing.hold().ok_or_else(|| Error::DatabaseCorruption {
                    details: format!("booked listing {} has no hold", listing.id()),
                })?;

                if !hold.is_expired(config.hold_window(), now) {
                    let reason = if hold.is_held_by(buyer.email()) {
                        "listing is already booked by this buyer".to_string()
                    } else {
                        "listing is already booked".to_string()
                    };
                    return Err(Error::InvalidTransition {
                        event: Event::Book,
                        status: listing.status(),
                        reason,
                    });
                }

                // The previous hold lapsed. Release exactly that hold,
                // then book; each step carries its own guard.
                plan = plan
                    .add_warning(format!(
                        "hold by {} on listing {} expired; releasing before booking",
                        hold.buyer().email(),
                        listing.id()
                    ))
                    .add_action(PlanAction::ReleaseExpired {
                        listing: listing.id(),
                        booked_at: hold.booked_at(),
                    })
                    .add_action(PlanAction::Transition {
                        listing: listing.id(),
                        event: Event::Book,
                        expected: ListingStatus::Available,
                        update: ListingUpdate::booked(Hold::new(buyer, now)),
                    });
            }
            ListingStatus::VerificationPending => {
                return Err(Error::InvalidTransition {
                    event: Event::Book,
                    status: listing.status(),
                    reason: "payment verification is in progress".into(),
                });
            }
            ListingStatus::Sold => {
                return Err(Error::InvalidTransition {
                    event: Event::Book,
                    status: listing.status(),
                    reason: "listing has been sold".into(),
                });
            }
        }

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::database::test_util::{create_test_database, create_test_details};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn caller() -> Caller {
        Caller::shopper("buyer@example.com", "923001112233").unwrap()
    }

    #[test]
    fn test_book_available_listing() {
        let mut db = create_test_database();
        let id = db.create_listing(&create_test_details("A"), t0()).unwrap();
        let clock = ManualClock::new(t0());

        let plan = BookPlan::new(BookOptions::new(id, caller()))
            .build_plan(&db, &Config::default(), &clock)
            .unwrap();

        assert_eq!(plan.len(), 1);
        assert!(matches!(
            &plan.actions[0],
            PlanAction::Transition {
                event: Event::Book,
                expected: ListingStatus::Available,
                ..
            }
        ));
    }

    #[test]
    fn test_book_unknown_listing() {
        let db = create_test_database();
        let clock = ManualClock::new(t0());

        let err = BookPlan::new(BookOptions::new(ListingId::new(999), caller()))
            .build_plan(&db, &Config::default(), &clock)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_book_listing_with_live_hold() {
        let mut db = create_test_database();
        let id = db.create_listing(&create_test_details("A"), t0()).unwrap();
        let clock = ManualClock::new(t0());
        let config = Config::default();

        // First booking succeeds in planning.
        let plan = BookPlan::new(BookOptions::new(id, caller()))
            .build_plan(&db, &config, &clock)
            .unwrap();
        let buyer = Buyer::new("other@example.com", "923009998877").unwrap();
        db.conditional_update(
            id,
            ListingStatus::Available,
            &ListingUpdate::booked(Hold::new(buyer, clock.now())),
        )
        .unwrap();
        drop(plan);

        // A second booking one minute later is rejected.
        clock.advance(Duration::minutes(1));
        let err = BookPlan::new(BookOptions::new(id, caller()))
            .build_plan(&db, &config, &clock)
            .unwrap_err();
        assert!(err.is_invalid_transition());
    }

    #[test]
    fn test_book_listing_with_expired_hold_releases_first() {
        let mut db = create_test_database();
        let id = db.create_listing(&create_test_details("A"), t0()).unwrap();
        let clock = ManualClock::new(t0());
        let config = Config::default();

        let old_buyer = Buyer::new("old@example.com", "923001110000").unwrap();
        db.conditional_update(
            id,
            ListingStatus::Available,
            &ListingUpdate::booked(Hold::new(old_buyer, t0())),
        )
        .unwrap();

        clock.advance(Duration::seconds(301));
        let plan = BookPlan::new(BookOptions::new(id, caller()))
            .build_plan(&db, &config, &clock)
            .unwrap();

        assert_eq!(plan.len(), 2);
        assert!(matches!(
            &plan.actions[0],
            PlanAction::ReleaseExpired { booked_at, .. } if *booked_at == t0()
        ));
        assert!(matches!(
            &plan.actions[1],
            PlanAction::Transition {
                event: Event::Book,
                expected: ListingStatus::Available,
                ..
            }
        ));
        assert_eq!(plan.warnings.len(), 1);
        assert!(plan.warnings[0].contains("expired"));
    }

    #[test]
    fn test_book_sold_listing() {
        let mut db = create_test_database();
        let id = db.create_listing(&create_test_details("A"), t0()).unwrap();
        let clock = ManualClock::new(t0());

        let buyer = Buyer::new("done@example.com", "923000001111").unwrap();
        db.conditional_update(
            id,
            ListingStatus::Available,
            &ListingUpdate::booked(Hold::new(buyer.clone(), t0())),
        )
        .unwrap();
        db.conditional_update(
            id,
            ListingStatus::Booked,
            &ListingUpdate {
                status: ListingStatus::Sold,
                hold: Some(Hold::new(buyer, t0())),
                payment_status: crate::listing::PaymentStatus::Paid,
                selling_time: Some(t0()),
            },
        )
        .unwrap();

        let err = BookPlan::new(BookOptions::new(id, caller()))
            .build_plan(&db, &Config::default(), &clock)
            .unwrap_err();
        assert!(err.is_invalid_transition());
        assert!(err.to_string().contains("sold"));
    }

    #[test]
    fn test_book_requires_phone() {
        let mut db = create_test_database();
        let id = db.create_listing(&create_test_details("A"), t0()).unwrap();
        let clock = ManualClock::new(t0());

        let admin = Caller::admin("admin").unwrap();
        let err = BookPlan::new(BookOptions::new(id, admin))
            .build_plan(&db, &Config::default(), &clock)
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }
}
