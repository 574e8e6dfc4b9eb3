//! Cancellation operation planning.
//!
//! A buyer may walk away from their own hold at any time while the listing
//! is still booked. Expiry is irrelevant here: even a lapsed hold can be
//! cancelled explicitly, the outcome is the same release.

use crate::database::{Database, ListingUpdate};
use crate::error::{Error, Result};
use crate::identity::Caller;
use crate::listing::{Event, ListingId, ListingStatus};

use super::plan::{OperationPlan, PlanAction};

/// Options for a cancellation operation.
#[derive(Debug, Clone)]
pub struct CancelOptions {
    /// The listing whose hold to release.
    pub listing: ListingId,

    /// The caller requesting the cancellation.
    pub caller: Caller,
}

impl CancelOptions {
    /// Creates new `CancelOptions`.
    #[must_use]
    pub const fn new(listing: ListingId, caller: Caller) -> Self {
        Self { listing, caller }
    }
}

/// A cancellation plan generator.
pub struct CancelPlan {
    options: CancelOptions,
}

impl CancelPlan {
    /// Creates a new cancellation plan with the given options.
    #[must_use]
    pub const fn new(options: CancelOptions) -> Self {
        Self { options }
    }

    /// Builds an operation plan for this cancellation request.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The listing does not exist
    /// - The listing is not booked
    /// - The caller is not the buyer holding the listing
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let listing = Database::require_listing(db.connection(), self.options.listing)?;

        if listing.status() != ListingStatus::Booked {
            return Err(Error::InvalidTransition {
                event: Event::CancelByUser,
                status: listing.status(),
                reason: "only a booked listing can be cancelled".into(),
            });
        }

        let hold = listing.hold().ok_or_else(|| Error::DatabaseCorruption {
            details: format!("booked listing {} has no hold", listing.id()),
        })?;

        if !hold.is_held_by(self.options.caller.email()) {
            return Err(Error::InvalidTransition {
                event: Event::CancelByUser,
                status: listing.status(),
                reason: "the hold belongs to a different buyer".into(),
            });
        }

        let plan = OperationPlan::new(format!(
            "Cancel hold on listing {} for {}",
            listing.id(),
            self.options.caller.email()
        ))
        .add_action(PlanAction::Transition {
            listing: listing.id(),
            event: Event::CancelByUser,
            expected: ListingStatus::Booked,
            update: ListingUpdate::released(),
        });

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, create_test_details};
    use crate::listing::{Buyer, Hold};
    use chrono::{DateTime, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn book(db: &mut Database, id: ListingId, email: &str) {
        let buyer = Buyer::new(email, "923001112233").unwrap();
        db.conditional_update(
            id,
            ListingStatus::Available,
            &ListingUpdate::booked(Hold::new(buyer, t0())),
        )
        .unwrap();
    }

    #[test]
    fn test_cancel_own_hold() {
        let mut db = create_test_database();
        let id = db.create_listing(&create_test_details("A"), t0()).unwrap();
        book(&mut db, id, "buyer@example.com");

        let caller = Caller::shopper("buyer@example.com", "923001112233").unwrap();
        let plan = CancelPlan::new(CancelOptions::new(id, caller))
            .build_plan(&db)
            .unwrap();

        assert_eq!(plan.len(), 1);
        assert!(matches!(
            &plan.actions[0],
            PlanAction::Transition {
                event: Event::CancelByUser,
                expected: ListingStatus::Booked,
                ..
            }
        ));
    }

    #[test]
    fn test_cancel_matches_email_case_insensitively() {
        let mut db = create_test_database();
        let id = db.create_listing(&create_test_details("A"), t0()).unwrap();
        book(&mut db, id, "buyer@example.com");

        let caller = Caller::shopper("  BUYER@Example.com ", "923001112233").unwrap();
        let plan = CancelPlan::new(CancelOptions::new(id, caller))
            .build_plan(&db)
            .unwrap();
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_cancel_someone_elses_hold() {
        let mut db = create_test_database();
        let id = db.create_listing(&create_test_details("A"), t0()).unwrap();
        book(&mut db, id, "buyer@example.com");

        let caller = Caller::shopper("intruder@example.com", "923009990000").unwrap();
        let err = CancelPlan::new(CancelOptions::new(id, caller))
            .build_plan(&db)
            .unwrap_err();
        assert!(err.is_invalid_transition());
    }

    #[test]
    fn test_cancel_available_listing() {
        let mut db = create_test_database();
        let id = db.create_listing(&create_test_details("A"), t0()).unwrap();

        let caller = Caller::shopper("buyer@example.com", "923001112233").unwrap();
        let err = CancelPlan::new(CancelOptions::new(id, caller))
            .build_plan(&db)
            .unwrap_err();
        assert!(err.is_invalid_transition());
    }

    #[test]
    fn test_cancel_unknown_listing() {
        let db = create_test_database();
        let caller = Caller::shopper("buyer@example.com", "923001112233").unwrap();
        let err = CancelPlan::new(CancelOptions::new(ListingId::new(42), caller))
            .build_plan(&db)
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
