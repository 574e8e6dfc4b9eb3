//! Admin resolution planning.
//!
//! Once payment proof is in, an admin reviews it and either completes the
//! sale, rejects the proof and returns the listing to the shelf, or defers
//! the decision. Listings in verification never lapse on their own; the
//! admin is the only way out of this status.

use crate::clock::Clock;
use crate::database::{Database, ListingUpdate};
use crate::error::{Error, Result};
use crate::identity::Caller;
use crate::listing::{Event, ListingId, ListingStatus, PaymentStatus, Resolution};

use super::plan::{OperationPlan, PlanAction};

/// Options for an admin resolution.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// The listing under verification.
    pub listing: ListingId,

    /// The caller resolving the verification. Must be an admin.
    pub caller: Caller,

    /// The verdict.
    pub resolution: Resolution,
}

impl ResolveOptions {
    /// Creates new `ResolveOptions`.
    #[must_use]
    pub const fn new(listing: ListingId, caller: Caller, resolution: Resolution) -> Self {
        Self {
            listing,
            caller,
            resolution,
        }
    }
}

/// An admin resolution plan generator.
pub struct ResolvePlan {
    options: ResolveOptions,
}

impl ResolvePlan {
    /// Creates a new resolution plan with the given options.
    #[must_use]
    pub const fn new(options: ResolveOptions) -> Self {
        Self { options }
    }

    /// Builds an operation plan for this resolution.
    ///
    /// A [`Resolution::Pending`] verdict produces an empty plan with a
    /// warning: the listing stays in verification and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The caller is not an admin
    /// - The listing does not exist
    /// - The listing is not awaiting verification
    pub fn build_plan(&self, db: &Database, clock: &dyn Clock) -> Result<OperationPlan> {
        if !self.options.caller.is_admin() {
            return Err(Error::Validation {
                field: "caller".into(),
                message: "resolving a verification requires the admin role".into(),
            });
        }

        let listing = Database::require_listing(db.connection(), self.options.listing)?;

        if listing.status() != ListingStatus::VerificationPending {
            return Err(Error::InvalidTransition {
                event: Event::AdminResolve,
                status: listing.status(),
                reason: "only a listing awaiting verification can be resolved".into(),
            });
        }

        let hold = listing.hold().ok_or_else(|| Error::DatabaseCorruption {
            details: format!("listing {} in verification has no hold", listing.id()),
        })?;

        let mut plan = OperationPlan::new(format!(
            "Resolve verification on listing {} as {}",
            listing.id(),
            self.options.resolution
        ));

        match self.options.resolution {
            Resolution::Sold => {
                // The hold stays on record: the sale keeps the buyer and
                // booking time alongside the selling time.
                plan = plan.add_action(PlanAction::Transition {
                    listing: listing.id(),
                    event: Event::AdminResolve,
                    expected: ListingStatus::VerificationPending,
                    update: ListingUpdate {
                        status: ListingStatus::Sold,
                        hold: Some(hold.clone()),
                        payment_status: PaymentStatus::Paid,
                        selling_time: Some(clock.now()),
                    },
                });
            }
            Resolution::Rejected => {
                plan = plan.add_action(PlanAction::Transition {
                    listing: listing.id(),
                    event: Event::AdminResolve,
                    expected: ListingStatus::VerificationPending,
                    update: ListingUpdate::released(),
                });
            }
            Resolution::Pending => {
                plan = plan.add_warning(format!(
                    "listing {} left in verification; no changes made",
                    listing.id()
                ));
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
    use crate::listing::{Buyer, Hold};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn admin() -> Caller {
        Caller::admin("admin").unwrap()
    }

    fn put_in_verification(db: &mut Database, id: ListingId) {
        let buyer = Buyer::new("buyer@example.com", "923001112233").unwrap();
        let hold = Hold::new(buyer, t0());
        db.conditional_update(
            id,
            ListingStatus::Available,
            &ListingUpdate::booked(hold.clone()),
        )
        .unwrap();
        db.conditional_update(
            id,
            ListingStatus::Booked,
            &ListingUpdate {
                status: ListingStatus::VerificationPending,
                hold: Some(hold),
                payment_status: PaymentStatus::Pending,
                selling_time: None,
            },
        )
        .unwrap();
    }

    #[test]
    fn test_resolve_sold() {
        let mut db = create_test_database();
        let id = db.create_listing(&create_test_details("A"), t0()).unwrap();
        put_in_verification(&mut db, id);

        let now = t0() + Duration::minutes(10);
        let clock = ManualClock::new(now);
        let plan = ResolvePlan::new(ResolveOptions::new(id, admin(), Resolution::Sold))
            .build_plan(&db, &clock)
            .unwrap();

        assert_eq!(plan.len(), 1);
        match &plan.actions[0] {
            PlanAction::Transition { update, .. } => {
                assert_eq!(update.status, ListingStatus::Sold);
                assert_eq!(update.payment_status, PaymentStatus::Paid);
                assert_eq!(update.selling_time, Some(now));
                assert!(update.hold.is_some());
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_resolve_rejected() {
        let mut db = create_test_database();
        let id = db.create_listing(&create_test_details("A"), t0()).unwrap();
        put_in_verification(&mut db, id);

        let clock = ManualClock::new(t0());
        let plan = ResolvePlan::new(ResolveOptions::new(id, admin(), Resolution::Rejected))
            .build_plan(&db, &clock)
            .unwrap();

        assert_eq!(plan.len(), 1);
        match &plan.actions[0] {
            PlanAction::Transition { update, .. } => {
                assert_eq!(update.status, ListingStatus::Available);
                assert_eq!(update.payment_status, PaymentStatus::None);
                assert!(update.hold.is_none());
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_resolve_pending_is_a_noop() {
        let mut db = create_test_database();
        let id = db.create_listing(&create_test_details("A"), t0()).unwrap();
        put_in_verification(&mut db, id);

        let clock = ManualClock::new(t0());
        let plan = ResolvePlan::new(ResolveOptions::new(id, admin(), Resolution::Pending))
            .build_plan(&db, &clock)
            .unwrap();

        assert!(plan.is_empty());
        assert_eq!(plan.warnings.len(), 1);
    }

    #[test]
    fn test_resolve_requires_admin() {
        let mut db = create_test_database();
        let id = db.create_listing(&create_test_details("A"), t0()).unwrap();
        put_in_verification(&mut db, id);

        let clock = ManualClock::new(t0());
        let shopper = Caller::shopper("buyer@example.com", "923001112233").unwrap();
        let err = ResolvePlan::new(ResolveOptions::new(id, shopper, Resolution::Sold))
            .build_plan(&db, &clock)
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_resolve_listing_not_in_verification() {
        let mut db = create_test_database();
        let id = db.create_listing(&create_test_details("A"), t0()).unwrap();

        let clock = ManualClock::new(t0());
        let err = ResolvePlan::new(ResolveOptions::new(id, admin(), Resolution::Sold))
            .build_plan(&db, &clock)
            .unwrap_err();
        assert!(err.is_invalid_transition());
    }
}
