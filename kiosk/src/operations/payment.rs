//! Payment submission planning.
//!
//! Submitting payment proof moves a booked listing into verification. The
//! hold window is re-checked here: proof arriving after the window lapsed
//! is rejected even though no sweep has released the hold yet.

use crate::clock::Clock;
use crate::config::Config;
use crate::database::{Database, ListingUpdate};
use crate::error::{Error, Result};
use crate::identity::Caller;
use crate::listing::{Event, ListingId, ListingStatus, PaymentStatus};

use super::plan::{OperationPlan, PlanAction};

/// Options for a payment submission.
#[derive(Debug, Clone)]
pub struct PaymentOptions {
    /// The listing the payment is for.
    pub listing: ListingId,

    /// The caller submitting the payment proof.
    pub caller: Caller,
}

impl PaymentOptions {
    /// Creates new `PaymentOptions`.
    #[must_use]
    pub const fn new(listing: ListingId, caller: Caller) -> Self {
        Self { listing, caller }
    }
}

/// A payment submission plan generator.
pub struct PaymentPlan {
    options: PaymentOptions,
}

impl PaymentPlan {
    /// Creates a new payment plan with the given options.
    #[must_use]
    pub const fn new(options: PaymentOptions) -> Self {
        Self { options }
    }

    /// Builds an operation plan for this payment submission.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The listing does not exist
    /// - The listing is not booked
    /// - The caller is not the buyer holding the listing
    /// - The hold has already expired
    pub fn build_plan(
        &self,
        db: &Database,
        config: &Config,
        clock: &dyn Clock,
    ) -> Result<OperationPlan> {
        let listing = Database::require_listing(db.connection(), self.options.listing)?;

        if listing.status() != ListingStatus::Booked {
            return Err(Error::InvalidTransition {
                event: Event::SubmitPayment,
                status: listing.status(),
                reason: "payment proof requires a booked listing".into(),
            });
        }

        let hold = listing.hold().ok_or_else(|| Error::DatabaseCorruption {
            details: format!("booked listing {} has no hold", listing.id()),
        })?;

        if !hold.is_held_by(self.options.caller.email()) {
            return Err(Error::InvalidTransition {
                event: Event::SubmitPayment,
                status: listing.status(),
                reason: "the hold belongs to a different buyer".into(),
            });
        }

        if hold.is_expired(config.hold_window(), clock.now()) {
            return Err(Error::InvalidTransition {
                event: Event::SubmitPayment,
                status: listing.status(),
                reason: "hold expired".into(),
            });
        }

        // The hold carries over into verification unchanged; only the
        // status and payment flag move.
        let plan = OperationPlan::new(format!(
            "Submit payment for listing {} by {}",
            listing.id(),
            self.options.caller.email()
        ))
        .add_action(PlanAction::Transition {
            listing: listing.id(),
            event: Event::SubmitPayment,
            expected: ListingStatus::Booked,
            update: ListingUpdate {
                status: ListingStatus::VerificationPending,
                hold: Some(hold.clone()),
                payment_status: PaymentStatus::Pending,
                selling_time: None,
            },
        });

        Ok(plan)
    }
}
