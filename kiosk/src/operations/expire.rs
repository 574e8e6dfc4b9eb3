//! Hold expiry: per-listing checks and the batch sweep.
//!
//! Expiry has two remedies. The transition guards re-derive it lazily on
//! every read of the clock, so a lapsed hold never blocks a new booking
//! even if no sweep ever runs. The sweep here is the active remedy: it
//! scans for lapsed holds and releases them in bulk, each release guarded
//! by its own conditional update so a concurrent transition wins cleanly.

use log::debug;

use crate::clock::Clock;
use crate::config::Config;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::listing::{Listing, ListingId};

use super::plan::{OperationPlan, PlanAction};

/// A per-listing expiry check plan generator.
///
/// Produces a release transition when the listing is booked and its hold
/// has lapsed, and an empty plan otherwise. The empty plan makes the check
/// idempotent: running it on an available, sold, or freshly booked listing
/// changes nothing.
pub struct ExpiryCheckPlan {
    listing: ListingId,
}

impl ExpiryCheckPlan {
    /// Creates a new expiry check for the given listing.
    #[must_use]
    pub const fn new(listing: ListingId) -> Self {
        Self { listing }
    }

    /// Builds an operation plan for this expiry check.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing does not exist.
    pub fn build_plan(
        &self,
        db: &Database,
        config: &Config,
        clock: &dyn Clock,
    ) -> Result<OperationPlan> {
        let listing = Database::require_listing(db.connection(), self.listing)?;
        let mut plan = OperationPlan::new(format!("Expiry check on listing {}", listing.id()));

        if listing.hold_expired(config.hold_window(), clock.now()) {
            let hold = listing.hold().ok_or_else(|| Error::DatabaseCorruption {
                details: format!("booked listing {} has no hold", listing.id()),
            })?;
            plan = plan.add_action(PlanAction::ReleaseExpired {
                listing: listing.id(),
                booked_at: hold.booked_at(),
            });
        }

        Ok(plan)
    }
}

/// The result of a sweep over expired holds.
#[derive(Debug, Clone)]
pub struct SweepResult {
    /// Whether this was a dry-run (no actual changes made).
    pub dry_run: bool,

    /// The number of holds released (or that would be released in dry-run).
    pub released_count: usize,

    /// The listings whose holds were found expired, as they looked at scan
    /// time.
    pub released: Vec<Listing>,
}

/// Batch operations over expired holds.
pub struct SweepOperations;

impl SweepOperations {
    /// Releases every lapsed hold in the store.
    ///
    /// Each release is its own conditional update. A listing that moves
    /// between the scan and its release (the buyer paid, a sweep raced)
    /// is skipped silently; the other transition already settled it.
    ///
    /// In dry-run mode the scan runs but nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be read or written.
    pub fn release_expired(
        db: &mut Database,
        config: &Config,
        clock: &dyn Clock,
        dry_run: bool,
    ) -> Result<SweepResult> {
        let expired =
            Database::find_expired_holds(db.connection(), config.hold_window(), clock.now())?;

        if dry_run {
            return Ok(SweepResult {
                dry_run: true,
                released_count: expired.len(),
                released: expired,
            });
        }

        let mut released = Vec::new();
        for listing in expired {
            let hold = listing.hold().ok_or_else(|| Error::DatabaseCorruption {
                details: format!("booked listing {} has no hold", listing.id()),
            })?;
            let updated = db.release_expired_hold(listing.id(), hold.booked_at())?;
            if updated {
                released.push(listing);
            } else {
                debug!(
                    "listing {} transitioned during sweep; skipping",
                    listing.id()
                );
            }
        }

        Ok(SweepResult {
            dry_run: false,
            released_count: released.len(),
            released,
        })
    }
}
