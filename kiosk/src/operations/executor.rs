//! Plan execution engine.
//!
//! This module implements the executor that takes operation plans
//! and applies them to the database.

use log::debug;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::listing::{Listing, ListingId};

use super::plan::{OperationPlan, PlanAction};

/// Result of executing a plan.
///
/// This struct provides information about what happened during execution,
/// including whether it was a dry run and what actions were taken.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Whether the execution was successful.
    pub success: bool,

    /// Whether this was a dry-run (no actual changes made).
    pub dry_run: bool,

    /// Descriptions of actions that were taken (or would be taken in dry-run).
    pub actions_taken: Vec<String>,

    /// Warnings from the plan.
    pub warnings: Vec<String>,

    /// The id of the listing that was created (if applicable).
    pub created: Option<ListingId>,

    /// The listing's state after execution (if applicable).
    pub listing: Option<Listing>,
}

impl ExecutionResult {
    /// Creates a successful execution result.
    fn success(plan: &OperationPlan, created: Option<ListingId>, listing: Option<Listing>) -> Self {
        Self {
            success: true,
            dry_run: false,
            actions_taken: plan.actions.iter().map(PlanAction::description).collect(),
            warnings: plan.warnings.clone(),
            created,
            listing,
        }
    }

    /// Creates a dry-run execution result.
    fn dry_run(plan: &OperationPlan) -> Self {
        Self {
            success: true,
            dry_run: true,
            actions_taken: plan.actions.iter().map(PlanAction::description).collect(),
            warnings: plan.warnings.clone(),
            created: None,
            listing: None,
        }
    }
}

/// Executes operation plans against the database.
///
/// The executor can run in normal mode (applying changes) or dry-run mode
/// (validating without changes). A `Transition` action whose conditional
/// update affects zero rows means another caller transitioned the listing
/// between planning and execution; the executor reports that as
/// [`Error::Conflict`] (or [`Error::NotFound`] if the listing is gone).
///
/// # Examples
///
/// ```no_run
/// use kiosk::clock::SystemClock;
/// use kiosk::database::{Database, DatabaseConfig};
/// use kiosk::operations::{BookOptions, BookPlan, PlanExecutor};
/// use kiosk::{Caller, Config, ListingId};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/kiosk.db")).unwrap();
/// let config = Config::default();
/// let clock = SystemClock;
/// let caller = Caller::shopper("buyer@example.com", "923001112233").unwrap();
///
/// let options = BookOptions::new(ListingId::new(1), caller);
/// let plan = BookPlan::new(options).build_plan(&db, &config, &clock).unwrap();
///
/// // Normal execution
/// let mut executor = PlanExecutor::new(&mut db);
/// let result = executor.execute(&plan).unwrap();
/// assert!(result.success);
///
/// // Dry-run execution
/// let mut executor = PlanExecutor::new(&mut db).dry_run();
/// let result = executor.execute(&plan).unwrap();
/// assert!(result.dry_run);
/// ```
pub struct PlanExecutor<'a> {
    db: &'a mut Database,
    dry_run: bool,
}

impl<'a> PlanExecutor<'a> {
    /// Creates a new plan executor.
    #[must_use]
    pub const fn new(db: &'a mut Database) -> Self {
        Self { db, dry_run: false }
    }

    /// Sets the executor to dry-run mode.
    ///
    /// In dry-run mode, the executor validates the plan but does not
    /// actually modify the database.
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Executes the given plan.
    ///
    /// If in dry-run mode, validates the plan but makes no database changes.
    /// Otherwise, applies all actions in the plan to the database.
    ///
    /// # Errors
    ///
    /// Returns an error if any action fails to execute. In particular, a
    /// `Transition` action fails with [`Error::Conflict`] when a concurrent
    /// transition moved the listing first.
    pub fn execute(&mut self, plan: &OperationPlan) -> Result<ExecutionResult> {
        if self.dry_run {
            return Ok(ExecutionResult::dry_run(plan));
        }

        let mut created = None;
        let mut subject = None;

        for action in &plan.actions {
            match self.execute_action(action)? {
                ActionOutcome::Created(id) => {
                    created = Some(id);
                    subject = Some(id);
                }
                ActionOutcome::Transitioned(id) => subject = Some(id),
            }
        }

        // Re-fetch so callers see the post-transition state, not their
        // stale planning copy.
        let listing = match subject {
            Some(id) => Database::get_listing(self.db.connection(), id)?,
            None => None,
        };

        Ok(ExecutionResult::success(plan, created, listing))
    }

    /// Executes a single action.
    fn execute_action(&mut self, action: &PlanAction) -> Result<ActionOutcome> {
        match action {
            PlanAction::CreateListing {
                details,
                created_at,
            } => {
                let id = self.db.create_listing(details, *created_at)?;
                Ok(ActionOutcome::Created(id))
            }
            PlanAction::ReleaseExpired { listing, booked_at } => {
                let released = self.db.release_expired_hold(*listing, *booked_at)?;
                if !released {
                    // Another transition settled this hold already. The
                    // next action's conditional update arbitrates.
                    debug!("expired hold on listing {listing} already settled");
                }
                Ok(ActionOutcome::Transitioned(*listing))
            }
            PlanAction::Transition {
                listing,
                event,
                expected,
                update,
            } => {
                let updated = self.db.conditional_update(*listing, *expected, update)?;
                if !updated {
                    // Zero rows: either the listing moved or it is gone.
                    return match Database::get_listing(self.db.connection(), *listing)? {
                        Some(_) => Err(Error::Conflict {
                            event: *event,
                            listing: *listing,
                        }),
                        None => Err(Error::NotFound { listing: *listing }),
                    };
                }
                Ok(ActionOutcome::Transitioned(*listing))
            }
        }
    }
}

enum ActionOutcome {
    Created(ListingId),
    Transitioned(ListingId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, create_test_details};
    use crate::database::ListingUpdate;
    use crate::listing::{Buyer, Event, Hold, ListingStatus};
    use chrono::{TimeZone, Utc};

    fn t0() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn hold() -> Hold {
        let buyer = Buyer::new("buyer@example.com", "923001112233").unwrap();
        Hold::new(buyer, t0())
    }

    #[test]
    fn test_execute_create_listing() {
        let mut db = create_test_database();
        let plan = OperationPlan::new("Test").add_action(PlanAction::CreateListing {
            details: create_test_details("Pixel 7"),
            created_at: t0(),
        });

        let mut executor = PlanExecutor::new(&mut db);
        let result = executor.execute(&plan).unwrap();

        assert!(result.success);
        assert!(!result.dry_run);
        assert_eq!(result.actions_taken.len(), 1);

        let id = result.created.unwrap();
        let listing = result.listing.unwrap();
        assert_eq!(listing.id(), id);
        assert_eq!(listing.model(), "Pixel 7");
    }

    #[test]
    fn test_execute_transition() {
        let mut db = create_test_database();
        let id = db
            .create_listing(&create_test_details("A"), t0())
            .unwrap();

        let plan = OperationPlan::new("Test").add_action(PlanAction::Transition {
            listing: id,
            event: Event::Book,
            expected: ListingStatus::Available,
            update: ListingUpdate::booked(hold()),
        });

        let mut executor = PlanExecutor::new(&mut db);
        let result = executor.execute(&plan).unwrap();

        assert!(result.success);
        let listing = result.listing.unwrap();
        assert_eq!(listing.status(), ListingStatus::Booked);
    }

    #[test]
    fn test_execute_transition_conflict() {
        let mut db = create_test_database();
        let id = db
            .create_listing(&create_test_details("A"), t0())
            .unwrap();

        // Another caller books first.
        db.conditional_update(id, ListingStatus::Available, &ListingUpdate::booked(hold()))
            .unwrap();

        let plan = OperationPlan::new("Test").add_action(PlanAction::Transition {
            listing: id,
            event: Event::Book,
            expected: ListingStatus::Available,
            update: ListingUpdate::booked(hold()),
        });

        let mut executor = PlanExecutor::new(&mut db);
        let err = executor.execute(&plan).unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_execute_transition_not_found() {
        let mut db = create_test_database();

        let plan = OperationPlan::new("Test").add_action(PlanAction::Transition {
            listing: crate::ListingId::new(999),
            event: Event::Book,
            expected: ListingStatus::Available,
            update: ListingUpdate::booked(hold()),
        });

        let mut executor = PlanExecutor::new(&mut db);
        let err = executor.execute(&plan).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_release_expired_skips_when_hold_changed() {
        let mut db = create_test_database();
        let id = db
            .create_listing(&create_test_details("A"), t0())
            .unwrap();

        // A fresh hold with a later booking time replaced the one the
        // plan observed.
        let later = t0() + chrono::Duration::seconds(400);
        let buyer = Buyer::new("fresh@example.com", "923009998877").unwrap();
        db.conditional_update(
            id,
            ListingStatus::Available,
            &ListingUpdate::booked(Hold::new(buyer, later)),
        )
        .unwrap();

        let plan = OperationPlan::new("Test").add_action(PlanAction::ReleaseExpired {
            listing: id,
            booked_at: t0(),
        });

        // The stale release is a no-op, not an error.
        let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
        assert!(result.success);

        let listing = result.listing.unwrap();
        assert_eq!(listing.status(), ListingStatus::Booked);
        assert!(listing.hold().unwrap().is_held_by("fresh@example.com"));
    }

    #[test]
    fn test_dry_run_does_not_modify_database() {
        let mut db = create_test_database();

        let plan = OperationPlan::new("Test").add_action(PlanAction::CreateListing {
            details: create_test_details("Pixel 7"),
            created_at: t0(),
        });

        let mut executor = PlanExecutor::new(&mut db).dry_run();
        let result = executor.execute(&plan).unwrap();

        assert!(result.success);
        assert!(result.dry_run);
        assert!(result.created.is_none());

        let all =
            Database::list_listings(db.connection(), crate::database::StatusFilter::All).unwrap();
        assert!(all.is_empty());
    }

    #[test]
    fn test_execution_result_includes_warnings() {
        let mut db = create_test_database();

        let plan = OperationPlan::new("Test")
            .add_warning("Warning 1")
            .add_warning("Warning 2");

        let mut executor = PlanExecutor::new(&mut db);
        let result = executor.execute(&plan).unwrap();

        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.warnings[0], "Warning 1");
        assert!(result.listing.is_none());
    }
}
