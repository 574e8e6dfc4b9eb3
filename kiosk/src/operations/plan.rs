//! Plan types for reservation operations.
//!
//! This module defines the plan structures that describe what actions
//! will be taken during an operation, without actually performing them.

use chrono::{DateTime, Utc};

use crate::database::ListingUpdate;
use crate::listing::{Event, ListingId, ListingStatus, NewListing};

/// A single action to be taken during plan execution.
///
/// Each action corresponds to a specific database operation that will
/// be performed when the plan is executed.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanAction {
    /// Insert a new listing onto the shelf.
    CreateListing {
        /// The descriptive fields of the new listing.
        details: NewListing,
        /// The creation timestamp, stamped at planning time.
        created_at: DateTime<Utc>,
    },

    /// Release one specific lapsed hold.
    ///
    /// Keyed on the hold's booking time as well as the status, so a fresh
    /// hold placed between planning and execution is never released. A
    /// zero-row outcome is not a failure: the hold was already settled by
    /// another transition, and any following action re-checks the status
    /// itself.
    ReleaseExpired {
        /// The listing whose hold lapsed.
        listing: ListingId,
        /// The booking time of the lapsed hold, as observed at planning.
        booked_at: DateTime<Utc>,
    },

    /// Apply a state-machine transition via conditional update.
    ///
    /// The `expected` status is the compare half of the compare-and-set:
    /// if the listing is no longer in that status at execution time, the
    /// update affects zero rows and the executor reports a conflict.
    Transition {
        /// The listing being transitioned.
        listing: ListingId,
        /// The event driving the transition, for error reporting.
        event: Event,
        /// The status the listing must still be in.
        expected: ListingStatus,
        /// The columns to write.
        update: ListingUpdate,
    },
}

impl PlanAction {
    /// Returns a human-readable description of this action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::CreateListing { details, .. } => {
                format!(
                    "Create listing for {} at {}",
                    details.model(),
                    details.price()
                )
            }
            Self::ReleaseExpired { listing, .. } => {
                format!("Release expired hold on listing {listing}")
            }
            Self::Transition {
                listing,
                event,
                expected,
                update,
            } => {
                format!(
                    "Apply {event} to listing {listing}: {expected} -> {}",
                    update.status
                )
            }
        }
    }
}

/// A complete operation plan describing all actions to be taken.
///
/// Plans are generated during the planning phase and can be inspected,
/// logged, or executed. They include a description, a sequence of actions,
/// and any warnings that should be communicated to the user.
#[derive(Debug, Clone)]
pub struct OperationPlan {
    /// A human-readable description of the operation.
    pub description: String,

    /// The sequence of actions to perform.
    pub actions: Vec<PlanAction>,

    /// Warnings to communicate to the user.
    pub warnings: Vec<String>,
}

impl OperationPlan {
    /// Creates a new operation plan with the given description.
    ///
    /// # Examples
    ///
    /// ```
    /// use kiosk::operations::OperationPlan;
    ///
    /// let plan = OperationPlan::new("Book listing 3");
    /// assert_eq!(plan.description, "Book listing 3");
    /// assert!(plan.is_empty());
    /// ```
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an action to the plan.
    #[must_use]
    pub fn add_action(mut self, action: PlanAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a warning to the plan.
    ///
    /// # Examples
    ///
    /// ```
    /// use kiosk::operations::OperationPlan;
    ///
    /// let plan = OperationPlan::new("Test")
    ///     .add_warning("This is a warning");
    ///
    /// assert_eq!(plan.warnings.len(), 1);
    /// ```
    #[must_use]
    pub fn add_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Checks if the plan has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the number of actions in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }
}
