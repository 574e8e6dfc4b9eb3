//! Listing creation planning.
//!
//! Only admins stock the shelf. The creation timestamp is stamped at
//! planning time from the injected clock.

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::identity::Caller;
use crate::listing::NewListing;

use super::plan::{OperationPlan, PlanAction};

/// Options for creating a listing.
#[derive(Debug, Clone)]
pub struct AddListingOptions {
    /// The descriptive fields of the new listing.
    pub details: NewListing,

    /// The caller creating the listing. Must be an admin.
    pub caller: Caller,
}

impl AddListingOptions {
    /// Creates new `AddListingOptions`.
    #[must_use]
    pub const fn new(details: NewListing, caller: Caller) -> Self {
        Self { details, caller }
    }
}

/// A listing creation plan generator.
pub struct AddListingPlan {
    options: AddListingOptions,
}

impl AddListingPlan {
    /// Creates a new listing creation plan with the given options.
    #[must_use]
    pub const fn new(options: AddListingOptions) -> Self {
        Self { options }
    }

    /// Builds an operation plan for this creation request.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin.
    pub fn build_plan(&self, clock: &dyn Clock) -> Result<OperationPlan> {
        if !self.options.caller.is_admin() {
            return Err(Error::Validation {
                field: "caller".into(),
                message: "creating a listing requires the admin role".into(),
            });
        }

        let plan = OperationPlan::new(format!(
            "Create listing for {}",
            self.options.details.model()
        ))
        .add_action(PlanAction::CreateListing {
            details: self.options.details.clone(),
            created_at: clock.now(),
        });

        Ok(plan)
    }
}
