//! Reservation operations: planning and execution.
//!
//! Every operation follows the same two-phase shape. A plan generator
//! reads the store and the clock and produces an [`OperationPlan`], a
//! description of the transitions to apply. The [`PlanExecutor`] then
//! applies the plan, re-checking each transition's expected status via
//! conditional update so concurrent callers serialize correctly.
//!
//! Plans can be inspected or run in dry-run mode before committing.

mod add;
mod book;
mod cancel;
mod executor;
mod expire;
mod payment;
mod plan;
mod resolve;

pub use add::{AddListingOptions, AddListingPlan};
pub use book::{BookOptions, BookPlan};
pub use cancel::{CancelOptions, CancelPlan};
pub use executor::{ExecutionResult, PlanExecutor};
pub use expire::{ExpiryCheckPlan, SweepOperations, SweepResult};
pub use payment::{PaymentOptions, PaymentPlan};
pub use plan::{OperationPlan, PlanAction};
pub use resolve::{ResolveOptions, ResolvePlan};
