//! Per-unit fulfillment tracking for admin operators.

mod board;
mod policy;
mod tracker;

pub use board::ProgressBoard;
pub use policy::ProgressPolicy;
pub use tracker::{CommitOutcome, NotificationStatus, ProgressTracker};

use thiserror::Error;
use uuid::Uuid;

use crate::domain::aggregates::OrderError;
use crate::domain::value_objects::ProgressPercent;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("Order {0} not found")]
    UnknownOrder(Uuid),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Progress cannot move back from {from} to {to}")]
    Regression { from: ProgressPercent, to: ProgressPercent },

    #[error("Unit {editing} is being edited; save or cancel it first")]
    EditLocked { editing: String },

    #[error("Unit {0} is not open for editing")]
    NotEditing(String),

    #[error("Nothing to save")]
    NothingToSave,

    /// The progress map could not be persisted. Local selection is kept.
    #[error("Failed to save progress: {0}")]
    Persistence(#[from] StoreError),
}
