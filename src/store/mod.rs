//! Order persistence.
//!
//! Every successful write bumps the order's `version`. Writes carry the
//! version the caller last read; a mismatch fails with
//! [`StoreError::Conflict`] instead of overwriting a concurrent update.

mod memory;
mod postgres;

pub use memory::InMemoryOrderStore;
pub use postgres::PgOrderStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::aggregates::{FulfillmentProgress, Order};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Order {0} not found")]
    NotFound(Uuid),

    #[error("Order {id} was modified concurrently (expected version {expected}, found {actual})")]
    Conflict { id: Uuid, expected: u64, actual: u64 },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a new order. The stored copy starts at version 1.
    async fn create(&self, order: &Order) -> Result<Order, StoreError>;

    async fn fetch(&self, id: Uuid) -> Result<Option<Order>, StoreError>;

    /// Newest first.
    async fn fetch_by_email(&self, email: &str) -> Result<Vec<Order>, StoreError>;

    /// Newest first.
    async fn fetch_all(&self) -> Result<Vec<Order>, StoreError>;

    /// Replace the whole progress map of an order.
    async fn save_progress(&self, id: Uuid, progress: &FulfillmentProgress, expected_version: u64) -> Result<Order, StoreError>;

    /// Replace the whole order (flags, lines and progress).
    async fn replace(&self, order: &Order, expected_version: u64) -> Result<Order, StoreError>;

    /// `false` when there was nothing to delete.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}
