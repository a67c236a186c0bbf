use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{OrderStore, StoreError};
use crate::domain::aggregates::{FulfillmentProgress, Order};

/// Process-local store, used when no database is configured.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self { Self::default() }
}

fn newest_first(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by_key(|o| std::cmp::Reverse(o.created_at()));
    orders
}

fn check_version(stored: &Order, expected: u64) -> Result<(), StoreError> {
    if stored.version() != expected {
        return Err(StoreError::Conflict { id: stored.id(), expected, actual: stored.version() });
    }
    Ok(())
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(&self, order: &Order) -> Result<Order, StoreError> {
        let mut stored = order.snapshot();
        stored.set_version(1);
        self.orders.write().await.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn fetch_by_email(&self, email: &str) -> Result<Vec<Order>, StoreError> {
        let orders = self.orders.read().await;
        Ok(newest_first(orders.values().filter(|o| o.email().eq_ignore_ascii_case(email)).cloned().collect()))
    }

    async fn fetch_all(&self) -> Result<Vec<Order>, StoreError> {
        Ok(newest_first(self.orders.read().await.values().cloned().collect()))
    }

    async fn save_progress(&self, id: Uuid, progress: &FulfillmentProgress, expected_version: u64) -> Result<Order, StoreError> {
        let mut orders = self.orders.write().await;
        let stored = orders.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        check_version(stored, expected_version)?;
        stored.replace_progress(progress.clone());
        stored.set_version(expected_version + 1);
        Ok(stored.clone())
    }

    async fn replace(&self, order: &Order, expected_version: u64) -> Result<Order, StoreError> {
        let mut orders = self.orders.write().await;
        let stored = orders.get_mut(&order.id()).ok_or(StoreError::NotFound(order.id()))?;
        check_version(stored, expected_version)?;
        *stored = order.snapshot();
        stored.set_version(expected_version + 1);
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.orders.write().await.remove(&id).is_some())
    }
}
