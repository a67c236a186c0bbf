//! Domain events
use serde::Serialize;
use uuid::Uuid;

use crate::domain::value_objects::ProgressPercent;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum DomainEvent {
    Order(OrderEvent),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum OrderEvent {
    Created { order_id: Uuid, email: String, units: u32 },
    FlagsUpdated { order_id: Uuid, is_paid: bool, is_delivered: bool },
    UnitsRemoved { order_id: Uuid, line: usize, removed: u32, pruned_keys: Vec<String> },
    ProgressUpdated { order_id: Uuid, unit_key: String, from: ProgressPercent, to: ProgressPercent },
    ThresholdReached { order_id: Uuid, product_key: String, progress: ProgressPercent },
}

impl DomainEvent {
    /// Emit the event to the tracing subscriber.
    pub fn log(&self) {
        match self {
            Self::Order(OrderEvent::Created { order_id, email, units }) => {
                tracing::info!(%order_id, %email, units, "order created")
            }
            Self::Order(OrderEvent::FlagsUpdated { order_id, is_paid, is_delivered }) => {
                tracing::info!(%order_id, is_paid, is_delivered, "order flags updated")
            }
            Self::Order(OrderEvent::UnitsRemoved { order_id, line, removed, pruned_keys }) => {
                tracing::info!(%order_id, line, removed, pruned = pruned_keys.len(), "units removed from order")
            }
            Self::Order(OrderEvent::ProgressUpdated { order_id, unit_key, from, to }) => {
                tracing::info!(%order_id, %unit_key, %from, %to, "unit progress updated")
            }
            Self::Order(OrderEvent::ThresholdReached { order_id, product_key, progress }) => {
                tracing::info!(%order_id, %product_key, %progress, "progress threshold reached")
            }
        }
    }
}
