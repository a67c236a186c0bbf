//! Customer notifications for progress thresholds.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::value_objects::ProgressPercent;

/// Payload sent when a unit reaches 60% or 100%.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressNotice {
    pub order_id: Uuid,
    pub email: String,
    /// `productId|colorName`, without the occurrence index.
    pub product_key: String,
    pub progress: ProgressPercent,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Failed to encode notice: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to publish notice: {0}")]
    Publish(String),

    /// No broker is configured, so nothing was sent.
    #[error("No notification broker configured")]
    Unconfigured,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: &ProgressNotice) -> Result<(), NotifyError>;
}

/// Publishes notices as JSON on a NATS subject for the mailer to pick up.
#[derive(Clone)]
pub struct NatsNotifier {
    client: async_nats::Client,
    subject: String,
}

impl NatsNotifier {
    pub fn new(client: async_nats::Client, subject: impl Into<String>) -> Self {
        Self { client, subject: subject.into() }
    }
}

#[async_trait]
impl Notifier for NatsNotifier {
    async fn notify(&self, notice: &ProgressNotice) -> Result<(), NotifyError> {
        let payload = serde_json::to_vec(notice)?;
        self.client
            .publish(self.subject.clone(), payload.into())
            .await
            .map_err(|e| NotifyError::Publish(e.to_string()))?;
        // Publish only buffers; flush before reporting success.
        self.client.flush().await.map_err(|e| NotifyError::Publish(e.to_string()))?;
        tracing::info!(order_id = %notice.order_id, product_key = %notice.product_key, progress = %notice.progress, subject = %self.subject, "progress notice published");
        Ok(())
    }
}

/// Stand-in when no broker is configured: logs the notice and reports
/// [`NotifyError::Unconfigured`], since the customer was not reached.
#[derive(Clone, Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notice: &ProgressNotice) -> Result<(), NotifyError> {
        tracing::warn!(order_id = %notice.order_id, email = %notice.email, product_key = %notice.product_key, progress = %notice.progress, "no notification broker configured, notice not delivered");
        Err(NotifyError::Unconfigured)
    }
}
