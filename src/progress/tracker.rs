use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use super::{ProgressError, ProgressPolicy};
use crate::domain::aggregates::Order;
use crate::domain::value_objects::{Language, ProgressPercent, UnitKey};
use crate::notify::{Notifier, NotifyError, ProgressNotice};
use crate::store::{OrderStore, StoreError};

/// What happened to the customer notification after a successful save.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum NotificationStatus {
    /// The new value is not a notification threshold.
    NotRequired,
    Sent,
    /// No broker is configured; progress is saved and nobody was notified.
    Skipped,
    /// Progress is saved; only the notice was lost.
    Failed(String),
}

#[derive(Clone, Debug)]
pub struct CommitOutcome {
    pub order: Order,
    pub notification: NotificationStatus,
}

/// Persists unit progress and notifies customers at 60% and 100%.
///
/// Saving and notifying are separate steps: a notification failure is
/// reported in the outcome and never undoes the saved progress. Nothing is
/// retried automatically.
#[derive(Clone)]
pub struct ProgressTracker {
    store: Arc<dyn OrderStore>,
    notifier: Arc<dyn Notifier>,
    policy: ProgressPolicy,
    language: Language,
}

impl ProgressTracker {
    pub fn new(store: Arc<dyn OrderStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier, policy: ProgressPolicy::default(), language: Language::default() }
    }

    pub fn with_policy(mut self, policy: ProgressPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Language of the color names inside unit keys.
    pub fn with_key_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn policy(&self) -> ProgressPolicy { self.policy }
    pub fn key_language(&self) -> Language { self.language }

    /// Units of an order with their current progress.
    pub fn units(&self, order: &Order) -> Vec<(UnitKey, ProgressPercent)> {
        order
            .unit_keys(self.language)
            .into_iter()
            .map(|key| {
                let progress = order.progress_of(&key);
                (key, progress)
            })
            .collect()
    }

    /// Write `value` for one unit and persist the order's full progress map.
    ///
    /// With `expected_version`, the write is refused when the order changed
    /// since the caller read it.
    pub async fn commit_progress(
        &self,
        order_id: Uuid,
        key: &UnitKey,
        value: ProgressPercent,
        expected_version: Option<u64>,
    ) -> Result<CommitOutcome, ProgressError> {
        let mut order = self.store.fetch(order_id).await?.ok_or(ProgressError::UnknownOrder(order_id))?;
        let version = order.version();
        if let Some(expected) = expected_version.filter(|v| *v != version) {
            return Err(StoreError::Conflict { id: order_id, expected, actual: version }.into());
        }

        self.policy.check(order.progress_of(key), value)?;
        order.set_progress(key, value, self.language)?;

        let saved = match self.store.save_progress(order_id, order.progress(), version).await {
            Ok(saved) => saved,
            Err(e) => {
                tracing::error!(%order_id, unit_key = %key, error = %e, "failed to save unit progress");
                return Err(e.into());
            }
        };
        for event in order.take_events() {
            event.log();
        }

        let notification = if value.triggers_notification() {
            self.send_notice(&saved, key, value).await
        } else {
            NotificationStatus::NotRequired
        };
        Ok(CommitOutcome { order: saved, notification })
    }

    async fn send_notice(&self, order: &Order, key: &UnitKey, value: ProgressPercent) -> NotificationStatus {
        let notice = ProgressNotice {
            order_id: order.id(),
            email: order.email().to_string(),
            product_key: key.notification_key(),
            progress: value,
        };
        match self.notifier.notify(&notice).await {
            Ok(()) => NotificationStatus::Sent,
            Err(NotifyError::Unconfigured) => NotificationStatus::Skipped,
            Err(e) => {
                tracing::warn!(order_id = %order.id(), product_key = %notice.product_key, error = %e, "progress saved but notification failed");
                NotificationStatus::Failed(e.to_string())
            }
        }
    }
}
