//! Boutique Fulfillment
//!
//! Order fulfillment service for a multilingual (English, French, Arabic)
//! boutique.
//!
//! ## Features
//! - Color names resolved across languages, with light/dark/matte/glossy modifiers
//! - Checkout from a cart into orders with one line per product and color
//! - Per-unit production progress in 20% steps
//! - Customer notices at 60% and 100%
//! - Optimistic versioning on every order write

pub mod api;
pub mod color;
pub mod config;
pub mod domain;
pub mod notify;
pub mod progress;
pub mod store;

use std::sync::Arc;

use thiserror::Error;

use crate::api::AppState;
use crate::color::{ColorResolver, ResolutionCache};
use crate::config::{Config, ConfigError};
use crate::notify::{LogNotifier, NatsNotifier, Notifier};
use crate::progress::ProgressTracker;
use crate::store::{InMemoryOrderStore, OrderStore, PgOrderStore, StoreError};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum FulfillmentError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Notification broker unavailable: {0}")]
    Broker(String),
}

pub type Result<T> = std::result::Result<T, FulfillmentError>;

/// Wire the store, notifier and resolver described by `config`.
///
/// Without `DATABASE_URL` orders live in memory; without `NATS_URL` notices
/// are only logged.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let store: Arc<dyn OrderStore> = match &config.database_url {
        Some(url) => Arc::new(PgOrderStore::connect(url).await?),
        None => {
            tracing::warn!("DATABASE_URL not set, orders are kept in memory only");
            Arc::new(InMemoryOrderStore::new())
        }
    };

    let notifier: Arc<dyn Notifier> = match &config.nats_url {
        Some(url) => {
            let client = async_nats::connect(url.as_str()).await.map_err(|e| FulfillmentError::Broker(e.to_string()))?;
            tracing::info!(subject = %config.notify_subject, "publishing progress notices to NATS");
            Arc::new(NatsNotifier::new(client, config.notify_subject.clone()))
        }
        None => {
            tracing::warn!("NATS_URL not set, progress notices are only logged");
            Arc::new(LogNotifier)
        }
    };

    let tracker = ProgressTracker::new(store.clone(), notifier)
        .with_policy(config.progress_policy)
        .with_key_language(config.key_language);
    let resolver = Arc::new(ColorResolver::with_cache(ResolutionCache::new(config.color_cache_capacity)));
    Ok(AppState { store, tracker, resolver })
}
