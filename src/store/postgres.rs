use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use uuid::Uuid;

use super::{OrderStore, StoreError};
use crate::domain::aggregates::{FulfillmentProgress, Order};

/// Orders as JSONB documents; `version` lives in its own column.
#[derive(Debug, Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    document: Json<Order>,
    version: i64,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        let mut order = row.document.0;
        order.set_version(u64::try_from(row.version).unwrap_or_default());
        order
    }
}

fn db_version(version: u64) -> i64 { i64::try_from(version).unwrap_or(i64::MAX) }

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self { Self { pool } }

    /// Connect and bring the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new().max_connections(10).connect(database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self::new(pool))
    }

    /// Explains why a version-guarded update matched no row.
    async fn rejected_write(&self, id: Uuid, expected: u64) -> StoreError {
        match sqlx::query_scalar::<_, i64>("SELECT version FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
        {
            Ok(Some(actual)) => StoreError::Conflict { id, expected, actual: u64::try_from(actual).unwrap_or_default() },
            Ok(None) => StoreError::NotFound(id),
            Err(e) => StoreError::Database(e),
        }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn create(&self, order: &Order) -> Result<Order, StoreError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "INSERT INTO orders (id, email, document, version, created_at, updated_at) VALUES ($1, $2, $3, 1, $4, NOW()) RETURNING document, version",
        )
        .bind(order.id())
        .bind(order.email())
        .bind(Json(order.snapshot()))
        .bind(order.created_at())
        .fetch_one(&self.pool)
        .await?;
        tracing::debug!(order_id = %order.id(), "order inserted");
        Ok(row.into())
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query_as::<_, OrderRow>("SELECT document, version FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Order::from))
    }

    async fn fetch_by_email(&self, email: &str) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query_as::<_, OrderRow>("SELECT document, version FROM orders WHERE lower(email) = lower($1) ORDER BY created_at DESC")
            .bind(email)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn fetch_all(&self) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query_as::<_, OrderRow>("SELECT document, version FROM orders ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn save_progress(&self, id: Uuid, progress: &FulfillmentProgress, expected_version: u64) -> Result<Order, StoreError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "UPDATE orders SET document = jsonb_set(jsonb_set(document, '{productProgress}', $2), '{updatedAt}', to_jsonb(NOW())), \
             version = version + 1, updated_at = NOW() WHERE id = $1 AND version = $3 RETURNING document, version",
        )
        .bind(id)
        .bind(Json(progress))
        .bind(db_version(expected_version))
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => Ok(row.into()),
            None => Err(self.rejected_write(id, expected_version).await),
        }
    }

    async fn replace(&self, order: &Order, expected_version: u64) -> Result<Order, StoreError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "UPDATE orders SET document = $2, email = $3, version = version + 1, updated_at = NOW() \
             WHERE id = $1 AND version = $4 RETURNING document, version",
        )
        .bind(order.id())
        .bind(Json(order.snapshot()))
        .bind(order.email())
        .bind(db_version(expected_version))
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => Ok(row.into()),
            None => Err(self.rejected_write(order.id(), expected_version).await),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
