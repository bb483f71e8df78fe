//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use checkout_types::{
    CreateOrderRequest, Order, OrderId, OrderRepository, PaymentSource, RepoError,
};

use crate::types::{DbOrder, DbPaymentSource};

const SCHEMA: &str = include_str!("../migrations/0001_create_orders.sql");

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Every connection to an in-memory database sees its own empty database.
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .connect_with(options)
            .await?;

        sqlx::query(SCHEMA).execute(&pool).await?;

        tracing::debug!("SQLite repository ready at {}", database_url);
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Maps constraint violations onto repository errors.
fn write_error(e: sqlx::Error, conflict: impl FnOnce() -> String) -> RepoError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return RepoError::Conflict(conflict());
        }
        if db.is_foreign_key_violation() {
            return RepoError::NotFound;
        }
    }
    RepoError::Database(e.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl OrderRepository for SqliteRepo {
    async fn create_order(&self, req: CreateOrderRequest) -> Result<Order, RepoError> {
        let order = Order::new(req.number, req.total)?;

        sqlx::query(
            r#"INSERT INTO orders (id, number, total_incl_tax, currency, created_at) VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(order.id.to_string())
        .bind(&order.number)
        .bind(order.total.incl_tax().to_string())
        .bind(order.total.currency().as_str())
        .bind(order.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, || format!("Order {} already exists", order.number)))?;

        Ok(order)
    }

    async fn get_order_by_number(&self, number: &str) -> Result<Option<Order>, RepoError> {
        let row: Option<DbOrder> = sqlx::query_as(
            r#"SELECT id, number, total_incl_tax, currency, created_at FROM orders WHERE number = ?"#,
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbOrder::into_domain).transpose()
    }

    async fn add_payment_source(
        &self,
        source: PaymentSource,
    ) -> Result<PaymentSource, RepoError> {
        sqlx::query(
            r#"INSERT INTO payment_sources (id, order_id, source_type, reference, amount_allocated, currency, date_created, date_captured)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(source.id.to_string())
        .bind(source.order_id.to_string())
        .bind(&source.source_type)
        .bind(source.reference.as_str())
        .bind(source.amount_allocated.to_string())
        .bind(source.currency.as_str())
        .bind(source.date_created.to_rfc3339())
        .bind(source.date_captured.map(|dt| dt.to_rfc3339()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            write_error(e, || {
                format!("Order {} already has a payment source", source.order_id)
            })
        })?;

        Ok(source)
    }

    async fn get_payment_source_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Option<PaymentSource>, RepoError> {
        let row: Option<DbPaymentSource> = sqlx::query_as(
            r#"SELECT id, order_id, source_type, reference, amount_allocated, currency, date_created, date_captured
               FROM payment_sources WHERE order_id = ?"#,
        )
        .bind(order_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbPaymentSource::into_domain).transpose()
    }

    async fn save_payment_source(&self, source: &PaymentSource) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"UPDATE payment_sources
               SET source_type = ?, reference = ?, amount_allocated = ?, currency = ?, date_captured = ?
               WHERE id = ?"#,
        )
        .bind(&source.source_type)
        .bind(source.reference.as_str())
        .bind(source.amount_allocated.to_string())
        .bind(source.currency.as_str())
        .bind(source.date_captured.map(|dt| dt.to_rfc3339()))
        .bind(source.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
