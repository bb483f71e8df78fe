//! Database row types and their conversion into domain models.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use checkout_types::{ChargeId, CurrencyCode, Order, OrderId, PaymentSource, Price, RepoError};

// ─────────────────────────────────────────────────────────────────────────────
// Database row structs (derive FromRow for automatic mapping)
// ─────────────────────────────────────────────────────────────────────────────

/// Order row from database.
#[derive(FromRow)]
pub struct DbOrder {
    pub id: String,
    pub number: String,
    pub total_incl_tax: String,
    pub currency: String,
    pub created_at: String,
}

/// Payment source row from database.
#[derive(FromRow)]
pub struct DbPaymentSource {
    pub id: String,
    pub order_id: String,
    pub source_type: String,
    pub reference: String,
    pub amount_allocated: String,
    pub currency: String,
    pub date_created: String,
    pub date_captured: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Column parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

fn parse_uuid(s: &str) -> Result<Uuid, RepoError> {
    Uuid::parse_str(s).map_err(|e| RepoError::Database(format!("Invalid UUID {}: {}", s, e)))
}

fn parse_decimal(s: &str) -> Result<Decimal, RepoError> {
    Decimal::from_str(s).map_err(|e| RepoError::Database(format!("Invalid decimal {}: {}", s, e)))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepoError::Database(format!("Invalid timestamp {}: {}", s, e)))
}

fn parse_currency(s: &str) -> Result<CurrencyCode, RepoError> {
    s.parse().map_err(RepoError::Domain)
}

impl DbOrder {
    pub fn into_domain(self) -> Result<Order, RepoError> {
        let total = Price::new(
            parse_decimal(&self.total_incl_tax)?,
            parse_currency(&self.currency)?,
        )?;

        Ok(Order::from_parts(
            OrderId::from_uuid(parse_uuid(&self.id)?),
            self.number,
            total,
            parse_timestamp(&self.created_at)?,
        ))
    }
}

impl DbPaymentSource {
    pub fn into_domain(self) -> Result<PaymentSource, RepoError> {
        Ok(PaymentSource {
            id: parse_uuid(&self.id)?,
            order_id: OrderId::from_uuid(parse_uuid(&self.order_id)?),
            source_type: self.source_type,
            reference: ChargeId::new(self.reference),
            amount_allocated: parse_decimal(&self.amount_allocated)?,
            currency: parse_currency(&self.currency)?,
            date_created: parse_timestamp(&self.date_created)?,
            date_captured: self
                .date_captured
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
        })
    }
}
