//! Order domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::Price;
use crate::error::DomainError;

/// Unique identifier for an Order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Creates a new random OrderId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an OrderId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for OrderId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A placed order, identified to customers by its `number`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Customer-facing order number, unique across orders
    pub number: String,
    /// Amount to charge, tax included
    pub total: Price,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new order.
    ///
    /// # Validation
    /// - Number cannot be empty
    pub fn new(number: String, total: Price) -> Result<Self, DomainError> {
        let number = number.trim().to_string();
        if number.is_empty() {
            return Err(DomainError::ValidationError(
                "Order number cannot be empty".into(),
            ));
        }

        Ok(Self {
            id: OrderId::new(),
            number,
            total,
            created_at: Utc::now(),
        })
    }

    /// Reconstructs an order from stored parts (used by repositories).
    pub fn from_parts(id: OrderId, number: String, total: Price, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            number,
            total,
            created_at,
        }
    }
}
