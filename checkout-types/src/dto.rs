//! Data Transfer Objects (DTOs) for requests and responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{CurrencyCode, Price};

// ─────────────────────────────────────────────────────────────────────────────
// Order DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to record a new order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Customer-facing order number
    pub number: String,
    /// Tax-inclusive total
    pub total: Price,
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the facade needs to authorize a charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeRequest {
    /// Order the charge belongs to (logged and used as default metadata)
    pub order_number: String,
    pub total: Price,
    /// Card token; a missing or blank token is rejected before any gateway call
    #[serde(default)]
    pub card: Option<String>,
    /// Currency to charge in; falls back to the currency of `total`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    /// Extra gateway parameters merged into the request
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl ChargeRequest {
    /// Creates a request with no optional fields set.
    pub fn new(order_number: impl Into<String>, total: Price, card: Option<String>) -> Self {
        Self {
            order_number: order_number.into(),
            total,
            card,
            currency: None,
            description: None,
            metadata: None,
            extra: BTreeMap::new(),
        }
    }
}

/// Request to pay for a stored order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayOrderRequest {
    #[serde(default)]
    pub card: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

/// Request to capture an authorized charge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureRequest {
    /// Extra gateway parameters for the capture call (e.g. a partial `amount`)
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}
