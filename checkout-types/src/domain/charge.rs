//! Gateway-facing charge types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::money::CurrencyCode;

/// Opaque charge identifier assigned by the gateway (`ch_...`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChargeId(String);

impl ChargeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChargeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A create-charge request in gateway terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCharge {
    /// Amount in the gateway's integer unit for `currency`
    pub amount: i64,
    pub currency: CurrencyCode,
    /// Card token or source reference
    pub source: String,
    pub description: Option<String>,
    pub metadata: BTreeMap<String, String>,
    /// Capture immediately instead of leaving the charge authorized
    pub capture: bool,
    /// Additional gateway parameters passed through untouched
    pub extra: BTreeMap<String, String>,
}

/// Charge as reported back by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayCharge {
    pub id: ChargeId,
    pub amount: i64,
    pub currency: String,
    pub captured: bool,
    #[serde(default)]
    pub status: Option<String>,
}
