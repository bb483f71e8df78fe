//! Payment gateway port.

use std::collections::BTreeMap;

use crate::domain::{ChargeId, GatewayCharge, NewCharge};
use crate::error::GatewayError;

/// Remote payment gateway supporting two-phase charges.
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    /// Creates (authorizes, and optionally captures) a charge.
    async fn create_charge(&self, charge: NewCharge) -> Result<GatewayCharge, GatewayError>;

    /// Fetches an existing charge.
    async fn retrieve_charge(&self, id: &ChargeId) -> Result<GatewayCharge, GatewayError>;

    /// Captures a previously authorized charge.
    async fn capture_charge(
        &self,
        id: &ChargeId,
        extra: &BTreeMap<String, String>,
    ) -> Result<GatewayCharge, GatewayError>;
}
