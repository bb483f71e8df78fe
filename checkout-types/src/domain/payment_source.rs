//! Payment source: links an order to its gateway charge.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::charge::ChargeId;
use super::money::{CurrencyCode, Price};
use super::order::OrderId;

/// Source type recorded for charges taken through Stripe.
pub const STRIPE_SOURCE_TYPE: &str = "Stripe";

/// Persisted record of how an order was paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSource {
    pub id: Uuid,
    pub order_id: OrderId,
    pub source_type: String,
    /// Gateway charge reference
    pub reference: ChargeId,
    pub amount_allocated: Decimal,
    pub currency: CurrencyCode,
    pub date_created: DateTime<Utc>,
    /// Set once the charge has been captured
    pub date_captured: Option<DateTime<Utc>>,
}

impl PaymentSource {
    /// Records a fresh Stripe charge against an order.
    pub fn new(order_id: OrderId, reference: ChargeId, allocated: &Price) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            source_type: STRIPE_SOURCE_TYPE.to_string(),
            reference,
            amount_allocated: allocated.incl_tax(),
            currency: allocated.currency().clone(),
            date_created: Utc::now(),
            date_captured: None,
        }
    }

    pub fn is_captured(&self) -> bool {
        self.date_captured.is_some()
    }

    pub fn mark_captured(&mut self, at: DateTime<Utc>) {
        self.date_captured = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_source_is_not_captured() {
        let total = Price::new(dec!(19.99), "USD".parse().unwrap()).unwrap();
        let source = PaymentSource::new(OrderId::new(), ChargeId::new("ch_123"), &total);

        assert_eq!(source.source_type, "Stripe");
        assert_eq!(source.amount_allocated, dec!(19.99));
        assert!(!source.is_captured());
    }

    #[test]
    fn test_mark_captured_keeps_reference() {
        let total = Price::new(dec!(1500), "JPY".parse().unwrap()).unwrap();
        let mut source = PaymentSource::new(OrderId::new(), ChargeId::new("ch_456"), &total);

        source.mark_captured(Utc::now());

        assert!(source.is_captured());
        assert_eq!(source.reference.as_str(), "ch_456");
    }
}
