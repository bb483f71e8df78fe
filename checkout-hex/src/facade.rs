//! Stripe Payment Facade
//!
//! Turns order totals into gateway charges, captures authorized charges, and
//! collapses gateway failures into the two customer-facing payment errors.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{error, info, warn};

use checkout_types::{
    CaptureError, ChargeId, ChargeRequest, GatewayError, NewCharge, OrderRepository,
    PaymentError, PaymentGateway, PaymentSource,
};

/// Charge parameters owned by the facade; extra options may not override them.
const RESERVED_CHARGE_PARAMS: [&str; 7] = [
    "amount",
    "currency",
    "source",
    "card",
    "description",
    "metadata",
    "capture",
];

/// Settings fixed for the lifetime of a facade.
#[derive(Debug, Clone, Default)]
pub struct FacadeConfig {
    /// Capture at authorization time instead of waiting for `capture`
    pub charge_and_capture_in_one_step: bool,
}

/// Payment facade over a single gateway.
///
/// Generic over the gateway and the order store so either can be swapped for
/// an in-memory stand-in.
pub struct Facade<G: PaymentGateway, R: OrderRepository> {
    config: FacadeConfig,
    gateway: G,
    repo: R,
}

impl<G: PaymentGateway, R: OrderRepository> Facade<G, R> {
    pub fn new(config: FacadeConfig, gateway: G, repo: R) -> Self {
        Self {
            config,
            gateway,
            repo,
        }
    }

    pub fn config(&self) -> &FacadeConfig {
        &self.config
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Authorizes a charge for an order total and returns the gateway reference.
    ///
    /// The charge is only captured right away when
    /// `charge_and_capture_in_one_step` is set; otherwise call [`Facade::capture`]
    /// later.
    #[tracing::instrument(skip(self, req), fields(order_number = %req.order_number))]
    pub async fn charge(&self, req: ChargeRequest) -> Result<ChargeId, PaymentError> {
        let order_number = req.order_number;
        info!("Authorizing payment on order '{}' via stripe", order_number);

        let Some(card) = req.card.filter(|card| !card.trim().is_empty()) else {
            error!(
                "Card info not found (no stripe token) for order '{}' while trying to charge stripe",
                order_number
            );
            return Err(PaymentError::UnableToTakePayment("Invalid card info".into()));
        };

        let amount = req.total.gateway_amount().map_err(|e| {
            error!(error = %e, "Unchargeable total {} for order '{}'", req.total, order_number);
            PaymentError::gateway()
        })?;

        let metadata = match req.metadata {
            Some(metadata) if !metadata.is_empty() => metadata,
            _ => BTreeMap::from([("order_number".to_string(), order_number.clone())]),
        };

        let charge = NewCharge {
            amount,
            currency: req.currency.unwrap_or_else(|| req.total.currency().clone()),
            source: card,
            description: req.description,
            metadata,
            capture: self.config.charge_and_capture_in_one_step,
            extra: charge_extras(req.extra),
        };

        match self.gateway.create_charge(charge).await {
            Ok(charge) => {
                info!("Payment authorized for order {} via stripe.", order_number);
                Ok(charge.id)
            }
            Err(err) => Err(payment_error(&order_number, err)),
        }
    }

    /// Captures the charge previously authorized for an order and stamps the
    /// payment source with the capture time.
    #[tracing::instrument(skip(self, extra))]
    pub async fn capture(
        &self,
        order_number: &str,
        extra: &BTreeMap<String, String>,
    ) -> Result<PaymentSource, CaptureError> {
        info!("Initiating payment capture for order '{}' via stripe", order_number);

        let Some(order) = self.repo.get_order_by_number(order_number).await? else {
            error!("Order Error for order: '{}'", order_number);
            return Err(CaptureError::OrderNotFound(order_number.to_string()));
        };

        let Some(mut source) = self.repo.get_payment_source_for_order(order.id).await? else {
            error!("Source Error for order: '{}'", order_number);
            return Err(CaptureError::PaymentSourceNotFound(order_number.to_string()));
        };

        let charge = self
            .gateway
            .retrieve_charge(&source.reference)
            .await
            .map_err(|e| payment_error(order_number, e))?;

        self.gateway
            .capture_charge(&charge.id, extra)
            .await
            .map_err(|e| payment_error(order_number, e))?;

        source.mark_captured(Utc::now());
        self.repo.save_payment_source(&source).await?;

        info!(
            "payment for order '{}' (id:{}) was captured via stripe (stripe_ref:{})",
            order.number, order.id, source.reference
        );
        Ok(source)
    }
}

/// Drops extra options that would shadow a core charge parameter.
fn charge_extras(extra: BTreeMap<String, String>) -> BTreeMap<String, String> {
    extra
        .into_iter()
        .filter(|(key, _)| {
            let reserved =
                RESERVED_CHARGE_PARAMS.contains(&key.as_str()) || key.starts_with("metadata[");
            if reserved {
                warn!("Ignoring extra charge option '{}'", key);
            }
            !reserved
        })
        .collect()
}

/// Logs a gateway failure and converts it into the customer-facing error.
///
/// Gateway detail stays in the log; callers only see fixed messages.
fn payment_error(order_number: &str, err: GatewayError) -> PaymentError {
    match err {
        GatewayError::CardDeclined { .. } => {
            error!(error = %err, "Card Error for order: '{}'", order_number);
            PaymentError::declined()
        }
        GatewayError::InvalidRequest { .. }
        | GatewayError::AuthenticationFailed(_)
        | GatewayError::PermissionDenied(_)
        | GatewayError::RateLimited(_)
        | GatewayError::Idempotency(_)
        | GatewayError::Api { .. }
        | GatewayError::Network(_)
        | GatewayError::MalformedResponse(_) => {
            error!(error = %err, "Stripe Error for order: '{}'", order_number);
            PaymentError::gateway()
        }
    }
}
