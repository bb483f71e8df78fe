//! Checkout Application Service
//!
//! The order-management side of the facade: stores orders, charges them
//! through the facade and records the resulting payment source.

use chrono::Utc;

use checkout_types::{
    AppError, CaptureRequest, ChargeRequest, CreateOrderRequest, Order, OrderRepository,
    PayOrderRequest, PaymentGateway, PaymentSource,
};

use crate::facade::Facade;

/// Application service for checkout operations.
///
/// Generic over the gateway and repository, both injected through the facade.
pub struct CheckoutService<G: PaymentGateway, R: OrderRepository> {
    facade: Facade<G, R>,
}

impl<G: PaymentGateway, R: OrderRepository> CheckoutService<G, R> {
    /// Creates a new checkout service around a facade.
    pub fn new(facade: Facade<G, R>) -> Self {
        Self { facade }
    }

    /// Returns the underlying facade.
    pub fn facade(&self) -> &Facade<G, R> {
        &self.facade
    }

    fn repo(&self) -> &R {
        self.facade.repo()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Orders
    // ─────────────────────────────────────────────────────────────────────────────

    /// Records a new order.
    pub async fn create_order(&self, req: CreateOrderRequest) -> Result<Order, AppError> {
        if req.number.trim().is_empty() {
            return Err(AppError::BadRequest("Order number cannot be empty".into()));
        }

        self.repo().create_order(req).await.map_err(Into::into)
    }

    /// Gets an order by number.
    pub async fn get_order(&self, number: &str) -> Result<Order, AppError> {
        self.repo()
            .get_order_by_number(number)
            .await
            .map_err(Into::into)
            .and_then(|opt| opt.ok_or_else(|| AppError::NotFound(format!("Order {}", number))))
    }

    /// Gets the payment source recorded for an order.
    pub async fn get_payment_source(&self, number: &str) -> Result<PaymentSource, AppError> {
        let order = self.get_order(number).await?;

        self.repo()
            .get_payment_source_for_order(order.id)
            .await
            .map_err(Into::into)
            .and_then(|opt| {
                opt.ok_or_else(|| {
                    AppError::NotFound(format!("Payment source for order {}", number))
                })
            })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Payments
    // ─────────────────────────────────────────────────────────────────────────────

    /// Charges the order total and stores the gateway reference as the
    /// order's payment source.
    ///
    /// The "already paid" check runs before the charge and is not atomic with
    /// it. Two concurrent calls for the same order can both be charged; the
    /// repository's one-source-per-order constraint then rejects the second
    /// with `Conflict` and the orphaned charge is logged with its reference.
    pub async fn pay_order(
        &self,
        number: &str,
        req: PayOrderRequest,
    ) -> Result<PaymentSource, AppError> {
        let order = self.get_order(number).await?;

        if self
            .repo()
            .get_payment_source_for_order(order.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Order {} has already been paid",
                number
            )));
        }

        let reference = self
            .facade
            .charge(ChargeRequest {
                order_number: order.number.clone(),
                total: order.total.clone(),
                card: req.card,
                currency: req.currency,
                description: req.description,
                metadata: req.metadata,
                extra: req.extra,
            })
            .await?;

        let charge_ref = reference.clone();
        let mut source = PaymentSource::new(order.id, reference, &order.total);
        if self.facade.config().charge_and_capture_in_one_step {
            source.mark_captured(Utc::now());
        }

        self.repo().add_payment_source(source).await.map_err(|e| {
            tracing::error!(
                error = %e,
                reference = %charge_ref,
                "Charge taken for order '{}' but its payment source was not saved",
                number
            );
            e.into()
        })
    }

    /// Captures the authorized charge for an order.
    pub async fn capture_order(
        &self,
        number: &str,
        req: CaptureRequest,
    ) -> Result<PaymentSource, AppError> {
        self.facade
            .capture(number, &req.extra)
            .await
            .map_err(Into::into)
    }
}
