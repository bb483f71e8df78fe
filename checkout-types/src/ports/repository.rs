//! Repository port trait.
//!
//! Orders and their payment sources are owned by the surrounding shop;
//! adapters (SQLite, in-memory) implement this trait.

use crate::domain::{Order, OrderId, PaymentSource};
use crate::dto::CreateOrderRequest;
use crate::error::RepoError;

/// Storage for orders and the payment sources attached to them.
#[async_trait::async_trait]
pub trait OrderRepository: Send + Sync + 'static {
    // ─────────────────────────────────────────────────────────────────────────────
    // Orders
    // ─────────────────────────────────────────────────────────────────────────────

    /// Stores a new order. Fails with `Conflict` if the number is taken.
    async fn create_order(&self, req: CreateOrderRequest) -> Result<Order, RepoError>;

    /// Looks up an order by its customer-facing number.
    async fn get_order_by_number(&self, number: &str) -> Result<Option<Order>, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Payment sources (one per order)
    // ─────────────────────────────────────────────────────────────────────────────

    /// Stores a new payment source. Fails with `Conflict` if the order already has one.
    async fn add_payment_source(&self, source: PaymentSource)
    -> Result<PaymentSource, RepoError>;

    /// Gets the payment source attached to an order.
    async fn get_payment_source_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Option<PaymentSource>, RepoError>;

    /// Persists changes to an existing payment source.
    async fn save_payment_source(&self, source: &PaymentSource) -> Result<(), RepoError>;
}
