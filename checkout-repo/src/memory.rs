//! In-memory repository adapter.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use checkout_types::{
    CreateOrderRequest, Order, OrderId, OrderRepository, PaymentSource, RepoError,
};

/// Repository keeping orders and payment sources in concurrent maps.
#[derive(Default)]
pub struct MemoryRepo {
    /// Orders keyed by order number
    orders: DashMap<String, Order>,
    /// Payment sources keyed by the order they pay for
    sources: DashMap<OrderId, PaymentSource>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for MemoryRepo {
    async fn create_order(&self, req: CreateOrderRequest) -> Result<Order, RepoError> {
        let order = Order::new(req.number, req.total)?;

        match self.orders.entry(order.number.clone()) {
            Entry::Occupied(_) => Err(RepoError::Conflict(format!(
                "Order {} already exists",
                order.number
            ))),
            Entry::Vacant(slot) => {
                slot.insert(order.clone());
                Ok(order)
            }
        }
    }

    async fn get_order_by_number(&self, number: &str) -> Result<Option<Order>, RepoError> {
        Ok(self.orders.get(number).map(|o| o.value().clone()))
    }

    async fn add_payment_source(
        &self,
        source: PaymentSource,
    ) -> Result<PaymentSource, RepoError> {
        if !self.orders.iter().any(|o| o.id == source.order_id) {
            return Err(RepoError::NotFound);
        }

        match self.sources.entry(source.order_id) {
            Entry::Occupied(_) => Err(RepoError::Conflict(format!(
                "Order {} already has a payment source",
                source.order_id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(source.clone());
                Ok(source)
            }
        }
    }

    async fn get_payment_source_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Option<PaymentSource>, RepoError> {
        Ok(self.sources.get(&order_id).map(|s| s.value().clone()))
    }

    async fn save_payment_source(&self, source: &PaymentSource) -> Result<(), RepoError> {
        match self.sources.get_mut(&source.order_id) {
            Some(mut stored) if stored.id == source.id => {
                *stored = source.clone();
                Ok(())
            }
            _ => Err(RepoError::NotFound),
        }
    }
}
