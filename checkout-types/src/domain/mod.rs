//! Domain models for the checkout facade.

pub mod charge;
pub mod money;
pub mod order;
pub mod payment_source;

pub use charge::{ChargeId, GatewayCharge, NewCharge};
pub use money::{CurrencyCode, Price, ZERO_DECIMAL_CURRENCIES};
pub use order::{Order, OrderId};
pub use payment_source::{PaymentSource, STRIPE_SOURCE_TYPE};
