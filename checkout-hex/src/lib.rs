//! # Checkout Hex
//!
//! Payment facade, checkout service and HTTP adapter.
//!
//! ## Architecture
//!
//! - `facade/` - Stripe payment facade (charge, capture, error translation)
//! - `service/` - Checkout service (orders in, payment sources out)
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! Everything is generic over `G: PaymentGateway` and `R: OrderRepository`,
//! allowing different adapters to be injected.

pub mod facade;
pub mod inbound;
pub mod service;


pub use facade::{Facade, FacadeConfig};
pub use service::CheckoutService;
