//! # Checkout Types
//!
//! Domain types and port traits for the Stripe checkout facade.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Price, Order, PaymentSource, ChargeId)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain, repository, gateway and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    ChargeId, CurrencyCode, GatewayCharge, NewCharge, Order, OrderId, PaymentSource, Price,
    STRIPE_SOURCE_TYPE, ZERO_DECIMAL_CURRENCIES,
};
pub use dto::*;
pub use error::{
    AppError, CaptureError, DECLINE_MESSAGE, DomainError, GATEWAY_ERROR_MESSAGE, GatewayError,
    PaymentError, RepoError,
};
pub use ports::{OrderRepository, PaymentGateway};
