//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The facade depends on these traits, not concrete implementations.

mod gateway;
mod repository;

pub use gateway::PaymentGateway;
pub use repository::OrderRepository;
