//! # Checkout Repository
//!
//! Concrete repository implementations (adapters) for the checkout facade.
//! This crate provides the storage adapters that implement the `OrderRepository` port.

use async_trait::async_trait;
use checkout_types::{
    CreateOrderRequest, Order, OrderId, OrderRepository, PaymentSource, RepoError,
};

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
mod types;

#[cfg(test)]
mod repo_tests;

pub use memory::MemoryRepo;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepo;

/// Repository selected at startup from the database URL.
pub enum Repo {
    Memory(MemoryRepo),
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteRepo),
}

/// Build and initialize a repository from a database URL.
///
/// # Examples
///
/// ```ignore
/// // Process-local storage, lost on exit
/// let repo = build_repo("memory://").await?;
///
/// // SQLite (with `sqlite` feature)
/// let repo = build_repo("sqlite://checkout.db?mode=rwc").await?;
/// ```
pub async fn build_repo(database_url: &str) -> anyhow::Result<Repo> {
    if database_url.starts_with("memory:") {
        return Ok(Repo::Memory(MemoryRepo::new()));
    }

    #[cfg(feature = "sqlite")]
    {
        if database_url.starts_with("sqlite:") {
            return Ok(Repo::Sqlite(SqliteRepo::new(database_url).await?));
        }
    }

    anyhow::bail!("Unsupported database URL: {}", database_url)
}

// ─────────────────────────────────────────────────────────────────────────────
// Implement OrderRepository for Repo (delegation)
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! delegate {
    ($self:ident, $repo:ident => $call:expr) => {
        match $self {
            Repo::Memory($repo) => $call,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite($repo) => $call,
        }
    };
}

#[async_trait]
impl OrderRepository for Repo {
    async fn create_order(&self, req: CreateOrderRequest) -> Result<Order, RepoError> {
        delegate!(self, repo => repo.create_order(req).await)
    }

    async fn get_order_by_number(&self, number: &str) -> Result<Option<Order>, RepoError> {
        delegate!(self, repo => repo.get_order_by_number(number).await)
    }

    async fn add_payment_source(
        &self,
        source: PaymentSource,
    ) -> Result<PaymentSource, RepoError> {
        delegate!(self, repo => repo.add_payment_source(source).await)
    }

    async fn get_payment_source_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Option<PaymentSource>, RepoError> {
        delegate!(self, repo => repo.get_payment_source_for_order(order_id).await)
    }

    async fn save_payment_source(&self, source: &PaymentSource) -> Result<(), RepoError> {
        delegate!(self, repo => repo.save_payment_source(source).await)
    }
}
