//! Repository integration tests, run against every adapter.

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use checkout_types::{
        ChargeId, CreateOrderRequest, OrderId, OrderRepository, PaymentSource, Price, RepoError,
    };

    use crate::{MemoryRepo, Repo, build_repo};

    fn order_request(number: &str) -> CreateOrderRequest {
        CreateOrderRequest {
            number: number.to_string(),
            total: Price::new(dec!(19.99), "USD".parse().unwrap()).unwrap(),
        }
    }

    async fn creates_and_finds_order<R: OrderRepository>(repo: R) {
        let created = repo.create_order(order_request("1001")).await.unwrap();

        let fetched = repo.get_order_by_number("1001").await.unwrap().unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.number, "1001");
        assert_eq!(fetched.total.incl_tax(), dec!(19.99));
        assert_eq!(fetched.total.currency().as_str(), "USD");
    }

    async fn unknown_order_is_none<R: OrderRepository>(repo: R) {
        assert!(repo.get_order_by_number("nope").await.unwrap().is_none());
    }

    async fn duplicate_order_number_conflicts<R: OrderRepository>(repo: R) {
        repo.create_order(order_request("1001")).await.unwrap();

        let result = repo.create_order(order_request("1001")).await;

        assert!(matches!(result, Err(RepoError::Conflict(_))));
    }

    async fn payment_source_lifecycle<R: OrderRepository>(repo: R) {
        let order = repo.create_order(order_request("1001")).await.unwrap();
        let source = PaymentSource::new(order.id, ChargeId::new("ch_123"), &order.total);
        repo.add_payment_source(source.clone()).await.unwrap();

        let mut stored = repo
            .get_payment_source_for_order(order.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, source.id);
        assert_eq!(stored.reference.as_str(), "ch_123");
        assert!(stored.date_captured.is_none());

        stored.mark_captured(Utc::now());
        repo.save_payment_source(&stored).await.unwrap();

        let reloaded = repo
            .get_payment_source_for_order(order.id)
            .await
            .unwrap()
            .unwrap();
        assert!(reloaded.date_captured.is_some());
        assert_eq!(reloaded.reference.as_str(), "ch_123");
        assert_eq!(reloaded.amount_allocated, dec!(19.99));
    }

    async fn second_payment_source_conflicts<R: OrderRepository>(repo: R) {
        let order = repo.create_order(order_request("1001")).await.unwrap();
        repo.add_payment_source(PaymentSource::new(
            order.id,
            ChargeId::new("ch_1"),
            &order.total,
        ))
        .await
        .unwrap();

        let result = repo
            .add_payment_source(PaymentSource::new(
                order.id,
                ChargeId::new("ch_2"),
                &order.total,
            ))
            .await;

        assert!(matches!(result, Err(RepoError::Conflict(_))));
    }

    async fn source_for_unknown_order_is_rejected<R: OrderRepository>(repo: R) {
        let total = Price::new(dec!(5), "USD".parse().unwrap()).unwrap();
        let result = repo
            .add_payment_source(PaymentSource::new(
                OrderId::new(),
                ChargeId::new("ch_1"),
                &total,
            ))
            .await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    async fn saving_unknown_source_is_not_found<R: OrderRepository>(repo: R) {
        let order = repo.create_order(order_request("1001")).await.unwrap();
        let source = PaymentSource::new(order.id, ChargeId::new("ch_1"), &order.total);

        let result = repo.save_payment_source(&source).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // In-memory adapter
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_memory_create_and_find_order() {
        creates_and_finds_order(MemoryRepo::new()).await;
    }

    #[tokio::test]
    async fn test_memory_unknown_order() {
        unknown_order_is_none(MemoryRepo::new()).await;
    }

    #[tokio::test]
    async fn test_memory_duplicate_order() {
        duplicate_order_number_conflicts(MemoryRepo::new()).await;
    }

    #[tokio::test]
    async fn test_memory_payment_source_lifecycle() {
        payment_source_lifecycle(MemoryRepo::new()).await;
    }

    #[tokio::test]
    async fn test_memory_second_payment_source() {
        second_payment_source_conflicts(MemoryRepo::new()).await;
    }

    #[tokio::test]
    async fn test_memory_source_for_unknown_order() {
        source_for_unknown_order_is_rejected(MemoryRepo::new()).await;
    }

    #[tokio::test]
    async fn test_memory_save_unknown_source() {
        saving_unknown_source_is_not_found(MemoryRepo::new()).await;
    }

    #[tokio::test]
    async fn test_build_repo_memory_url() {
        let repo = build_repo("memory://").await.unwrap();
        assert!(matches!(repo, Repo::Memory(_)));
        payment_source_lifecycle(repo).await;
    }

    #[tokio::test]
    async fn test_build_repo_rejects_unknown_scheme() {
        assert!(build_repo("postgres://localhost/checkout").await.is_err());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // SQLite adapter
    // ─────────────────────────────────────────────────────────────────────────

    #[cfg(feature = "sqlite")]
    mod sqlite {
        use super::*;
        use crate::SqliteRepo;

        async fn setup_repo() -> SqliteRepo {
            SqliteRepo::new("sqlite::memory:").await.unwrap()
        }

        #[tokio::test]
        async fn test_sqlite_create_and_find_order() {
            creates_and_finds_order(setup_repo().await).await;
        }

        #[tokio::test]
        async fn test_sqlite_unknown_order() {
            unknown_order_is_none(setup_repo().await).await;
        }

        #[tokio::test]
        async fn test_sqlite_duplicate_order() {
            duplicate_order_number_conflicts(setup_repo().await).await;
        }

        #[tokio::test]
        async fn test_sqlite_payment_source_lifecycle() {
            payment_source_lifecycle(setup_repo().await).await;
        }

        #[tokio::test]
        async fn test_sqlite_second_payment_source() {
            second_payment_source_conflicts(setup_repo().await).await;
        }

        #[tokio::test]
        async fn test_sqlite_source_for_unknown_order() {
            source_for_unknown_order_is_rejected(setup_repo().await).await;
        }

        #[tokio::test]
        async fn test_sqlite_save_unknown_source() {
            saving_unknown_source_is_not_found(setup_repo().await).await;
        }

        #[tokio::test]
        async fn test_build_repo_sqlite_url() {
            let repo = build_repo("sqlite::memory:").await.unwrap();
            assert!(matches!(repo, Repo::Sqlite(_)));
            creates_and_finds_order(repo).await;
        }
    }
}
