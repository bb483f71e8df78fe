//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use checkout_types::{OrderRepository, PaymentGateway};

use super::handlers::{self, AppState};
use crate::CheckoutService;

/// HTTP Server for the checkout API.
pub struct HttpServer<G: PaymentGateway, R: OrderRepository> {
    state: Arc<AppState<G, R>>,
}

impl<G: PaymentGateway, R: OrderRepository> HttpServer<G, R> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: CheckoutService<G, R>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/api/orders", post(handlers::create_order::<G, R>))
            .route("/api/orders/{number}", get(handlers::get_order::<G, R>))
            .route(
                "/api/orders/{number}/payment-source",
                get(handlers::get_payment_source::<G, R>),
            )
            .route(
                "/api/orders/{number}/payments",
                post(handlers::pay_order::<G, R>),
            )
            .route(
                "/api/orders/{number}/capture",
                post(handlers::capture_order::<G, R>),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
