//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use checkout_types::{
    AppError, CaptureRequest, CreateOrderRequest, OrderRepository, PayOrderRequest,
    PaymentGateway,
};

use crate::CheckoutService;

/// Application state shared across handlers.
pub struct AppState<G: PaymentGateway, R: OrderRepository> {
    pub service: CheckoutService<G, R>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::PaymentDeclined(msg) => (StatusCode::PAYMENT_REQUIRED, msg.clone()),
            AppError::GatewayUnavailable(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Record a new order.
#[tracing::instrument(skip(state, req), fields(order_number = %req.number))]
pub async fn create_order<G: PaymentGateway, R: OrderRepository>(
    State(state): State<Arc<AppState<G, R>>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state.service.create_order(req).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Get order by number.
#[tracing::instrument(skip(state))]
pub async fn get_order<G: PaymentGateway, R: OrderRepository>(
    State(state): State<Arc<AppState<G, R>>>,
    Path(number): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state.service.get_order(&number).await?;
    Ok(Json(order))
}

/// Get the payment source recorded for an order.
#[tracing::instrument(skip(state))]
pub async fn get_payment_source<G: PaymentGateway, R: OrderRepository>(
    State(state): State<Arc<AppState<G, R>>>,
    Path(number): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let source = state.service.get_payment_source(&number).await?;
    Ok(Json(source))
}

/// Charge an order through the gateway.
#[tracing::instrument(skip(state, req))]
pub async fn pay_order<G: PaymentGateway, R: OrderRepository>(
    State(state): State<Arc<AppState<G, R>>>,
    Path(number): Path<String>,
    Json(req): Json<PayOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let source = state.service.pay_order(&number, req).await?;
    Ok((StatusCode::CREATED, Json(source)))
}

/// Capture the authorized charge for an order.
///
/// The JSON body is optional; an empty body captures the full amount.
#[tracing::instrument(skip(state, body))]
pub async fn capture_order<G: PaymentGateway, R: OrderRepository>(
    State(state): State<Arc<AppState<G, R>>>,
    Path(number): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let req: CaptureRequest = if body.is_empty() {
        CaptureRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid capture request: {}", e)))?
    };
    let source = state.service.capture_order(&number, req).await?;
    Ok(Json(source))
}
