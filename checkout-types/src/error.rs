//! Error types for the checkout facade.

use rust_decimal::Decimal;

/// Message shown to the customer when the bank declines the card.
pub const DECLINE_MESSAGE: &str =
    "The transaction was declined by your bank - please check your bankcard details and try again.";

/// Message shown to the customer for any other gateway failure.
pub const GATEWAY_ERROR_MESSAGE: &str =
    "An error occurred when communicating with the payment gateway.";

/// Domain-level errors (business rule violations).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Amount cannot be negative")]
    NegativeAmount,

    #[error("Amount {0} cannot be represented as a gateway amount")]
    AmountOutOfRange(Decimal),

    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Failures reported by the payment gateway adapter.
///
/// The set is closed: the facade matches on it exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Card declined: {message}")]
    CardDeclined {
        code: Option<String>,
        decline_code: Option<String>,
        message: String,
    },

    #[error("Invalid request: {message}")]
    InvalidRequest {
        param: Option<String>,
        message: String,
    },

    #[error("Authentication with the gateway failed: {0}")]
    AuthenticationFailed(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Idempotency error: {0}")]
    Idempotency(String),

    #[error("Gateway API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed gateway response: {0}")]
    MalformedResponse(String),
}

/// Payment errors surfaced by the facade.
///
/// Messages are fixed and safe to show to customers; gateway detail only
/// goes to the log.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    /// The payment cannot be taken: missing card data or a declined card.
    #[error("{0}")]
    UnableToTakePayment(String),

    /// The gateway request failed for reasons other than the card.
    #[error("{0}")]
    InvalidGatewayRequest(String),
}

impl PaymentError {
    /// The bank declined the card.
    pub fn declined() -> Self {
        PaymentError::UnableToTakePayment(DECLINE_MESSAGE.to_string())
    }

    /// Any failure talking to the gateway other than a decline.
    pub fn gateway() -> Self {
        PaymentError::InvalidGatewayRequest(GATEWAY_ERROR_MESSAGE.to_string())
    }
}

/// Errors from capturing a previously authorized charge.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Capture failure: order {0} does not exist")]
    OrderNotFound(String),

    #[error("Capture failure: could not find payment source for order {0}")]
    PaymentSourceNotFound(String),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Repository(#[from] RepoError),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("{0}")]
    PaymentDeclined(String),

    #[error("{0}")]
    GatewayUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(e) => AppError::BadRequest(e.to_string()),
            RepoError::NotFound => AppError::NotFound("Resource not found".into()),
            RepoError::Conflict(e) => AppError::Conflict(e),
            RepoError::Database(e) => AppError::Internal(e),
        }
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::UnableToTakePayment(msg) => AppError::PaymentDeclined(msg),
            PaymentError::InvalidGatewayRequest(msg) => AppError::GatewayUnavailable(msg),
        }
    }
}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        match err {
            e @ (CaptureError::OrderNotFound(_) | CaptureError::PaymentSourceNotFound(_)) => {
                AppError::NotFound(e.to_string())
            }
            CaptureError::Payment(e) => e.into(),
            CaptureError::Repository(e) => e.into(),
        }
    }
}
