//! # Stripe Gateway
//!
//! `PaymentGateway` adapter for the Stripe Charges API.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use checkout_types::{ChargeId, GatewayCharge, GatewayError, NewCharge, PaymentGateway};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Stripe connection settings.
#[derive(Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl StripeConfig {
    /// Settings for the live Stripe API with the given secret key.
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"[redacted]")
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Stripe API client.
pub struct StripeClient {
    base_url: String,
    secret_key: String,
    http: Client,
}

impl StripeClient {
    /// Creates a new client.
    pub fn new(config: StripeConfig) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(Self {
            base_url: config.api_base.trim_end_matches('/').to_string(),
            secret_key: config.secret_key,
            http,
        })
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.http
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.secret_key)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.secret_key)
    }

    async fn send(&self, req: RequestBuilder) -> Result<GatewayCharge, GatewayError> {
        let resp = req
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| GatewayError::MalformedResponse(e.to_string()))
        } else {
            Err(error_from_response(status, &body))
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn create_charge(&self, charge: NewCharge) -> Result<GatewayCharge, GatewayError> {
        tracing::debug!(amount = charge.amount, currency = %charge.currency, capture = charge.capture, "creating stripe charge");
        let form = charge_form(&charge);
        self.send(self.post("/v1/charges").form(&form)).await
    }

    async fn retrieve_charge(&self, id: &ChargeId) -> Result<GatewayCharge, GatewayError> {
        tracing::debug!(charge_id = %id, "retrieving stripe charge");
        self.send(self.get(&format!("/v1/charges/{}", id))).await
    }

    async fn capture_charge(
        &self,
        id: &ChargeId,
        extra: &BTreeMap<String, String>,
    ) -> Result<GatewayCharge, GatewayError> {
        tracing::debug!(charge_id = %id, "capturing stripe charge");
        let form: Vec<(&String, &String)> = extra.iter().collect();
        self.send(self.post(&format!("/v1/charges/{}/capture", id)).form(&form))
            .await
    }
}

/// Form parameters for `POST /v1/charges`.
fn charge_form(charge: &NewCharge) -> Vec<(String, String)> {
    let mut form = vec![
        ("amount".to_string(), charge.amount.to_string()),
        (
            "currency".to_string(),
            charge.currency.as_str().to_ascii_lowercase(),
        ),
        ("source".to_string(), charge.source.clone()),
        ("capture".to_string(), charge.capture.to_string()),
    ];

    if let Some(description) = &charge.description {
        form.push(("description".to_string(), description.clone()));
    }

    for (key, value) in &charge.metadata {
        form.push((format!("metadata[{}]", key), value.clone()));
    }

    for (key, value) in &charge.extra {
        form.push((key.clone(), value.clone()));
    }

    form
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: StripeErrorBody,
}

#[derive(Deserialize, Default)]
struct StripeErrorBody {
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<String>,
    decline_code: Option<String>,
    message: Option<String>,
    param: Option<String>,
}

/// Decodes a Stripe error response into a gateway error.
fn error_from_response(status: StatusCode, body: &str) -> GatewayError {
    let err = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error)
        .unwrap_or_default();
    let message = err.message.clone().unwrap_or_else(|| body.to_string());

    match (status, err.kind.as_deref()) {
        (StatusCode::UNAUTHORIZED, _) => GatewayError::AuthenticationFailed(message),
        (StatusCode::FORBIDDEN, _) => GatewayError::PermissionDenied(message),
        (StatusCode::TOO_MANY_REQUESTS, _) => GatewayError::RateLimited(message),
        (StatusCode::PAYMENT_REQUIRED, _) | (_, Some("card_error")) => {
            GatewayError::CardDeclined {
                code: err.code,
                decline_code: err.decline_code,
                message,
            }
        }
        (_, Some("idempotency_error")) => GatewayError::Idempotency(message),
        (s, _) if s.is_client_error() => GatewayError::InvalidRequest {
            param: err.param,
            message,
        },
        (s, _) => GatewayError::Api {
            status: s.as_u16(),
            message,
        },
    }
}
