//! Exercises `StripeClient` against a local stand-in for the Stripe API.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use checkout_types::{ChargeId, GatewayError, NewCharge, PaymentGateway};
use stripe_gateway::{StripeClient, StripeConfig};

const SECRET: &str = "sk_test_123";

#[derive(Default)]
struct Recorded {
    forms: Mutex<Vec<HashMap<String, String>>>,
    auth: Mutex<Vec<String>>,
}

type Shared = Arc<Recorded>;

fn record(state: &Shared, headers: &HeaderMap, form: HashMap<String, String>) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    state.auth.lock().unwrap().push(auth);
    state.forms.lock().unwrap().push(form);
}

async fn create_charge(
    State(state): State<Shared>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let source = form.get("source").cloned().unwrap_or_default();
    let amount: i64 = form.get("amount").and_then(|a| a.parse().ok()).unwrap_or(0);
    let currency = form.get("currency").cloned().unwrap_or_default();
    let capture = form.get("capture").map(|c| c == "true").unwrap_or(true);
    record(&state, &headers, form);

    if source == "tok_chargeDeclined" {
        return (
            StatusCode::PAYMENT_REQUIRED,
            Json(json!({
                "error": {
                    "type": "card_error",
                    "code": "card_declined",
                    "decline_code": "generic_decline",
                    "message": "Your card was declined."
                }
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "id": "ch_123",
            "object": "charge",
            "amount": amount,
            "currency": currency,
            "captured": capture,
            "status": "succeeded"
        })),
    )
}

async fn retrieve_charge(Path(id): Path<String>) -> impl IntoResponse {
    if id != "ch_123" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": {
                    "type": "invalid_request_error",
                    "param": "id",
                    "message": format!("No such charge: '{}'", id)
                }
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "id": id,
            "amount": 1999,
            "currency": "usd",
            "captured": false,
            "status": "succeeded"
        })),
    )
}

async fn capture_charge(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    record(&state, &headers, form);
    Json(json!({
        "id": id,
        "amount": 1999,
        "currency": "usd",
        "captured": true,
        "status": "succeeded"
    }))
}

async fn spawn_stub() -> (String, Shared) {
    let state: Shared = Arc::default();
    let router = Router::new()
        .route("/v1/charges", post(create_charge))
        .route("/v1/charges/{id}", get(retrieve_charge))
        .route("/v1/charges/{id}/capture", post(capture_charge))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), state)
}

fn client(base: &str) -> StripeClient {
    StripeClient::new(
        StripeConfig::new(SECRET)
            .with_api_base(base)
            .with_timeout(Duration::from_secs(5)),
    )
    .unwrap()
}

fn new_charge(source: &str) -> NewCharge {
    NewCharge {
        amount: 1999,
        currency: "USD".parse().unwrap(),
        source: source.to_string(),
        description: None,
        metadata: BTreeMap::from([("order_number".to_string(), "1001".to_string())]),
        capture: false,
        extra: BTreeMap::new(),
    }
}

#[tokio::test]
async fn test_create_charge_sends_form_and_returns_id() {
    let (base, state) = spawn_stub().await;

    let charge = client(&base)
        .create_charge(new_charge("tok_visa"))
        .await
        .unwrap();

    assert_eq!(charge.id, ChargeId::new("ch_123"));
    assert_eq!(charge.amount, 1999);
    assert!(!charge.captured);

    let forms = state.forms.lock().unwrap();
    let form = &forms[0];
    assert_eq!(form["amount"], "1999");
    assert_eq!(form["currency"], "usd");
    assert_eq!(form["source"], "tok_visa");
    assert_eq!(form["capture"], "false");
    assert_eq!(form["metadata[order_number]"], "1001");
    assert!(!form.contains_key("description"));

    assert_eq!(state.auth.lock().unwrap()[0], format!("Bearer {}", SECRET));
}

#[tokio::test]
async fn test_declined_card_is_card_declined() {
    let (base, _state) = spawn_stub().await;

    let err = client(&base)
        .create_charge(new_charge("tok_chargeDeclined"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GatewayError::CardDeclined { ref decline_code, .. } if decline_code.as_deref() == Some("generic_decline")
    ));
}

#[tokio::test]
async fn test_retrieve_then_capture() {
    let (base, state) = spawn_stub().await;
    let stripe = client(&base);
    let id = ChargeId::new("ch_123");

    let charge = stripe.retrieve_charge(&id).await.unwrap();
    assert!(!charge.captured);

    let extra = BTreeMap::from([("amount".to_string(), "1000".to_string())]);
    let captured = stripe.capture_charge(&charge.id, &extra).await.unwrap();

    assert!(captured.captured);
    assert_eq!(state.forms.lock().unwrap()[0]["amount"], "1000");
}

#[tokio::test]
async fn test_retrieve_unknown_charge_is_invalid_request() {
    let (base, _state) = spawn_stub().await;

    let err = client(&base)
        .retrieve_charge(&ChargeId::new("ch_missing"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GatewayError::InvalidRequest { ref param, .. } if param.as_deref() == Some("id")
    ));
}

#[tokio::test]
async fn test_unreachable_gateway_is_network_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr))
        .create_charge(new_charge("tok_visa"))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Network(_)));
}
