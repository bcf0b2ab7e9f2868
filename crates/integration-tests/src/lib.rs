//! Integration tests for Güzel.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p guzel-integration-tests
//! ```
//!
//! Every test starts its own storefront on an ephemeral local port, and,
//! when it needs one, a fake Allpay endpoint that records what it receives.
//! Nothing external is required.
//!
//! # Test Categories
//!
//! - `catalog_api` - Health, catalog browsing, response headers
//! - `shopper_api` - Session cart and wishlist
//! - `checkout_flow` - Checkout, payment webhook, order lookup, promo, rate limits

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};

use axum::{Json, Router, extract::State, routing::post};
use guzel_storefront::config::AllpayConfig;
use guzel_storefront::{AppState, StorefrontConfig, app};
use reqwest::Client;
use secrecy::SecretString;
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;
use url::Url;

/// API key shared by the storefront under test and the fake provider.
pub const TEST_API_KEY: &str = "test-allpay-key-4c9e71b2d8a5f036";

/// Login the storefront presents to the fake provider.
pub const TEST_LOGIN: &str = "guzel-test";

/// How the fake provider answers payment requests.
#[derive(Debug, Clone)]
pub enum ProviderMode {
    /// Answer with a payment page URL.
    Accept,
    /// Answer with an `error` and no URL.
    Refuse(String),
}

#[derive(Clone)]
struct ProviderState {
    mode: ProviderMode,
    received: Arc<Mutex<Vec<Map<String, Value>>>>,
}

/// A fake Allpay endpoint.
pub struct FakeAllpay {
    pub url: Url,
    received: Arc<Mutex<Vec<Map<String, Value>>>>,
}

impl FakeAllpay {
    /// Start a fake provider on an ephemeral port.
    pub async fn start(mode: ProviderMode) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = ProviderState {
            mode,
            received: Arc::clone(&received),
        };
        let router = Router::new()
            .route("/api", post(create_payment))
            .with_state(state);

        let addr = serve(router).await;
        let url = Url::parse(&format!("http://{addr}/api")).expect("valid fake provider URL");
        Self { url, received }
    }

    /// Payment requests received so far.
    #[must_use]
    pub fn received(&self) -> Vec<Map<String, Value>> {
        self.received.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Storefront-side configuration pointing at this provider.
    #[must_use]
    pub fn config(&self) -> AllpayConfig {
        AllpayConfig {
            login: TEST_LOGIN.to_string(),
            api_key: SecretString::from(TEST_API_KEY),
            api_url: self.url.clone(),
        }
    }
}

async fn create_payment(
    State(state): State<ProviderState>,
    Json(body): Json<Map<String, Value>>,
) -> Json<Value> {
    let order_id = body
        .get("order_id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if let Ok(mut received) = state.received.lock() {
        received.push(body);
    }

    match state.mode {
        ProviderMode::Accept => Json(json!({
            "payment_url": format!("https://pay.example.test/checkout/{order_id}"),
        })),
        ProviderMode::Refuse(message) => Json(json!({ "error": message })),
    }
}

/// A storefront running on an ephemeral port.
pub struct TestStorefront {
    pub base_url: String,
    pub state: AppState,
    /// Client with a cookie jar, so it keeps one session.
    pub client: Client,
}

impl TestStorefront {
    /// Start a storefront without payment configuration or rate limits.
    pub async fn start() -> Self {
        Self::start_with(None, false).await
    }

    /// Start a storefront talking to `provider`.
    pub async fn with_provider(provider: &FakeAllpay) -> Self {
        Self::start_with(Some(provider.config()), false).await
    }

    /// Start a storefront with explicit payment and rate-limit settings.
    pub async fn start_with(allpay: Option<AllpayConfig>, rate_limit: bool) -> Self {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("listener has an address");
        let base_url = format!("http://{addr}");

        let config = test_config(addr, &base_url, allpay, rate_limit);
        let state = AppState::new(config).expect("Failed to build application state");
        let service = app(state.clone()).into_make_service_with_connect_info::<SocketAddr>();
        tokio::spawn(async move {
            let _ = axum::serve(listener, service).await;
        });

        Self {
            base_url,
            state,
            client: client(),
        }
    }

    /// Absolute URL for a path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a path and decode the JSON body.
    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed");
        decode(response).await
    }

    /// POST a JSON body and decode the JSON answer.
    pub async fn post_json(&self, path: &str, body: &Value) -> (u16, Value) {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("POST request failed");
        decode(response).await
    }
}

/// Configuration for an in-process storefront.
#[must_use]
pub fn test_config(
    addr: SocketAddr,
    base_url: &str,
    allpay: Option<AllpayConfig>,
    rate_limit: bool,
) -> StorefrontConfig {
    StorefrontConfig {
        host: addr.ip(),
        port: addr.port(),
        base_url: base_url.to_string(),
        rate_limit,
        allpay,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// HTTP client with a cookie jar.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

async fn decode(response: reqwest::Response) -> (u16, Value) {
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("Failed to bind fake provider");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// A valid shipping address.
#[must_use]
pub fn shipping_address(email: &str) -> Value {
    json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": email,
        "phone": "555-0100",
        "address1": "1 Analytical Way",
        "city": "Brooklyn",
        "state": "NY",
        "zipCode": "11201",
        "country": "US"
    })
}
