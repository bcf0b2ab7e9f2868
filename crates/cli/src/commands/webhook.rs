//! Send a signed payment notification to a running storefront.
//!
//! Useful for completing test orders locally without a real Allpay payment.
//!
//! # Usage
//!
//! ```bash
//! guzel-cli webhook --order-id 6f1c... --status 1 --url http://localhost:3000/api/webhook
//! ```

use std::time::Duration;

use guzel_core::signature::{self, SIGN_FIELD};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value, json};

use super::CliError;

const TIMEOUT: Duration = Duration::from_secs(10);

/// Storefront's answer to a notification.
#[derive(Debug)]
pub struct Delivery {
    pub status: u16,
    pub body: String,
}

/// Build a signed notification payload.
#[must_use]
pub fn payload(order_id: &str, status: i64, api_key: &SecretString) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("order_id".to_string(), json!(order_id));
    payload.insert("status".to_string(), json!(status));
    let sign = signature::sign(&payload, api_key.expose_secret());
    payload.insert(SIGN_FIELD.to_string(), Value::String(sign));
    payload
}

/// POST a signed notification to `url`.
///
/// # Errors
///
/// Returns an error if the request cannot be sent or the body cannot be read.
/// Non-2xx answers are returned, not treated as errors.
pub async fn send(
    url: &str,
    order_id: &str,
    status: i64,
    api_key: &SecretString,
) -> Result<Delivery, CliError> {
    let client = reqwest::Client::builder().timeout(TIMEOUT).build()?;

    tracing::info!(%url, order_id, status, "Sending webhook");
    let response = client
        .post(url)
        .json(&payload(order_id, status, api_key))
        .send()
        .await?;

    let status = response.status().as_u16();
    let body = response.text().await?;
    Ok(Delivery { status, body })
}
