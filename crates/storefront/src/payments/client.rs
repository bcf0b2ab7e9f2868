//! Allpay HTTP client.

use std::sync::Arc;
use std::time::Duration;

use guzel_core::signature::{self, SIGN_FIELD};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use tracing::instrument;
use url::Url;

use super::error::PaymentError;
use super::types::{PaymentRequest, PaymentResponse};
use crate::config::AllpayConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_REFUSAL: &str = "Failed to create payment session";

/// Allpay payment API client.
///
/// Cheaply cloneable; the underlying connection pool is shared.
#[derive(Clone)]
pub struct AllpayClient {
    inner: Arc<AllpayClientInner>,
}

struct AllpayClientInner {
    client: reqwest::Client,
    login: String,
    api_key: SecretString,
    api_url: Url,
}

impl AllpayClient {
    /// Create a new Allpay client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &AllpayConfig) -> Result<Self, PaymentError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(AllpayClientInner {
                client,
                login: config.login.clone(),
                api_key: config.api_key.clone(),
                api_url: config.api_url.clone(),
            }),
        })
    }

    /// Merchant login sent with every request.
    #[must_use]
    pub fn login(&self) -> &str {
        &self.inner.login
    }

    /// Sign a payload with the merchant API key.
    #[must_use]
    pub fn sign(&self, payload: &Map<String, Value>) -> String {
        signature::sign(payload, self.inner.api_key.expose_secret())
    }

    /// Check the signature of an inbound notification.
    #[must_use]
    pub fn verify(&self, payload: &Map<String, Value>) -> bool {
        signature::verify(payload, self.inner.api_key.expose_secret())
    }

    /// Encode a request as a JSON object with its `sign` field set.
    ///
    /// # Errors
    ///
    /// Returns an error if the request does not serialize to a JSON object.
    pub fn signed_body(&self, request: &PaymentRequest) -> Result<Map<String, Value>, PaymentError> {
        let Value::Object(mut body) = serde_json::to_value(request)? else {
            return Err(PaymentError::Refused(
                "payment request is not a JSON object".to_string(),
            ));
        };
        let sign = self.sign(&body);
        body.insert(SIGN_FIELD.to_string(), Value::String(sign));
        Ok(body)
    }

    /// Create a payment session and return the hosted payment page URL.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Refused`] when Allpay answers without a
    /// payment URL, and a transport or decoding error otherwise.
    #[instrument(skip(self, request), fields(order_id = %request.order_id))]
    pub async fn create_payment(&self, request: &PaymentRequest) -> Result<String, PaymentError> {
        let body = self.signed_body(request)?;

        let response = self
            .inner
            .client
            .post(self.inner.api_url.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let answer: PaymentResponse =
            serde_json::from_str(&text).map_err(|e| PaymentError::InvalidResponse {
                status: status.as_u16(),
                message: e.to_string(),
            })?;

        match answer.payment_url.filter(|url| !url.is_empty()) {
            Some(url) => {
                tracing::info!(http_status = %status, "Allpay payment session created");
                Ok(url)
            }
            None => {
                let message = answer
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| DEFAULT_REFUSAL.to_string());
                tracing::warn!(http_status = %status, error = %message, "Allpay refused payment");
                Err(PaymentError::Refused(message))
            }
        }
    }
}

impl std::fmt::Debug for AllpayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AllpayClient")
            .field("login", &self.inner.login)
            .field("api_key", &"[REDACTED]")
            .field("api_url", &self.inner.api_url.as_str())
            .finish()
    }
}
