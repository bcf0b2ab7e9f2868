//! Error types for the Allpay client.

use thiserror::Error;

/// Errors that can occur when creating an Allpay payment.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Allpay answered without a payment URL.
    #[error("payment refused: {0}")]
    Refused(String),

    /// Allpay answered with something that is not the expected JSON.
    #[error("unexpected response (HTTP {status}): {message}")]
    InvalidResponse {
        /// HTTP status of the response.
        status: u16,
        /// Parse failure.
        message: String,
    },

    /// Request body could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_error_display() {
        let err = PaymentError::Refused("Wrong login".to_string());
        assert_eq!(err.to_string(), "payment refused: Wrong login");

        let err = PaymentError::InvalidResponse {
            status: 502,
            message: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unexpected response (HTTP 502): expected value at line 1 column 1"
        );
    }
}
