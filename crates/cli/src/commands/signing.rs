//! Payload signing commands.
//!
//! # Usage
//!
//! ```bash
//! # Print the signature of a payload
//! guzel-cli sign payload.json --api-key "$ALLPAY_API_KEY"
//!
//! # Check a received notification
//! guzel-cli verify notification.json
//! ```

use std::path::Path;

use guzel_core::signature;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};

use super::{CliError, parse_object, read_file};

/// Signature of a payload file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON object.
pub async fn sign(path: &Path, api_key: &SecretString) -> Result<String, CliError> {
    let payload = parse_object(&read_file(path).await?)?;
    tracing::debug!(fields = payload.len(), "Signing payload");
    Ok(signature::sign(&payload, api_key.expose_secret()))
}

/// Check the `sign` field of a payload file.
///
/// # Errors
///
/// Returns [`CliError::BadSignature`] if the signature is missing or wrong.
pub async fn verify(path: &Path, api_key: &SecretString) -> Result<(), CliError> {
    let payload = parse_object(&read_file(path).await?)?;
    check(&payload, api_key)
}

fn check(payload: &Map<String, Value>, api_key: &SecretString) -> Result<(), CliError> {
    if signature::verify(payload, api_key.expose_secret()) {
        Ok(())
    } else {
        Err(CliError::BadSignature)
    }
}
