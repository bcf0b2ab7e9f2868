//! CLI subcommand implementations.

pub mod pricing;
pub mod signing;
pub mod webhook;

use std::path::Path;

use secrecy::SecretString;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// No Allpay API key was given.
    #[error("Missing API key: pass --api-key or set ALLPAY_API_KEY")]
    MissingApiKey,

    /// Input file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Input is not valid JSON of the expected shape.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Input parsed but is not a JSON object.
    #[error("Expected a JSON object")]
    NotAnObject,

    /// Signature check failed.
    #[error("Signature does not match")]
    BadSignature,

    /// Shipping method id not in the shipping table.
    #[error("Unknown shipping method: {0}")]
    UnknownShippingMethod(String),

    /// Bundled catalog failed to load.
    #[error("Catalog error: {0}")]
    Catalog(#[from] guzel_core::catalog::CatalogError),

    /// HTTP request failed.
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Resolve the API key from the flag or the environment.
///
/// clap already falls back to `ALLPAY_API_KEY`; this only turns an absent or
/// empty value into an error.
pub fn api_key(flag: Option<String>) -> Result<SecretString, CliError> {
    flag.filter(|key| !key.trim().is_empty())
        .map(SecretString::from)
        .ok_or(CliError::MissingApiKey)
}

/// Read a file into a string.
pub async fn read_file(path: &Path) -> Result<String, CliError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Read {
            path: path.display().to_string(),
            source,
        })
}

/// Parse a JSON object.
pub fn parse_object(text: &str) -> Result<Map<String, Value>, CliError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(object) => Ok(object),
        _ => Err(CliError::NotAnObject),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_required() {
        assert!(matches!(api_key(None), Err(CliError::MissingApiKey)));
        assert!(matches!(
            api_key(Some("  ".to_string())),
            Err(CliError::MissingApiKey)
        ));
        assert!(api_key(Some("k3y".to_string())).is_ok());
    }

    #[test]
    fn test_parse_object() {
        assert_eq!(parse_object(r#"{"a":1}"#).unwrap().len(), 1);
        assert!(matches!(parse_object("[1]"), Err(CliError::NotAnObject)));
        assert!(matches!(parse_object("{"), Err(CliError::Json(_))));
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let err = read_file(Path::new("/nonexistent/payload.json"))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to read /nonexistent/payload.json"));
    }
}
