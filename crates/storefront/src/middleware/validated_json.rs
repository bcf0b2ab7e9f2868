//! JSON body extractor with field validation.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// Like [`axum::Json`], but also runs the body's [`Validate`] rules.
///
/// A body that is not JSON at all is rejected with [`AppError::InvalidJson`].
/// A JSON body with missing or mistyped fields is rejected with
/// [`AppError::InvalidField`], and one that fails its rules with
/// [`AppError::Validation`]. All three are 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<serde_json::Value>::from_request(req, state).await?;
        let value: T = serde_path_to_error::deserialize(raw)?;
        value.validate()?;
        Ok(Self(value))
    }
}
