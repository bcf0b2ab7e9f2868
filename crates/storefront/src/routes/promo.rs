//! Promo code validation endpoint.
//!
//! Unlike the other endpoints, this one always answers in its own shape,
//! `{ valid, discount, type?, message }`, including for malformed input.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use guzel_core::commerce::{AppliedPromo, PromoKind, PromoRejection};
use guzel_core::types::Cents;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct PromoRequest {
    #[validate(length(min = 1))]
    pub code: String,
    #[validate(range(min = 0))]
    pub subtotal: Cents,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoResponse {
    pub valid: bool,
    pub discount: Cents,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<PromoKind>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub free_shipping: bool,
    pub message: String,
}

impl PromoResponse {
    fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            discount: 0,
            kind: None,
            free_shipping: false,
            message: message.into(),
        }
    }
}

impl From<Result<AppliedPromo, PromoRejection>> for PromoResponse {
    fn from(result: Result<AppliedPromo, PromoRejection>) -> Self {
        match result {
            Ok(applied) => Self {
                valid: true,
                discount: applied.discount,
                kind: Some(applied.kind),
                free_shipping: applied.free_shipping,
                message: applied.message(),
            },
            Err(rejection) => Self::invalid(rejection.to_string()),
        }
    }
}

/// Check a promo code against a subtotal.
#[instrument(skip(state, body))]
pub async fn validate(
    State(state): State<AppState>,
    body: Result<Json<PromoRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) if request.validate().is_ok() => request,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(PromoResponse::invalid("Invalid request")),
            )
                .into_response();
        }
    };

    let result = state
        .promos()
        .validate(&request.code, request.subtotal, Utc::now());
    if let Err(rejection) = &result {
        tracing::debug!(code = %request.code, %rejection, "Promo code rejected");
    }

    Json(PromoResponse::from(result)).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use guzel_core::commerce::PromoCatalog;

    use super::*;

    #[test]
    fn test_applied_response() {
        let result = PromoCatalog::builtin().validate("WELCOME15", 10_000, Utc::now());
        let response = PromoResponse::from(result);
        assert!(response.valid);
        assert_eq!(response.discount, 1_500);
        assert_eq!(response.kind, Some(PromoKind::Percentage));
        assert_eq!(response.message, "Promo applied! You save $15.00");
    }

    #[test]
    fn test_rejected_response_has_no_type() {
        let result = PromoCatalog::builtin().validate("BOGUS", 10_000, Utc::now());
        let json = serde_json::to_value(PromoResponse::from(result)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "valid": false,
                "discount": 0,
                "message": "Invalid promo code"
            })
        );
    }

    #[test]
    fn test_negative_subtotal_is_invalid() {
        let request = PromoRequest {
            code: "SPRING10".to_string(),
            subtotal: -1,
        };
        assert!(request.validate().is_err());
    }
}
