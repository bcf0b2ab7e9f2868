//! Allpay payment notification handler.
//!
//! Allpay posts a signed JSON object when a payment completes. A verified
//! notification with `status` 1 moves the matching pending order to paid;
//! everything else is logged and acknowledged. Only malformed or forged
//! notifications get a 400.

use axum::{Json, body::Bytes, extract::State};
use chrono::Utc;
use guzel_core::types::{OrderId, OrderStatus};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::orders::StatusUpdate;
use crate::payments::Notification;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Received {
    pub received: bool,
}

/// Handle a payment notification.
#[instrument(skip(state, body))]
pub async fn receive(State(state): State<AppState>, body: Bytes) -> Result<Json<Received>> {
    let allpay = state.allpay().ok_or(AppError::PaymentNotConfigured)?;

    let payload: Map<String, Value> = serde_json::from_slice(&body)
        .map_err(|_| AppError::BadRequest("Invalid payload".to_string()))?;

    if !allpay.verify(&payload) {
        tracing::warn!("Webhook signature verification failed");
        return Err(AppError::BadRequest("Invalid signature".to_string()));
    }

    let notification = Notification::from_payload(&payload)
        .ok_or_else(|| AppError::BadRequest("Missing order_id".to_string()))?;

    if notification.paid {
        mark_paid(&state, &notification).await;
    } else {
        tracing::info!(
            order_id = %notification.order_id,
            status = %notification.status,
            "Payment not completed"
        );
    }

    Ok(Json(Received { received: true }))
}

async fn mark_paid(state: &AppState, notification: &Notification) {
    let Ok(id) = notification.order_id.parse::<OrderId>() else {
        tracing::warn!(order_id = %notification.order_id, "Paid notification for malformed order id");
        return;
    };

    match state
        .orders()
        .update_status(&id, OrderStatus::Paid, Utc::now())
        .await
    {
        StatusUpdate::Applied(order) => {
            tracing::info!(order_id = %order.id, total = order.summary.total, "Payment successful");
        }
        StatusUpdate::UnknownOrder => {
            tracing::warn!(order_id = %id, "Paid notification for unknown order");
        }
        StatusUpdate::Rejected(rejected) => {
            tracing::info!(order_id = %id, %rejected, "Ignoring paid notification");
        }
    }
}
