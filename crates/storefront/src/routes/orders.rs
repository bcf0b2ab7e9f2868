//! Order lookup handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use guzel_core::commerce::Order;
use guzel_core::types::OrderId;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderList {
    pub orders: Vec<Order>,
}

fn not_found() -> AppError {
    AppError::NotFound("Order not found".to_string())
}

/// Show an order by id.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Order>> {
    // A malformed id cannot name an order
    let id: OrderId = id.parse().map_err(|_| not_found())?;
    state.orders().get(&id).await.map(Json).ok_or_else(not_found)
}

/// List the orders placed with an email address, newest first.
#[instrument(skip(state, query))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<OrderList>> {
    let email = query
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::BadRequest("Email is required".to_string()))?;

    Ok(Json(OrderList {
        orders: state.orders().by_email(email).await,
    }))
}
