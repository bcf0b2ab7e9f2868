//! In-memory order store.
//!
//! Orders live for the lifetime of the process. The store is an async
//! `RwLock<HashMap>` so a status transition is atomic with respect to
//! concurrent webhook deliveries.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use guzel_core::commerce::{InvalidTransition, Order};
use guzel_core::types::{OrderId, OrderStatus};
use tokio::sync::RwLock;

/// Outcome of a status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// The order moved to the new status.
    Applied(Order),
    /// No order has this id.
    UnknownOrder,
    /// The order exists but cannot make this move.
    Rejected(InvalidTransition),
}

/// Shared, cheaply cloneable order store.
#[derive(Debug, Clone, Default)]
pub struct OrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl OrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an order.
    pub async fn insert(&self, order: Order) {
        self.orders.write().await.insert(order.id, order);
    }

    pub async fn get(&self, id: &OrderId) -> Option<Order> {
        self.orders.read().await.get(id).cloned()
    }

    /// Orders placed with `email` (case-insensitive), newest first.
    pub async fn by_email(&self, email: &str) -> Vec<Order> {
        let mut found: Vec<Order> = self
            .orders
            .read()
            .await
            .values()
            .filter(|order| order.placed_by(email))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        found
    }

    /// Move an order to `status`, following the order lifecycle.
    pub async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> StatusUpdate {
        let mut orders = self.orders.write().await;
        let Some(order) = orders.get_mut(id) else {
            return StatusUpdate::UnknownOrder;
        };
        match order.transition_to(status, now) {
            Ok(()) => StatusUpdate::Applied(order.clone()),
            Err(rejected) => StatusUpdate::Rejected(rejected),
        }
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}
