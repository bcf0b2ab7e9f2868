//! Application state shared across handlers.

use std::sync::Arc;

use guzel_core::Catalog;
use guzel_core::catalog::CatalogError;
use guzel_core::commerce::{PromoCatalog, ShippingMethod, builtin_methods};

use crate::config::StorefrontConfig;
use crate::orders::OrderStore;
use crate::payments::{AllpayClient, PaymentError};

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("payment client error: {0}")]
    Payment(#[from] PaymentError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog, the order store and the payment client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    promos: PromoCatalog,
    shipping_methods: Vec<ShippingMethod>,
    orders: OrderStore,
    allpay: Option<AllpayClient>,
}

impl AppState {
    /// Create application state with the bundled catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled catalog is malformed or the payment
    /// client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        Self::with_catalog(config, Catalog::builtin()?)
    }

    /// Create application state with a specific catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment client cannot be built.
    pub fn with_catalog(config: StorefrontConfig, catalog: Catalog) -> Result<Self, StateError> {
        let allpay = config.allpay.as_ref().map(AllpayClient::new).transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                promos: PromoCatalog::builtin(),
                shipping_methods: builtin_methods(),
                orders: OrderStore::new(),
                allpay,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    #[must_use]
    pub fn promos(&self) -> &PromoCatalog {
        &self.inner.promos
    }

    #[must_use]
    pub fn shipping_methods(&self) -> &[ShippingMethod] {
        &self.inner.shipping_methods
    }

    #[must_use]
    pub fn orders(&self) -> &OrderStore {
        &self.inner.orders
    }

    /// The Allpay client, if payment is configured.
    #[must_use]
    pub fn allpay(&self) -> Option<&AllpayClient> {
        self.inner.allpay.as_ref()
    }
}
