//! Shopper state extractors.
//!
//! Load the visitor's cart or wishlist from the session in route handlers.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn clear(mut cart: SessionCart) -> Result<Json<CartView>> {
//!     cart.cart.clear();
//!     cart.save().await?;
//!     Ok(Json(CartView::from(&cart.cart)))
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};
use guzel_core::commerce::{Cart, Wishlist};
use serde::{Serialize, de::DeserializeOwned};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::session_keys;

/// The visitor's cart, loaded from the session.
///
/// Changes are not persisted until [`SessionCart::save`] is called.
pub struct SessionCart {
    session: Session,
    pub cart: Cart,
}

impl SessionCart {
    /// Persist the cart back into the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn save(&self) -> Result<(), AppError> {
        store(&self.session, session_keys::CART, &self.cart).await
    }
}

impl<S> FromRequestParts<S> for SessionCart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts)?;
        let cart = load(&session, session_keys::CART).await?;
        Ok(Self { session, cart })
    }
}

/// The visitor's wishlist, loaded from the session.
///
/// Changes are not persisted until [`SessionWishlist::save`] is called.
pub struct SessionWishlist {
    session: Session,
    pub wishlist: Wishlist,
}

impl SessionWishlist {
    /// Persist the wishlist back into the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn save(&self) -> Result<(), AppError> {
        store(&self.session, session_keys::WISHLIST, &self.wishlist).await
    }
}

impl<S> FromRequestParts<S> for SessionWishlist
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts)?;
        let wishlist = load(&session, session_keys::WISHLIST).await?;
        Ok(Self { session, wishlist })
    }
}

/// Empty the cart held in `session` (after a successful checkout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_cart(session: &Session) -> Result<(), AppError> {
    session.remove::<Cart>(session_keys::CART).await?;
    Ok(())
}

fn session_from_parts(parts: &Parts) -> Result<Session, AppError> {
    // Set by SessionManagerLayer
    parts
        .extensions
        .get::<Session>()
        .cloned()
        .ok_or_else(|| AppError::Internal("session layer not installed".to_string()))
}

async fn load<T>(session: &Session, key: &str) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    Ok(session.get::<T>(key).await?.unwrap_or_default())
}

async fn store<T>(session: &Session, key: &str, value: &T) -> Result<(), AppError>
where
    T: Serialize + Send + Sync,
{
    session.insert(key, value).await?;
    Ok(())
}
