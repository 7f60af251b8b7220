//! Order placement from the client cart.

use chrono::{DateTime, Utc};
use cloudmart_core::{EmailError, NewOrder, PriceError};
use thiserror::Error;
use tracing::instrument;

use crate::api::{ApiClient, ApiError};
use crate::cart::CartManager;
use crate::storage::StorageError;
use crate::user::UserSession;

/// Errors that stop an order from being placed.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is no profile, or its email is blank. The shopper should log in.
    #[error("Please log in to complete your order.")]
    LoginRequired,

    /// The profile email is present but malformed.
    #[error("Invalid email address: {0}")]
    InvalidEmail(EmailError),

    /// The cart has no items.
    #[error("Your cart is empty.")]
    EmptyCart,

    /// The cart total does not fit in a price.
    #[error("Order total cannot be computed: {0}")]
    Total(#[from] PriceError),

    /// Client storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The backend rejected or never received the order.
    #[error("Failed to create order: {0}")]
    Api(#[from] ApiError),
}

/// Places orders built from the cart and the user profile.
#[derive(Debug, Clone)]
pub struct Checkout {
    cart: CartManager,
    user: UserSession,
    api: ApiClient,
}

impl Checkout {
    #[must_use]
    pub const fn new(cart: CartManager, user: UserSession, api: ApiClient) -> Self {
        Self { cart, user, api }
    }

    /// Build the order the current cart would produce, without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::LoginRequired`] without a usable email,
    /// [`CheckoutError::EmptyCart`] for an empty cart, or a storage error.
    pub fn prepare(&self, now: DateTime<Utc>) -> Result<NewOrder, CheckoutError> {
        let profile = self.user.current()?.ok_or(CheckoutError::LoginRequired)?;
        let email = profile.order_email().map_err(|e| match e {
            EmailError::Blank => CheckoutError::LoginRequired,
            other => CheckoutError::InvalidEmail(other),
        })?;

        let items = self.cart.items()?;
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        Ok(NewOrder::from_cart(email, &items, now)?)
    }

    /// Submit the cart as a pending order and empty the cart.
    ///
    /// The cart is only cleared once the backend has accepted the order.
    ///
    /// # Errors
    ///
    /// Returns the [`prepare`](Self::prepare) errors, or
    /// [`CheckoutError::Api`] if submission fails (the cart is left intact).
    #[instrument(skip(self))]
    pub async fn place_order(&self, now: DateTime<Utc>) -> Result<NewOrder, CheckoutError> {
        let order = self.prepare(now)?;
        self.api.create_order(&order).await?;
        self.cart.clear()?;

        tracing::info!(
            user_email = %order.user_email,
            items = order.items.len(),
            total = %order.total,
            "Order placed"
        );
        Ok(order)
    }
}
