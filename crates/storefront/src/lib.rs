//! CloudMart storefront client library.
//!
//! Client-local state for the storefront: the shopping cart, the user
//! profile, and support chat threads, all persisted as JSON records in a
//! key-value store. Also carries the REST client for the CloudMart backend
//! and the checkout flow that turns a cart into an order.
//!
//! # Example
//!
//! ```rust,ignore
//! use cloudmart_storefront::config::StorefrontConfig;
//! use cloudmart_storefront::state::Storefront;
//!
//! let storefront = Storefront::new(StorefrontConfig::from_env()?)?;
//! storefront.user().initialize()?;
//!
//! let products = storefront.api().products().await?;
//! if let Some(product) = products.first() {
//!     storefront.cart().add_item(product)?;
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod events;
pub mod state;
pub mod storage;
pub mod support;
pub mod user;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod testing;
