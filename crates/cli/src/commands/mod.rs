//! CLI command implementations.

pub mod admin;
pub mod cart;
pub mod orders;
pub mod products;
pub mod support;
pub mod user;

use cloudmart_core::ProductId;
use thiserror::Error;

/// Errors raised by the CLI before or around storefront calls.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No product in the catalog has this ID.
    #[error("No product with ID {0}")]
    UnknownProduct(ProductId),

    /// The cart has no line for this product.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Quantities below one are refused; use `cart remove` instead.
    #[error("Quantity must be at least 1 (use `cart remove` to drop a line)")]
    InvalidQuantity,
}

/// Result type for command functions.
pub type Result<T = ()> = std::result::Result<T, Box<dyn std::error::Error>>;
