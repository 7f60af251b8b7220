//! Cart line items.
//!
//! A cart is an ordered list of [`CartItem`]s with at most one entry per
//! product. Display fields and the unit price are copied from the product
//! when the item is first added and never re-fetched.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{Price, PriceError};
use super::product::Product;

/// One product entry in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Price,
    pub quantity: u32,
}

impl CartItem {
    /// Build a new line item for `product` with a quantity of one.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            image: product.image.clone(),
            description: product.description.clone(),
            price: product.price,
            quantity: 1,
        }
    }

    /// Unit price times quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if the total does not fit.
    pub fn line_total(&self) -> Result<Price, PriceError> {
        self.price.times(self.quantity)
    }
}

/// Total number of units across all items.
///
/// Counted in `u64`, so the sum of any number of `u32` quantities a cart can
/// hold is exact.
#[must_use]
pub fn item_count(items: &[CartItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

/// Sum of every line total.
///
/// # Errors
///
/// Returns [`PriceError::Overflow`] if a line total or the sum does not fit.
pub fn subtotal(items: &[CartItem]) -> Result<Price, PriceError> {
    items
        .iter()
        .try_fold(Price::ZERO, |total, item| total.checked_add(item.line_total()?))
}
