//! Cart state manager.
//!
//! The cart record in storage is the source of truth. Every operation reads
//! the record, computes the new item list, writes the whole list back and
//! then notifies [`CartEvents`] subscribers. Nothing is cached in between.

use cloudmart_core::{CartItem, Price, PriceError, Product, ProductId, item_count, subtotal};
use thiserror::Error;
use tracing::instrument;

use crate::events::{CartEvent, CartEvents};
use crate::storage::{RecordStore, Result, StorageError, keys};

/// Errors from cart reads that also do price arithmetic.
#[derive(Debug, Error)]
pub enum CartError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The stored quantities and prices do not fit in a total.
    #[error("cart total cannot be computed: {0}")]
    Total(#[from] PriceError),
}

/// Owns the cart line items in client storage.
#[derive(Debug, Clone)]
pub struct CartManager {
    store: RecordStore,
    events: CartEvents,
}

impl CartManager {
    /// Create a cart manager over `store` that publishes to `events`.
    #[must_use]
    pub const fn new(store: RecordStore, events: CartEvents) -> Self {
        Self { store, events }
    }

    /// The notification bus this manager publishes to.
    #[must_use]
    pub const fn events(&self) -> &CartEvents {
        &self.events
    }

    /// Current line items in insertion order.
    ///
    /// An absent or corrupted record reads as an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn items(&self) -> Result<Vec<CartItem>> {
        Ok(self
            .store
            .read_lenient::<Vec<CartItem>>(keys::CART)?
            .unwrap_or_default())
    }

    /// Add one unit of `product`.
    ///
    /// Increments the quantity if the product is already in the cart,
    /// otherwise appends a new line item with quantity one.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or written.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_item(&self, product: &Product) -> Result<()> {
        let mut items = self.items()?;
        match items.iter_mut().find(|item| item.id == product.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(1),
            None => items.push(CartItem::from_product(product)),
        }
        self.save(&items)
    }

    /// Remove the line item for `id`.
    ///
    /// Removing a product that is not in the cart leaves the items unchanged
    /// but still rewrites the record and notifies subscribers.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or written.
    #[instrument(skip(self))]
    pub fn remove_item(&self, id: &ProductId) -> Result<()> {
        let mut items = self.items()?;
        items.retain(|item| &item.id != id);
        self.save(&items)
    }

    /// Set the quantity of the line item for `id`.
    ///
    /// The quantity is written as given; callers are responsible for refusing
    /// quantities below one. If `id` is not in the cart nothing is written
    /// and no notification is sent.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or written.
    #[instrument(skip(self))]
    pub fn update_quantity(&self, id: &ProductId, quantity: u32) -> Result<()> {
        let mut items = self.items()?;
        let Some(item) = items.iter_mut().find(|item| &item.id == id) else {
            tracing::debug!("Product not in cart, quantity unchanged");
            return Ok(());
        };
        item.quantity = quantity;
        self.save(&items)
    }

    /// Empty the cart. The record is kept, holding an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn clear(&self) -> Result<()> {
        self.save(&[])
    }

    /// Total units across all line items.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn item_count(&self) -> Result<u64> {
        Ok(item_count(&self.items()?))
    }

    /// Sum of price times quantity across all line items.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read, or
    /// [`CartError::Total`] if the total overflows.
    pub fn subtotal(&self) -> std::result::Result<Price, CartError> {
        Ok(subtotal(&self.items()?)?)
    }

    fn save(&self, items: &[CartItem]) -> Result<()> {
        self.store.write(keys::CART, items)?;
        self.events.emit(CartEvent::Updated {
            item_count: item_count(items),
        });
        Ok(())
    }
}
