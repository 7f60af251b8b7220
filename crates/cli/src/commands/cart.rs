//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! cloudmart cart add 4
//! cloudmart cart set 4 3
//! cloudmart cart remove 4
//! cloudmart cart list
//! ```

use cloudmart_core::{CartItem, PriceError, ProductId};
use cloudmart_storefront::state::Storefront;

use super::{CommandError, Result};

/// Print every cart line and the subtotal.
pub fn list(storefront: &Storefront) -> Result {
    let items = storefront.cart().items()?;
    if items.is_empty() {
        println!("Your cart is empty.");
        return Ok(());
    }

    for item in &items {
        println!("{}", format_line(item)?);
    }
    println!("Subtotal: {}", cloudmart_core::subtotal(&items)?);
    Ok(())
}

/// Add one unit of a catalog product.
pub async fn add(storefront: &Storefront, id: &ProductId) -> Result {
    let product = storefront
        .api()
        .product(id)
        .await?
        .ok_or_else(|| CommandError::UnknownProduct(id.clone()))?;

    storefront.cart().add_item(&product)?;
    println!(
        "Added {} ({} in cart)",
        product.name,
        storefront.cart().item_count()?
    );
    Ok(())
}

pub fn remove(storefront: &Storefront, id: &ProductId) -> Result {
    storefront.cart().remove_item(id)?;
    println!("Removed {id} ({} in cart)", storefront.cart().item_count()?);
    Ok(())
}

/// Set a line's quantity. Quantities below one are refused here and never
/// reach the cart.
pub fn set_quantity(storefront: &Storefront, id: &ProductId, quantity: u32) -> Result {
    let quantity = validate_quantity(quantity)?;

    let cart = storefront.cart();
    if !cart.items()?.iter().any(|item| &item.id == id) {
        return Err(CommandError::NotInCart(id.clone()).into());
    }

    cart.update_quantity(id, quantity)?;
    println!("Set {id} to {quantity} ({} in cart)", cart.item_count()?);
    Ok(())
}

pub fn clear(storefront: &Storefront) -> Result {
    storefront.cart().clear()?;
    println!("Cart cleared.");
    Ok(())
}

pub fn count(storefront: &Storefront) -> Result {
    println!("{}", storefront.cart().item_count()?);
    Ok(())
}

const fn validate_quantity(quantity: u32) -> std::result::Result<u32, CommandError> {
    if quantity < 1 {
        Err(CommandError::InvalidQuantity)
    } else {
        Ok(quantity)
    }
}

fn format_line(item: &CartItem) -> std::result::Result<String, PriceError> {
    Ok(format!(
        "{:>4} x {} [{}] @ {} = {}",
        item.quantity,
        item.name,
        item.id,
        item.price,
        item.line_total()?
    ))
}
