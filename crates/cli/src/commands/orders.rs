//! Checkout and order history.

use chrono::Utc;
use cloudmart_core::Order;
use cloudmart_storefront::checkout::CheckoutError;
use cloudmart_storefront::state::Storefront;

use super::Result;

/// Submit the cart as a pending order.
pub async fn checkout(storefront: &Storefront) -> Result {
    match storefront.checkout().place_order(Utc::now()).await {
        Ok(order) => {
            println!(
                "Order placed for {}: {} line(s), total {}",
                order.user_email,
                order.items.len(),
                order.total
            );
            Ok(())
        }
        Err(CheckoutError::LoginRequired) => {
            println!("Please log in to complete your order.");
            println!("Set an email with `cloudmart user update --email <address>`.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// List orders placed with the current profile email.
pub async fn list(storefront: &Storefront) -> Result {
    let Some(profile) = storefront.user().current()? else {
        println!("No profile stored.");
        return Ok(());
    };

    let orders = storefront.api().orders_for_user(&profile.email).await?;
    if orders.is_empty() {
        println!("No orders for {}.", profile.email);
        return Ok(());
    }

    for order in &orders {
        println!("{}", format_order(order));
    }
    Ok(())
}

pub(super) fn format_order(order: &Order) -> String {
    format!(
        "{} {} {:<10} {} ({} line(s))",
        order.created_at.format("%Y-%m-%d"),
        order.id,
        order.status.as_str(),
        order.total,
        order.items.len()
    )
}
