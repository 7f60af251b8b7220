//! Back-office commands for the catalog, orders, and support tickets.
//!
//! # Usage
//!
//! ```bash
//! cloudmart admin products create --name Lamp --price 24.50
//! cloudmart admin products update 4 --price 19.99
//! cloudmart admin orders status ord-1 Shipped
//! cloudmart admin tickets list --status open
//! ```

use cloudmart_core::{
    NewProduct, Order, OrderId, OrderStatus, Price, Product, ProductId, Ticket, TicketId,
    TicketStatus,
};
use cloudmart_storefront::state::Storefront;

use super::orders::format_order;
use super::{CommandError, Result};

/// Product fields given on the command line. Unset fields keep their
/// current value on update.
#[derive(Debug, Default)]
pub struct ProductFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub image: Option<String>,
}

impl ProductFields {
    /// Overlay these fields on an existing product.
    #[must_use]
    pub fn over(self, current: &Product) -> NewProduct {
        NewProduct {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            description: self.description.or_else(|| current.description.clone()),
            price: self.price.unwrap_or(current.price),
            image: self.image.unwrap_or_else(|| current.image.clone()),
        }
    }
}

pub async fn create_product(
    storefront: &Storefront,
    name: String,
    price: Price,
    fields: ProductFields,
) -> Result {
    let product = NewProduct {
        name,
        description: fields.description,
        price,
        image: fields.image.unwrap_or_default(),
    };
    let created = storefront.api().create_product(&product).await?;
    println!("Created [{}] {} - {}", created.id, created.name, created.price);
    Ok(())
}

/// Update `id`, keeping any field not given.
pub async fn update_product(
    storefront: &Storefront,
    id: &ProductId,
    fields: ProductFields,
) -> Result {
    let api = storefront.api();
    let current = api
        .product(id)
        .await?
        .ok_or_else(|| CommandError::UnknownProduct(id.clone()))?;

    let updated = api.update_product(id, &fields.over(&current)).await?;
    println!("Updated [{}] {} - {}", updated.id, updated.name, updated.price);
    Ok(())
}

pub async fn delete_product(storefront: &Storefront, id: &ProductId) -> Result {
    storefront.api().delete_product(id).await?;
    println!("Deleted product {id}");
    Ok(())
}

/// List every order, newest first.
pub async fn list_orders(storefront: &Storefront) -> Result {
    let mut orders = storefront.api().orders().await?;
    if orders.is_empty() {
        println!("No orders.");
        return Ok(());
    }

    sort_newest_first(&mut orders);
    for order in &orders {
        println!("{} {}", format_order(order), order.user_email);
    }
    Ok(())
}

pub async fn set_order_status(
    storefront: &Storefront,
    id: &OrderId,
    status: OrderStatus,
) -> Result {
    storefront.api().update_order_status(id, status).await?;
    println!("Order {id} is now {status}");
    Ok(())
}

pub async fn delete_order(storefront: &Storefront, id: &OrderId) -> Result {
    storefront.api().delete_order(id).await?;
    println!("Deleted order {id}");
    Ok(())
}

pub async fn list_tickets(storefront: &Storefront, status: Option<TicketStatus>) -> Result {
    let tickets = storefront.api().tickets(status).await?;
    if tickets.is_empty() {
        println!("No tickets.");
        return Ok(());
    }

    for ticket in &tickets {
        println!("{}", format_ticket(ticket));
    }
    Ok(())
}

pub async fn delete_ticket(storefront: &Storefront, id: &TicketId) -> Result {
    storefront.api().delete_ticket(id).await?;
    println!("Deleted ticket {id}");
    Ok(())
}

fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

fn format_ticket(ticket: &Ticket) -> String {
    let opened = ticket
        .created_at
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    let sentiment = ticket.overall_sentiment.as_deref().unwrap_or("unrated");
    format!(
        "{opened} {} {:<11} {sentiment} ({} message(s))",
        ticket.id,
        ticket.status.to_string(),
        ticket.messages().len()
    )
}
