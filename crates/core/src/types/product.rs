//! Catalog products as served by `GET /products`.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub image: String,
}

/// Product fields submitted when creating or editing a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub image: String,
}

/// Keep the products whose name contains `term`, ignoring case.
///
/// A blank term keeps every product.
#[must_use]
pub fn filter_products<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    let needle = term.trim().to_lowercase();
    products
        .iter()
        .filter(|product| product.name.to_lowercase().contains(&needle))
        .collect()
}
