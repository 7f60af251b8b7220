//! Catalog listing.

use cloudmart_core::filter_products;
use cloudmart_storefront::state::Storefront;

use super::Result;

/// Print the catalog, optionally narrowed to names containing `search`.
pub async fn list(storefront: &Storefront, search: Option<&str>) -> Result {
    let products = storefront.api().products().await?;
    let shown = filter_products(&products, search.unwrap_or_default());

    if shown.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    for product in shown {
        println!("[{}] {} - {}", product.id, product.name, product.price);
        if let Some(description) = product.description.as_deref()
            && !description.is_empty()
        {
            println!("      {description}");
        }
    }
    Ok(())
}
