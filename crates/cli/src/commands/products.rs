//! `baiyit products ...`

use baiyit_storefront::loaders::ProductFilter;
use baiyit_storefront::models::{Product, ProductQuery};
use baiyit_storefront::state::Storefront;

use super::CliError;

/// Build a listing filter from command-line flags.
#[must_use]
pub fn filter(
    category: Option<String>,
    featured: bool,
    limit: Option<usize>,
    keyword: Option<String>,
) -> ProductFilter {
    let filter = ProductFilter {
        featured,
        limit,
        keyword,
        ..ProductFilter::default()
    };
    match category {
        Some(category) => filter.category(category),
        None => filter,
    }
}

#[allow(clippy::print_stdout)]
pub async fn list(storefront: &Storefront, filter: &ProductFilter, remote: bool) -> Result<(), CliError> {
    let loader = storefront.products_loader();
    if remote {
        let query = ProductQuery {
            search: filter.keyword.clone(),
            featured: filter.featured.then_some(true),
            ..ProductQuery::default()
        };
        loader.load_remote(storefront.products(), &query, filter).await?;
    } else {
        loader.load_catalog(filter).await?;
    }

    let products = loader.resource().data();
    if products.is_empty() {
        println!("No products found");
    }
    for product in &products {
        println!("{}", listing_line(product));
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn show(storefront: &Storefront, id: &str) -> Result<(), CliError> {
    let product = storefront.products().get(id).await.into_result()?;

    println!("{}", listing_line(&product));
    if !product.description.is_empty() {
        println!("  {}", product.description);
    }
    if let Some(original) = product.original_price {
        println!("  was {original}");
    }
    for spec in product.specs() {
        println!("  - {spec}");
    }
    Ok(())
}

/// Resolve a product id, checking the built-in catalog before the backend.
pub async fn find(storefront: &Storefront, id: &str) -> Result<Product, CliError> {
    let loader = storefront.products_loader();
    loader.load_catalog(&ProductFilter::default()).await?;
    if let Some(product) = loader
        .resource()
        .data()
        .into_iter()
        .find(|p| p.id.as_str() == id)
    {
        return Ok(product);
    }

    match storefront.products().get(id).await.into_result() {
        Ok(product) => Ok(product),
        Err(error) if error.status() == Some(404) => Err(CliError::UnknownProduct(id.to_string())),
        Err(error) => Err(error.into()),
    }
}

fn listing_line(product: &Product) -> String {
    let featured = if product.is_featured() { " *" } else { "" };
    format!(
        "{:<12} {:<28} {:>10}  {:.1}{featured}",
        product.id.as_str(),
        product.title,
        product.selling_price().to_string(),
        product.rating
    )
}
