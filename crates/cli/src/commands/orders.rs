//! `baiyit orders ...`

use baiyit_core::OrderId;
use baiyit_storefront::models::Order;
use baiyit_storefront::state::Storefront;

use super::CliError;

#[allow(clippy::print_stdout)]
pub async fn list(storefront: &Storefront) -> Result<(), CliError> {
    let is_authenticated = storefront.auth().is_authenticated();
    if !is_authenticated {
        println!("Sign in to see your orders");
        return Ok(());
    }

    let loader = storefront.orders_loader();
    loader.load(is_authenticated).await?;

    let orders = loader.resource().data();
    if orders.is_empty() {
        println!("No orders yet");
    }
    for order in &orders {
        println!("{}", summary(order));
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn show(storefront: &Storefront, id: &str) -> Result<(), CliError> {
    let order = storefront.orders().get(id).await.into_result()?;

    println!("{}", summary(&order));
    for item in order.items() {
        println!(
            "  {:<12} {:<28} {:>3} x {}",
            item.product_id.as_str(),
            item.title,
            item.quantity,
            item.price
        );
    }
    if order.status.is_cancellable() {
        println!("  (can be cancelled)");
    }
    Ok(())
}

pub async fn cancel(storefront: &Storefront, id: &str) -> Result<(), CliError> {
    storefront.orders_loader().cancel(&OrderId::new(id)).await?;
    Ok(())
}

fn summary(order: &Order) -> String {
    format!(
        "{:<16} {}  {:>10}  {}",
        order.id.as_str(),
        order.created_at.format("%Y-%m-%d"),
        order.total.to_string(),
        order.status
    )
}
