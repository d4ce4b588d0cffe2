//! `baiyit acquisitions` and `baiyit sessions`.

use baiyit_storefront::state::Storefront;

use super::CliError;

#[allow(clippy::print_stdout)]
pub async fn acquisitions(storefront: &Storefront) -> Result<(), CliError> {
    let loader = storefront.acquisitions_loader();
    loader.load().await?;

    for acquisition in loader.resource().data() {
        println!(
            "{}  {}  {:>10}  {}",
            acquisition.id,
            acquisition.date.format("%Y-%m-%d"),
            acquisition.total.to_string(),
            acquisition.status
        );
        for item in &acquisition.items {
            println!("  {} x {} ({})", item.quantity, item.title, item.price);
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn sessions(storefront: &Storefront) -> Result<(), CliError> {
    let loader = storefront.sessions_loader();
    loader.load().await?;

    for session in loader.resource().data() {
        println!("{}  {}  {}", session.id, session.date.format("%Y-%m-%d"), session.title);
        println!("  {}", session.preview);
        println!("  Products: {}", session.products.join(", "));
    }
    Ok(())
}
