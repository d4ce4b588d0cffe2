//! `baiyit cart ...`, also driving the bag with `--bag`.

use baiyit_core::ProductId;
use baiyit_storefront::models::{LineItem, LineItems};
use baiyit_storefront::state::{BagContext, CartContext, Storefront};

use super::{CliError, products};

/// The list a cart command operates on.
pub enum Target {
    Cart(CartContext),
    Bag(BagContext),
}

impl Target {
    #[must_use]
    pub fn select(storefront: &Storefront, bag: bool) -> Self {
        if bag {
            Self::Bag(storefront.bag().clone())
        } else {
            Self::Cart(storefront.cart().clone())
        }
    }

    fn items(&self) -> LineItems {
        match self {
            Self::Cart(cart) => cart.items(),
            Self::Bag(bag) => bag.items(),
        }
    }

    const fn name(&self) -> &'static str {
        match self {
            Self::Cart(_) => "Cart",
            Self::Bag(_) => "Bag",
        }
    }
}

pub async fn add(storefront: &Storefront, target: &Target, id: &str, quantity: u32) -> Result<(), CliError> {
    let product = products::find(storefront, id).await?;
    let item = LineItem::from_product(&product, quantity);
    match target {
        Target::Cart(cart) => cart.add_item(item),
        Target::Bag(bag) => bag.add_item(item),
    }
    show(target);
    Ok(())
}

pub fn remove(target: &Target, id: &str) {
    let id = ProductId::new(id);
    match target {
        Target::Cart(cart) => cart.remove_item(&id),
        Target::Bag(bag) => bag.remove_item(&id),
    }
    show(target);
}

pub fn set(target: &Target, id: &str, quantity: u32) {
    let id = ProductId::new(id);
    match target {
        Target::Cart(cart) => cart.update_quantity(&id, quantity),
        Target::Bag(bag) => bag.update_quantity(&id, quantity),
    }
    show(target);
}

pub fn clear(target: &Target) {
    match target {
        Target::Cart(cart) => cart.clear(),
        Target::Bag(bag) => bag.clear(),
    }
}

#[allow(clippy::print_stdout)]
pub fn show(target: &Target) {
    let items = target.items();
    if items.is_empty() {
        println!("{} is empty", target.name());
        return;
    }

    for item in &items {
        println!(
            "{:<12} {:<28} {:>3} x {:>10} = {:>10}",
            item.id.as_str(),
            item.title,
            item.quantity,
            item.price.to_string(),
            item.subtotal().to_string()
        );
    }
    println!("{} total: {} ({} items)", target.name(), items.total(), items.item_count());
}

#[allow(clippy::print_stdout)]
pub async fn checkout(storefront: &Storefront, bag: bool) -> Result<(), CliError> {
    if bag {
        return Err(CliError::Unavailable("The bag cannot be checked out; use the cart"));
    }

    let order = storefront.checkout().await?;
    println!("Order {} placed: {} ({})", order.id, order.total, order.status);
    Ok(())
}
