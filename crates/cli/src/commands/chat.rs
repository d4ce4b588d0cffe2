//! `baiyit assistant ...`, `baiyit concierge` and `baiyit recommend`.

use baiyit_core::{SessionId, Sender};
use baiyit_storefront::models::ChatMessage;
use baiyit_storefront::state::{ContextUpdate, Storefront};

use super::{CliError, products};

#[allow(clippy::print_stdout)]
pub async fn ask(
    storefront: &Storefront,
    text: &str,
    page: Option<String>,
    product_id: Option<&str>,
) -> Result<(), CliError> {
    let assistant = storefront.assistant();

    let product = match product_id {
        Some(id) => Some(products::find(storefront, id).await?),
        None => None,
    };
    if page.is_some() || product.is_some() {
        let page = page.unwrap_or_else(|| "product".to_string());
        assistant.update_context_info(ContextUpdate::page(page).with_product(product));
    }

    match assistant.send_message(text).await {
        Some(reply) => println!("{}", line(&reply)),
        None => println!("Nothing to send"),
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn history(storefront: &Storefront) {
    let messages = storefront.assistant().messages();
    if messages.is_empty() {
        println!("No conversation yet");
    }
    for message in &messages {
        println!("{}", line(message));
    }
}

#[allow(clippy::print_stdout)]
pub async fn concierge(
    storefront: &Storefront,
    text: &str,
    image: Option<String>,
    session: Option<String>,
) -> Result<(), CliError> {
    let chat = storefront.concierge();
    if let Some(session) = session {
        let id = storefront
            .sessions()
            .set_current_session_id(Some(SessionId::new(session)));
        chat.open_session(id);
    }

    let Some(reply) = chat.send_message(text, image).await else {
        println!("Nothing to send");
        return Ok(());
    };
    println!("{}", line(&reply));
    println!("(session {})", chat.state().session_id);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn recommend(storefront: &Storefront) {
    let products = storefront.recommendations().products();
    if products.is_empty() {
        println!("Ask the assistant something first");
        return;
    }
    for product in &products {
        println!(
            "{:<12} {:<24} {:>10}",
            product.id.as_str(),
            product.title,
            product.price.to_string()
        );
    }
}

fn line(message: &ChatMessage) -> String {
    let who = match message.sender {
        Sender::User => "You",
        Sender::Ai => "Baiyit",
    };
    match &message.image {
        Some(image) => format!("{who}: {} [image: {image}]", message.text),
        None => format!("{who}: {}", message.text),
    }
}
