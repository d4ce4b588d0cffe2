//! `baiyit auth ...`

use baiyit_storefront::state::Storefront;

use super::CliError;

pub async fn register(
    storefront: &Storefront,
    first_name: &str,
    last_name: &str,
    email: &str,
) -> Result<(), CliError> {
    storefront
        .auth()
        .register(first_name, last_name, email)
        .await?;
    Ok(())
}

pub async fn request_otp(storefront: &Storefront, email: &str) -> Result<(), CliError> {
    storefront.auth().request_otp(email).await?;
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn login(storefront: &Storefront, email: &str, otp: &str) -> Result<(), CliError> {
    let user = storefront.auth().login(email, otp).await?;
    println!("Signed in as {} <{}>", user.full_name(), user.email);
    Ok(())
}

pub async fn logout(storefront: &Storefront) -> Result<(), CliError> {
    storefront.auth().logout().await;
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn whoami(storefront: &Storefront) -> Result<(), CliError> {
    let auth = storefront.auth();
    auth.initialize().await;

    match auth.user() {
        Some(user) => {
            println!("{} <{}>", user.full_name(), user.email);
            println!("  id:   {}", user.id);
            println!("  role: {}", user.role);
        }
        None => println!("Not signed in"),
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn refresh(storefront: &Storefront) -> Result<(), CliError> {
    let user = storefront.auth().refresh_session().await?;
    println!("Session renewed for {}", user.email);
    Ok(())
}
