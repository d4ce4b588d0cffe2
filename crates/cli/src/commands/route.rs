//! `baiyit route <path>`

use baiyit_storefront::middleware::route_guard::{self, RouteDecision};
use baiyit_storefront::state::Storefront;

/// Print what the route gate would do with `path` given the stored cookie.
#[allow(clippy::print_stdout)]
pub fn evaluate(storefront: &Storefront, path: &str) {
    let token = storefront
        .auth()
        .tokens()
        .cookie()
        .and_then(|record| route_guard::access_token_from_set_cookie(&record));

    match route_guard::evaluate(path, token.as_deref()) {
        RouteDecision::Allow => println!("allow {path}"),
        decision => println!(
            "307 -> {}",
            decision.location().unwrap_or_default()
        ),
    }
}
