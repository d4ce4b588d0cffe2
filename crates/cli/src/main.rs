//! Baiyit CLI - drive the storefront client from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in with a one-time code
//! baiyit auth request-otp user@example.com
//! baiyit auth login user@example.com 123456
//!
//! # Browse and shop
//! baiyit products list --category electronics --featured --limit 3
//! baiyit cart add laptop-1 --quantity 2
//! baiyit cart checkout
//!
//! # Talk to the assistant
//! baiyit assistant ask "any good headphones?"
//! baiyit concierge "find me a laptop"
//!
//! # Check whether a page would be let through
//! baiyit route /profile
//! ```
//!
//! State lives in `$BAIYIT_STATE_DIR/storage.json` (default `.baiyit/`).
//! Toasts are printed as they arrive; any failure exits with status 1.

#![cfg_attr(not(test), forbid(unsafe_code))]

use baiyit_storefront::StorefrontConfig;
use baiyit_storefront::notify::Toast;
use baiyit_storefront::state::Storefront;
use clap::{Args, Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "baiyit")]
#[command(author, version, about = "Baiyit storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, sign out and inspect the session
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage the cart (or the bag, with --bag)
    Cart {
        #[command(subcommand)]
        action: CartAction,
        /// Operate on the bag instead of the cart
        #[arg(long, global = true)]
        bag: bool,
    },
    /// List, inspect and cancel orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Chat with the shopping assistant overlay
    Assistant {
        #[command(subcommand)]
        action: AssistantAction,
    },
    /// Send a message to the concierge
    Concierge(ConciergeArgs),
    /// Show purchase history
    Acquisitions,
    /// Show past concierge sessions
    Sessions,
    /// Recommend products from the assistant conversation
    Recommend,
    /// Evaluate the route gate for a path using the stored cookie
    Route {
        /// Request path, e.g. `/profile`
        path: String,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Create an account and send a verification code
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(short, long)]
        email: String,
    },
    /// Send a verification code
    RequestOtp { email: String },
    /// Exchange a verification code for a session
    Login { email: String, otp: String },
    /// End the session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Renew the session with the refresh token
    Refresh,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List(ListArgs),
    /// Show one product from the backend
    Show { id: String },
}

#[derive(Args)]
struct ListArgs {
    /// Exact category
    #[arg(short, long)]
    category: Option<String>,
    /// Only featured products
    #[arg(short, long)]
    featured: bool,
    /// At most this many products
    #[arg(short, long)]
    limit: Option<usize>,
    /// Title/description keyword
    #[arg(short, long)]
    search: Option<String>,
    /// Query the backend instead of the built-in catalog
    #[arg(long)]
    remote: bool,
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product
    Add {
        id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product
    Remove { id: String },
    /// Set a product's quantity
    Set { id: String, quantity: u32 },
    /// Show the contents and total
    Show,
    /// Empty it
    Clear,
    /// Place an order for the cart
    Checkout,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// Recent orders
    List,
    /// One order
    Show { id: String },
    /// Cancel an order
    Cancel { id: String },
}

#[derive(Subcommand)]
enum AssistantAction {
    /// Ask a question and wait for the reply
    Ask {
        text: String,
        /// Page the question is asked from, e.g. `product`
        #[arg(long)]
        page: Option<String>,
        /// Product on screen
        #[arg(long)]
        product: Option<String>,
    },
    /// Print the conversation
    History,
    /// Forget the conversation
    Clear,
}

#[derive(Args)]
struct ConciergeArgs {
    text: String,
    /// Attach an image reference
    #[arg(long)]
    image: Option<String>,
    /// Continue an existing session
    #[arg(long)]
    session: Option<String>,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
#[allow(clippy::print_stderr)]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = StorefrontConfig::from_env()?;

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "baiyit=info,baiyit_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let storefront = Storefront::open(config)?;
    let printer = tokio::spawn(print_toasts(storefront.toaster().subscribe()));

    let result = dispatch(cli.command, &storefront).await;

    // Closing the last sender lets the printer drain and stop
    drop(storefront);
    let _ = printer.await;
    result
}

async fn dispatch(command: Commands, storefront: &Storefront) -> Result<(), CliError> {
    match command {
        Commands::Auth { action } => match action {
            AuthAction::Register {
                first_name,
                last_name,
                email,
            } => commands::auth::register(storefront, &first_name, &last_name, &email).await,
            AuthAction::RequestOtp { email } => commands::auth::request_otp(storefront, &email).await,
            AuthAction::Login { email, otp } => commands::auth::login(storefront, &email, &otp).await,
            AuthAction::Logout => commands::auth::logout(storefront).await,
            AuthAction::Whoami => commands::auth::whoami(storefront).await,
            AuthAction::Refresh => commands::auth::refresh(storefront).await,
        },
        Commands::Products { action } => match action {
            ProductsAction::List(args) => {
                let filter = commands::products::filter(
                    args.category,
                    args.featured,
                    args.limit,
                    args.search,
                );
                commands::products::list(storefront, &filter, args.remote).await
            }
            ProductsAction::Show { id } => commands::products::show(storefront, &id).await,
        },
        Commands::Cart { action, bag } => {
            let target = commands::cart::Target::select(storefront, bag);
            match action {
                CartAction::Add { id, quantity } => {
                    commands::cart::add(storefront, &target, &id, quantity).await
                }
                CartAction::Remove { id } => {
                    commands::cart::remove(&target, &id);
                    Ok(())
                }
                CartAction::Set { id, quantity } => {
                    commands::cart::set(&target, &id, quantity);
                    Ok(())
                }
                CartAction::Show => {
                    commands::cart::show(&target);
                    Ok(())
                }
                CartAction::Clear => {
                    commands::cart::clear(&target);
                    Ok(())
                }
                CartAction::Checkout => commands::cart::checkout(storefront, bag).await,
            }
        }
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(storefront).await,
            OrdersAction::Show { id } => commands::orders::show(storefront, &id).await,
            OrdersAction::Cancel { id } => commands::orders::cancel(storefront, &id).await,
        },
        Commands::Assistant { action } => match action {
            AssistantAction::Ask {
                text,
                page,
                product,
            } => commands::chat::ask(storefront, &text, page, product.as_deref()).await,
            AssistantAction::History => {
                commands::chat::history(storefront);
                Ok(())
            }
            AssistantAction::Clear => {
                storefront.assistant().clear_messages();
                Ok(())
            }
        },
        Commands::Concierge(args) => {
            commands::chat::concierge(storefront, &args.text, args.image, args.session).await
        }
        Commands::Acquisitions => commands::history::acquisitions(storefront).await,
        Commands::Sessions => commands::history::sessions(storefront).await,
        Commands::Recommend => {
            commands::chat::recommend(storefront);
            Ok(())
        }
        Commands::Route { path } => {
            commands::route::evaluate(storefront, &path);
            Ok(())
        }
    }
}

#[allow(clippy::print_stdout)]
async fn print_toasts(mut toasts: broadcast::Receiver<Toast>) {
    loop {
        match toasts.recv().await {
            Ok(toast) => println!("{toast}"),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Dropped toasts");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
