//! Vitrina CLI - storefront client for the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! vitrina products list --category calzado
//! vitrina products show 1f0c...
//!
//! # Manage the cart (kept in $VITRINA_DATA_DIR between runs)
//! vitrina cart add 1f0c... --quantity 2
//! vitrina cart checkout
//!
//! # Favorites require a session
//! vitrina auth sign-in -e maria@tienda.mx
//! vitrina favorites add 1f0c...
//! ```
//!
//! # Commands
//!
//! - `products` - List and inspect products
//! - `cart` - Local cart and WhatsApp checkout
//! - `favorites` - Server-side favorites
//! - `auth` - Sign in, sign up, sign out

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vitrina_storefront::config::StorefrontConfig;
use vitrina_storefront::error::Result;
use vitrina_storefront::services::NotificationLog;
use vitrina_storefront::state::AppState;

mod commands;

use commands::{AuthAction, CartAction, FavoritesAction, ProductsAction};

#[derive(Parser)]
#[command(name = "vitrina")]
#[command(author, version, about = "Vitrina storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage favorites (requires sign-in)
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Manage the session
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
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

fn init_tracing() {
    // Quiet by default; stdout is reserved for command output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vitrina=warn,vitrina_storefront=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Error: {e}");
            }
            return ExitCode::FAILURE;
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let notifications = Arc::new(NotificationLog::new());
    let result = match AppState::new(config, notifications.clone()) {
        Ok(state) => run(&state, cli.command).await,
        Err(e) => Err(e),
    };

    let had_error_notification = commands::print_notifications(&notifications.drain());

    match result {
        Ok(()) if had_error_notification => ExitCode::FAILURE,
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Error: {}", e.user_message());
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(state: &AppState, command: Commands) -> Result<()> {
    match command {
        Commands::Products { action } => commands::products::run(state, action).await,
        Commands::Cart { action } => commands::cart::run(state, action).await,
        Commands::Favorites { action } => commands::favorites::run(state, action).await,
        Commands::Auth { action } => commands::auth::run(state, action).await,
    }
}
