//! pxkit command line checkout
//!
//! Drives the checkout flow against a payment gateway from the terminal.

mod commands;
mod config;
mod context;
mod views;

use clap::{Parser, Subcommand};
use config::{ConfigLoader, Overrides};
use context::AppContext;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::checkout::CheckoutArgs;

/// pxkit - checkout flow from the command line
#[derive(Parser, Debug)]
#[command(name = "pxkit")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./pxkit.toml")]
    config: PathBuf,

    /// Override the gateway public key
    #[arg(long, env = "PXKIT_PUBLIC_KEY")]
    public_key: Option<String>,

    /// Override the gateway private key
    #[arg(long, env = "PXKIT_PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a checkout preference
    Preference {
        /// Preference id
        id: String,
    },
    /// Search the payment methods available for a preference
    PaymentMethods {
        /// Preference id
        preference_id: String,
    },
    /// Resolve a discount for an amount
    Discount {
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        email: String,
        /// Coupon code; the direct discount is used when absent
        #[arg(long)]
        code: Option<String>,
    },
    /// Run a full checkout for a preference
    Checkout(CheckoutArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    tracing::debug!("Starting pxkit v{}", env!("CARGO_PKG_VERSION"));

    let config_loader = ConfigLoader::new(
        &args.config,
        Overrides {
            public_key: args.public_key,
            private_key: args.private_key,
        },
    );
    let config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::debug!("Configuration loaded from {:?}", args.config);

    let ctx = AppContext::new(config);

    let result = match args.command {
        Command::Preference { id } => commands::preference::run(&ctx, &id).await,
        Command::PaymentMethods { preference_id } => {
            commands::payment_methods::run(&ctx, &preference_id).await
        }
        Command::Discount {
            amount,
            email,
            code,
        } => commands::discount::run(&ctx, amount, &email, code.as_deref()).await,
        Command::Checkout(checkout) => commands::checkout::run(&ctx, checkout).await,
    };

    ctx.shutdown().await;
    result
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
