//! # Checkout Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the repository adapter and the Stripe client
//! - Create the payment facade and checkout service
//! - Serve the HTTP API, or run a single checkout step from the command line

mod config;

use std::collections::BTreeMap;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkout_hex::{CheckoutService, Facade, FacadeConfig, inbound::HttpServer};
use checkout_repo::{Repo, build_repo};
use checkout_types::{
    AppError, CaptureRequest, CreateOrderRequest, CurrencyCode, PayOrderRequest, Price,
};
use stripe_gateway::{StripeClient, StripeConfig};

use config::Config;

#[derive(Parser)]
#[command(name = "checkout")]
#[command(author, version, about = "Stripe checkout facade", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the checkout HTTP API
    Serve,
    /// Order operations
    Order {
        #[command(subcommand)]
        action: OrderCommands,
    },
    /// Charge an order's total to a card token
    Pay {
        /// Order number
        number: String,
        /// Stripe card token
        #[arg(long)]
        card: String,
        /// Charge in this currency instead of the order's
        #[arg(long)]
        currency: Option<CurrencyCode>,
        #[arg(long)]
        description: Option<String>,
        /// Extra charge parameter (repeatable)
        #[arg(long = "extra", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        extra: Vec<(String, String)>,
    },
    /// Capture the charge previously authorized for an order
    Capture {
        /// Order number
        number: String,
        /// Extra capture parameter, e.g. `amount=1000` (repeatable)
        #[arg(long = "extra", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        extra: Vec<(String, String)>,
    },
}

#[derive(Subcommand)]
enum OrderCommands {
    /// Record a new order
    Create {
        /// Order number
        number: String,
        /// Tax-inclusive total, e.g. 19.99
        #[arg(long)]
        total: Decimal,
        /// Defaults to STRIPE_CURRENCY
        #[arg(long)]
        currency: Option<CurrencyCode>,
    },
    /// Show an order and its payment source
    Show {
        /// Order number
        number: String,
    },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

/// Treats a missing record as absent; every other failure is still an error.
fn not_found_as_none<T>(result: Result<T, AppError>) -> Result<Option<T>, AppError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(AppError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

async fn build_service(config: &Config) -> Result<CheckoutService<StripeClient, Repo>> {
    let repo = build_repo(&config.database_url).await?;

    let mut stripe = StripeConfig::new(config.stripe.secret_key.clone())
        .with_timeout(config.stripe.timeout);
    if let Some(api_base) = &config.stripe.api_base {
        stripe = stripe.with_api_base(api_base.clone());
    }
    let gateway = StripeClient::new(stripe)?;

    let facade = Facade::new(
        FacadeConfig {
            charge_and_capture_in_one_step: config.stripe.charge_and_capture_in_one_step,
        },
        gateway,
        repo,
    );

    Ok(CheckoutService::new(facade))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,checkout_app=debug,checkout_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing::debug!("Using database: {}", config.database_url);
    let service = build_service(&config).await?;

    match cli.command {
        Commands::Serve => {
            tracing::info!("Starting checkout server on port {}", config.port);
            let addr = format!("0.0.0.0:{}", config.port);
            HttpServer::new(service).run(&addr).await?;
        }

        Commands::Order { action } => match action {
            OrderCommands::Create {
                number,
                total,
                currency,
            } => {
                let currency = currency.unwrap_or_else(|| config.stripe.currency.clone());
                let order = service
                    .create_order(CreateOrderRequest {
                        number,
                        total: Price::new(total, currency)?,
                    })
                    .await?;
                println!("{}", serde_json::to_string_pretty(&order)?);
            }
            OrderCommands::Show { number } => {
                let order = service.get_order(&number).await?;
                let source = not_found_as_none(service.get_payment_source(&number).await)?;
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "order": order,
                        "payment_source": source,
                    }))?
                );
            }
        },

        Commands::Pay {
            number,
            card,
            currency,
            description,
            extra,
        } => {
            let source = service
                .pay_order(
                    &number,
                    PayOrderRequest {
                        card: Some(card),
                        currency,
                        description,
                        metadata: None,
                        extra: extra.into_iter().collect(),
                    },
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&source)?);
        }

        Commands::Capture { number, extra } => {
            let extra: BTreeMap<String, String> = extra.into_iter().collect();
            let source = service
                .capture_order(&number, CaptureRequest { extra })
                .await?;
            println!("{}", serde_json::to_string_pretty(&source)?);
        }
    }

    Ok(())
}
