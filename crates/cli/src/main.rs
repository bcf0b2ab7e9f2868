//! Güzel CLI - operator tools for the storefront.
//!
//! # Usage
//!
//! ```bash
//! # Sign a payload / check a notification (key from --api-key or ALLPAY_API_KEY)
//! guzel-cli sign payload.json
//! guzel-cli verify notification.json
//!
//! # Price a cart the way checkout does
//! guzel-cli quote cart.json --shipping standard --promo WELCOME15
//!
//! # Check a promo code against a subtotal in cents
//! guzel-cli promo SPRING10 12000
//!
//! # Mark a local test order as paid
//! guzel-cli webhook --order-id 6f1c... --status 1
//! ```
//!
//! # Commands
//!
//! - `sign` - Print the signature of a JSON object
//! - `verify` - Check the `sign` field of a JSON object
//! - `quote` - Print the order summary for a JSON array of cart items
//! - `promo` - Run promo validation
//! - `webhook` - Send a signed notification to a running storefront

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use guzel_core::types::{Cents, format_cents};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "guzel-cli")]
#[command(author, version, about = "Güzel storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the signature of a JSON object
    Sign {
        /// Path to the JSON payload
        file: PathBuf,

        /// Allpay API key
        #[arg(long, env = "ALLPAY_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
    /// Check the `sign` field of a JSON object
    Verify {
        /// Path to the JSON payload
        file: PathBuf,

        /// Allpay API key
        #[arg(long, env = "ALLPAY_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
    /// Print the order summary for a JSON array of cart items
    Quote {
        /// Path to the JSON cart items
        file: PathBuf,

        /// Shipping method id (`standard`, `express`, `overnight`)
        #[arg(short, long)]
        shipping: String,

        /// Promo code to apply
        #[arg(short, long)]
        promo: Option<String>,
    },
    /// Run promo validation
    Promo {
        /// Promo code
        code: String,

        /// Order subtotal in cents
        subtotal: Cents,
    },
    /// Send a signed payment notification to a running storefront
    Webhook {
        /// Order id
        #[arg(long)]
        order_id: String,

        /// Payment status (1 = paid)
        #[arg(long, default_value_t = 1)]
        status: i64,

        /// Storefront webhook URL
        #[arg(long, default_value = "http://localhost:3000/api/webhook")]
        url: String,

        /// Allpay API key
        #[arg(long, env = "ALLPAY_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "guzel_cli=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::print_stdout)]
async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Sign { file, api_key } => {
            let key = commands::api_key(api_key)?;
            println!("{}", commands::signing::sign(&file, &key).await?);
        }
        Commands::Verify { file, api_key } => {
            let key = commands::api_key(api_key)?;
            commands::signing::verify(&file, &key).await?;
            println!("Signature OK");
        }
        Commands::Quote {
            file,
            shipping,
            promo,
        } => {
            let summary =
                commands::pricing::quote(&file, &shipping, promo.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Promo { code, subtotal } => match commands::pricing::promo(&code, subtotal) {
            Ok(applied) => {
                println!("{}", applied.message());
                println!("Discount: {}", format_cents(applied.discount));
                if applied.free_shipping {
                    println!("Free shipping");
                }
            }
            Err(rejection) => println!("{rejection}"),
        },
        Commands::Webhook {
            order_id,
            status,
            url,
            api_key,
        } => {
            let key = commands::api_key(api_key)?;
            let delivery = commands::webhook::send(&url, &order_id, status, &key).await?;
            println!("{} {}", delivery.status, delivery.body);
        }
    }
    Ok(())
}
