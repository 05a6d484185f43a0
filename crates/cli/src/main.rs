//! Cannabiabuds CLI - catalog browsing, cart quotes and budtender chat.
//!
//! # Usage
//!
//! ```bash
//! # List the launch catalog
//! cbud catalog list
//!
//! # Only discounted indica flower
//! cbud catalog list --category Flower --type Indica --deals
//!
//! # Show one product
//! cbud catalog show 3
//!
//! # Price a cart: two of product 1, one of product 4
//! cbud cart quote 1:2 4
//!
//! # Ask Bud a question (needs GEMINI_API_KEY, otherwise prints the fallback)
//! cbud chat "something to help me sleep?"
//! ```
//!
//! # Commands
//!
//! - `catalog` - List and inspect products
//! - `cart quote` - Subtotal, tax and grand total for a set of lines
//! - `chat` - One budtender exchange

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::cart::QuoteLine;

#[derive(Parser)]
#[command(name = "cbud")]
#[command(author, version, about = "Cannabiabuds storefront tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Work with a shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Send one message to the budtender
    Chat {
        /// The question for Bud
        message: String,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products, optionally filtered
    List {
        /// Product category (`Flower`, `Edibles`, `Vapes`, ...) or `All`
        #[arg(short, long)]
        category: Option<String>,

        /// Strain type (`Indica`, `Sativa`, `Hybrid`, `CBD`) or `All`
        #[arg(short = 't', long = "type")]
        strain_type: Option<String>,

        /// Only products with a sale price
        #[arg(short, long)]
        deals: bool,
    },
    /// Show a single product
    Show {
        /// Product id
        id: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Price a cart built from `ID` or `ID:QUANTITY` lines
    Quote {
        #[arg(required = true, value_parser = commands::cart::parse_line)]
        lines: Vec<QuoteLine>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cannabiabuds_cli=info,cannabiabuds_storefront=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List {
                category,
                strain_type,
                deals,
            } => commands::catalog::list(category.as_deref(), strain_type.as_deref(), deals)?,
            CatalogAction::Show { id } => commands::catalog::show(&id)?,
        },
        Commands::Cart { action } => match action {
            CartAction::Quote { lines } => commands::cart::quote(&lines)?,
        },
        Commands::Chat { message } => commands::chat::ask(&message).await?,
    }
    Ok(())
}
