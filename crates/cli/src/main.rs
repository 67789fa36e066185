//! Luxe CLI - Inspect boutique content as the storefront sees it.
//!
//! # Usage
//!
//! ```bash
//! # Categories in display order
//! luxe categories
//!
//! # Products in a category, as YAML
//! luxe --format yaml products --category dresses
//!
//! # One product with its approved reviews
//! luxe product silk-midi-dress --reviews
//!
//! # Against local fixtures instead of Cosmic
//! luxe --fixtures crates/storefront/fixtures/catalog.json collections --featured
//! ```
//!
//! # Commands
//!
//! - `categories` - List categories
//! - `products` - List products, optionally featured or by category
//! - `product` - Show one product
//! - `collections` - List collections
//! - `collection` - Show one collection
//! - `reviews` - List approved reviews
//! - `facets` - Categories referenced by products

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::content::{Format, Request};

#[derive(Parser)]
#[command(name = "luxe")]
#[command(author, version, about = "Luxe Fashion Boutique content tools")]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json, global = true)]
    format: Format,

    /// Read content from a fixtures file instead of Cosmic
    #[arg(long, global = true)]
    fixtures: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List categories in display order
    Categories {
        /// Only featured categories
        #[arg(long)]
        featured: bool,
    },
    /// List products
    Products {
        /// Only featured products
        #[arg(long, conflicts_with = "category")]
        featured: bool,

        /// Only products in the category with this slug
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one product
    Product {
        /// Product slug
        slug: String,

        /// Include approved reviews and the rating summary
        #[arg(long)]
        reviews: bool,
    },
    /// List collections
    Collections {
        /// Only featured collections
        #[arg(long)]
        featured: bool,
    },
    /// Show one collection
    Collection {
        /// Collection slug
        slug: String,
    },
    /// List approved reviews
    Reviews {
        /// Only reviews of the product with this id
        #[arg(short, long)]
        product: Option<String>,
    },
    /// List categories referenced by products
    Facets,
}

impl From<Commands> for Request {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Categories { featured } => Self::Categories { featured },
            Commands::Products { featured, category } => Self::Products { featured, category },
            Commands::Product { slug, reviews } => Self::Product { slug, reviews },
            Commands::Collections { featured } => Self::Collections { featured },
            Commands::Collection { slug } => Self::Collection { slug },
            Commands::Reviews { product } => Self::Reviews { product },
            Commands::Facets => Self::Facets,
        }
    }
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = commands::content::connect(cli.fixtures).await?;
    let output = commands::content::run(&catalog, cli.command.into(), cli.format).await?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{output}")?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_products_by_category() {
        let cli = Cli::try_parse_from(["luxe", "products", "--category", "dresses", "--format", "yaml"])
            .unwrap();
        assert_eq!(cli.format, Format::Yaml);
        assert_eq!(
            Request::from(cli.command),
            Request::Products {
                featured: false,
                category: Some("dresses".to_string())
            }
        );
    }

    #[test]
    fn test_featured_conflicts_with_category() {
        assert!(Cli::try_parse_from(["luxe", "products", "--featured", "--category", "bags"]).is_err());
    }

    #[test]
    fn test_parse_product_with_reviews() {
        let cli = Cli::try_parse_from(["luxe", "product", "silk-midi-dress", "--reviews"]).unwrap();
        assert_eq!(cli.format, Format::Json);
        assert_eq!(
            Request::from(cli.command),
            Request::Product {
                slug: "silk-midi-dress".to_string(),
                reviews: true
            }
        );
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
