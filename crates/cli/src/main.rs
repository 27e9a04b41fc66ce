//! Wix CLI - Exploration scripts for the Wix Stores APIs.
//!
//! Every command authenticates with the API key from the YAML config and
//! writes pretty JSON under `--out`.
//!
//! # Usage
//!
//! ```bash
//! # Dump the whole catalog and a summary
//! wix-cli products dump
//!
//! # Fetch every product individually with the full field set
//! wix-cli products fetch-each
//!
//! # One product
//! wix-cli products get --slug my-shirt
//!
//! # Search with filters and print the price facets
//! wix-cli search --query shirt --min-price 10 --in-stock
//!
//! # Validate the config file
//! wix-cli config check
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use wix_headless_storefront::wix::DEFAULT_API_BASE_URL;

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "wix-cli")]
#[command(author, version, about = "Wix Stores exploration tools")]
struct Cli {
    /// Output directory for JSON dumps
    #[arg(long, global = true, default_value = "output")]
    out: PathBuf,

    /// Path to the Wix YAML config
    #[arg(long, global = true, env = "WIX_CONFIG_PATH", default_value = "wix-config.yaml")]
    config: PathBuf,

    /// Wix API base URL
    #[arg(long, global = true, env = "WIX_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Catalog products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Search products with filters and price aggregations
    Search(commands::search::SearchArgs),
    /// Store categories
    Categories {
        #[command(subcommand)]
        action: DumpAction,
    },
    /// Inventory items
    Inventory {
        #[command(subcommand)]
        action: DumpAction,
    },
    /// Configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// Query every product page and write a summary
    Dump,
    /// Fetch each product by ID, recording failures
    FetchEach,
    /// Fetch one product by ID or slug
    Get {
        /// Product ID
        #[arg(long, conflicts_with = "slug", required_unless_present = "slug")]
        id: Option<String>,

        /// Product slug
        #[arg(long)]
        slug: Option<String>,
    },
}

#[derive(Subcommand)]
enum DumpAction {
    /// Fetch every page and write it out
    Dump,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate the config file
    Check,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), commands::CliError> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    if let Commands::Config { action: ConfigAction::Check } = cli.command {
        return commands::config::check(&cli.config);
    }

    let ctx = Context::load(&cli.config, &cli.api_base_url, cli.out)?;
    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::Dump => commands::products::dump(&ctx).await?,
            ProductsAction::FetchEach => commands::products::fetch_each(&ctx).await?,
            ProductsAction::Get { id, slug } => {
                let lookup = match (id, slug) {
                    (Some(id), _) => commands::products::Lookup::Id(id),
                    (None, Some(slug)) => commands::products::Lookup::Slug(slug),
                    (None, None) => return Err(commands::CliError::MissingArgument("--id or --slug")),
                };
                commands::products::get(&ctx, &lookup).await?;
            }
        },
        Commands::Search(args) => commands::search::run(&ctx, &args).await?,
        Commands::Categories { action: DumpAction::Dump } => commands::categories::dump(&ctx).await?,
        Commands::Inventory { action: DumpAction::Dump } => commands::inventory::dump(&ctx).await?,
        Commands::Config { action: ConfigAction::Check } => {}
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_get_requires_id_or_slug() {
        assert!(Cli::try_parse_from(["wix-cli", "products", "get"]).is_err());
        assert!(Cli::try_parse_from(["wix-cli", "products", "get", "--id", "a", "--slug", "b"]).is_err());

        let cli = Cli::try_parse_from(["wix-cli", "products", "get", "--slug", "shirt"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Products { action: ProductsAction::Get { id: None, slug: Some(_) } }
        ));
    }

    #[test]
    fn test_global_out() {
        let cli = Cli::try_parse_from(["wix-cli", "categories", "dump", "--out", "/tmp/x"]).unwrap();
        assert_eq!(cli.out, PathBuf::from("/tmp/x"));
    }
}
