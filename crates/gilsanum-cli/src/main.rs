mod catalog;
mod dashboard;
mod source;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use gilsanum_core::{AmountFilter, DatePreset, SortBy};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gilsanum")]
#[command(about = "Gilsanum dashboard command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Filter, sort and list featured products
    Products {
        /// Read products from a JSON file instead of the API
        #[arg(long)]
        file: Option<PathBuf>,
        /// Case-insensitive match against product name or description
        #[arg(long, default_value = "")]
        search: String,
        /// Sort order: default, price_low, price_high, name
        #[arg(long, default_value = "default")]
        sort: SortBy,
        /// Amount filter: low_to_high, high_to_low, under_100, 100_to_500, over_500
        #[arg(long, default_value = "low_to_high")]
        amount: AmountFilter,
        /// Lower bound of the price slider
        #[arg(long)]
        min_price: Option<Decimal>,
        /// Upper bound of the price slider
        #[arg(long)]
        max_price: Option<Decimal>,
        /// Date preset: today, week, month
        #[arg(long)]
        preset: Option<DatePreset>,
        /// Number of rows to print
        #[arg(long, default_value_t = gilsanum_core::RESULTS_PAGE_SIZE)]
        top: usize,
        /// Print the full view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Group products by shop for the map view
    Shops {
        /// Read products from a JSON file instead of the API
        #[arg(long)]
        file: Option<PathBuf>,
        /// Shop or product name to search for
        #[arg(long, default_value = "")]
        search: String,
        /// Print the groups as JSON
        #[arg(long)]
        json: bool,
    },
    /// Dashboard aggregates from the API
    Dashboard {
        #[command(subcommand)]
        command: dashboard::DashboardCommands,
    },
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins; otherwise `GILSANUM_LOG_LEVEL`, otherwise `info`.
fn init_tracing() -> anyhow::Result<()> {
    let fallback = std::env::var("GILSANUM_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Products {
            file,
            search,
            sort,
            amount,
            min_price,
            max_price,
            preset,
            top,
            json,
        }) => {
            let products = source::load_products(file.as_deref()).await?;
            let options = catalog::ProductOptions {
                search,
                sort,
                amount,
                min_price,
                max_price,
                preset,
                top,
                json,
            };
            catalog::run_products(&products, &options)?;
        }
        Some(Commands::Shops { file, search, json }) => {
            let products = source::load_products(file.as_deref()).await?;
            catalog::run_shops(&products, &search, json)?;
        }
        Some(Commands::Dashboard { command }) => {
            let client = source::api_client()?;
            dashboard::run_dashboard(&client, command).await?;
        }
        None => Cli::command().print_help()?,
    }

    Ok(())
}
