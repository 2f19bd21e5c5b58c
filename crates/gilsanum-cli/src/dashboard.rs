//! `dashboard` command handlers. All read straight from the API.

use clap::Subcommand;
use gilsanum_client::DashboardClient;

/// Sub-commands available under `dashboard`.
#[derive(Debug, Subcommand)]
pub enum DashboardCommands {
    /// Headline stat cards
    Stats,
    /// Monthly sales series
    Chart,
    /// Most recent orders
    Recent {
        /// Maximum number of orders to show
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Product-monitoring leaderboard
    Popular {
        /// Maximum number of products to show
        #[arg(long)]
        limit: Option<u32>,
    },
}

/// Dispatches a `dashboard` sub-command.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub(crate) async fn run_dashboard(
    client: &DashboardClient,
    command: DashboardCommands,
) -> anyhow::Result<()> {
    match command {
        DashboardCommands::Stats => run_stats(client).await,
        DashboardCommands::Chart => run_chart(client).await,
        DashboardCommands::Recent { limit } => run_recent(client, limit).await,
        DashboardCommands::Popular { limit } => run_popular(client, limit).await,
    }
}

async fn run_stats(client: &DashboardClient) -> anyhow::Result<()> {
    let cards = client.dashboard_stats().await?;
    for card in &cards {
        let sign = if card.is_positive { "+" } else { "-" };
        println!("{:<18}{:>14}  {sign}{}", card.title, card.value, card.change);
        println!("  {}", card.description);
        if let Some(highlight) = &card.highlight_value {
            println!("  {highlight}");
        }
    }
    Ok(())
}

async fn run_chart(client: &DashboardClient) -> anyhow::Result<()> {
    let points = client.chart_data().await?;
    println!("{:<8}{:>12}", "MONTH", "SALES");
    for point in &points {
        let marker = if point.is_highlighted { "  *" } else { "" };
        println!("{:<8}{:>12.2}{marker}", point.month, point.value);
    }
    Ok(())
}

async fn run_recent(client: &DashboardClient, limit: Option<u32>) -> anyhow::Result<()> {
    let orders = client.recent_orders(limit).await?;
    if orders.is_empty() {
        println!("no recent orders");
        return Ok(());
    }
    println!("{:<14}{:<14}{:<12}{:>12}", "ORDER", "CUSTOMER", "STATUS", "TOTAL");
    for order in &orders {
        let total = order
            .total
            .map_or_else(|| "\u{2014}".to_string(), |t| format!("{t:.2}"));
        println!(
            "{:<14}{:<14}{:<12}{:>12}",
            order.id,
            order.customer_id.as_deref().unwrap_or("\u{2014}"),
            order.status.as_deref().unwrap_or("\u{2014}"),
            total
        );
    }
    Ok(())
}

async fn run_popular(client: &DashboardClient, limit: Option<u32>) -> anyhow::Result<()> {
    let ranking = client.popular_products(limit).await?;
    println!("{:<6}{:<32}{:>10}", "RANK", "PRODUCT", "ORDERS");
    for row in &ranking {
        println!("{:<6}{:<32}{:>10}", row.rank, row.name, row.orders);
    }
    Ok(())
}
