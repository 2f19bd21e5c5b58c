//! Where product lists come from: a local JSON file or the dashboard API.

use std::path::Path;

use anyhow::Context;
use gilsanum_client::{ApiResponse, DashboardClient, ProductQuery};
use gilsanum_core::Product;
use serde::Deserialize;

/// Accepted shapes for `--file`: the API envelope or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProductsFile {
    Envelope(ApiResponse<Vec<Product>>),
    Bare(Vec<Product>),
}

/// Parses a products file body.
///
/// # Errors
///
/// Returns an error if the body is neither a `{"success", "data"}` envelope
/// nor a JSON array of products, or if the envelope reports failure.
pub(crate) fn parse_products(body: &str) -> anyhow::Result<Vec<Product>> {
    let parsed: ProductsFile =
        serde_json::from_str(body).context("expected a product envelope or array")?;
    match parsed {
        ProductsFile::Envelope(envelope) if !envelope.success => anyhow::bail!(
            "products file reports failure: {}",
            envelope.message.as_deref().unwrap_or("unknown error")
        ),
        ProductsFile::Envelope(envelope) => Ok(envelope.data),
        ProductsFile::Bare(products) => Ok(products),
    }
}

/// Builds an API client from the environment.
///
/// # Errors
///
/// Returns an error if configuration is missing or invalid, or the HTTP
/// client cannot be constructed.
pub(crate) fn api_client() -> anyhow::Result<DashboardClient> {
    let config = gilsanum_core::load_app_config().context("failed to load configuration")?;
    tracing::debug!(?config, "configuration loaded");
    Ok(DashboardClient::from_config(&config)?)
}

/// Loads the full product list from `file` if given, else from the API.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the API request
/// fails.
pub(crate) async fn load_products(file: Option<&Path>) -> anyhow::Result<Vec<Product>> {
    let products = if let Some(path) = file {
        let body = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        parse_products(&body).with_context(|| format!("failed to parse {}", path.display()))?
    } else {
        api_client()?
            .list_products(&ProductQuery::default())
            .await
            .context("failed to load products from the dashboard API")?
    };
    tracing::info!(count = products.len(), "products loaded");
    Ok(products)
}
