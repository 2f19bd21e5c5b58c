//! `products` and `shops` command handlers.
//!
//! Both run the catalog engine over an already loaded product list, so they
//! work the same against a local file or the live API.

use chrono::Local;
use gilsanum_core::{
    focus_group, group_by_shop, search_filter_groups, shop_total_value, top_n,
    AmountFilter, CatalogView, DatePreset, FilterCriteria, Location, Product, SortBy,
};
use rust_decimal::Decimal;
use serde::Serialize;

/// Options for the `products` command, mirroring the filter panel.
#[derive(Debug, Clone)]
pub(crate) struct ProductOptions {
    pub search: String,
    pub sort: SortBy,
    pub amount: AmountFilter,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub preset: Option<DatePreset>,
    pub top: usize,
    pub json: bool,
}

/// Builds criteria sized to `products` and applies `options` on top.
///
/// The upper slider handle moves first so a raised minimum is checked
/// against the new maximum.
///
/// # Errors
///
/// Returns an error if a slider bound would cross the other handle.
pub(crate) fn build_criteria(
    products: &[Product],
    options: &ProductOptions,
) -> anyhow::Result<FilterCriteria> {
    let mut criteria = FilterCriteria::for_products(products);
    criteria.search_term.clone_from(&options.search);
    criteria.sort_by = options.sort;
    criteria.amount_filter = options.amount;

    if let Some(max) = options.max_price {
        if !criteria.price_range.set_upper(max) {
            anyhow::bail!(
                "--max-price {max} must be above the minimum {}",
                criteria.price_range.min
            );
        }
    }
    if let Some(min) = options.min_price {
        if !criteria.price_range.set_lower(min) {
            anyhow::bail!(
                "--min-price {min} must be below the maximum {}",
                criteria.price_range.max
            );
        }
    }
    if let Some(preset) = options.preset {
        criteria.apply_date_preset(preset, Local::now().date_naive());
    }
    Ok(criteria)
}

fn shop_name(product: &Product) -> &str {
    product.shop.as_ref().map_or("\u{2014}", |s| s.name.as_str())
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() > max {
        format!("{}...", value.chars().take(max).collect::<String>())
    } else {
        value.to_string()
    }
}

/// Prints the filtered product grid.
///
/// # Errors
///
/// Returns an error if the options are inconsistent or JSON encoding fails.
pub(crate) fn run_products(products: &[Product], options: &ProductOptions) -> anyhow::Result<()> {
    let criteria = build_criteria(products, options)?;
    let view = CatalogView::compute(products, &criteria);
    tracing::debug!(
        total = view.window.total,
        groups = view.groups.len(),
        active_filters = view.active_filters,
        "catalog view computed"
    );

    if options.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("{}", view.window);
    println!("Date range: {}", criteria.date_range);
    println!("Active filters: {}", view.active_filters);
    println!();

    if view.products.is_empty() {
        println!("no products match the current filters");
        return Ok(());
    }

    println!("{:<10}{:<34}{:>12}  SHOP", "ID", "NAME", "PRICE");
    for product in top_n(&view.products, options.top) {
        let price = format!("{:.2}", product.price);
        println!(
            "{:<10}{:<34}{:>12}  {}",
            truncate(&product.id, 8),
            truncate(&product.name, 30),
            price,
            shop_name(product)
        );
    }

    Ok(())
}

/// One map marker as printed by `shops --json`.
#[derive(Debug, Serialize)]
pub(crate) struct ShopSummary<'a> {
    pub name: &'a str,
    pub location: &'a Location,
    pub product_count: usize,
    pub total_value: Decimal,
    pub products: Vec<&'a str>,
}

/// Prints each shop group with its marker position and running total.
///
/// # Errors
///
/// Returns an error if JSON encoding fails.
pub(crate) fn run_shops(products: &[Product], search: &str, json: bool) -> anyhow::Result<()> {
    let groups = search_filter_groups(&group_by_shop(products), search);
    let summaries: Vec<ShopSummary<'_>> = groups
        .iter()
        .map(|group| ShopSummary {
            name: &group.name,
            location: &group.location,
            product_count: group.product_count(),
            total_value: shop_total_value(group),
            products: group.products.iter().map(|p| p.name.as_str()).collect(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!("no shops match '{search}'");
        return Ok(());
    }

    println!(
        "{:<24}{:>10}{:>10}{:>8}{:>12}  ADDRESS",
        "SHOP", "LAT", "LNG", "ITEMS", "TOTAL"
    );
    for summary in &summaries {
        println!(
            "{:<24}{:>10.4}{:>10.4}{:>8}{:>12.2}  {}",
            truncate(summary.name, 22),
            summary.location.lat,
            summary.location.lng,
            summary.product_count,
            summary.total_value,
            summary.location.address
        );
    }

    if let Some(group) = focus_group(&groups, search) {
        println!();
        println!(
            "Focus: {} at ({}, {})",
            group.name, group.location.lat, group.location.lng
        );
    }

    Ok(())
}
