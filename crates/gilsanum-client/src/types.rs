//! Dashboard API request and response types.
//!
//! Every response is wrapped in `{"success": bool, "data": ..., "total"?,
//! "message"?}`; [`ApiResponse`] captures that envelope generically. Field
//! names on the wire are camelCase.

use gilsanum_core::{Product, Shop};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Top-level envelope for all dashboard API responses.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// products
// ---------------------------------------------------------------------------

/// Server-side filters for `GET /products`. `None` fields are left off the
/// query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort: Option<String>,
}

impl ProductQuery {
    /// Translates the shop page's sidebar state into query parameters.
    ///
    /// Values still at their defaults are omitted so the API applies its own:
    /// category `All`, featured off, a blank search, a price floor of 0 and a
    /// ceiling of [`ShopFilters::DEFAULT_MAX_PRICE`]. The shop page always
    /// asks for the `default` sort.
    #[must_use]
    pub fn from_shop_filters(filters: &ShopFilters, search: &str) -> Self {
        Self {
            category: (filters.category != ShopFilters::ALL_CATEGORIES)
                .then(|| filters.category.clone()),
            featured: filters.featured.then_some(true),
            search: (!search.is_empty()).then(|| search.to_string()),
            min_price: (filters.min_price > Decimal::ZERO).then_some(filters.min_price),
            max_price: (filters.max_price < ShopFilters::DEFAULT_MAX_PRICE)
                .then_some(filters.max_price),
            sort: Some("default".to_string()),
        }
    }

    /// Query pairs in the order the API documents them.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(featured) = self.featured {
            params.push(("featured", featured.to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if let Some(min) = self.min_price {
            params.push(("minPrice", min.to_string()));
        }
        if let Some(max) = self.max_price {
            params.push(("maxPrice", max.to_string()));
        }
        if let Some(sort) = &self.sort {
            params.push(("sort", sort.clone()));
        }
        params
    }
}

/// Sidebar state of the shop page.
#[derive(Debug, Clone, PartialEq)]
pub struct ShopFilters {
    pub category: String,
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub featured: bool,
}

impl ShopFilters {
    pub const ALL_CATEGORIES: &'static str = "All";
    pub const CATEGORIES: [&'static str; 5] = ["All", "Electronics", "Fashion", "Home", "Sports"];
    pub const DEFAULT_MAX_PRICE: Decimal = Decimal::from_parts(2000, 0, 0, false, 0);
}

impl Default for ShopFilters {
    fn default() -> Self {
        Self {
            category: Self::ALL_CATEGORIES.to_string(),
            min_price: Decimal::ZERO,
            max_price: Self::DEFAULT_MAX_PRICE,
            featured: false,
        }
    }
}

/// Body for `POST /products` and `PUT /products/{id}`. Only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sent as a JSON number.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop: Option<Shop>,
}

impl From<&Product> for ProductInput {
    fn from(product: &Product) -> Self {
        Self {
            name: Some(product.name.clone()),
            description: product.description.clone(),
            price: Some(product.price),
            image: Some(product.image.clone()),
            shop: product.shop.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// customers & orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl CustomerQuery {
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        [
            ("status", &self.status),
            ("search", &self.search),
            ("sort", &self.sort),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.clone().map(|v| (k, v)))
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderQuery {
    pub status: Option<String>,
    pub customer_id: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<u32>,
}

impl OrderQuery {
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&'static str, String)> = [
            ("status", &self.status),
            ("customerId", &self.customer_id),
            ("search", &self.search),
            ("sort", &self.sort),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.clone().map(|v| (k, v)))
        .collect();
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// A customer record. Only the fields the dashboard lists are typed; the
/// rest of the payload is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body for `POST /customers` and `PUT /customers/{id}`.
///
/// Unset fields are left out; `extra` carries any further attributes the
/// API accepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total: Option<Decimal>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body for `POST /orders` and `PUT /orders/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Sent as a JSON number.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub total: Option<Decimal>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// dashboard
// ---------------------------------------------------------------------------

/// One headline card on the dashboard (earnings, orders, sales, customers).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsCard {
    pub id: String,
    pub title: String,
    /// Preformatted, e.g. `"$108,906"` or `"+2,345"`.
    pub value: String,
    /// Preformatted percentage, e.g. `"5.2%"`.
    pub change: String,
    pub is_positive: bool,
    pub description: String,
    #[serde(default)]
    pub highlight_value: Option<String>,
}

/// One bar of the monthly sales chart.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub month: String,
    pub value: f64,
    #[serde(default)]
    pub is_highlighted: bool,
}

/// A row of the product-monitoring leaderboard.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProductRanking {
    pub id: String,
    pub rank: u32,
    pub name: String,
    pub orders: u64,
    #[serde(default)]
    pub image: String,
}
