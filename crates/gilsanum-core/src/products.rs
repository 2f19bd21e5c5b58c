use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog item as returned by the dashboard's `/products` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique within any list handed to the engine.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Non-negative amount in the store's single currency unit. Accepts JSON
    /// numbers or numeric strings.
    pub price: Decimal,
    /// Display asset reference (URL or path); never interpreted.
    #[serde(default)]
    pub image: String,
    /// Storefront selling this product. Products without one are left off the map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop: Option<Shop>,
}

impl Product {
    /// Returns `true` if this product can be plotted on the shop map.
    #[must_use]
    pub fn has_shop(&self) -> bool {
        self.shop.is_some()
    }
}

/// A named physical or virtual storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub name: String,
    pub location: Location,
}

/// Map coordinates plus a human-readable address.
///
/// Coordinates are used verbatim as marker positions; no range checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

/// All products sharing one shop name, positioned at the location of the
/// first product seen for that shop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShopGroup {
    pub name: String,
    pub location: Location,
    pub products: Vec<Product>,
}

impl ShopGroup {
    #[must_use]
    pub fn product_count(&self) -> usize {
        self.products.len()
    }
}
