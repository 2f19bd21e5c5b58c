//! Typed client for the dashboard REST API: products, customers, orders and
//! dashboard widgets.

mod cache;
mod client;
mod error;
mod retry;
mod types;

pub use cache::{QueryCache, Tag, TagKind};
pub use client::DashboardClient;
pub use error::ClientError;
pub use types::{
    ApiResponse, ChartPoint, Customer, CustomerInput, CustomerQuery, Order, OrderInput,
    OrderQuery, ProductInput, ProductQuery, ProductRanking, ShopFilters, StatsCard,
};
