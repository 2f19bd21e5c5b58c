//! Domain types, configuration and the catalog filter engine shared by the
//! Gilsanum dashboard crates.

pub mod app_config;
pub mod config;
pub mod criteria;
pub mod engine;
mod error;
pub mod products;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use criteria::{
    format_date, parse_date, AmountFilter, DatePreset, DateRange, FilterCriteria, PriceRange,
    SortBy, DEFAULT_PRICE_CEILING,
};
pub use engine::{
    active_filter_count, filter_and_sort, focus_group, group_by_shop, locale_cmp,
    matches_amount_bucket, matches_search, price_ceiling, search_filter_groups, shop_total_value,
    top_n, CatalogView, ResultsWindow, RESULTS_PAGE_SIZE,
};
pub use error::{ConfigError, CoreError};
pub use products::{Location, Product, Shop, ShopGroup};
