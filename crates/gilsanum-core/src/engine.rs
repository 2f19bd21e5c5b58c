//! Client-side filter, sort and shop-grouping engine.
//!
//! Every function here is pure: inputs are borrowed read-only and results are
//! freshly allocated. Nothing validates its input. A price range with
//! `min > max` simply matches nothing, and it is the caller's job to keep
//! criteria well formed (see [`PriceRange::set_lower`]).
//!
//! [`PriceRange::set_lower`]: crate::criteria::PriceRange::set_lower

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::criteria::{AmountFilter, FilterCriteria, SortBy, DEFAULT_PRICE_CEILING};
use crate::products::{Product, ShopGroup};

/// Number of rows the featured-products header counts as "shown".
pub const RESULTS_PAGE_SIZE: usize = 8;

const FIVE_HUNDRED: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Returns `true` when `term` is empty or appears, ignoring case, in the
/// product's name or description.
#[must_use]
pub fn matches_search(product: &Product, term: &str) -> bool {
    matches_folded(product, &term.to_lowercase())
}

fn matches_folded(product: &Product, needle: &str) -> bool {
    needle.is_empty()
        || contains_folded(&product.name, needle)
        || product
            .description
            .as_deref()
            .is_some_and(|d| contains_folded(d, needle))
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Applies the bucket half of [`AmountFilter`].
///
/// The ordering values (`LowToHigh`, `HighToLow`) admit every product.
#[must_use]
pub fn matches_amount_bucket(product: &Product, amount: AmountFilter) -> bool {
    let price = product.price;
    match amount {
        AmountFilter::Under100 => price < Decimal::ONE_HUNDRED,
        AmountFilter::From100To500 => price >= Decimal::ONE_HUNDRED && price <= FIVE_HUNDRED,
        AmountFilter::Over500 => price > FIVE_HUNDRED,
        AmountFilter::LowToHigh | AmountFilter::HighToLow => true,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortKey {
    PriceAscending,
    PriceDescending,
    Name,
}

/// Resolves the explicit sort, falling back to the amount filter's ordering
/// when the sort dropdown is left on "default".
fn sort_key(criteria: &FilterCriteria) -> Option<SortKey> {
    match criteria.sort_by {
        SortBy::PriceLow => Some(SortKey::PriceAscending),
        SortBy::PriceHigh => Some(SortKey::PriceDescending),
        SortBy::Name => Some(SortKey::Name),
        SortBy::Default => match criteria.amount_filter {
            AmountFilter::LowToHigh => Some(SortKey::PriceAscending),
            AmountFilter::HighToLow => Some(SortKey::PriceDescending),
            AmountFilter::Under100 | AmountFilter::From100To500 | AmountFilter::Over500 => None,
        },
    }
}

/// Filters `products` by search term, price range and amount bucket, then
/// orders the survivors.
///
/// The sort is stable, so products with equal keys keep their input order.
/// Slice for "top N" only after calling this.
#[must_use]
pub fn filter_and_sort(products: &[Product], criteria: &FilterCriteria) -> Vec<Product> {
    let needle = criteria.search_term.to_lowercase();

    let mut retained: Vec<Product> = products
        .iter()
        .filter(|p| {
            matches_folded(p, &needle)
                && criteria.price_range.contains(p.price)
                && matches_amount_bucket(p, criteria.amount_filter)
        })
        .cloned()
        .collect();

    match sort_key(criteria) {
        Some(SortKey::PriceAscending) => retained.sort_by(|a, b| a.price.cmp(&b.price)),
        Some(SortKey::PriceDescending) => retained.sort_by(|a, b| b.price.cmp(&a.price)),
        Some(SortKey::Name) => retained.sort_by(|a, b| locale_cmp(&a.name, &b.name)),
        None => {}
    }

    retained
}

/// Orders names alphabetically the way a human reader expects.
///
/// Three levels, each consulted only on a tie at the previous one:
/// base letters with accents and case folded away (`Éclair` sorts among the
/// `e`s), then accents (unaccented first), then case (lowercase first).
#[must_use]
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented_letters(a).cmp(accented_letters(b)))
        .then_with(|| b.cmp(a))
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn accented_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

/// Groups products by exact (case-sensitive) shop name.
///
/// Groups appear in first-seen order and sit at the location of the first
/// product seen for that name, even if later products report a different
/// location. Products without a shop are skipped.
#[must_use]
pub fn group_by_shop(products: &[Product]) -> Vec<ShopGroup> {
    let mut groups: Vec<ShopGroup> = Vec::new();
    for product in products {
        let Some(shop) = &product.shop else {
            continue;
        };
        match groups.iter_mut().find(|g| g.name == shop.name) {
            Some(group) => group.products.push(product.clone()),
            None => groups.push(ShopGroup {
                name: shop.name.clone(),
                location: shop.location.clone(),
                products: vec![product.clone()],
            }),
        }
    }
    groups
}

/// Keeps groups whose name, or any of whose product names, contains `term`
/// (ignoring case). An empty term keeps everything.
#[must_use]
pub fn search_filter_groups(groups: &[ShopGroup], term: &str) -> Vec<ShopGroup> {
    let needle = term.to_lowercase();
    groups
        .iter()
        .filter(|g| {
            needle.is_empty()
                || contains_folded(&g.name, &needle)
                || g.products.iter().any(|p| contains_folded(&p.name, &needle))
        })
        .cloned()
        .collect()
}

/// The group the map should recenter on after a search, if any.
///
/// `groups` is the output of [`search_filter_groups`] for the same term.
#[must_use]
pub fn focus_group<'a>(groups: &'a [ShopGroup], term: &str) -> Option<&'a ShopGroup> {
    if term.is_empty() {
        None
    } else {
        groups.first()
    }
}

/// Sum of product prices in a group, shown in the shop popup.
#[must_use]
pub fn shop_total_value(group: &ShopGroup) -> Decimal {
    group.products.iter().map(|p| p.price).sum()
}

/// Highest price in the list, used as the price slider's upper bound.
///
/// Falls back to [`DEFAULT_PRICE_CEILING`] for an empty list.
#[must_use]
pub fn price_ceiling(products: &[Product]) -> Decimal {
    products
        .iter()
        .map(|p| p.price)
        .max()
        .unwrap_or(DEFAULT_PRICE_CEILING)
}

/// Number of filter-panel sections that differ from their defaults.
///
/// Date range, amount filter and price range each count at most once. Search
/// and sort are not part of the panel and never count.
#[must_use]
pub fn active_filter_count(criteria: &FilterCriteria, price_ceiling: Decimal) -> usize {
    [
        !criteria.date_range.is_default(),
        criteria.amount_filter != AmountFilter::default(),
        !criteria.price_range.is_full(price_ceiling),
    ]
    .into_iter()
    .filter(|changed| *changed)
    .count()
}

/// The first `n` products of an already sorted list.
#[must_use]
pub fn top_n(sorted: &[Product], n: usize) -> &[Product] {
    &sorted[..n.min(sorted.len())]
}

/// The "1 - k of N Results" header above the product grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultsWindow {
    pub shown: usize,
    pub total: usize,
}

impl ResultsWindow {
    #[must_use]
    pub fn new(total: usize, page_size: usize) -> Self {
        Self {
            shown: total.min(page_size),
            total,
        }
    }
}

impl std::fmt::Display for ResultsWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "1 - {} of {} Results", self.shown, self.total)
    }
}

/// Everything the featured-products view renders for one criteria snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogView {
    /// Filtered and sorted products.
    pub products: Vec<Product>,
    /// Map groups built from `products`, narrowed by the search term.
    pub groups: Vec<ShopGroup>,
    pub window: ResultsWindow,
    pub active_filters: usize,
}

impl CatalogView {
    /// Runs the full pipeline: filter and sort, group the survivors by shop,
    /// then apply the map search overlay.
    ///
    /// The search term narrows twice. Products must match it by name or
    /// description to be grouped at all, so a term that only matches a shop
    /// name yields no groups here. Call [`group_by_shop`] and
    /// [`search_filter_groups`] on the unfiltered list to search by shop.
    #[must_use]
    pub fn compute(products: &[Product], criteria: &FilterCriteria) -> Self {
        let ceiling = price_ceiling(products);
        let filtered = filter_and_sort(products, criteria);
        let groups = search_filter_groups(&group_by_shop(&filtered), &criteria.search_term);
        Self {
            window: ResultsWindow::new(filtered.len(), RESULTS_PAGE_SIZE),
            active_filters: active_filter_count(criteria, ceiling),
            products: filtered,
            groups,
        }
    }

    #[must_use]
    pub fn focus(&self, term: &str) -> Option<&ShopGroup> {
        focus_group(&self.groups, term)
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
