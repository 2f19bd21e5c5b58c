//! User-adjustable filter settings for the shop and featured-products views.
//!
//! A [`FilterCriteria`] is owned by whoever drives the view, mutated in place
//! as controls change, and handed to the engine by reference on every
//! recomputation. Nothing here is persisted.

use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::products::Product;
use crate::CoreError;

/// Upper slider bound used before any products have loaded.
pub const DEFAULT_PRICE_CEILING: Decimal = Decimal::ONE_THOUSAND;

const DATE_FORMAT: &str = "%d-%m-%Y";

/// Coarse price control that doubles as a bucket filter and an ordering hint.
///
/// The three bucket values narrow the result set. The two ordering values
/// admit every product and only take effect when [`SortBy::Default`] is
/// selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmountFilter {
    #[default]
    #[serde(rename = "low_to_high")]
    LowToHigh,
    #[serde(rename = "high_to_low")]
    HighToLow,
    #[serde(rename = "under_100")]
    Under100,
    #[serde(rename = "100_to_500")]
    From100To500,
    #[serde(rename = "over_500")]
    Over500,
}

impl AmountFilter {
    pub const ALL: [AmountFilter; 5] = [
        AmountFilter::LowToHigh,
        AmountFilter::HighToLow,
        AmountFilter::Under100,
        AmountFilter::From100To500,
        AmountFilter::Over500,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AmountFilter::LowToHigh => "low_to_high",
            AmountFilter::HighToLow => "high_to_low",
            AmountFilter::Under100 => "under_100",
            AmountFilter::From100To500 => "100_to_500",
            AmountFilter::Over500 => "over_500",
        }
    }

    /// Returns `true` for the values that restrict which products are shown.
    #[must_use]
    pub fn is_bucket(self) -> bool {
        matches!(
            self,
            AmountFilter::Under100 | AmountFilter::From100To500 | AmountFilter::Over500
        )
    }
}

impl std::fmt::Display for AmountFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AmountFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AmountFilter::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| CoreError::InvalidAmountFilter(s.to_string()))
    }
}

/// Explicit sort order picked from the results header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Defer to the ordering half of [`AmountFilter`].
    #[default]
    Default,
    PriceLow,
    PriceHigh,
    Name,
}

impl SortBy {
    pub const ALL: [SortBy; 4] = [
        SortBy::Default,
        SortBy::PriceLow,
        SortBy::PriceHigh,
        SortBy::Name,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Default => "default",
            SortBy::PriceLow => "price_low",
            SortBy::PriceHigh => "price_high",
            SortBy::Name => "name",
        }
    }
}

impl std::fmt::Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortBy::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| CoreError::InvalidSortBy(s.to_string()))
    }
}

/// Inclusive price bounds driven by a two-handle slider.
///
/// `min <= max` is the caller's job; the handle setters below refuse moves
/// that would cross the other handle, which is how the filter panel keeps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    #[must_use]
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    /// The untouched slider: `[0, ceiling]`.
    #[must_use]
    pub fn full(ceiling: Decimal) -> Self {
        Self {
            min: Decimal::ZERO,
            max: ceiling,
        }
    }

    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && price <= self.max
    }

    #[must_use]
    pub fn is_full(&self, ceiling: Decimal) -> bool {
        self.min == Decimal::ZERO && self.max == ceiling
    }

    /// Moves the lower handle. Ignored unless `value < max`.
    pub fn set_lower(&mut self, value: Decimal) -> bool {
        if value < self.max {
            self.min = value;
            true
        } else {
            false
        }
    }

    /// Moves the upper handle. Ignored unless `value > min`.
    pub fn set_upper(&mut self, value: Decimal) -> bool {
        if value > self.min {
            self.max = value;
            true
        } else {
            false
        }
    }
}

/// Quick-pick buttons in the date section of the filter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePreset {
    Today,
    Week,
    Month,
}

impl DatePreset {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DatePreset::Today => "today",
            DatePreset::Week => "week",
            DatePreset::Month => "month",
        }
    }
}

impl std::fmt::Display for DatePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatePreset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(DatePreset::Today),
            "week" => Ok(DatePreset::Week),
            "month" => Ok(DatePreset::Month),
            other => Err(CoreError::InvalidDatePreset(other.to_string())),
        }
    }
}

/// Calendar window shown in the filter panel, rendered as `DD-MM-YYYY`.
///
/// Products carry no date, so this never excludes anything; it only feeds
/// the active-filter badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub const DEFAULT_FROM: NaiveDate = NaiveDate::from_ymd_opt(2025, 10, 9).expect("valid date");
    pub const DEFAULT_TO: NaiveDate = NaiveDate::from_ymd_opt(2025, 11, 9).expect("valid date");

    /// Resolves a preset relative to `today`.
    ///
    /// `Month` steps back one calendar month, clamping to the last day of a
    /// shorter month (31 March becomes 28 or 29 February).
    #[must_use]
    pub fn from_preset(preset: DatePreset, today: NaiveDate) -> Self {
        let from = match preset {
            DatePreset::Today => today,
            DatePreset::Week => today.checked_sub_days(Days::new(7)).unwrap_or(today),
            DatePreset::Month => today.checked_sub_months(Months::new(1)).unwrap_or(today),
        };
        Self { from, to: today }
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            from: Self::DEFAULT_FROM,
            to: Self::DEFAULT_TO,
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to {}",
            format_date(self.from),
            format_date(self.to)
        )
    }
}

/// Formats a date the way the filter panel shows it (`DD-MM-YYYY`).
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a `DD-MM-YYYY` date.
///
/// # Errors
///
/// Returns [`CoreError::InvalidDate`] if `value` is not a valid `DD-MM-YYYY` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| CoreError::InvalidDate {
        value: value.to_string(),
    })
}

/// Everything the user can adjust in the featured-products view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search_term: String,
    pub price_range: PriceRange,
    pub amount_filter: AmountFilter,
    pub sort_by: SortBy,
    pub date_range: DateRange,
    /// Last preset button pressed; cleared when the date range is reset.
    pub date_preset: Option<DatePreset>,
}

impl FilterCriteria {
    /// Default criteria with the price slider spanning `[0, ceiling]`.
    #[must_use]
    pub fn with_price_ceiling(ceiling: Decimal) -> Self {
        Self {
            search_term: String::new(),
            price_range: PriceRange::full(ceiling),
            amount_filter: AmountFilter::default(),
            sort_by: SortBy::default(),
            date_range: DateRange::default(),
            date_preset: None,
        }
    }

    /// Default criteria sized to the given product list.
    #[must_use]
    pub fn for_products(products: &[Product]) -> Self {
        Self::with_price_ceiling(crate::engine::price_ceiling(products))
    }

    /// Re-spans the price slider after the product list changes.
    ///
    /// Only the price range moves; search, sort and amount settings are kept.
    pub fn rebase_price_ceiling(&mut self, ceiling: Decimal) {
        self.price_range = PriceRange::full(ceiling);
    }

    pub fn apply_date_preset(&mut self, preset: DatePreset, today: NaiveDate) {
        self.date_preset = Some(preset);
        self.date_range = DateRange::from_preset(preset, today);
    }

    pub fn reset_date_range(&mut self) {
        self.date_range = DateRange::default();
        self.date_preset = None;
    }

    pub fn reset_amount(&mut self) {
        self.amount_filter = AmountFilter::default();
    }

    pub fn reset_price_range(&mut self, ceiling: Decimal) {
        self.price_range = PriceRange::full(ceiling);
    }

    /// Resets every filter-panel section (date, amount, price).
    ///
    /// The search box and the sort dropdown live outside the panel and keep
    /// their values.
    pub fn reset_all(&mut self, ceiling: Decimal) {
        self.reset_date_range();
        self.reset_amount();
        self.reset_price_range(ceiling);
    }
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::with_price_ceiling(DEFAULT_PRICE_CEILING)
    }
}

#[cfg(test)]
#[path = "criteria_test.rs"]
mod tests;
