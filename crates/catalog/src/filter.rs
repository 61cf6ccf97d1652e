use core_types::{Category, Level};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The full set of marketplace filter dimensions.
///
/// `None` / `false` means "no constraint" for that dimension, and `Default`
/// starts every dimension unconstrained, so a fresh state always shows the
/// whole catalog. An active item must satisfy every constrained dimension at
/// once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub category: Option<Category>,
    pub level: Option<Level>,
    /// Inclusive `(min, max)` price bounds.
    pub price_range: Option<(Decimal, Decimal)>,
    /// Items must be rated at least this highly. Zero constrains nothing.
    pub min_rating: Decimal,
    /// Required delivery format, e.g. "PDF".
    pub format: Option<String>,
    pub language: Option<String>,
    pub featured_only: bool,
    pub bestseller_only: bool,
    pub on_sale_only: bool,
}

/// A single-dimension filter mutation.
///
/// The view layer edits one dimension per user interaction and sends the
/// change here as a message, keeping the state transitions explicit.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterUpdate {
    Category(Option<Category>),
    Level(Option<Level>),
    PriceRange(Option<(Decimal, Decimal)>),
    MinRating(Decimal),
    Format(Option<String>),
    Language(Option<String>),
    FeaturedOnly(bool),
    BestsellerOnly(bool),
    OnSaleOnly(bool),
}

impl FilterState {
    /// Applies one single-dimension update, leaving every other dimension
    /// untouched.
    pub fn apply(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::Category(value) => self.category = value,
            FilterUpdate::Level(value) => self.level = value,
            FilterUpdate::PriceRange(value) => self.price_range = value,
            FilterUpdate::MinRating(value) => self.min_rating = value,
            FilterUpdate::Format(value) => self.format = value,
            FilterUpdate::Language(value) => self.language = value,
            FilterUpdate::FeaturedOnly(value) => self.featured_only = value,
            FilterUpdate::BestsellerOnly(value) => self.bestseller_only = value,
            FilterUpdate::OnSaleOnly(value) => self.on_sale_only = value,
        }
    }

    /// Restores every dimension to its unconstrained default in one step.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
