use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::enums::{Category, Level, OrderSide};
use crate::error::CoreError;

/// A purchasable content unit (ebook or course) shown in the marketplace.
///
/// Immutable after catalog load, with one exception: `purchased` flips
/// false -> true exactly once, and only through `Catalog::purchase`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ebook {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub price: Decimal,
    /// Pre-sale price; must never be below `price` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    /// Percentage off `original_price`. Present and positive only while on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Decimal>,
    pub category: Category,
    /// 0-5 scale.
    pub rating: Decimal,
    pub reviews: u32,
    pub level: Level,
    pub topics: Vec<String>,
    pub published: NaiveDate,
    pub pages: u32,
    pub language: String,
    /// Delivery formats ("PDF", "EPUB", ...).
    pub format: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub purchased: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub bestseller: bool,
}

impl Ebook {
    /// Checks the catalog-load invariants: a sale price never exceeds the
    /// original price, and the rating stays on the 0-5 scale.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(original) = self.original_price {
            if original < self.price {
                return Err(CoreError::InvalidInput(
                    format!("ebook {}", self.id),
                    format!(
                        "original price {} is below the sale price {}",
                        original, self.price
                    ),
                ));
            }
        }
        if self.rating < Decimal::ZERO || self.rating > Decimal::from(5) {
            return Err(CoreError::InvalidInput(
                format!("ebook {}", self.id),
                format!("rating {} is outside the 0-5 scale", self.rating),
            ));
        }
        Ok(())
    }

    /// An item counts as on sale only when a positive discount is attached.
    pub fn is_on_sale(&self) -> bool {
        self.discount.is_some_and(|d| d > Decimal::ZERO)
    }
}

/// One closed trade as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    pub executed_at: DateTime<Utc>,
    /// Instrument pair, e.g. "EURUSD".
    pub pair: String,
    pub direction: OrderSide,
    /// Signed realized profit.
    pub profit: Decimal,
    #[serde(with = "humantime_serde")]
    pub duration: Duration,
}

/// One sample of the account's equity time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformancePoint {
    pub timestamp: DateTime<Utc>,
    pub balance: Decimal,
    pub equity: Decimal,
    /// Percentage decline from the highest recorded equity at this instant.
    pub drawdown_pct: f64,
}

/// A fetched trade history plus its equity time series, ordered ascending by
/// timestamp. The analytics engine relies on that ordering and never re-sorts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceData {
    pub trades: Vec<TradeRecord>,
    pub performance: Vec<PerformancePoint>,
}
