use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the opposite side of the order
    pub fn opposite(&self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }
}

/// The reader level a catalog item is pitched at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        };
        write!(f, "{name}")
    }
}

/// The fixed set of catalog categories. Serialized with the display names the
/// backend uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Category {
    #[serde(rename = "Technical Analysis")]
    TechnicalAnalysis,
    Fundamentals,
    Psychology,
    #[serde(rename = "Risk Management")]
    RiskManagement,
    #[serde(rename = "Algorithmic Trading")]
    AlgorithmicTrading,
    Strategy,
    #[serde(rename = "Market Analysis")]
    MarketAnalysis,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::TechnicalAnalysis => "Technical Analysis",
            Category::Fundamentals => "Fundamentals",
            Category::Psychology => "Psychology",
            Category::RiskManagement => "Risk Management",
            Category::AlgorithmicTrading => "Algorithmic Trading",
            Category::Strategy => "Strategy",
            Category::MarketAnalysis => "Market Analysis",
        };
        write!(f, "{name}")
    }
}

/// The total order applied to the visible subset of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum SortOption {
    /// Descending by review count.
    #[default]
    Popular,
    /// Descending by publication date.
    Newest,
    /// Ascending by price.
    PriceAsc,
    /// Descending by price.
    PriceDesc,
    /// Descending by rating.
    Rating,
}
