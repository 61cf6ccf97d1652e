//! # Meridian Chart Analytics
//!
//! Transforms a raw trade history and equity time series into the chart-ready
//! aggregates the performance dashboards render: monthly returns, the profit
//! histogram, per-pair win rates, rolling risk ratios, hourly timing and the
//! significant-event log.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** A pure logic crate with no knowledge of external
//!   systems. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `ChartEngine` is a stateless calculator.
//!   It takes pre-fetched data as input and produces derived series as output,
//!   with no memory between calls. This makes it reliable and easy to test.
//!
//! ## Public API
//!
//! - `ChartEngine`: the calculator, one method per chart.
//! - The report structs in [`report`]: the derived, serializable shapes.
//! - `AnalyticsError`: the specific error types this crate can return.

pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::ChartEngine;
pub use error::AnalyticsError;
pub use report::{
    ComparisonSeries, EquityPoint, EventKind, HourlyTiming, MonthlyReturn, PairWinRate,
    ProfitDistribution, RiskMetricsPoint, SignificantEvent,
};
