use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Aggregate percentage equity change for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReturn {
    /// `YYYY-MM` bucket key.
    pub month: String,
    pub return_pct: f64,
}

/// Fixed-width histogram of per-trade profits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitDistribution {
    /// Lower edge of each bin.
    pub bins: Vec<f64>,
    /// Trade count per bin. Always sums to the number of trades.
    pub frequencies: Vec<usize>,
}

/// Win-rate summary for one instrument pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairWinRate {
    pub pair: String,
    pub trades: usize,
    pub win_rate_pct: f64,
}

/// One equity sample on a comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    pub equity: Decimal,
}

/// The current equity curve next to the synthetic previous period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSeries {
    pub current: Vec<EquityPoint>,
    pub previous: Vec<EquityPoint>,
}

/// Risk-adjusted-return metrics over one trailing window.
///
/// Ratios are `None` where their denominator vanishes: Sharpe with zero
/// volatility, Sortino with no negative returns, Calmar with zero drawdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetricsPoint {
    pub timestamp: DateTime<Utc>,
    pub mean_return: f64,
    /// Population standard deviation of the window's returns.
    pub volatility: f64,
    /// Standard deviation of the negative returns only.
    pub downside_volatility: Option<f64>,
    /// Most negative drawdown sample in the window.
    pub max_drawdown_pct: f64,
    pub sharpe_ratio: Option<f64>,
    pub sortino_ratio: Option<f64>,
    pub calmar_ratio: Option<f64>,
    /// Simplified: mean return over the risk-free rate.
    pub alpha: f64,
    /// Fixed stand-in until a benchmark series exists.
    pub beta: f64,
}

/// Per-hour-of-day trading outcome summary. One entry per hour 0-23, present
/// even when the hour saw no trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyTiming {
    pub hour: u32,
    pub trades: usize,
    pub win_rate_pct: f64,
    pub average_profit: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    EquityHigh,
    EquityLow,
    MaxDrawdown,
    WinStreak,
    LossStreak,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::EquityHigh => "equity high",
            EventKind::EquityLow => "equity low",
            EventKind::MaxDrawdown => "max drawdown",
            EventKind::WinStreak => "win streak",
            EventKind::LossStreak => "loss streak",
        };
        write!(f, "{name}")
    }
}

/// A notable point in the trade history, logged for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificantEvent {
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
    pub description: String,
}
