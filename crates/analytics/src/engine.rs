use std::collections::BTreeMap;

use chrono::Timelike;
use core_types::{PerformancePoint, TradeRecord};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

use crate::error::AnalyticsError;
use crate::report::{
    ComparisonSeries, EquityPoint, EventKind, HourlyTiming, MonthlyReturn, PairWinRate,
    ProfitDistribution, RiskMetricsPoint, SignificantEvent,
};

/// Number of bins in the profit histogram.
const PROFIT_BINS: usize = 20;

/// Pairs with fewer trades than this carry no statistical weight and are
/// excluded from the per-pair win-rate chart.
const MIN_TRADES_PER_PAIR: usize = 10;

/// Trailing window length for the rolling risk metrics.
const RISK_WINDOW: usize = 30;

/// Annual risk-free rate used by the Sharpe and Sortino ratios.
const RISK_FREE_RATE: f64 = 0.02;

/// Stand-in benchmark beta until a real benchmark series is wired in.
const BENCHMARK_BETA: f64 = 1.0;

/// Equity multiplier standing in for the unavailable previous-period series.
const PREVIOUS_PERIOD_FACTOR: Decimal = dec!(0.8);

/// A stateless calculator turning a raw trade history into chart-ready series.
#[derive(Debug, Default)]
pub struct ChartEngine {}

impl ChartEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate percentage equity change per calendar month, in month order.
    ///
    /// Each consecutive-sample change is attributed to the month of the later
    /// sample. The very first sample of the series has no prior point and
    /// contributes no delta.
    pub fn monthly_returns(&self, series: &[PerformancePoint]) -> Vec<MonthlyReturn> {
        let mut months: BTreeMap<String, f64> = BTreeMap::new();

        for (i, point) in series.iter().enumerate() {
            if i == 0 {
                continue;
            }
            let prev = to_f64(series[i - 1].equity);
            if prev == 0.0 {
                continue;
            }
            let change_pct = (to_f64(point.equity) - prev) / prev * 100.0;
            let month = point.timestamp.format("%Y-%m").to_string();
            *months.entry(month).or_insert(0.0) += change_pct;
        }

        months
            .into_iter()
            .map(|(month, return_pct)| MonthlyReturn { month, return_pct })
            .collect()
    }

    /// Fixed-width histogram of trade profits over `[min, max]`.
    ///
    /// The maximum profit lands exactly on the upper edge and is clamped into
    /// the last bin. A degenerate range (every profit equal) collapses into
    /// bin 0, so the counts always sum to the number of trades.
    pub fn profit_distribution(
        &self,
        trades: &[TradeRecord],
    ) -> Result<ProfitDistribution, AnalyticsError> {
        if trades.is_empty() {
            return Err(AnalyticsError::NotEnoughData(
                "profit distribution needs at least one trade".to_string(),
            ));
        }

        let profits: Vec<f64> = trades.iter().map(|t| to_f64(t.profit)).collect();
        let min = profits.iter().copied().fold(f64::INFINITY, f64::min);
        let max = profits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let bin_width = (max - min) / PROFIT_BINS as f64;

        let bins: Vec<f64> = (0..PROFIT_BINS)
            .map(|i| min + i as f64 * bin_width)
            .collect();
        let mut frequencies = vec![0usize; PROFIT_BINS];

        for profit in profits {
            let index = if bin_width > 0.0 {
                (((profit - min) / bin_width).floor() as usize).min(PROFIT_BINS - 1)
            } else {
                0
            };
            frequencies[index] += 1;
        }

        Ok(ProfitDistribution { bins, frequencies })
    }

    /// Win rate per instrument pair, skipping pairs with fewer than
    /// [`MIN_TRADES_PER_PAIR`] trades. Output is in pair order.
    pub fn correlation_by_pair(&self, trades: &[TradeRecord]) -> Vec<PairWinRate> {
        let mut stats: BTreeMap<&str, (usize, usize)> = BTreeMap::new();

        for trade in trades {
            let (wins, total) = stats.entry(trade.pair.as_str()).or_insert((0, 0));
            *total += 1;
            if trade.profit > Decimal::ZERO {
                *wins += 1;
            }
        }

        stats
            .into_iter()
            .filter(|(_, (_, total))| *total >= MIN_TRADES_PER_PAIR)
            .map(|(pair, (wins, total))| PairWinRate {
                pair: pair.to_string(),
                trades: total,
                win_rate_pct: wins as f64 / total as f64 * 100.0,
            })
            .collect()
    }

    /// The current equity curve next to a synthetic previous period.
    ///
    /// No historical source for the previous period exists yet, so it is
    /// approximated as a fixed fraction of current equity.
    pub fn comparison_series(&self, series: &[PerformancePoint]) -> ComparisonSeries {
        let current = series
            .iter()
            .map(|p| EquityPoint {
                timestamp: p.timestamp,
                equity: p.equity,
            })
            .collect();
        let previous = series
            .iter()
            .map(|p| EquityPoint {
                timestamp: p.timestamp,
                equity: p.equity * PREVIOUS_PERIOD_FACTOR,
            })
            .collect();

        ComparisonSeries { current, previous }
    }

    /// Risk metrics over a trailing [`RISK_WINDOW`]-sample window, one output
    /// point per sample from index `RISK_WINDOW` on. Earlier samples are
    /// omitted entirely, never zero-filled.
    pub fn rolling_risk_metrics(&self, series: &[PerformancePoint]) -> Vec<RiskMetricsPoint> {
        let mut metrics = Vec::new();

        for i in RISK_WINDOW..series.len() {
            let window = &series[i - RISK_WINDOW..i];

            // The window's first sample has no in-window predecessor and
            // contributes a zero return, as does a zero-equity predecessor.
            let returns: Vec<f64> = window
                .iter()
                .enumerate()
                .map(|(j, p)| {
                    if j == 0 {
                        return 0.0;
                    }
                    let prev = to_f64(window[j - 1].equity);
                    if prev == 0.0 {
                        0.0
                    } else {
                        (to_f64(p.equity) - prev) / prev
                    }
                })
                .collect();

            let mean_return = returns.iter().sum::<f64>() / returns.len() as f64;
            let volatility = (returns
                .iter()
                .map(|r| (r - mean_return).powi(2))
                .sum::<f64>()
                / returns.len() as f64)
                .sqrt();

            let negative: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
            let downside_volatility = if negative.is_empty() {
                None
            } else {
                Some((negative.iter().map(|r| r * r).sum::<f64>() / negative.len() as f64).sqrt())
            };

            let max_drawdown_pct = window
                .iter()
                .map(|p| p.drawdown_pct)
                .fold(f64::INFINITY, f64::min);

            let sharpe_ratio = (volatility > 0.0).then(|| (mean_return - RISK_FREE_RATE) / volatility);
            let sortino_ratio = downside_volatility
                .filter(|v| *v > 0.0)
                .map(|v| (mean_return - RISK_FREE_RATE) / v);
            let calmar_ratio =
                (max_drawdown_pct != 0.0).then(|| (mean_return / max_drawdown_pct).abs());

            metrics.push(RiskMetricsPoint {
                timestamp: series[i].timestamp,
                mean_return,
                volatility,
                downside_volatility,
                max_drawdown_pct,
                sharpe_ratio,
                sortino_ratio,
                calmar_ratio,
                alpha: mean_return - RISK_FREE_RATE,
                beta: BENCHMARK_BETA,
            });
        }

        metrics
    }

    /// Outcome summary for each hour of the day (UTC). All 24 slots are always
    /// present; hours with no trades are zero-filled.
    pub fn trade_timing_by_hour(&self, trades: &[TradeRecord]) -> Vec<HourlyTiming> {
        let mut wins = [0usize; 24];
        let mut totals = [0usize; 24];
        let mut profit_sums = [Decimal::ZERO; 24];

        for trade in trades {
            let hour = trade.executed_at.hour() as usize;
            totals[hour] += 1;
            profit_sums[hour] += trade.profit;
            if trade.profit > Decimal::ZERO {
                wins[hour] += 1;
            }
        }

        (0..24)
            .map(|hour| HourlyTiming {
                hour: hour as u32,
                trades: totals[hour],
                win_rate_pct: if totals[hour] > 0 {
                    wins[hour] as f64 / totals[hour] as f64 * 100.0
                } else {
                    0.0
                },
                average_profit: if totals[hour] > 0 {
                    profit_sums[hour] / Decimal::from(totals[hour] as u64)
                } else {
                    Decimal::ZERO
                },
            })
            .collect()
    }

    /// Single forward pass over the trades logging new equity highs and lows,
    /// new max-drawdown records and new longest win/loss streaks, ascending by
    /// timestamp.
    ///
    /// A zero-profit trade counts as a loss for streak purposes. The balance
    /// for a trade comes from the performance sample taken at the same
    /// instant, defaulting to zero when none matches.
    pub fn significant_events(
        &self,
        series: &[PerformancePoint],
        trades: &[TradeRecord],
    ) -> Vec<SignificantEvent> {
        let mut events = Vec::new();

        let mut peak_balance: Option<Decimal> = None;
        let mut trough_balance: Option<Decimal> = None;
        let mut max_drawdown_pct = 0.0f64;
        let mut win_streak = 0usize;
        let mut loss_streak = 0usize;
        let mut longest_win_streak = 0usize;
        let mut longest_loss_streak = 0usize;

        for trade in trades {
            let balance = series
                .iter()
                .find(|p| p.timestamp == trade.executed_at)
                .map(|p| p.balance)
                .unwrap_or(Decimal::ZERO);

            // The first trade always records both a high and a low.
            if peak_balance.is_none_or(|peak| balance > peak) {
                peak_balance = Some(balance);
                events.push(SignificantEvent {
                    timestamp: trade.executed_at,
                    kind: EventKind::EquityHigh,
                    description: format!("New equity high: {balance:.2}"),
                });
            }

            if trough_balance.is_none_or(|trough| balance < trough) {
                trough_balance = Some(balance);
                events.push(SignificantEvent {
                    timestamp: trade.executed_at,
                    kind: EventKind::EquityLow,
                    description: format!("New equity low: {balance:.2}"),
                });
            }

            if let Some(peak) = peak_balance.filter(|p| *p > Decimal::ZERO) {
                let drawdown_pct = to_f64((peak - balance) / peak) * 100.0;
                if drawdown_pct > max_drawdown_pct {
                    max_drawdown_pct = drawdown_pct;
                    events.push(SignificantEvent {
                        timestamp: trade.executed_at,
                        kind: EventKind::MaxDrawdown,
                        description: format!("New max drawdown: {max_drawdown_pct:.2}%"),
                    });
                }
            }

            if trade.profit > Decimal::ZERO {
                win_streak += 1;
                loss_streak = 0;
                if win_streak > longest_win_streak {
                    longest_win_streak = win_streak;
                    events.push(SignificantEvent {
                        timestamp: trade.executed_at,
                        kind: EventKind::WinStreak,
                        description: format!(
                            "New streak: {longest_win_streak} consecutive winning trades"
                        ),
                    });
                }
            } else {
                loss_streak += 1;
                win_streak = 0;
                if loss_streak > longest_loss_streak {
                    longest_loss_streak = loss_streak;
                    events.push(SignificantEvent {
                        timestamp: trade.executed_at,
                        kind: EventKind::LossStreak,
                        description: format!(
                            "New streak: {longest_loss_streak} consecutive losing trades"
                        ),
                    });
                }
            }
        }

        tracing::debug!(events = events.len(), trades = trades.len(), "event log built");

        // The forward pass already emits in order; the contract asks for
        // sorted output regardless. Stable, so same-instant events keep their
        // emission order.
        events.sort_by_key(|e| e.timestamp);
        events
    }
}

/// Finite decimals always have an f64 approximation; the fallback is never hit.
fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use core_types::OrderSide;
    use std::time::Duration;

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    fn point(at: DateTime<Utc>, equity: i64, drawdown_pct: f64) -> PerformancePoint {
        PerformancePoint {
            timestamp: at,
            balance: Decimal::from(equity),
            equity: Decimal::from(equity),
            drawdown_pct,
        }
    }

    fn trade(at: DateTime<Utc>, pair: &str, profit: i64) -> TradeRecord {
        TradeRecord {
            executed_at: at,
            pair: pair.to_string(),
            direction: OrderSide::Buy,
            profit: Decimal::from(profit),
            duration: Duration::from_secs(3600),
        }
    }

    /// A flat series long enough for the rolling window, starting on `day`.
    fn flat_series(len: usize, equity: i64) -> Vec<PerformancePoint> {
        (0..len)
            .map(|i| {
                point(
                    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                        + chrono::Duration::hours(i as i64),
                    equity,
                    0.0,
                )
            })
            .collect()
    }

    #[test]
    fn monthly_returns_skip_the_first_sample() {
        let engine = ChartEngine::new();
        assert!(engine.monthly_returns(&[point(ts(1, 0), 1000, 0.0)]).is_empty());

        let series = [point(ts(1, 0), 1000, 0.0), point(ts(2, 0), 1100, 0.0)];
        let months = engine.monthly_returns(&series);
        assert_eq!(months.len(), 1);
        assert_eq!(months[0].month, "2024-03");
        assert!((months[0].return_pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn monthly_returns_bucket_by_the_later_sample_and_keep_month_order() {
        let engine = ChartEngine::new();
        let series = [
            point(Utc.with_ymd_and_hms(2024, 2, 28, 0, 0, 0).unwrap(), 1000, 0.0),
            // February -> March boundary: the delta belongs to March.
            point(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(), 1050, 0.0),
            point(Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap(), 1155, 0.0),
            point(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap(), 1155, 0.0),
        ];
        let months = engine.monthly_returns(&series);
        assert_eq!(
            months.iter().map(|m| m.month.as_str()).collect::<Vec<_>>(),
            ["2024-03", "2024-04"]
        );
        // March accumulates 5% + 10%.
        assert!((months[0].return_pct - 15.0).abs() < 1e-9);
        assert!((months[1].return_pct - 0.0).abs() < 1e-9);
    }

    #[test]
    fn profit_distribution_counts_sum_to_trade_count() {
        let engine = ChartEngine::new();
        let trades: Vec<TradeRecord> = (0..37)
            .map(|i| trade(ts(1, 0), "EURUSD", i * 3 - 40))
            .collect();

        let histogram = engine.profit_distribution(&trades).unwrap();
        assert_eq!(histogram.bins.len(), 20);
        assert_eq!(histogram.frequencies.len(), 20);
        assert_eq!(histogram.frequencies.iter().sum::<usize>(), trades.len());
        // The maximum profit sits on the upper edge and lands in the last bin.
        assert!(histogram.frequencies[19] >= 1);
    }

    #[test]
    fn profit_distribution_rejects_empty_input() {
        let engine = ChartEngine::new();
        assert!(matches!(
            engine.profit_distribution(&[]),
            Err(AnalyticsError::NotEnoughData(_))
        ));
    }

    #[test]
    fn profit_distribution_degenerate_range_collapses_into_bin_zero() {
        let engine = ChartEngine::new();
        let trades: Vec<TradeRecord> = (0..5).map(|_| trade(ts(1, 0), "EURUSD", 7)).collect();

        let histogram = engine.profit_distribution(&trades).unwrap();
        assert_eq!(histogram.frequencies[0], 5);
        assert_eq!(histogram.frequencies.iter().sum::<usize>(), 5);
    }

    #[test]
    fn correlation_excludes_pairs_below_the_significance_cutoff() {
        let engine = ChartEngine::new();
        let mut trades = Vec::new();
        // 12 winners and 3 losers on EURUSD, 9 trades on GBPUSD (one short).
        for _ in 0..12 {
            trades.push(trade(ts(1, 0), "EURUSD", 5));
        }
        for _ in 0..3 {
            trades.push(trade(ts(1, 1), "EURUSD", -3));
        }
        for _ in 0..9 {
            trades.push(trade(ts(1, 2), "GBPUSD", 4));
        }

        let rates = engine.correlation_by_pair(&trades);
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].pair, "EURUSD");
        assert_eq!(rates[0].trades, 15);
        assert!((rates[0].win_rate_pct - 80.0).abs() < 1e-9);
    }

    #[test]
    fn correlation_keeps_a_pair_at_exactly_ten_trades() {
        let engine = ChartEngine::new();
        let trades: Vec<TradeRecord> =
            (0..10).map(|_| trade(ts(1, 0), "USDJPY", -1)).collect();

        let rates = engine.correlation_by_pair(&trades);
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].win_rate_pct, 0.0);
    }

    #[test]
    fn comparison_previous_period_is_eighty_percent_of_current() {
        let engine = ChartEngine::new();
        let series = [point(ts(1, 0), 1000, 0.0), point(ts(2, 0), 1200, 0.0)];

        let comparison = engine.comparison_series(&series);
        assert_eq!(comparison.current.len(), 2);
        assert_eq!(comparison.previous.len(), 2);
        assert_eq!(comparison.previous[0].equity, Decimal::from(800));
        assert_eq!(comparison.previous[1].equity, Decimal::from(960));
        assert_eq!(comparison.current[0].equity, Decimal::from(1000));
    }

    #[test]
    fn rolling_metrics_need_more_than_the_window() {
        let engine = ChartEngine::new();
        assert!(engine.rolling_risk_metrics(&flat_series(29, 1000)).is_empty());
        assert!(engine.rolling_risk_metrics(&flat_series(30, 1000)).is_empty());
        assert_eq!(engine.rolling_risk_metrics(&flat_series(31, 1000)).len(), 1);
        assert_eq!(engine.rolling_risk_metrics(&flat_series(35, 1000)).len(), 5);
    }

    #[test]
    fn rolling_metrics_on_a_flat_series_have_no_defined_ratios() {
        let engine = ChartEngine::new();
        let metrics = engine.rolling_risk_metrics(&flat_series(31, 1000));
        let m = &metrics[0];

        assert_eq!(m.mean_return, 0.0);
        assert_eq!(m.volatility, 0.0);
        assert_eq!(m.downside_volatility, None);
        assert_eq!(m.sharpe_ratio, None);
        assert_eq!(m.sortino_ratio, None);
        assert_eq!(m.calmar_ratio, None);
        assert_eq!(m.beta, 1.0);
        assert!((m.alpha + RISK_FREE_RATE).abs() < 1e-12);
        assert_eq!(m.timestamp, flat_series(31, 1000)[30].timestamp);
    }

    #[test]
    fn rolling_metrics_track_the_window_drawdown_minimum() {
        let engine = ChartEngine::new();
        let mut series = flat_series(32, 1000);
        // A drawdown trough inside the first window, plus some volatility so
        // the ratios are defined.
        series[10].drawdown_pct = -12.5;
        series[11].equity = Decimal::from(900);

        let metrics = engine.rolling_risk_metrics(&series);
        assert_eq!(metrics[0].max_drawdown_pct, -12.5);
        assert!(metrics[0].volatility > 0.0);
        assert!(metrics[0].sharpe_ratio.is_some());
        assert!(metrics[0].sortino_ratio.is_some());
        assert!(metrics[0].calmar_ratio.unwrap() > 0.0);
    }

    #[test]
    fn timing_always_emits_twenty_four_hours() {
        let engine = ChartEngine::new();

        let empty = engine.trade_timing_by_hour(&[]);
        assert_eq!(empty.len(), 24);
        assert!(empty.iter().enumerate().all(|(i, h)| h.hour == i as u32
            && h.trades == 0
            && h.win_rate_pct == 0.0
            && h.average_profit == Decimal::ZERO));

        let trades = [
            trade(ts(1, 9), "EURUSD", 10),
            trade(ts(2, 9), "EURUSD", -4),
            trade(ts(3, 14), "GBPUSD", 6),
        ];
        let timing = engine.trade_timing_by_hour(&trades);
        assert_eq!(timing.len(), 24);
        assert_eq!(timing[9].trades, 2);
        assert!((timing[9].win_rate_pct - 50.0).abs() < 1e-9);
        assert_eq!(timing[9].average_profit, Decimal::from(3));
        assert_eq!(timing[14].trades, 1);
        assert_eq!(timing[0].trades, 0);
    }

    #[test]
    fn significant_events_record_highs_lows_and_streaks() {
        let engine = ChartEngine::new();
        let series = [
            point(ts(1, 0), 1000, 0.0),
            point(ts(2, 0), 1100, 0.0),
            point(ts(3, 0), 900, 0.0),
        ];
        let trades = [
            trade(ts(1, 0), "EURUSD", 5),
            trade(ts(2, 0), "EURUSD", 5),
            trade(ts(3, 0), "EURUSD", -7),
        ];

        let events = engine.significant_events(&series, &trades);

        // First trade: high, low, and a 1-win streak.
        let first: Vec<EventKind> = events
            .iter()
            .filter(|e| e.timestamp == ts(1, 0))
            .map(|e| e.kind)
            .collect();
        assert_eq!(
            first,
            [EventKind::EquityHigh, EventKind::EquityLow, EventKind::WinStreak]
        );

        // Second trade: new high and a longer win streak.
        assert!(events
            .iter()
            .any(|e| e.timestamp == ts(2, 0) && e.kind == EventKind::EquityHigh));
        assert!(events.iter().any(|e| e.kind == EventKind::WinStreak
            && e.description.contains("2 consecutive winning trades")));

        // Third trade: balance fell below the first low and off the peak.
        assert!(events
            .iter()
            .any(|e| e.timestamp == ts(3, 0) && e.kind == EventKind::EquityLow));
        assert!(events
            .iter()
            .any(|e| e.timestamp == ts(3, 0) && e.kind == EventKind::MaxDrawdown));
        assert!(events
            .iter()
            .any(|e| e.timestamp == ts(3, 0) && e.kind == EventKind::LossStreak));

        // Chronological output.
        assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn zero_profit_counts_as_a_loss_for_streaks() {
        let engine = ChartEngine::new();
        let trades = [
            trade(ts(1, 0), "EURUSD", 5),
            trade(ts(2, 0), "EURUSD", 0),
            trade(ts(3, 0), "EURUSD", -1),
        ];

        let events = engine.significant_events(&[], &trades);
        assert!(events.iter().any(|e| e.kind == EventKind::LossStreak
            && e.description.contains("2 consecutive losing trades")));
    }

    #[test]
    fn streak_events_fire_only_on_new_records() {
        let engine = ChartEngine::new();
        // Win-loss alternation after the first win never beats streak 1 again.
        let trades = [
            trade(ts(1, 0), "EURUSD", 5),
            trade(ts(2, 0), "EURUSD", -5),
            trade(ts(3, 0), "EURUSD", 5),
            trade(ts(4, 0), "EURUSD", -5),
        ];

        let events = engine.significant_events(&[], &trades);
        let win_streaks = events
            .iter()
            .filter(|e| e.kind == EventKind::WinStreak)
            .count();
        let loss_streaks = events
            .iter()
            .filter(|e| e.kind == EventKind::LossStreak)
            .count();
        assert_eq!(win_streaks, 1);
        assert_eq!(loss_streaks, 1);
    }
}
