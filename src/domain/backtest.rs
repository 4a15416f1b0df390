//! Fixed-holding-period backtest gated by a signal score.
//!
//! Every entry day `i` in `[0, len - holding_period)` that passes the gate
//! opens a hypothetical trade at `close[i]` and exits at `close[i + holding_period]`.
//! Trades are not compounded and may overlap in time; there is no capital,
//! sizing, commission or slippage model.

use crate::domain::price::PricePoint;
use crate::domain::score::round2;
use chrono::NaiveDate;

pub const DEFAULT_HOLDING_PERIOD: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct HypotheticalTrade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    pub return_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestReport {
    pub total_trades: usize,
    pub win_rate_pct: f64,
    pub avg_return_pct: f64,
    pub cumulative_return_pct: f64,
    pub holding_period_days: usize,
    pub trades: Vec<HypotheticalTrade>,
}

impl BacktestReport {
    fn from_trades(trades: Vec<HypotheticalTrade>, holding_period_days: usize) -> Self {
        let total_trades = trades.len();
        if total_trades == 0 {
            return Self {
                total_trades,
                win_rate_pct: 0.0,
                avg_return_pct: 0.0,
                cumulative_return_pct: 0.0,
                holding_period_days,
                trades,
            };
        }

        let wins = trades.iter().filter(|t| t.return_pct > 0.0).count();
        let cumulative: f64 = trades.iter().map(|t| t.return_pct).sum();

        Self {
            total_trades,
            win_rate_pct: round2(wins as f64 / total_trades as f64 * 100.0),
            avg_return_pct: round2(cumulative / total_trades as f64),
            cumulative_return_pct: round2(cumulative),
            holding_period_days,
            trades,
        }
    }
}

/// Gates the whole window on one score: either every entry day qualifies
/// (`signal_score > threshold`) or none does.
pub fn run_backtest(
    prices: &[PricePoint],
    signal_score: f64,
    threshold: f64,
    holding_period_days: usize,
) -> BacktestReport {
    let scores = vec![Some(signal_score); prices.len()];
    run_backtest_with_scores(prices, &scores, threshold, holding_period_days)
}

/// Gates each entry day on the score recorded for that day. Days without a
/// score (or beyond the end of `scores`) never trade.
pub fn run_backtest_with_scores(
    prices: &[PricePoint],
    scores: &[Option<f64>],
    threshold: f64,
    holding_period_days: usize,
) -> BacktestReport {
    if scores.len() != prices.len() {
        log::warn!(
            "score series length {} does not match price series length {}",
            scores.len(),
            prices.len()
        );
    }

    let entries = prices.len().saturating_sub(holding_period_days);
    let mut trades = Vec::new();

    for i in 0..entries {
        let qualifies = scores
            .get(i)
            .copied()
            .flatten()
            .is_some_and(|score| score > threshold);
        if !qualifies {
            continue;
        }

        let entry = prices[i];
        let exit = prices[i + holding_period_days];
        if !entry.close.is_finite() || entry.close <= 0.0 {
            log::warn!("skipping entry on {} with unusable close {}", entry.date, entry.close);
            continue;
        }
        if !exit.close.is_finite() {
            log::warn!("skipping entry on {}: exit close on {} is {}", entry.date, exit.date, exit.close);
            continue;
        }

        trades.push(HypotheticalTrade {
            entry_date: entry.date,
            exit_date: exit.date,
            entry_price: entry.close,
            exit_price: exit.close,
            return_pct: (exit.close - entry.close) / entry.close * 100.0,
        });
    }

    BacktestReport::from_trades(trades, holding_period_days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_prices;
    use approx::assert_relative_eq;

    fn rising(n: usize) -> Vec<PricePoint> {
        let closes: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        make_prices(&closes)
    }

    #[test]
    fn score_at_threshold_makes_no_trades() {
        let report = run_backtest(&rising(30), 75.0, 75.0, 10);
        assert_eq!(report.total_trades, 0);
        assert_eq!(report.win_rate_pct, 0.0);
        assert_eq!(report.avg_return_pct, 0.0);
        assert_eq!(report.cumulative_return_pct, 0.0);
        assert_eq!(report.holding_period_days, 10);
        assert!(report.trades.is_empty());
    }

    #[test]
    fn rising_series_every_trade_wins() {
        let prices = rising(30);
        let report = run_backtest(&prices, 80.0, 75.0, 10);

        assert_eq!(report.total_trades, 20);
        assert_relative_eq!(report.win_rate_pct, 100.0);

        let expected: f64 = (0..20)
            .map(|i| {
                let entry = 100.0 + i as f64;
                (entry + 10.0 - entry) / entry * 100.0
            })
            .sum();
        assert_relative_eq!(report.cumulative_return_pct, round2(expected));
        assert_relative_eq!(report.avg_return_pct, round2(expected / 20.0));
    }

    #[test]
    fn trade_fields() {
        let prices = make_prices(&[100.0, 90.0, 120.0]);
        let report = run_backtest(&prices, 90.0, 50.0, 2);

        assert_eq!(report.total_trades, 1);
        let trade = &report.trades[0];
        assert_eq!(trade.entry_date, prices[0].date);
        assert_eq!(trade.exit_date, prices[2].date);
        assert_relative_eq!(trade.return_pct, 20.0);
    }

    #[test]
    fn mixed_returns() {
        // entries: 100→110 (+10%), 120→99 (-17.5%), 110→110 (0%)
        let prices = make_prices(&[100.0, 120.0, 110.0, 110.0, 99.0, 110.0]);
        let report = run_backtest(&prices, 90.0, 50.0, 3);

        assert_eq!(report.total_trades, 3);
        assert_relative_eq!(report.win_rate_pct, 33.33);
        assert_relative_eq!(report.cumulative_return_pct, -7.5);
        assert_relative_eq!(report.avg_return_pct, -2.5);
    }

    #[test]
    fn series_shorter_than_holding_period() {
        let report = run_backtest(&rising(5), 90.0, 50.0, 10);
        assert_eq!(report.total_trades, 0);
    }

    #[test]
    fn empty_series() {
        let report = run_backtest(&[], 90.0, 50.0, DEFAULT_HOLDING_PERIOD);
        assert_eq!(report.total_trades, 0);
    }

    #[test]
    fn non_positive_entry_skipped() {
        let prices = make_prices(&[0.0, 10.0, 11.0, 12.0]);
        let report = run_backtest(&prices, 90.0, 50.0, 1);
        assert_eq!(report.total_trades, 2);
        assert!(report.trades.iter().all(|t| t.return_pct.is_finite()));
    }

    #[test]
    fn non_finite_close_skips_trades_touching_it() {
        let mut closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        closes[15] = f64::NAN;
        closes[25] = f64::INFINITY;
        let prices = make_prices(&closes);
        let report = run_backtest(&prices, 80.0, 75.0, 10);

        // entries 5 and 15 exit/enter on the NaN day, entry 15 also exits on inf
        assert_eq!(report.total_trades, 18);
        assert!(report.trades.iter().all(|t| t.return_pct.is_finite()));
        assert!(report.cumulative_return_pct.is_finite());
        assert!(report.avg_return_pct.is_finite());
        assert_relative_eq!(report.win_rate_pct, 100.0);
    }

    #[test]
    fn per_day_scores_gate_each_entry() {
        let prices = rising(6);
        let scores = vec![Some(80.0), Some(40.0), None, Some(90.0), Some(99.0), Some(99.0)];
        let report = run_backtest_with_scores(&prices, &scores, 75.0, 2);

        let entries: Vec<NaiveDate> = report.trades.iter().map(|t| t.entry_date).collect();
        assert_eq!(entries, vec![prices[0].date, prices[3].date]);
    }

    #[test]
    fn short_score_series_stops_trading() {
        let prices = rising(6);
        let report = run_backtest_with_scores(&prices, &[Some(90.0)], 75.0, 1);
        assert_eq!(report.total_trades, 1);
    }
}
