//! RSI (Relative Strength Index) indicator implementation.
//!
//! Uses simple trailing means of gains and losses (not Wilder's smoothing):
//! - delta[i] = C[i] - C[i-1]
//! - gain = max(delta, 0), loss = max(-delta, 0)
//! - avg_gain / avg_loss = rolling mean over the last n deltas
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first n points are undefined (need n price changes).

use crate::domain::indicator::rolling::rolling_mean;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::price::PricePoint;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(prices: &[PricePoint], period: usize) -> IndicatorSeries {
    if prices.is_empty() {
        return IndicatorSeries::from_values(IndicatorType::Rsi(period), prices, Vec::new());
    }

    let mut gains = Vec::with_capacity(prices.len() - 1);
    let mut losses = Vec::with_capacity(prices.len() - 1);
    for pair in prices.windows(2) {
        let change = pair[1].close - pair[0].close;
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let avg_gains = rolling_mean(&gains, period);
    let avg_losses = rolling_mean(&losses, period);

    let mut values = Vec::with_capacity(prices.len());
    values.push(None);
    for (avg_gain, avg_loss) in avg_gains.into_iter().zip(avg_losses) {
        values.push(match (avg_gain, avg_loss) {
            (Some(g), Some(l)) => Some(rsi_from_averages(g, l)),
            _ => None,
        });
    }

    IndicatorSeries::from_values(IndicatorType::Rsi(period), prices, values)
}

/// Zero average loss is the all-gains limit (including a flat window).
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rsi = 100.0 - (100.0 / (1.0 + avg_gain / avg_loss));
    rsi.clamp(0.0, 100.0)
}
