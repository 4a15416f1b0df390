//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]). Warmup: first (n-1) points are undefined.

use crate::domain::indicator::rolling::rolling_mean;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::price::{closes, PricePoint};

pub fn calculate_sma(prices: &[PricePoint], period: usize) -> IndicatorSeries {
    let values = rolling_mean(&closes(prices), period);
    IndicatorSeries::from_values(IndicatorType::Sma(period), prices, values)
}
