//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first close, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! No warmup: every point is defined. A span of 0 yields an undefined series.

use crate::domain::indicator::rolling::{exponential_smoothing, smoothing_factor};
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::price::{closes, PricePoint};

pub fn calculate_ema(prices: &[PricePoint], span: usize) -> IndicatorSeries {
    let values = if span == 0 {
        vec![None; prices.len()]
    } else {
        exponential_smoothing(&closes(prices), smoothing_factor(span))
            .into_iter()
            .map(Some)
            .collect()
    };
    IndicatorSeries::from_values(IndicatorType::Ema(span), prices, values)
}
