//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//!
//! Both EMAs are seeded with the first close, so every point is defined.
//! Default parameters: fast=12, slow=26, signal=9

use crate::domain::indicator::rolling::{exponential_smoothing, smoothing_factor};
use crate::domain::indicator::{calculate_ema, IndicatorSeries, IndicatorType};
use crate::domain::price::PricePoint;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: IndicatorSeries,
    pub signal: IndicatorSeries,
}

pub fn calculate_macd(
    prices: &[PricePoint],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> MacdSeries {
    let line_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };
    let signal_type = IndicatorType::MacdSignal {
        fast,
        slow,
        signal: signal_period,
    };

    if fast == 0 || slow == 0 || signal_period == 0 {
        return MacdSeries {
            line: IndicatorSeries::from_values(line_type, prices, vec![None; prices.len()]),
            signal: IndicatorSeries::from_values(signal_type, prices, vec![None; prices.len()]),
        };
    }

    let ema_fast = calculate_ema(prices, fast).raw();
    let ema_slow = calculate_ema(prices, slow).raw();

    let line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f.unwrap_or(0.0) - s.unwrap_or(0.0))
        .collect();
    let signal = exponential_smoothing(&line, smoothing_factor(signal_period));

    MacdSeries {
        line: IndicatorSeries::from_values(line_type, prices, line.into_iter().map(Some).collect()),
        signal: IndicatorSeries::from_values(
            signal_type,
            prices,
            signal.into_iter().map(Some).collect(),
        ),
    }
}

pub fn calculate_macd_default(prices: &[PricePoint]) -> MacdSeries {
    calculate_macd(prices, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
