//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is the sample standard deviation (divides by N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) points are undefined.

use crate::domain::indicator::rolling::{rolling_mean, rolling_sample_std};
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::price::{closes, PricePoint};

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_STDDEV_MULT_X100: u32 = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: IndicatorSeries,
    pub middle: IndicatorSeries,
    pub lower: IndicatorSeries,
}

pub fn calculate_bollinger(
    prices: &[PricePoint],
    period: usize,
    stddev_mult_x100: u32,
) -> BollingerBands {
    let closes = closes(prices);
    let mult = stddev_mult_x100 as f64 / 100.0;
    let middle = rolling_mean(&closes, period);
    let stddev = rolling_sample_std(&closes, period);

    let band = |sign: f64| -> Vec<Option<f64>> {
        middle
            .iter()
            .zip(&stddev)
            .map(|(m, s)| match (m, s) {
                (Some(m), Some(s)) => Some(m + sign * mult * s),
                _ => None,
            })
            .collect()
    };
    let upper = band(1.0);
    let lower = band(-1.0);

    BollingerBands {
        upper: IndicatorSeries::from_values(
            IndicatorType::BollingerUpper {
                period,
                stddev_mult_x100,
            },
            prices,
            upper,
        ),
        middle: IndicatorSeries::from_values(
            IndicatorType::BollingerMiddle { period },
            prices,
            middle,
        ),
        lower: IndicatorSeries::from_values(
            IndicatorType::BollingerLower {
                period,
                stddev_mult_x100,
            },
            prices,
            lower,
        ),
    }
}
