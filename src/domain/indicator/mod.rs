//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorType`: Enum for indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: A time series of indicator values aligned 1:1 with prices
//!
//! Undefined values (warm-up window, degenerate parameters) are `None`, never zero.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rolling;
pub mod rsi;
pub mod sma;

pub use bollinger::calculate_bollinger;
pub use ema::calculate_ema;
pub use macd::calculate_macd;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

use crate::domain::price::PricePoint;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl IndicatorPoint {
    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    MacdSignal {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    BollingerUpper {
        period: usize,
        stddev_mult_x100: u32,
    },
    BollingerMiddle {
        period: usize,
    },
    BollingerLower {
        period: usize,
        stddev_mult_x100: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Pairs each computed value with the date of the price at the same index.
    pub(crate) fn from_values(
        indicator_type: IndicatorType,
        prices: &[PricePoint],
        values: Vec<Option<f64>>,
    ) -> Self {
        debug_assert_eq!(prices.len(), values.len());
        let values = prices
            .iter()
            .zip(values)
            .map(|(p, value)| IndicatorPoint {
                date: p.date,
                value,
            })
            .collect();
        Self {
            indicator_type,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn raw(&self) -> Vec<Option<f64>> {
        self.values.iter().map(|p| p.value).collect()
    }

    pub fn last_value(&self) -> Option<f64> {
        self.values.last().and_then(|p| p.value)
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(span) => write!(f, "EMA({})", span),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::MacdSignal { fast, slow, signal } => {
                write!(f, "MACD_SIGNAL({},{},{})", fast, slow, signal)
            }
            IndicatorType::BollingerUpper {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER_UPPER({},{})", period, mult)
            }
            IndicatorType::BollingerMiddle { period } => write!(f, "BOLLINGER_MIDDLE({})", period),
            IndicatorType::BollingerLower {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER_LOWER({},{})", period, mult)
            }
        }
    }
}
