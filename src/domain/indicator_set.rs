//! The full indicator set derived from one close-price series.
//!
//! Every series has exactly the length of the input and is index-aligned
//! with it. `None` marks points where the window is not yet full.

use crate::domain::indicator::bollinger::{self, calculate_bollinger};
use crate::domain::indicator::macd::calculate_macd_default;
use crate::domain::indicator::rsi;
use crate::domain::indicator::{calculate_ema, calculate_rsi, calculate_sma};
use crate::domain::price::PricePoint;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub dates: Vec<NaiveDate>,
    pub closes: Vec<f64>,
    pub sma_50: Vec<Option<f64>>,
    pub sma_100: Vec<Option<f64>>,
    pub sma_200: Vec<Option<f64>>,
    pub rsi_14: Vec<Option<f64>>,
    pub ema_12: Vec<Option<f64>>,
    pub ema_26: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub bollinger_upper: Vec<Option<f64>>,
    pub bollinger_lower: Vec<Option<f64>>,
}

/// One row of the indicator set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub date: NaiveDate,
    pub close: f64,
    pub sma_50: Option<f64>,
    pub sma_100: Option<f64>,
    pub sma_200: Option<f64>,
    pub rsi_14: Option<f64>,
    pub ema_12: Option<f64>,
    pub ema_26: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_lower: Option<f64>,
}

impl IndicatorSnapshot {
    /// `Some(true)` when the MACD line is strictly above its signal line.
    pub fn macd_above_signal(&self) -> Option<bool> {
        Some(self.macd? > self.macd_signal?)
    }
}

pub fn compute_indicators(prices: &[PricePoint]) -> IndicatorSet {
    let macd = calculate_macd_default(prices);
    let bands = calculate_bollinger(
        prices,
        bollinger::DEFAULT_PERIOD,
        bollinger::DEFAULT_STDDEV_MULT_X100,
    );

    IndicatorSet {
        dates: prices.iter().map(|p| p.date).collect(),
        closes: prices.iter().map(|p| p.close).collect(),
        sma_50: calculate_sma(prices, 50).raw(),
        sma_100: calculate_sma(prices, 100).raw(),
        sma_200: calculate_sma(prices, 200).raw(),
        rsi_14: calculate_rsi(prices, rsi::DEFAULT_PERIOD).raw(),
        ema_12: calculate_ema(prices, 12).raw(),
        ema_26: calculate_ema(prices, 26).raw(),
        macd: macd.line.raw(),
        macd_signal: macd.signal.raw(),
        bollinger_upper: bands.upper.raw(),
        bollinger_lower: bands.lower.raw(),
    }
}

impl IndicatorSet {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// The price series the set was computed from.
    pub fn prices(&self) -> Vec<PricePoint> {
        self.dates
            .iter()
            .zip(&self.closes)
            .map(|(date, close)| PricePoint::new(*date, *close))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn row(&self, i: usize) -> Option<IndicatorSnapshot> {
        Some(IndicatorSnapshot {
            date: *self.dates.get(i)?,
            close: *self.closes.get(i)?,
            sma_50: self.sma_50[i],
            sma_100: self.sma_100[i],
            sma_200: self.sma_200[i],
            rsi_14: self.rsi_14[i],
            ema_12: self.ema_12[i],
            ema_26: self.ema_26[i],
            macd: self.macd[i],
            macd_signal: self.macd_signal[i],
            bollinger_upper: self.bollinger_upper[i],
            bollinger_lower: self.bollinger_lower[i],
        })
    }

    pub fn latest(&self) -> Option<IndicatorSnapshot> {
        self.len().checked_sub(1).and_then(|i| self.row(i))
    }
}
