//! Daily close-price points and series ordering checks.

use crate::domain::error::SignalError;
use chrono::NaiveDate;

/// One trading day. Only the close is consumed by the indicator engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Closing prices in series order.
pub fn closes(prices: &[PricePoint]) -> Vec<f64> {
    prices.iter().map(|p| p.close).collect()
}

/// Checks that dates are strictly ascending. Gaps are allowed.
pub fn validate_series(prices: &[PricePoint]) -> Result<(), SignalError> {
    for pair in prices.windows(2) {
        let (prev, curr) = (pair[0].date, pair[1].date);
        if curr == prev {
            return Err(SignalError::DuplicateDate { date: curr });
        }
        if curr < prev {
            return Err(SignalError::UnorderedSeries {
                date: curr,
                previous: prev,
            });
        }
    }
    Ok(())
}
