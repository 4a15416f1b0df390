//! Price history port trait.

use crate::domain::error::SignalError;
use crate::domain::price::PricePoint;
use chrono::NaiveDate;

pub trait PriceDataPort {
    /// Daily closes for `symbol` within `[start_date, end_date]`, ascending.
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, SignalError>;

    fn list_symbols(&self) -> Result<Vec<String>, SignalError>;
}
