//! Fundamentals and broker consensus port traits.

use crate::domain::error::SignalError;
use crate::domain::fundamentals::{BrokerRating, FundamentalSnapshot};

pub trait FundamentalsPort {
    /// An unknown symbol yields an empty snapshot, not an error.
    fn fetch_fundamentals(&self, symbol: &str) -> Result<FundamentalSnapshot, SignalError>;
}

pub trait BrokerRatingPort {
    /// `None` when no broker covers `code`.
    fn fetch_broker_rating(&self, code: &str) -> Result<Option<BrokerRating>, SignalError>;
}
