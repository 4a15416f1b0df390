//! Market selection and ticker list parsing.

use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Market {
    Asx,
    Us,
}

impl Market {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_uppercase().as_str() {
            "ASX" => Some(Market::Asx),
            "US" => Some(Market::Us),
            _ => None,
        }
    }

    /// Data-source symbol for a bare code: ASX codes carry a `.AX` suffix.
    pub fn symbol(self, code: &str) -> String {
        let code = code.trim().to_uppercase();
        match self {
            Market::Asx if !code.ends_with(".AX") => format!("{code}.AX"),
            _ => code,
        }
    }

    /// Bare code without any exchange suffix.
    pub fn code(self, symbol: &str) -> String {
        let symbol = symbol.trim().to_uppercase();
        match self {
            Market::Asx => symbol.strip_suffix(".AX").unwrap_or(&symbol).to_string(),
            Market::Us => symbol,
        }
    }

    /// Broker consensus is only published for ASX codes.
    pub fn has_broker_consensus(self) -> bool {
        matches!(self, Market::Asx)
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Market::Asx => f.write_str("ASX"),
            Market::Us => f.write_str("US"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TickerListError {
    #[error("empty ticker list")]
    Empty,
}

/// Splits a comma-separated list, trimming and upper-casing each entry.
/// Blank entries are ignored and repeats keep their first position.
pub fn parse_tickers(input: &str) -> Result<Vec<String>, TickerListError> {
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let ticker = token.trim().to_uppercase();
        if ticker.is_empty() {
            continue;
        }
        if !seen.insert(ticker.clone()) {
            log::warn!("ignoring repeated ticker {ticker}");
            continue;
        }
        tickers.push(ticker);
    }

    if tickers.is_empty() {
        return Err(TickerListError::Empty);
    }
    Ok(tickers)
}
