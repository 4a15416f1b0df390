#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use signalscore::domain::error::SignalError;
use signalscore::domain::fundamentals::{BrokerRating, FundamentalSnapshot};
pub use signalscore::domain::price::PricePoint;
use signalscore::ports::data_port::PriceDataPort;
use signalscore::ports::fundamentals_port::{BrokerRatingPort, FundamentalsPort};
use signalscore::ports::sector_pe_port::SectorPePort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_prices(mut self, symbol: &str, prices: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), prices);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PriceDataPort for MockDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, SignalError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SignalError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|prices| {
                prices
                    .iter()
                    .filter(|p| p.date >= start_date && p.date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

#[derive(Default)]
pub struct MockFundamentals {
    pub snapshots: HashMap<String, FundamentalSnapshot>,
    pub broker: HashMap<String, BrokerRating>,
    pub sector_pe: HashMap<String, f64>,
    pub fail: bool,
}

impl MockFundamentals {
    pub fn with_snapshot(mut self, symbol: &str, snapshot: FundamentalSnapshot) -> Self {
        self.snapshots.insert(symbol.to_string(), snapshot);
        self
    }

    pub fn with_broker(mut self, code: &str, rating: u8) -> Self {
        self.broker
            .insert(code.to_string(), BrokerRating::new(rating).unwrap());
        self
    }

    pub fn with_sector_pe(mut self, sector: &str, pe: f64) -> Self {
        self.sector_pe.insert(sector.to_string(), pe);
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn check(&self) -> Result<(), SignalError> {
        if self.fail {
            return Err(SignalError::Data {
                reason: "collaborator offline".into(),
            });
        }
        Ok(())
    }
}

impl FundamentalsPort for MockFundamentals {
    fn fetch_fundamentals(&self, symbol: &str) -> Result<FundamentalSnapshot, SignalError> {
        self.check()?;
        Ok(self.snapshots.get(symbol).cloned().unwrap_or_default())
    }
}

impl BrokerRatingPort for MockFundamentals {
    fn fetch_broker_rating(&self, code: &str) -> Result<Option<BrokerRating>, SignalError> {
        self.check()?;
        Ok(self.broker.get(code).copied())
    }
}

impl SectorPePort for MockFundamentals {
    fn fetch_sector_pe(&self) -> Result<HashMap<String, f64>, SignalError> {
        self.check()?;
        Ok(self.sector_pe.clone())
    }
}

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// One point per calendar day from 2024-01-01.
pub fn make_prices(closes: &[f64]) -> Vec<PricePoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint::new(start_date() + Duration::days(i as i64), close))
        .collect()
}

pub fn last_date(prices: &[PricePoint]) -> NaiveDate {
    prices.last().map(|p| p.date).unwrap_or_else(start_date)
}

/// `[100, 101, ..., 100 + n - 1]`
pub fn monotonic_closes(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 + i as f64).collect()
}

pub fn write_price_csv(dir: &std::path::Path, symbol: &str, prices: &[PricePoint]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for p in prices {
        content.push_str(&format!(
            "{},{},{},{},{},1000\n",
            p.date,
            p.close,
            p.close + 1.0,
            p.close - 1.0,
            p.close
        ));
    }
    std::fs::write(dir.join(format!("{symbol}.csv")), content).unwrap();
}
