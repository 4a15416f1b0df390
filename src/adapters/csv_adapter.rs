//! CSV file data adapter.
//!
//! One directory holds every collaborator file:
//!
//! - `<SYMBOL>.csv` daily prices; only the `date` and `close` columns are read
//! - `fundamentals.csv` one row per ticker, empty cells are absent values
//! - `sector_pe.csv` `sector,pe`
//! - `broker_consensus.csv` `ticker,rating` with free-text ratings
//! - `news.csv` `ticker,title,source`
//!
//! Only the price file is mandatory for a symbol.

use crate::domain::error::SignalError;
use crate::domain::fundamentals::{BrokerRating, FundamentalSnapshot, NewsItem};
use crate::domain::price::{validate_series, PricePoint};
use crate::ports::data_port::PriceDataPort;
use crate::ports::fundamentals_port::{BrokerRatingPort, FundamentalsPort};
use crate::ports::sector_pe_port::SectorPePort;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const FUNDAMENTALS_FILE: &str = "fundamentals.csv";
pub const SECTOR_PE_FILE: &str = "sector_pe.csv";
pub const BROKER_FILE: &str = "broker_consensus.csv";
pub const NEWS_FILE: &str = "news.csv";

const RESERVED_FILES: [&str; 4] = [FUNDAMENTALS_FILE, SECTOR_PE_FILE, BROKER_FILE, NEWS_FILE];

pub struct CsvAdapter {
    base_path: PathBuf,
}

/// A parsed file with header positions resolved by name.
struct Table {
    path: PathBuf,
    columns: HashMap<String, usize>,
    records: Vec<csv::StringRecord>,
}

impl Table {
    fn column(&self, name: &str) -> Result<usize, SignalError> {
        self.columns
            .get(name)
            .copied()
            .ok_or_else(|| SignalError::Data {
                reason: format!("{}: missing {} column", self.path.display(), name),
            })
    }

    fn optional_column(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }
}

fn cell(record: &csv::StringRecord, index: Option<usize>) -> Option<&str> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_number(
    record: &csv::StringRecord,
    index: Option<usize>,
    name: &str,
) -> Result<Option<f64>, SignalError> {
    match cell(record, index) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .map(Some)
            .map_err(|e| SignalError::Data {
                reason: format!("invalid {} value '{}': {}", name, raw, e),
            }),
    }
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_table(path: &Path) -> Result<Table, SignalError> {
        let content = fs::read_to_string(path).map_err(|e| SignalError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());

        let columns = rdr
            .headers()
            .map_err(|e| SignalError::Data {
                reason: format!("{}: CSV header error: {}", path.display(), e),
            })?
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_lowercase(), i))
            .collect();

        let records = rdr
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SignalError::Data {
                reason: format!("{}: CSV parse error: {}", path.display(), e),
            })?;

        Ok(Table {
            path: path.to_path_buf(),
            columns,
            records,
        })
    }

    /// Reads an optional collaborator file; a missing file is `None`.
    fn read_optional(&self, name: &str) -> Result<Option<Table>, SignalError> {
        let path = self.base_path.join(name);
        if !path.exists() {
            log::debug!("{} not present, skipping", path.display());
            return Ok(None);
        }
        Self::read_table(&path).map(Some)
    }

    fn news_for(&self, symbol: &str) -> Result<Vec<NewsItem>, SignalError> {
        let Some(table) = self.read_optional(NEWS_FILE)? else {
            return Ok(Vec::new());
        };
        let ticker = table.column("ticker")?;
        let title = table.column("title")?;
        let source = table.optional_column("source");

        Ok(table
            .records
            .iter()
            .filter(|r| cell(r, Some(ticker)).is_some_and(|t| t.eq_ignore_ascii_case(symbol)))
            .filter_map(|r| {
                cell(r, Some(title)).map(|t| NewsItem {
                    title: t.to_string(),
                    source: cell(r, source).map(str::to_string),
                })
            })
            .collect())
    }
}

impl PriceDataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, SignalError> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            return Err(SignalError::NoData {
                symbol: symbol.to_string(),
            });
        }

        let table = Self::read_table(&path)?;
        let date_col = table.column("date")?;
        let close_col = table.column("close")?;
        let mut prices = Vec::new();

        for record in &table.records {
            let date_str = cell(record, Some(date_col)).ok_or_else(|| SignalError::Data {
                reason: format!("{}: missing date value", path.display()),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                SignalError::Data {
                    reason: format!("invalid date format '{}': {}", date_str, e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            let close = parse_number(record, Some(close_col), "close")?.ok_or_else(|| {
                SignalError::Data {
                    reason: format!("{}: missing close on {}", path.display(), date),
                }
            })?;
            if !close.is_finite() {
                return Err(SignalError::Data {
                    reason: format!("{}: non-finite close '{}' on {}", path.display(), close, date),
                });
            }

            prices.push(PricePoint::new(date, close));
        }

        prices.sort_by_key(|p| p.date);
        validate_series(&prices)?;
        Ok(prices)
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| SignalError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if RESERVED_FILES.contains(&name_str.as_ref()) {
                continue;
            }
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

impl FundamentalsPort for CsvAdapter {
    fn fetch_fundamentals(&self, symbol: &str) -> Result<FundamentalSnapshot, SignalError> {
        let news_items = self.news_for(symbol)?;
        let Some(table) = self.read_optional(FUNDAMENTALS_FILE)? else {
            return Ok(FundamentalSnapshot {
                news_items,
                ..Default::default()
            });
        };

        let ticker = table.column("ticker")?;
        let Some(record) = table
            .records
            .iter()
            .find(|r| cell(r, Some(ticker)).is_some_and(|t| t.eq_ignore_ascii_case(symbol)))
        else {
            log::debug!("{symbol}: no fundamentals row");
            return Ok(FundamentalSnapshot {
                news_items,
                ..Default::default()
            });
        };

        let number = |name: &str| parse_number(record, table.optional_column(name), name);
        let broker_rating = number("broker_rating")?.and_then(|v| {
            let rating = BrokerRating::new(v.round() as u8);
            if rating.is_none() {
                log::warn!("{symbol}: ignoring broker_rating {v} outside 1-5");
            }
            rating
        });

        Ok(FundamentalSnapshot {
            trailing_pe: number("trailing_pe")?,
            forward_pe: number("forward_pe")?,
            peg_ratio: number("peg_ratio")?,
            eps_growth_pct: number("eps_growth_pct")?,
            revenue_growth_pct: number("revenue_growth_pct")?,
            target_mean_price: number("target_mean_price")?,
            sector: cell(record, table.optional_column("sector")).map(str::to_string),
            broker_rating,
            news_items,
        })
    }
}

impl SectorPePort for CsvAdapter {
    fn fetch_sector_pe(&self) -> Result<HashMap<String, f64>, SignalError> {
        let Some(table) = self.read_optional(SECTOR_PE_FILE)? else {
            return Ok(HashMap::new());
        };
        let sector = table.column("sector")?;
        let pe = table.column("pe")?;

        let mut averages = HashMap::new();
        for record in &table.records {
            let (Some(name), Some(raw)) = (cell(record, Some(sector)), cell(record, Some(pe)))
            else {
                continue;
            };
            match raw.parse::<f64>() {
                Ok(value) if value.is_finite() => {
                    averages.insert(name.to_string(), value);
                }
                _ => log::debug!("skipping sector PE row {name}: '{raw}'"),
            }
        }
        Ok(averages)
    }
}

impl BrokerRatingPort for CsvAdapter {
    fn fetch_broker_rating(&self, code: &str) -> Result<Option<BrokerRating>, SignalError> {
        let Some(table) = self.read_optional(BROKER_FILE)? else {
            return Ok(None);
        };
        let ticker = table.column("ticker")?;
        let rating = table.column("rating")?;

        Ok(table
            .records
            .iter()
            .find(|r| cell(r, Some(ticker)).is_some_and(|t| t.eq_ignore_ascii_case(code)))
            .and_then(|r| cell(r, Some(rating)))
            .map(BrokerRating::from_consensus_text))
    }
}
