//! Time-bounded cache of the sector → average PE table.
//!
//! The table is owned by the host and passed into each evaluation. A stale
//! table answers no lookups until it is refreshed.

use crate::ports::sector_pe_port::SectorPePort;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

pub const DEFAULT_TTL_HOURS: i64 = 24;
pub const MAX_TTL_HOURS: i64 = 8_760;

#[derive(Debug, Clone)]
pub struct SectorPeCache {
    table: HashMap<String, f64>,
    fetched_at: Option<DateTime<Utc>>,
    ttl: Duration,
}

impl SectorPeCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            table: HashMap::new(),
            fetched_at: None,
            ttl,
        }
    }

    pub fn with_table(table: HashMap<String, f64>, fetched_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            table,
            fetched_at: Some(fetched_at),
            ttl,
        }
    }

    /// An expiry past the representable range saturates to the maximum instant.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
            .map(|t| t.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC))
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expiry| now < expiry)
    }

    pub fn lookup(&self, sector: &str, now: DateTime<Utc>) -> Option<f64> {
        if !self.is_fresh(now) {
            return None;
        }
        self.table.get(sector).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Reloads the table through `port` when stale. A failed fetch stores an
    /// empty table so callers fall back to the default sector PE until expiry.
    /// Returns true when a fetch happened.
    pub fn refresh_with(&mut self, port: &dyn SectorPePort, now: DateTime<Utc>) -> bool {
        if self.is_fresh(now) {
            return false;
        }
        self.table = match port.fetch_sector_pe() {
            Ok(table) => {
                log::info!("loaded {} sector PE entries", table.len());
                table
            }
            Err(e) => {
                log::warn!("sector PE table unavailable: {e}");
                HashMap::new()
            }
        };
        self.fetched_at = Some(now);
        true
    }
}

impl Default for SectorPeCache {
    fn default() -> Self {
        Self::new(Duration::hours(DEFAULT_TTL_HOURS))
    }
}
