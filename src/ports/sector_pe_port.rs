//! Sector average PE port trait.

use crate::domain::error::SignalError;
use std::collections::HashMap;

pub trait SectorPePort {
    fn fetch_sector_pe(&self) -> Result<HashMap<String, f64>, SignalError>;
}
