//! Core domain types and logic.

pub mod price;
pub mod indicator;
pub mod indicator_set;
pub mod fundamentals;
pub mod market;
pub mod score;
pub mod sector_cache;
pub mod backtest;
pub mod evaluation;
pub mod config_validation;
pub mod error;
