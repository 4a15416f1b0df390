//! signalscore: composite stock signal scoring and score-gated backtesting.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], command line front end in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
