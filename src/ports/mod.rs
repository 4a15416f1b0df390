//! Port traits: the seams between the scoring core and its collaborators.

pub mod config_port;
pub mod data_port;
pub mod fundamentals_port;
pub mod sector_pe_port;
