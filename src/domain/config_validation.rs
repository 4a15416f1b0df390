//! Configuration validation.
//!
//! Checks every config value a run depends on before any data is read.
//! Absent optional keys are fine; their documented defaults apply.

use crate::domain::error::SignalError;
use crate::domain::evaluation::{DEFAULT_LOOKBACK_DAYS, DEFAULT_THRESHOLD, MAX_LOOKBACK_DAYS};
use crate::domain::backtest::DEFAULT_HOLDING_PERIOD;
use crate::domain::fundamentals::{DEFAULT_PEG_RATIO, DEFAULT_SECTOR_PE, DEFAULT_TRAILING_PE};
use crate::domain::market::{parse_tickers, Market};
use crate::domain::score::ScoreVariant;
use crate::domain::sector_cache::{DEFAULT_TTL_HOURS, MAX_TTL_HOURS};
use crate::ports::config_port::ConfigPort;

/// Variant name selecting growth-tech or growth-general from the sector.
pub const AUTO_VARIANT: &str = "auto";

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), SignalError> {
    validate_data_path(config)?;
    validate_market(config)?;
    validate_tickers(config)?;
    validate_variant(config)?;
    validate_threshold(config)?;
    validate_backtest(config)?;
    validate_defaults(config)?;
    validate_sector_pe_ttl(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> SignalError {
    SignalError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_data_path(config: &dyn ConfigPort) -> Result<(), SignalError> {
    config.require_string("data", "path").map(|_| ())
}

fn validate_market(config: &dyn ConfigPort) -> Result<(), SignalError> {
    match config.get_string("market", "market") {
        Some(name) if Market::from_name(&name).is_none() => Err(invalid(
            "market",
            "market",
            format!("unknown market '{}', expected ASX or US", name.trim()),
        )),
        _ => Ok(()),
    }
}

fn validate_tickers(config: &dyn ConfigPort) -> Result<(), SignalError> {
    match config.get_string("market", "tickers") {
        Some(list) => parse_tickers(&list)
            .map(|_| ())
            .map_err(|e| invalid("market", "tickers", e.to_string())),
        None => Ok(()),
    }
}

fn validate_variant(config: &dyn ConfigPort) -> Result<(), SignalError> {
    let Some(name) = config.get_string("score", "variant") else {
        return Ok(());
    };
    let name = name.trim();
    if name.eq_ignore_ascii_case(AUTO_VARIANT) || ScoreVariant::from_name(name).is_some() {
        return Ok(());
    }
    Err(invalid(
        "score",
        "variant",
        format!(
            "unknown variant '{}', expected one of {}, {}",
            name,
            ScoreVariant::NAMES.join(", "),
            AUTO_VARIANT
        ),
    ))
}

fn validate_threshold(config: &dyn ConfigPort) -> Result<(), SignalError> {
    let value = config.get_double("score", "threshold", DEFAULT_THRESHOLD);
    if !(0.0..=100.0).contains(&value) {
        return Err(invalid(
            "score",
            "threshold",
            "threshold must be between 0 and 100",
        ));
    }
    Ok(())
}

fn validate_backtest(config: &dyn ConfigPort) -> Result<(), SignalError> {
    let holding = config.get_int("backtest", "holding_period_days", DEFAULT_HOLDING_PERIOD as i64);
    if holding < 1 {
        return Err(invalid(
            "backtest",
            "holding_period_days",
            "holding_period_days must be at least 1",
        ));
    }
    let lookback = config.get_int("backtest", "lookback_days", DEFAULT_LOOKBACK_DAYS);
    if !(1..=MAX_LOOKBACK_DAYS).contains(&lookback) {
        return Err(invalid(
            "backtest",
            "lookback_days",
            format!("lookback_days must be between 1 and {MAX_LOOKBACK_DAYS}"),
        ));
    }
    Ok(())
}

fn validate_defaults(config: &dyn ConfigPort) -> Result<(), SignalError> {
    for (key, fallback) in [
        ("trailing_pe", DEFAULT_TRAILING_PE),
        ("sector_pe", DEFAULT_SECTOR_PE),
        ("peg_ratio", DEFAULT_PEG_RATIO),
    ] {
        let value = config.get_double("defaults", key, fallback);
        if value <= 0.0 {
            return Err(invalid("defaults", key, format!("{key} must be positive")));
        }
    }

    let rating = config.get_int("defaults", "broker_rating", 3);
    if !(1..=5).contains(&rating) {
        return Err(invalid(
            "defaults",
            "broker_rating",
            "broker_rating must be between 1 and 5",
        ));
    }

    if let Some(sector) = config.get_string("defaults", "sector") {
        if sector.trim().is_empty() {
            return Err(invalid("defaults", "sector", "sector must not be blank"));
        }
    }
    Ok(())
}

fn validate_sector_pe_ttl(config: &dyn ConfigPort) -> Result<(), SignalError> {
    let ttl = config.get_int("sector_pe", "ttl_hours", DEFAULT_TTL_HOURS);
    if !(1..=MAX_TTL_HOURS).contains(&ttl) {
        return Err(invalid(
            "sector_pe",
            "ttl_hours",
            format!("ttl_hours must be between 1 and {MAX_TTL_HOURS}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn invalid_key(err: SignalError) -> String {
        match err {
            SignalError::ConfigInvalid { key, .. } => key,
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn full_config_passes() {
        let config = make_config(
            r#"
[data]
path = /var/data/prices

[market]
market = ASX
tickers = WTC, BHP, CBA

[score]
variant = momentum
threshold = 70

[backtest]
holding_period_days = 10
lookback_days = 365

[defaults]
trailing_pe = 25
sector_pe = 20
peg_ratio = 1.5
broker_rating = 3
sector = Technology

[sector_pe]
ttl_hours = 24
"#,
        );
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn minimal_config_passes() {
        let config = make_config("[data]\npath = ./data\n");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn missing_data_path_fails() {
        let config = make_config("[score]\nthreshold = 60\n");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, SignalError::ConfigMissing { key, .. } if key == "path"));
    }

    #[test]
    fn blank_data_path_fails() {
        let config = make_config("[data]\npath =   \n");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, SignalError::ConfigMissing { .. }));
    }

    #[test]
    fn unknown_market_fails() {
        let config = make_config("[data]\npath = d\n[market]\nmarket = LSE\n");
        assert_eq!(invalid_key(validate_config(&config).unwrap_err()), "market");
    }

    #[test]
    fn repeated_tickers_pass() {
        let config = make_config("[data]\npath = d\n[market]\ntickers = BHP, bhp\n");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn unknown_variant_fails() {
        let config = make_config("[data]\npath = d\n[score]\nvariant = value-trap\n");
        assert_eq!(invalid_key(validate_config(&config).unwrap_err()), "variant");
    }

    #[test]
    fn auto_variant_accepted() {
        let config = make_config("[data]\npath = d\n[score]\nvariant = AUTO\n");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn threshold_above_hundred_fails() {
        let config = make_config("[data]\npath = d\n[score]\nthreshold = 100.5\n");
        assert_eq!(invalid_key(validate_config(&config).unwrap_err()), "threshold");
    }

    #[test]
    fn threshold_bounds_inclusive() {
        for value in ["0", "100"] {
            let config = make_config(&format!("[data]\npath = d\n[score]\nthreshold = {value}\n"));
            assert!(validate_config(&config).is_ok(), "threshold {value}");
        }
    }

    #[test]
    fn holding_period_zero_fails() {
        let config = make_config("[data]\npath = d\n[backtest]\nholding_period_days = 0\n");
        assert_eq!(
            invalid_key(validate_config(&config).unwrap_err()),
            "holding_period_days"
        );
    }

    #[test]
    fn lookback_negative_fails() {
        let config = make_config("[data]\npath = d\n[backtest]\nlookback_days = -30\n");
        assert_eq!(invalid_key(validate_config(&config).unwrap_err()), "lookback_days");
    }

    #[test]
    fn huge_lookback_fails() {
        let config = make_config("[data]\npath = d\n[backtest]\nlookback_days = 1000000000\n");
        assert_eq!(invalid_key(validate_config(&config).unwrap_err()), "lookback_days");
    }

    #[test]
    fn non_positive_default_pe_fails() {
        let config = make_config("[data]\npath = d\n[defaults]\nsector_pe = 0\n");
        assert_eq!(invalid_key(validate_config(&config).unwrap_err()), "sector_pe");
    }

    #[test]
    fn negative_default_peg_fails() {
        let config = make_config("[data]\npath = d\n[defaults]\npeg_ratio = -1.5\n");
        assert_eq!(invalid_key(validate_config(&config).unwrap_err()), "peg_ratio");
    }

    #[test]
    fn broker_rating_out_of_range_fails() {
        let config = make_config("[data]\npath = d\n[defaults]\nbroker_rating = 6\n");
        assert_eq!(invalid_key(validate_config(&config).unwrap_err()), "broker_rating");
    }

    #[test]
    fn ttl_zero_fails() {
        let config = make_config("[data]\npath = d\n[sector_pe]\nttl_hours = 0\n");
        assert_eq!(invalid_key(validate_config(&config).unwrap_err()), "ttl_hours");
    }

    #[test]
    fn huge_ttl_fails() {
        let config = make_config("[data]\npath = d\n[sector_pe]\nttl_hours = 10000000000\n");
        assert_eq!(invalid_key(validate_config(&config).unwrap_err()), "ttl_hours");
    }
}
