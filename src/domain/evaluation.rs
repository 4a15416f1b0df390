//! Per-ticker evaluation: indicators, score inputs, score and backtest.
//!
//! Collaborator values are resolved here, before the scoring core runs:
//! missing fundamentals get their documented defaults, the sector PE comes
//! from the injected cache, and broker consensus is only consulted for ASX.
//! Indicator values still in warm-up stay absent and surface as a neutral
//! score with a `MissingInput` fault.

use crate::domain::backtest::{
    run_backtest, run_backtest_with_scores, BacktestReport, DEFAULT_HOLDING_PERIOD,
};
use crate::domain::error::SignalError;
use crate::domain::fundamentals::{BrokerRating, FundamentalDefaults, FundamentalSnapshot};
use crate::domain::indicator_set::{compute_indicators, IndicatorSet, IndicatorSnapshot};
use crate::domain::market::Market;
use crate::domain::price::{validate_series, PricePoint};
use crate::domain::score::{calculate_signal_score, ScoreInputs, ScoreOutcome, ScoreVariant};
use crate::domain::sector_cache::SectorPeCache;
use crate::ports::data_port::PriceDataPort;
use crate::ports::fundamentals_port::{BrokerRatingPort, FundamentalsPort};
use chrono::{DateTime, Duration, NaiveDate, Utc};

pub const DEFAULT_THRESHOLD: f64 = 75.0;
pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

#[derive(Debug, Clone, PartialEq)]
pub enum VariantChoice {
    Fixed(ScoreVariant),
    /// Growth-tech for technology names, growth-general otherwise.
    BySector,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationSettings {
    pub variant: VariantChoice,
    pub threshold: f64,
    pub holding_period_days: usize,
    pub lookback_days: i64,
    pub defaults: FundamentalDefaults,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            variant: VariantChoice::Fixed(ScoreVariant::AsxBroker),
            threshold: DEFAULT_THRESHOLD,
            holding_period_days: DEFAULT_HOLDING_PERIOD,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            defaults: FundamentalDefaults::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub symbol: String,
    pub indicators: IndicatorSet,
    pub latest: Option<IndicatorSnapshot>,
    pub sector: String,
    pub pe_ratio: f64,
    pub sector_pe: f64,
    pub analyst_upside_pct: Option<f64>,
    pub broker_rating: BrokerRating,
    pub variant: ScoreVariant,
    pub inputs: ScoreInputs,
    pub outcome: ScoreOutcome,
    pub backtest: BacktestReport,
    pub fundamentals: FundamentalSnapshot,
}

/// The data sources one evaluation reads from.
pub struct Collaborators<'a> {
    pub prices: &'a dyn PriceDataPort,
    pub fundamentals: &'a dyn FundamentalsPort,
    pub broker: &'a dyn BrokerRatingPort,
}

/// Builds score inputs from the latest indicator row and a fundamentals
/// snapshot whose gaps have already been filled where defaults exist.
pub fn assemble_inputs(
    latest: Option<&IndicatorSnapshot>,
    fundamentals: &FundamentalSnapshot,
    defaults: &FundamentalDefaults,
    sector_pe: f64,
    broker_rating: BrokerRating,
) -> ScoreInputs {
    let current_price = latest.map(|row| row.close);
    ScoreInputs {
        current_price,
        sma_200: latest.and_then(|row| row.sma_200),
        pe_ratio: Some(fundamentals.trailing_pe_or(defaults)),
        sector_pe: Some(sector_pe),
        target_price: current_price.map(|price| fundamentals.target_price_or(price)),
        broker_rating: Some(broker_rating),
        rsi: latest.and_then(|row| row.rsi_14),
        macd_above_signal: latest.and_then(IndicatorSnapshot::macd_above_signal),
        forward_pe: fundamentals.forward_pe,
        peg_ratio: Some(fundamentals.peg_ratio_or(defaults)),
        eps_growth_pct: fundamentals.eps_growth_pct,
        revenue_growth_pct: fundamentals.revenue_growth_pct,
    }
}

/// Scores one ticker from already-fetched collaborator values.
pub fn evaluate(
    symbol: &str,
    prices: &[PricePoint],
    fundamentals: &FundamentalSnapshot,
    broker_rating: Option<BrokerRating>,
    sector_cache: &SectorPeCache,
    now: DateTime<Utc>,
    settings: &EvaluationSettings,
) -> Evaluation {
    let defaults = &settings.defaults;
    let indicators = compute_indicators(prices);
    let latest = indicators.latest();

    let sector = fundamentals.sector_or(defaults).to_string();
    let sector_pe = sector_cache
        .lookup(&sector, now)
        .unwrap_or(defaults.sector_pe);
    let broker_rating = broker_rating.unwrap_or_else(|| fundamentals.broker_rating_or(defaults));

    let variant = match &settings.variant {
        VariantChoice::Fixed(variant) => variant.clone(),
        VariantChoice::BySector => ScoreVariant::for_sector(&sector),
    };

    let inputs = assemble_inputs(latest.as_ref(), fundamentals, defaults, sector_pe, broker_rating);
    let analyst_upside_pct = match (inputs.target_price, inputs.current_price) {
        (Some(target), Some(current)) if current > 0.0 => {
            Some(((target - current) / current * 100.0).max(0.0))
        }
        _ => None,
    };

    let outcome = calculate_signal_score(&variant, &inputs);
    if let Some(fault) = outcome.fault() {
        log::info!("{symbol}: neutral score ({fault})");
    }

    let backtest = run_backtest(
        prices,
        outcome.value(),
        settings.threshold,
        settings.holding_period_days,
    );

    Evaluation {
        symbol: symbol.to_string(),
        indicators,
        latest,
        sector,
        pe_ratio: fundamentals.trailing_pe_or(defaults),
        sector_pe,
        analyst_upside_pct,
        broker_rating,
        variant,
        inputs,
        outcome,
        backtest,
        fundamentals: fundamentals.clone(),
    }
}

/// Re-scores every historical row with the evaluation's fundamentals, so
/// each day carries its own score. Days whose score falls back to neutral
/// are `None` and never trade.
///
/// Fundamentals are point-in-time values from the evaluation date and are
/// applied to every earlier day.
pub fn daily_scores(evaluation: &Evaluation, defaults: &FundamentalDefaults) -> Vec<Option<f64>> {
    (0..evaluation.indicators.len())
        .map(|i| {
            let row = evaluation.indicators.row(i);
            let inputs = assemble_inputs(
                row.as_ref(),
                &evaluation.fundamentals,
                defaults,
                evaluation.sector_pe,
                evaluation.broker_rating,
            );
            match calculate_signal_score(&evaluation.variant, &inputs) {
                ScoreOutcome::Computed(score) => Some(score.value()),
                ScoreOutcome::Neutral { .. } => None,
            }
        })
        .collect()
}

/// Backtest gated by each day's own score instead of the latest one.
pub fn run_daily_backtest(evaluation: &Evaluation, settings: &EvaluationSettings) -> BacktestReport {
    let scores = daily_scores(evaluation, &settings.defaults);
    run_backtest_with_scores(
        &evaluation.indicators.prices(),
        &scores,
        settings.threshold,
        settings.holding_period_days,
    )
}

/// Fetches everything for `code` through the collaborators and evaluates it.
///
/// Price-history failures abort this ticker. Fundamentals and broker failures
/// degrade to defaults.
pub fn evaluate_ticker(
    collaborators: &Collaborators<'_>,
    code: &str,
    market: Market,
    as_of: NaiveDate,
    sector_cache: &SectorPeCache,
    now: DateTime<Utc>,
    settings: &EvaluationSettings,
) -> Result<Evaluation, SignalError> {
    let symbol = market.symbol(code);
    let start = Duration::try_days(settings.lookback_days)
        .and_then(|lookback| as_of.checked_sub_signed(lookback))
        .ok_or_else(|| SignalError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "lookback_days".to_string(),
            reason: format!("lookback of {} days is out of range", settings.lookback_days),
        })?;

    let prices = collaborators.prices.fetch_prices(&symbol, start, as_of)?;
    if prices.is_empty() {
        return Err(SignalError::NoData { symbol });
    }
    validate_series(&prices)?;

    let fundamentals = collaborators
        .fundamentals
        .fetch_fundamentals(&symbol)
        .unwrap_or_else(|e| {
            log::warn!("{symbol}: fundamentals unavailable, using defaults: {e}");
            FundamentalSnapshot::default()
        });

    let broker_rating = if market.has_broker_consensus() {
        collaborators
            .broker
            .fetch_broker_rating(&market.code(code))
            .unwrap_or_else(|e| {
                log::warn!("{symbol}: broker consensus unavailable: {e}");
                None
            })
    } else {
        None
    };

    Ok(evaluate(
        &symbol,
        &prices,
        &fundamentals,
        broker_rating,
        sector_cache,
        now,
        settings,
    ))
}
