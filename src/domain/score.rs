//! Composite signal score.
//!
//! A [`ScoreVariant`] names a recipe: a list of sub-scores with weights that sum
//! to 1.0. Each sub-score normalizes one input to `[0, 100]`; the signal score is
//! the weighted sum, clamped to `[0, 100]` and rounded to 2 decimals.
//!
//! Any fault (missing input, zero or negative denominator, non-finite value,
//! bad weights) produces [`ScoreOutcome::Neutral`], whose value is
//! [`NEUTRAL_SCORE`]. Callers that need to tell a faulted neutral apart from a
//! computed 50.0 match on the outcome or use [`try_calculate_signal_score`].

use crate::domain::fundamentals::BrokerRating;
use std::fmt;

pub const NEUTRAL_SCORE: f64 = 50.0;
pub const FORWARD_PE_ANCHOR: f64 = 20.0;
pub const PEG_ANCHOR: f64 = 1.5;
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

const MOMENTUM_MACD_LOW: u8 = 30;
const GROWTH_TECH_MACD_LOW: u8 = 50;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreFault {
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    #[error("non-positive denominator for {input}: {value}")]
    InvalidDenominator { input: &'static str, value: f64 },

    #[error("non-finite value for {0}")]
    NonFinite(&'static str),

    #[error("weights sum to {sum}, expected 1.0")]
    InvalidWeights { sum: f64 },
}

/// A score in `[0, 100]`, rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SignalScore(f64);

impl SignalScore {
    pub fn from_raw(raw: f64) -> Result<Self, ScoreFault> {
        if !raw.is_finite() {
            return Err(ScoreFault::NonFinite("score"));
        }
        Ok(Self(round2(raw.clamp(0.0, 100.0))))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for SignalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutcome {
    Computed(SignalScore),
    Neutral { fault: ScoreFault },
}

impl ScoreOutcome {
    pub fn value(&self) -> f64 {
        match self {
            ScoreOutcome::Computed(score) => score.value(),
            ScoreOutcome::Neutral { .. } => NEUTRAL_SCORE,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, ScoreOutcome::Computed(_))
    }

    pub fn fault(&self) -> Option<&ScoreFault> {
        match self {
            ScoreOutcome::Computed(_) => None,
            ScoreOutcome::Neutral { fault } => Some(fault),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubScore {
    Technical,
    SectorValuation,
    ForwardPeValuation,
    PegValuation,
    Upside,
    EpsGrowth,
    RevenueGrowth,
    Broker,
    RsiBanded,
    RsiContinuous,
    MacdAlignment { low: u8 },
}

impl fmt::Display for SubScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubScore::Technical => "technical",
            SubScore::SectorValuation => "valuation (sector)",
            SubScore::ForwardPeValuation => "valuation (forward PE)",
            SubScore::PegValuation => "valuation (PEG)",
            SubScore::Upside => "analyst upside",
            SubScore::EpsGrowth => "EPS growth",
            SubScore::RevenueGrowth => "revenue growth",
            SubScore::Broker => "broker",
            SubScore::RsiBanded | SubScore::RsiContinuous => "RSI",
            SubScore::MacdAlignment { .. } => "MACD alignment",
        };
        f.write_str(name)
    }
}

/// Weights for the general growth recipe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthWeights {
    pub forward_pe: f64,
    pub peg: f64,
    pub eps_growth: f64,
    pub revenue_growth: f64,
    pub upside: f64,
}

impl Default for GrowthWeights {
    fn default() -> Self {
        Self {
            forward_pe: 0.2,
            peg: 0.2,
            eps_growth: 0.2,
            revenue_growth: 0.2,
            upside: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScoreVariant {
    /// Trend position, sector-relative PE, analyst upside and broker consensus.
    AsxBroker,
    /// The ASX recipe with broker consensus swapped for RSI and MACD.
    Momentum,
    GrowthGeneral(GrowthWeights),
    /// PEG-led growth recipe with a momentum overlay.
    GrowthTech,
}

impl ScoreVariant {
    pub const NAMES: [&'static str; 4] = ["asx-broker", "momentum", "growth-general", "growth-tech"];

    pub fn name(&self) -> &'static str {
        match self {
            ScoreVariant::AsxBroker => "asx-broker",
            ScoreVariant::Momentum => "momentum",
            ScoreVariant::GrowthGeneral(_) => "growth-general",
            ScoreVariant::GrowthTech => "growth-tech",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "asx-broker" => Some(ScoreVariant::AsxBroker),
            "momentum" => Some(ScoreVariant::Momentum),
            "growth-general" => Some(ScoreVariant::GrowthGeneral(GrowthWeights::default())),
            "growth-tech" => Some(ScoreVariant::GrowthTech),
            _ => None,
        }
    }

    pub fn for_sector(sector: &str) -> Self {
        if sector.trim().to_lowercase().contains("technology") {
            ScoreVariant::GrowthTech
        } else {
            ScoreVariant::GrowthGeneral(GrowthWeights::default())
        }
    }

    pub fn recipe(&self) -> Vec<(SubScore, f64)> {
        match self {
            ScoreVariant::AsxBroker => vec![
                (SubScore::Technical, 0.30),
                (SubScore::SectorValuation, 0.25),
                (SubScore::Upside, 0.25),
                (SubScore::Broker, 0.20),
            ],
            ScoreVariant::Momentum => vec![
                (SubScore::Technical, 0.25),
                (SubScore::SectorValuation, 0.20),
                (SubScore::Upside, 0.20),
                (SubScore::RsiContinuous, 0.20),
                (SubScore::MacdAlignment { low: MOMENTUM_MACD_LOW }, 0.15),
            ],
            ScoreVariant::GrowthGeneral(w) => vec![
                (SubScore::ForwardPeValuation, w.forward_pe),
                (SubScore::PegValuation, w.peg),
                (SubScore::EpsGrowth, w.eps_growth),
                (SubScore::RevenueGrowth, w.revenue_growth),
                (SubScore::Upside, w.upside),
            ],
            ScoreVariant::GrowthTech => vec![
                (SubScore::PegValuation, 0.25),
                (SubScore::EpsGrowth, 0.20),
                (SubScore::RevenueGrowth, 0.20),
                (SubScore::Upside, 0.15),
                (SubScore::RsiBanded, 0.10),
                (SubScore::MacdAlignment { low: GROWTH_TECH_MACD_LOW }, 0.10),
            ],
        }
    }

    pub fn weight_sum(&self) -> f64 {
        self.recipe().iter().map(|(_, w)| w).sum()
    }
}

impl fmt::Display for ScoreVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scalar inputs for every recipe. A recipe only reads the fields it needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreInputs {
    pub current_price: Option<f64>,
    pub sma_200: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub sector_pe: Option<f64>,
    pub target_price: Option<f64>,
    pub broker_rating: Option<BrokerRating>,
    pub rsi: Option<f64>,
    pub macd_above_signal: Option<bool>,
    pub forward_pe: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub eps_growth_pct: Option<f64>,
    pub revenue_growth_pct: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreComponent {
    pub sub_score: SubScore,
    pub weight: f64,
    pub value: f64,
}

impl ScoreComponent {
    pub fn contribution(&self) -> f64 {
        self.weight * self.value
    }
}

pub fn calculate_signal_score(variant: &ScoreVariant, inputs: &ScoreInputs) -> ScoreOutcome {
    match try_calculate_signal_score(variant, inputs) {
        Ok(score) => ScoreOutcome::Computed(score),
        Err(fault) => {
            log::debug!("{variant} score falls back to neutral: {fault}");
            ScoreOutcome::Neutral { fault }
        }
    }
}

pub fn try_calculate_signal_score(
    variant: &ScoreVariant,
    inputs: &ScoreInputs,
) -> Result<SignalScore, ScoreFault> {
    let components = score_breakdown(variant, inputs)?;
    SignalScore::from_raw(components.iter().map(ScoreComponent::contribution).sum())
}

/// Evaluates every sub-score of the recipe, after checking its weights.
pub fn score_breakdown(
    variant: &ScoreVariant,
    inputs: &ScoreInputs,
) -> Result<Vec<ScoreComponent>, ScoreFault> {
    let recipe = variant.recipe();
    check_weights(&recipe)?;
    recipe
        .into_iter()
        .map(|(sub_score, weight)| {
            Ok(ScoreComponent {
                sub_score,
                weight,
                value: evaluate_sub_score(sub_score, inputs)?,
            })
        })
        .collect()
}

fn check_weights(recipe: &[(SubScore, f64)]) -> Result<(), ScoreFault> {
    let sum: f64 = recipe.iter().map(|(_, w)| w).sum();
    let all_valid = recipe.iter().all(|(_, w)| w.is_finite() && *w >= 0.0);
    if !all_valid || (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(ScoreFault::InvalidWeights { sum });
    }
    Ok(())
}

fn evaluate_sub_score(sub_score: SubScore, inputs: &ScoreInputs) -> Result<f64, ScoreFault> {
    match sub_score {
        SubScore::Technical => technical_position_score(
            require(inputs.current_price, "current_price")?,
            require(inputs.sma_200, "sma_200")?,
        ),
        SubScore::SectorValuation => sector_valuation_score(
            require(inputs.pe_ratio, "pe_ratio")?,
            require(inputs.sector_pe, "sector_pe")?,
        ),
        SubScore::ForwardPeValuation => {
            anchor_valuation_score(require(inputs.forward_pe, "forward_pe")?, FORWARD_PE_ANCHOR)
        }
        SubScore::PegValuation => {
            anchor_valuation_score(require(inputs.peg_ratio, "peg_ratio")?, PEG_ANCHOR)
        }
        SubScore::Upside => upside_score(
            require(inputs.target_price, "target_price")?,
            require(inputs.current_price, "current_price")?,
        ),
        SubScore::EpsGrowth => Ok(growth_score(require(
            inputs.eps_growth_pct,
            "eps_growth_pct",
        )?)),
        SubScore::RevenueGrowth => Ok(growth_score(require(
            inputs.revenue_growth_pct,
            "revenue_growth_pct",
        )?)),
        SubScore::Broker => inputs
            .broker_rating
            .map(broker_score)
            .ok_or(ScoreFault::MissingInput("broker_rating")),
        SubScore::RsiBanded => Ok(rsi_banded_score(require(inputs.rsi, "rsi")?)),
        SubScore::RsiContinuous => Ok(rsi_continuous_score(require(inputs.rsi, "rsi")?)),
        SubScore::MacdAlignment { low } => inputs
            .macd_above_signal
            .map(|above| macd_alignment_score(above, low))
            .ok_or(ScoreFault::MissingInput("macd_above_signal")),
    }
}

fn require(value: Option<f64>, name: &'static str) -> Result<f64, ScoreFault> {
    match value {
        None => Err(ScoreFault::MissingInput(name)),
        Some(v) if !v.is_finite() => Err(ScoreFault::NonFinite(name)),
        Some(v) => Ok(v),
    }
}

fn positive(value: f64, name: &'static str) -> Result<f64, ScoreFault> {
    if value <= 0.0 {
        return Err(ScoreFault::InvalidDenominator { input: name, value });
    }
    Ok(value)
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// (value - benchmark) / benchmark
pub fn relative_deviation(value: f64, benchmark: f64) -> Result<f64, ScoreFault> {
    let benchmark = positive(benchmark, "benchmark")?;
    Ok((value - benchmark) / benchmark)
}

/// max(0, 100 - |value - benchmark| / benchmark * 100)
fn closeness_score(value: f64, benchmark: f64, name: &'static str) -> Result<f64, ScoreFault> {
    let benchmark = positive(benchmark, name)?;
    Ok(clamp_score(100.0 - (value - benchmark).abs() / benchmark * 100.0))
}

pub fn technical_position_score(price: f64, sma_200: f64) -> Result<f64, ScoreFault> {
    closeness_score(price, sma_200, "sma_200")
}

pub fn sector_valuation_score(pe_ratio: f64, sector_pe: f64) -> Result<f64, ScoreFault> {
    closeness_score(pe_ratio, sector_pe, "sector_pe")
}

pub fn anchor_valuation_score(metric: f64, anchor: f64) -> Result<f64, ScoreFault> {
    closeness_score(metric, anchor, "anchor")
}

/// Downside targets score 0, upside is capped at 100%.
pub fn upside_score(target_price: f64, current_price: f64) -> Result<f64, ScoreFault> {
    let current = positive(current_price, "current_price")?;
    Ok(clamp_score((target_price - current) / current * 100.0))
}

pub fn growth_score(growth_pct: f64) -> f64 {
    clamp_score(growth_pct)
}

pub fn broker_score(rating: BrokerRating) -> f64 {
    rating.value() as f64 * 20.0
}

pub fn rsi_banded_score(rsi: f64) -> f64 {
    if (40.0..=70.0).contains(&rsi) {
        100.0
    } else {
        clamp_score(100.0 - (rsi - 55.0).abs() * 2.0)
    }
}

pub fn rsi_continuous_score(rsi: f64) -> f64 {
    clamp_score(100.0 - (rsi - 50.0).abs() * 2.0)
}

pub fn macd_alignment_score(macd_above_signal: bool, low: u8) -> f64 {
    if macd_above_signal {
        100.0
    } else {
        f64::from(low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn asx_inputs() -> ScoreInputs {
        ScoreInputs {
            current_price: Some(110.0),
            sma_200: Some(100.0),
            pe_ratio: Some(25.0),
            sector_pe: Some(20.0),
            target_price: Some(121.0),
            broker_rating: BrokerRating::new(4),
            ..Default::default()
        }
    }

    fn growth_inputs() -> ScoreInputs {
        ScoreInputs {
            current_price: Some(50.0),
            target_price: Some(60.0),
            forward_pe: Some(25.0),
            peg_ratio: Some(1.2),
            eps_growth_pct: Some(30.0),
            revenue_growth_pct: Some(15.0),
            rsi: Some(65.0),
            macd_above_signal: Some(false),
            ..Default::default()
        }
    }

    #[test]
    fn technical_score_rules() {
        assert_relative_eq!(technical_position_score(100.0, 100.0).unwrap(), 100.0);
        assert_relative_eq!(technical_position_score(110.0, 100.0).unwrap(), 90.0, epsilon = 1e-9);
        assert_relative_eq!(technical_position_score(90.0, 100.0).unwrap(), 90.0, epsilon = 1e-9);
        assert_relative_eq!(technical_position_score(250.0, 100.0).unwrap(), 0.0);
        assert!(matches!(
            technical_position_score(100.0, 0.0),
            Err(ScoreFault::InvalidDenominator { input: "sma_200", .. })
        ));
    }

    #[test]
    fn sector_valuation_rules() {
        assert_relative_eq!(sector_valuation_score(25.0, 20.0).unwrap(), 75.0, epsilon = 1e-9);
        assert_relative_eq!(sector_valuation_score(15.0, 20.0).unwrap(), 75.0, epsilon = 1e-9);
        assert!(sector_valuation_score(15.0, 0.0).is_err());
        assert!(sector_valuation_score(15.0, -3.0).is_err());
        assert_relative_eq!(relative_deviation(25.0, 20.0).unwrap(), 0.25);
    }

    #[test]
    fn anchor_valuation_rules() {
        assert_relative_eq!(anchor_valuation_score(20.0, FORWARD_PE_ANCHOR).unwrap(), 100.0);
        assert_relative_eq!(anchor_valuation_score(30.0, FORWARD_PE_ANCHOR).unwrap(), 50.0, epsilon = 1e-9);
        assert_relative_eq!(anchor_valuation_score(0.75, PEG_ANCHOR).unwrap(), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn upside_rules() {
        assert_relative_eq!(upside_score(110.0, 100.0).unwrap(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(upside_score(80.0, 100.0).unwrap(), 0.0);
        assert_relative_eq!(upside_score(500.0, 100.0).unwrap(), 100.0);
        assert!(upside_score(10.0, 0.0).is_err());
    }

    #[test]
    fn growth_is_clamped_both_ways() {
        assert_relative_eq!(growth_score(35.0), 35.0);
        assert_relative_eq!(growth_score(250.0), 100.0);
        assert_relative_eq!(growth_score(-80.0), 0.0);
    }

    #[test]
    fn broker_rescaled() {
        assert_relative_eq!(broker_score(BrokerRating::new(1).unwrap()), 20.0);
        assert_relative_eq!(broker_score(BrokerRating::NEUTRAL), 60.0);
        assert_relative_eq!(broker_score(BrokerRating::new(5).unwrap()), 100.0);
    }

    #[test]
    fn rsi_shapes() {
        assert_relative_eq!(rsi_banded_score(40.0), 100.0);
        assert_relative_eq!(rsi_banded_score(70.0), 100.0);
        assert_relative_eq!(rsi_banded_score(80.0), 50.0);
        assert_relative_eq!(rsi_banded_score(20.0), 30.0);
        assert_relative_eq!(rsi_continuous_score(50.0), 100.0);
        assert_relative_eq!(rsi_continuous_score(70.0), 60.0);
        assert_relative_eq!(rsi_continuous_score(0.0), 0.0);
    }

    #[test]
    fn macd_alignment_low_value() {
        assert_relative_eq!(macd_alignment_score(true, 50), 100.0);
        assert_relative_eq!(macd_alignment_score(false, 50), 50.0);
        assert_relative_eq!(macd_alignment_score(false, 30), 30.0);
    }

    #[test]
    fn every_variant_weights_sum_to_one() {
        let variants = [
            ScoreVariant::AsxBroker,
            ScoreVariant::Momentum,
            ScoreVariant::GrowthGeneral(GrowthWeights::default()),
            ScoreVariant::GrowthTech,
        ];
        for v in &variants {
            assert!((v.weight_sum() - 1.0).abs() < WEIGHT_TOLERANCE, "{v}");
        }
        assert_eq!(ScoreVariant::AsxBroker.recipe().len(), 4);
        assert_eq!(ScoreVariant::Momentum.recipe().len(), 5);
        assert_eq!(ScoreVariant::GrowthTech.recipe().len(), 6);
    }

    #[test]
    fn asx_broker_known_score() {
        // technical 90, valuation 75, upside 10, broker 80
        let expected = 0.30 * 90.0 + 0.25 * 75.0 + 0.25 * 10.0 + 0.20 * 80.0;
        let score = try_calculate_signal_score(&ScoreVariant::AsxBroker, &asx_inputs()).unwrap();
        assert_relative_eq!(score.value(), round2(expected));
    }

    #[test]
    fn momentum_known_score() {
        let inputs = ScoreInputs {
            rsi: Some(60.0),
            macd_above_signal: Some(true),
            ..asx_inputs()
        };
        // technical 90, valuation 75, upside 10, rsi 80, macd 100
        let expected = 0.25 * 90.0 + 0.20 * 75.0 + 0.20 * 10.0 + 0.20 * 80.0 + 0.15 * 100.0;
        let score = try_calculate_signal_score(&ScoreVariant::Momentum, &inputs).unwrap();
        assert_relative_eq!(score.value(), round2(expected));
    }

    #[test]
    fn growth_general_known_score() {
        // forward PE 75, PEG 80, eps 30, revenue 15, upside 20
        let expected = 0.2 * (75.0 + 80.0 + 30.0 + 15.0 + 20.0);
        let variant = ScoreVariant::GrowthGeneral(GrowthWeights::default());
        let score = try_calculate_signal_score(&variant, &growth_inputs()).unwrap();
        assert_relative_eq!(score.value(), round2(expected));
    }

    #[test]
    fn growth_tech_known_score() {
        // PEG 80, eps 30, revenue 15, upside 20, rsi 100, macd 50
        let expected = 0.25 * 80.0 + 0.20 * 30.0 + 0.20 * 15.0 + 0.15 * 20.0 + 0.10 * 100.0 + 0.10 * 50.0;
        let score = try_calculate_signal_score(&ScoreVariant::GrowthTech, &growth_inputs()).unwrap();
        assert_relative_eq!(score.value(), round2(expected));
    }

    #[test]
    fn custom_growth_weights() {
        let weights = GrowthWeights {
            forward_pe: 0.1,
            peg: 0.1,
            eps_growth: 0.4,
            revenue_growth: 0.3,
            upside: 0.1,
        };
        let score = try_calculate_signal_score(&ScoreVariant::GrowthGeneral(weights), &growth_inputs()).unwrap();
        let expected = 0.1 * 75.0 + 0.1 * 80.0 + 0.4 * 30.0 + 0.3 * 15.0 + 0.1 * 20.0;
        assert_relative_eq!(score.value(), round2(expected));
    }

    #[test]
    fn bad_weights_fall_back_to_neutral() {
        let weights = GrowthWeights {
            upside: 0.5,
            ..GrowthWeights::default()
        };
        let outcome = calculate_signal_score(&ScoreVariant::GrowthGeneral(weights), &growth_inputs());
        assert_eq!(outcome.value(), NEUTRAL_SCORE);
        assert!(matches!(outcome.fault(), Some(ScoreFault::InvalidWeights { .. })));
    }

    #[test]
    fn zero_sma_falls_back_to_neutral() {
        let inputs = ScoreInputs {
            sma_200: Some(0.0),
            ..asx_inputs()
        };
        let outcome = calculate_signal_score(&ScoreVariant::AsxBroker, &inputs);
        assert!(!outcome.is_computed());
        assert_eq!(outcome.value(), 50.0);
    }

    #[test]
    fn missing_input_is_reported() {
        let inputs = ScoreInputs {
            sma_200: None,
            ..asx_inputs()
        };
        let outcome = calculate_signal_score(&ScoreVariant::AsxBroker, &inputs);
        assert_eq!(outcome.fault(), Some(&ScoreFault::MissingInput("sma_200")));
    }

    #[test]
    fn nan_input_is_reported() {
        let inputs = ScoreInputs {
            pe_ratio: Some(f64::NAN),
            ..asx_inputs()
        };
        let outcome = calculate_signal_score(&ScoreVariant::AsxBroker, &inputs);
        assert_eq!(outcome.fault(), Some(&ScoreFault::NonFinite("pe_ratio")));
        assert_eq!(outcome.value(), 50.0);
    }

    #[test]
    fn computed_fifty_is_distinguishable() {
        let inputs = ScoreInputs {
            forward_pe: Some(30.0),
            peg_ratio: Some(0.75),
            eps_growth_pct: Some(50.0),
            revenue_growth_pct: Some(50.0),
            target_price: Some(75.0),
            current_price: Some(50.0),
            ..Default::default()
        };
        let outcome = calculate_signal_score(&ScoreVariant::GrowthGeneral(GrowthWeights::default()), &inputs);
        assert!(outcome.is_computed());
        assert_relative_eq!(outcome.value(), 50.0);
    }

    #[test]
    fn breakdown_contributions_sum_to_score() {
        let components = score_breakdown(&ScoreVariant::AsxBroker, &asx_inputs()).unwrap();
        let total: f64 = components.iter().map(ScoreComponent::contribution).sum();
        let reversed: f64 = components.iter().rev().map(ScoreComponent::contribution).sum();
        assert_relative_eq!(total, reversed, epsilon = 1e-9);
        assert_eq!(components[0].sub_score, SubScore::Technical);
    }

    #[test]
    fn variant_names_round_trip() {
        for name in ScoreVariant::NAMES {
            assert_eq!(ScoreVariant::from_name(name).unwrap().name(), name);
        }
        assert_eq!(ScoreVariant::from_name(" Momentum "), Some(ScoreVariant::Momentum));
        assert!(ScoreVariant::from_name("value").is_none());
    }

    #[test]
    fn variant_for_sector() {
        assert_eq!(ScoreVariant::for_sector("Technology"), ScoreVariant::GrowthTech);
        assert_eq!(ScoreVariant::for_sector("Information Technology"), ScoreVariant::GrowthTech);
        assert_eq!(
            ScoreVariant::for_sector("Energy"),
            ScoreVariant::GrowthGeneral(GrowthWeights::default())
        );
    }

    #[test]
    fn signal_score_rounds_and_clamps() {
        assert_relative_eq!(SignalScore::from_raw(42.3456).unwrap().value(), 42.35);
        assert_relative_eq!(SignalScore::from_raw(-3.0).unwrap().value(), 0.0);
        assert_relative_eq!(SignalScore::from_raw(140.0).unwrap().value(), 100.0);
        assert!(SignalScore::from_raw(f64::INFINITY).is_err());
        assert_eq!(SignalScore::from_raw(7.5).unwrap().to_string(), "7.50");
    }
}
