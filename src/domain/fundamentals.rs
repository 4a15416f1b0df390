//! Point-in-time fundamentals supplied by collaborators, and their defaults.

use std::fmt;

pub const DEFAULT_TRAILING_PE: f64 = 25.0;
pub const DEFAULT_SECTOR_PE: f64 = 20.0;
pub const DEFAULT_PEG_RATIO: f64 = 1.5;
pub const DEFAULT_SECTOR: &str = "Technology";

/// Broker consensus on a 1 (strong sell) to 5 (strong buy) scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrokerRating(u8);

impl BrokerRating {
    pub const NEUTRAL: BrokerRating = BrokerRating(3);

    pub fn new(value: u8) -> Option<Self> {
        (1..=5).contains(&value).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            5 => "Strong Buy",
            4 => "Buy",
            3 => "Hold",
            2 => "Sell",
            _ => "Strong Sell",
        }
    }

    /// Maps a consensus phrase to a rating. Keywords are checked in order,
    /// so "strong buy" is a buy; unrecognised text is neutral.
    pub fn from_consensus_text(text: &str) -> Self {
        let text = text.trim().to_lowercase();
        if text.contains("buy") {
            Self(5)
        } else if text.contains("accumulate") {
            Self(4)
        } else if text.contains("hold") {
            Self(3)
        } else if text.contains("reduce") {
            Self(2)
        } else if text.contains("sell") {
            Self(1)
        } else {
            Self::NEUTRAL
        }
    }
}

impl Default for BrokerRating {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for BrokerRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.0)
    }
}

/// Headline attached to a snapshot. Shown to the user, never scored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsItem {
    pub title: String,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FundamentalSnapshot {
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub eps_growth_pct: Option<f64>,
    pub revenue_growth_pct: Option<f64>,
    pub target_mean_price: Option<f64>,
    pub sector: Option<String>,
    pub broker_rating: Option<BrokerRating>,
    pub news_items: Vec<NewsItem>,
}

/// Substitution values for absent fundamentals.
#[derive(Debug, Clone, PartialEq)]
pub struct FundamentalDefaults {
    pub trailing_pe: f64,
    pub sector_pe: f64,
    pub peg_ratio: f64,
    pub broker_rating: BrokerRating,
    pub sector: String,
}

impl Default for FundamentalDefaults {
    fn default() -> Self {
        Self {
            trailing_pe: DEFAULT_TRAILING_PE,
            sector_pe: DEFAULT_SECTOR_PE,
            peg_ratio: DEFAULT_PEG_RATIO,
            broker_rating: BrokerRating::NEUTRAL,
            sector: DEFAULT_SECTOR.to_string(),
        }
    }
}

impl FundamentalSnapshot {
    pub fn trailing_pe_or(&self, defaults: &FundamentalDefaults) -> f64 {
        self.trailing_pe.unwrap_or(defaults.trailing_pe)
    }

    pub fn peg_ratio_or(&self, defaults: &FundamentalDefaults) -> f64 {
        self.peg_ratio.unwrap_or(defaults.peg_ratio)
    }

    pub fn sector_or<'a>(&'a self, defaults: &'a FundamentalDefaults) -> &'a str {
        self.sector.as_deref().unwrap_or(&defaults.sector)
    }

    pub fn broker_rating_or(&self, defaults: &FundamentalDefaults) -> BrokerRating {
        self.broker_rating.unwrap_or(defaults.broker_rating)
    }

    /// Analyst target, falling back to the current price (zero upside).
    pub fn target_price_or(&self, current_price: f64) -> f64 {
        self.target_mean_price.unwrap_or(current_price)
    }
}
