//! CLI definition and dispatch.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{BacktestReport, DEFAULT_HOLDING_PERIOD};
use crate::domain::config_validation::{validate_config, AUTO_VARIANT};
use crate::domain::error::SignalError;
use crate::domain::evaluation::{
    evaluate_ticker, run_daily_backtest, Collaborators, Evaluation, EvaluationSettings,
    VariantChoice, DEFAULT_LOOKBACK_DAYS, DEFAULT_THRESHOLD, MAX_LOOKBACK_DAYS,
};
use crate::domain::fundamentals::{
    BrokerRating, FundamentalDefaults, DEFAULT_PEG_RATIO, DEFAULT_SECTOR, DEFAULT_SECTOR_PE,
    DEFAULT_TRAILING_PE,
};
use crate::domain::market::{parse_tickers, Market};
use crate::domain::score::{score_breakdown, ScoreOutcome, ScoreVariant};
use crate::domain::sector_cache::{SectorPeCache, DEFAULT_TTL_HOURS, MAX_TTL_HOURS};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceDataPort;
use crate::ports::sector_pe_port::SectorPePort;

#[derive(Parser, Debug)]
#[command(name = "signalscore", about = "Rule-based equity signal scoring and backtesting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Command-line values that take precedence over the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct Overrides {
    /// Comma-separated ticker codes
    #[arg(short, long)]
    pub ticker: Option<String>,
    /// ASX or US
    #[arg(short, long)]
    pub market: Option<String>,
    /// asx-broker, momentum, growth-general, growth-tech or auto
    #[arg(long)]
    pub variant: Option<String>,
    #[arg(long)]
    pub threshold: Option<f64>,
    /// Evaluation date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score the latest day of each ticker
    Score {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
        /// Show each weighted sub-score
        #[arg(long)]
        breakdown: bool,
    },
    /// Print the most recent indicator rows
    Indicators {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
        #[arg(long, default_value_t = 5)]
        rows: usize,
    },
    /// Run the fixed-holding-period backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
        #[arg(long)]
        holding_period: Option<usize>,
        /// Gate each day on its own score instead of the latest score
        #[arg(long)]
        per_day: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols with price files in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Score {
            config,
            overrides,
            breakdown,
        } => run_score(&config, &overrides, breakdown),
        Command::Indicators {
            config,
            overrides,
            rows,
        } => run_indicators(&config, &overrides, rows),
        Command::Backtest {
            config,
            overrides,
            holding_period,
            per_day,
        } => run_backtest(&config, &overrides, holding_period, per_day),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn fail(err: &SignalError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> SignalError {
    SignalError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

pub fn parse_variant(name: &str) -> Result<VariantChoice, SignalError> {
    let name = name.trim();
    if name.eq_ignore_ascii_case(AUTO_VARIANT) {
        return Ok(VariantChoice::BySector);
    }
    ScoreVariant::from_name(name)
        .map(VariantChoice::Fixed)
        .ok_or_else(|| invalid("score", "variant", format!("unknown variant '{name}'")))
}

pub fn build_defaults(config: &dyn ConfigPort) -> Result<FundamentalDefaults, SignalError> {
    let rating = config.get_int("defaults", "broker_rating", 3);
    let broker_rating = u8::try_from(rating)
        .ok()
        .and_then(BrokerRating::new)
        .ok_or_else(|| invalid("defaults", "broker_rating", "broker_rating must be between 1 and 5"))?;

    Ok(FundamentalDefaults {
        trailing_pe: config.get_double("defaults", "trailing_pe", DEFAULT_TRAILING_PE),
        sector_pe: config.get_double("defaults", "sector_pe", DEFAULT_SECTOR_PE),
        peg_ratio: config.get_double("defaults", "peg_ratio", DEFAULT_PEG_RATIO),
        broker_rating,
        sector: config
            .get_string("defaults", "sector")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SECTOR.to_string()),
    })
}

pub fn build_settings(
    config: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<EvaluationSettings, SignalError> {
    let variant = match overrides
        .variant
        .clone()
        .or_else(|| config.get_string("score", "variant"))
    {
        Some(name) => parse_variant(&name)?,
        None => VariantChoice::Fixed(ScoreVariant::AsxBroker),
    };

    let threshold = overrides
        .threshold
        .unwrap_or_else(|| config.get_double("score", "threshold", DEFAULT_THRESHOLD));
    if !(0.0..=100.0).contains(&threshold) {
        return Err(invalid("score", "threshold", "threshold must be between 0 and 100"));
    }

    let holding = config.get_int("backtest", "holding_period_days", DEFAULT_HOLDING_PERIOD as i64);
    let holding_period_days = usize::try_from(holding)
        .ok()
        .filter(|h| *h >= 1)
        .ok_or_else(|| {
            invalid("backtest", "holding_period_days", "holding_period_days must be at least 1")
        })?;

    let lookback_days = config.get_int("backtest", "lookback_days", DEFAULT_LOOKBACK_DAYS);
    if !(1..=MAX_LOOKBACK_DAYS).contains(&lookback_days) {
        return Err(invalid(
            "backtest",
            "lookback_days",
            format!("lookback_days must be between 1 and {MAX_LOOKBACK_DAYS}"),
        ));
    }

    Ok(EvaluationSettings {
        variant,
        threshold,
        holding_period_days,
        lookback_days,
        defaults: build_defaults(config)?,
    })
}

pub fn resolve_market(
    market_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Market, SignalError> {
    let name = market_override
        .map(str::to_string)
        .or_else(|| config.get_string("market", "market"))
        .unwrap_or_else(|| Market::Asx.to_string());
    Market::from_name(&name).ok_or_else(|| {
        invalid("market", "market", format!("unknown market '{}'", name.trim()))
    })
}

/// `--ticker` wins over `[market] tickers`.
pub fn resolve_tickers(
    ticker_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, SignalError> {
    let list = ticker_override
        .map(str::to_string)
        .or_else(|| config.get_string("market", "tickers"))
        .ok_or_else(|| SignalError::ConfigMissing {
            section: "market".to_string(),
            key: "tickers".to_string(),
        })?;
    parse_tickers(&list).map_err(|e| invalid("market", "tickers", e.to_string()))
}

pub fn build_sector_cache(
    config: &dyn ConfigPort,
    port: &dyn SectorPePort,
    now: DateTime<Utc>,
) -> Result<SectorPeCache, SignalError> {
    let hours = config.get_int("sector_pe", "ttl_hours", DEFAULT_TTL_HOURS);
    let ttl = Some(hours)
        .filter(|h| (1..=MAX_TTL_HOURS).contains(h))
        .and_then(Duration::try_hours)
        .ok_or_else(|| {
            invalid(
                "sector_pe",
                "ttl_hours",
                format!("ttl_hours must be between 1 and {MAX_TTL_HOURS}"),
            )
        })?;
    let mut cache = SectorPeCache::new(ttl);
    cache.refresh_with(port, now);
    Ok(cache)
}

/// Evaluates every ticker, skipping those that fail. Errors only when no
/// ticker could be evaluated; the first failure is returned.
pub fn evaluate_tickers(
    collaborators: &Collaborators<'_>,
    tickers: &[String],
    market: Market,
    as_of: NaiveDate,
    sector_cache: &SectorPeCache,
    now: DateTime<Utc>,
    settings: &EvaluationSettings,
) -> Result<Vec<Evaluation>, SignalError> {
    let mut evaluations = Vec::with_capacity(tickers.len());
    let mut first_error = None;

    for code in tickers {
        match evaluate_ticker(collaborators, code, market, as_of, sector_cache, now, settings) {
            Ok(evaluation) => evaluations.push(evaluation),
            Err(e) => {
                eprintln!("warning: skipping {} ({})", market.symbol(code), e);
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) if evaluations.is_empty() => Err(e),
        _ => Ok(evaluations),
    }
}

/// Tab-separated summary: symbol, score, variant, status.
pub fn format_score_line(evaluation: &Evaluation) -> String {
    let status = match &evaluation.outcome {
        ScoreOutcome::Computed(_) => "ok".to_string(),
        ScoreOutcome::Neutral { fault } => format!("neutral: {fault}"),
    };
    format!(
        "{}\t{:.2}\t{}\t{}",
        evaluation.symbol,
        evaluation.outcome.value(),
        evaluation.variant,
        status
    )
}

pub fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"))
}

/// Loaded config plus everything a command needs to evaluate tickers.
struct Session {
    adapter: CsvAdapter,
    settings: EvaluationSettings,
    market: Market,
    tickers: Vec<String>,
    as_of: NaiveDate,
    now: DateTime<Utc>,
    sector_cache: SectorPeCache,
}

impl Session {
    fn collaborators(&self) -> Collaborators<'_> {
        Collaborators {
            prices: &self.adapter,
            fundamentals: &self.adapter,
            broker: &self.adapter,
        }
    }

    fn evaluate(&self) -> Result<Vec<Evaluation>, SignalError> {
        evaluate_tickers(
            &self.collaborators(),
            &self.tickers,
            self.market,
            self.as_of,
            &self.sector_cache,
            self.now,
            &self.settings,
        )
    }
}

fn open_session(config_path: &Path, overrides: &Overrides) -> Result<Session, ExitCode> {
    eprintln!("Loading config from {}", config_path.display());
    let config = load_config(config_path)?;
    let session = || -> Result<Session, SignalError> {
        validate_config(&config)?;
        let settings = build_settings(&config, overrides)?;
        let market = resolve_market(overrides.market.as_deref(), &config)?;
        let tickers = resolve_tickers(overrides.ticker.as_deref(), &config)?;
        let adapter = CsvAdapter::new(PathBuf::from(config.require_string("data", "path")?));

        let now = Utc::now();
        let as_of = overrides.as_of.unwrap_or_else(|| now.date_naive());
        let sector_cache = build_sector_cache(&config, &adapter, now)?;

        Ok(Session {
            adapter,
            settings,
            market,
            tickers,
            as_of,
            now,
            sector_cache,
        })
    };
    session().map_err(|e| fail(&e))
}

fn run_score(config_path: &Path, overrides: &Overrides, breakdown: bool) -> ExitCode {
    let session = match open_session(config_path, overrides) {
        Ok(s) => s,
        Err(code) => return code,
    };
    eprintln!(
        "Scoring {} tickers on {} as of {}",
        session.tickers.len(),
        session.market,
        session.as_of
    );

    let evaluations = match session.evaluate() {
        Ok(e) => e,
        Err(e) => return fail(&e),
    };

    for evaluation in &evaluations {
        println!("{}", format_score_line(evaluation));
        print_evaluation_summary(evaluation);
        if breakdown {
            print_breakdown(evaluation);
        }
    }
    ExitCode::SUCCESS
}

fn print_evaluation_summary(evaluation: &Evaluation) {
    eprintln!("\n=== {} ===", evaluation.symbol);
    if let Some(latest) = &evaluation.latest {
        eprintln!("Close:            {:.2} ({})", latest.close, latest.date);
        eprintln!("SMA 200:          {}", format_value(latest.sma_200));
        eprintln!("RSI 14:           {}", format_value(latest.rsi_14));
    }
    eprintln!("Sector:           {}", evaluation.sector);
    eprintln!(
        "PE / Sector PE:   {:.2} / {:.2}",
        evaluation.pe_ratio, evaluation.sector_pe
    );
    if let Some(upside) = evaluation.analyst_upside_pct {
        eprintln!("Analyst Upside:   {:.2}%", upside);
    }
    eprintln!("Broker Rating:    {}", evaluation.broker_rating);
    eprintln!("Variant:          {}", evaluation.variant);
    eprintln!("Signal Score:     {:.2}", evaluation.outcome.value());
    if let Some(fault) = evaluation.outcome.fault() {
        eprintln!("  (neutral: {fault})");
    }
    for item in &evaluation.fundamentals.news_items {
        match &item.source {
            Some(source) => eprintln!("  news: {} [{}]", item.title, source),
            None => eprintln!("  news: {}", item.title),
        }
    }
}

fn print_breakdown(evaluation: &Evaluation) {
    match score_breakdown(&evaluation.variant, &evaluation.inputs) {
        Ok(components) => {
            for c in components {
                eprintln!(
                    "  {:<22} {:>6.2} x {:.2} = {:>6.2}",
                    c.sub_score.to_string(),
                    c.value,
                    c.weight,
                    c.contribution()
                );
            }
        }
        Err(fault) => eprintln!("  breakdown unavailable: {fault}"),
    }
}

fn run_indicators(config_path: &Path, overrides: &Overrides, rows: usize) -> ExitCode {
    let session = match open_session(config_path, overrides) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let evaluations = match session.evaluate() {
        Ok(e) => e,
        Err(e) => return fail(&e),
    };

    println!("symbol,date,close,sma_50,sma_100,sma_200,rsi_14,ema_12,ema_26,macd,macd_signal,bb_upper,bb_lower");
    for evaluation in &evaluations {
        let set = &evaluation.indicators;
        let start = set.len().saturating_sub(rows);
        for row in (start..set.len()).filter_map(|i| set.row(i)) {
            println!(
                "{},{},{:.4},{},{},{},{},{},{},{},{},{},{}",
                evaluation.symbol,
                row.date,
                row.close,
                format_value(row.sma_50),
                format_value(row.sma_100),
                format_value(row.sma_200),
                format_value(row.rsi_14),
                format_value(row.ema_12),
                format_value(row.ema_26),
                format_value(row.macd),
                format_value(row.macd_signal),
                format_value(row.bollinger_upper),
                format_value(row.bollinger_lower),
            );
        }
    }
    ExitCode::SUCCESS
}

fn run_backtest(
    config_path: &Path,
    overrides: &Overrides,
    holding_period: Option<usize>,
    per_day: bool,
) -> ExitCode {
    let mut session = match open_session(config_path, overrides) {
        Ok(s) => s,
        Err(code) => return code,
    };
    if let Some(h) = holding_period {
        if h == 0 {
            return fail(&invalid(
                "backtest",
                "holding_period_days",
                "holding_period_days must be at least 1",
            ));
        }
        session.settings.holding_period_days = h;
    }

    let evaluations = match session.evaluate() {
        Ok(e) => e,
        Err(e) => return fail(&e),
    };

    for evaluation in &evaluations {
        let report = if per_day {
            run_daily_backtest(evaluation, &session.settings)
        } else {
            evaluation.backtest.clone()
        };
        print_backtest_report(&evaluation.symbol, evaluation.outcome.value(), &report);
    }
    ExitCode::SUCCESS
}

fn print_backtest_report(symbol: &str, score: f64, report: &BacktestReport) {
    println!(
        "{}\t{}\t{:.2}\t{:.2}\t{:.2}",
        symbol,
        report.total_trades,
        report.win_rate_pct,
        report.avg_return_pct,
        report.cumulative_return_pct
    );
    eprintln!("\n=== {} Backtest ===", symbol);
    eprintln!("Signal Score:     {:.2}", score);
    eprintln!("Holding Period:   {} days", report.holding_period_days);
    eprintln!("Total Trades:     {}", report.total_trades);
    eprintln!("Win Rate:         {:.2}%", report.win_rate_pct);
    eprintln!("Avg Return:       {:.2}%", report.avg_return_pct);
    eprintln!("Cumulative:       {:.2}%", report.cumulative_return_pct);
    for trade in report.trades.iter().rev().take(5) {
        eprintln!(
            "  {} -> {}  {:.2} -> {:.2}  {:+.2}%",
            trade.entry_date, trade.exit_date, trade.entry_price, trade.exit_price, trade.return_pct
        );
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let checked = validate_config(&config)
        .and_then(|_| build_settings(&config, &Overrides::default()))
        .and_then(|settings| {
            resolve_market(None, &config).map(|market| (settings, market))
        });
    let (settings, market) = match checked {
        Ok(v) => v,
        Err(e) => return fail(&e),
    };

    let variant = match &settings.variant {
        VariantChoice::Fixed(v) => v.to_string(),
        VariantChoice::BySector => AUTO_VARIANT.to_string(),
    };
    eprintln!("  market:         {}", market);
    eprintln!("  variant:        {}", variant);
    eprintln!("  threshold:      {:.2}", settings.threshold);
    eprintln!("  holding period: {} days", settings.holding_period_days);
    eprintln!("  lookback:       {} days", settings.lookback_days);
    match resolve_tickers(None, &config) {
        Ok(tickers) => eprintln!("  tickers:        {}", tickers.join(", ")),
        Err(_) => eprintln!("  tickers:        (none, use --ticker)"),
    }
    eprintln!("\nConfig validated successfully");
    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let path = match config.require_string("data", "path") {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    let adapter = CsvAdapter::new(PathBuf::from(path));
    match adapter.list_symbols() {
        Ok(symbols) if symbols.is_empty() => {
            eprintln!("No symbols found");
            ExitCode::SUCCESS
        }
        Ok(symbols) => {
            for symbol in &symbols {
                println!("{}", symbol);
            }
            eprintln!("{} symbols found", symbols.len());
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}
