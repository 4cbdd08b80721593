//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::chart::{build_chart, ChartSpec, IndicatorToggleConfig, Theme};
use crate::domain::config_validation::{validate_symbol, DashboardSettings};
use crate::domain::error::StockdashError;
use crate::domain::format::{format_change_pct, format_large_number, format_price};
use crate::domain::fundamentals::Fundamentals;
use crate::domain::indicator_helpers::IndicatorSet;
use crate::domain::metrics::{MetricsSummary, PriceQuote};
use crate::domain::ohlcv::Series;
use crate::domain::period::Period;
use crate::ports::market_data_port::MarketDataPort;

#[derive(Parser, Debug)]
#[command(name = "stockdash", about = "Stock analysis dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze one symbol and emit its chart description
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: Option<String>,
        #[arg(short, long)]
        period: Option<String>,
        #[command(flatten)]
        indicators: IndicatorFlags,
        /// Use the light chart theme
        #[arg(long)]
        light: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Manage the watchlist
    Watchlist {
        #[command(subcommand)]
        action: WatchlistAction,
    },
    /// Show recent searches
    History {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Validate a dashboard configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum WatchlistAction {
    /// Add a symbol
    Add {
        symbol: String,
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Remove every entry for a symbol
    Remove {
        symbol: String,
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List all entries
    List {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Indicator overlays switched on from the command line. These add to the
/// `[indicators]` section, they never switch a configured group off.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct IndicatorFlags {
    #[arg(long)]
    pub sma: bool,
    #[arg(long)]
    pub ema: bool,
    #[arg(long)]
    pub bollinger: bool,
    #[arg(long)]
    pub rsi: bool,
    #[arg(long)]
    pub macd: bool,
}

impl IndicatorFlags {
    pub fn merge(&self, configured: IndicatorToggleConfig) -> IndicatorToggleConfig {
        IndicatorToggleConfig {
            sma: self.sma || configured.sma,
            ema: self.ema || configured.ema,
            bollinger: self.bollinger || configured.bollinger,
            rsi: self.rsi || configured.rsi,
            macd: self.macd || configured.macd,
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Dispatch one parsed command.
pub fn execute(cli: Cli) -> Result<(), StockdashError> {
    match cli.command {
        Command::Analyze {
            config,
            symbol,
            period,
            indicators,
            light,
            output,
        } => run_analyze(
            &config,
            symbol.as_deref(),
            period.as_deref(),
            indicators,
            light,
            output.as_deref(),
        ),
        Command::Watchlist { action } => run_watchlist(action),
        Command::History { config, limit } => run_history(&config, limit),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, StockdashError> {
    debug!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

/// Everything one analysis needs after config and flags are resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub symbol: String,
    pub period: Period,
    pub toggles: IndicatorToggleConfig,
    pub theme: Theme,
}

impl AnalysisRequest {
    pub fn resolve(
        settings: &DashboardSettings,
        symbol: Option<&str>,
        period: Option<&str>,
        flags: IndicatorFlags,
        light: bool,
    ) -> Result<Self, StockdashError> {
        let symbol = symbol
            .map(|s| s.trim().to_uppercase())
            .unwrap_or_else(|| settings.default_symbol.clone());
        validate_symbol(&symbol)?;

        let period = match period {
            Some(p) => p.parse()?,
            None => settings.default_period,
        };

        Ok(AnalysisRequest {
            symbol,
            period,
            toggles: flags.merge(settings.indicators),
            theme: if light { Theme::Light } else { settings.theme },
        })
    }
}

/// Output of one analysis run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub series: Series,
    pub fundamentals: Fundamentals,
    pub quote: Option<PriceQuote>,
    pub metrics: MetricsSummary,
    pub indicators: IndicatorSet,
    pub chart: ChartSpec,
}

pub fn run_analysis_pipeline(
    data_port: &dyn MarketDataPort,
    request: &AnalysisRequest,
) -> Result<Analysis, StockdashError> {
    let series = data_port.fetch_history(&request.symbol, request.period)?;
    let fundamentals = data_port.fetch_fundamentals(&request.symbol)?;
    info!(
        symbol = %request.symbol,
        period = %request.period,
        bars = series.len(),
        "fetched market data"
    );

    let groups = request.toggles.enabled_groups();
    let indicators = IndicatorSet::compute_groups(series.bars(), &groups);
    debug!(columns = indicators.len(), ?groups, "computed indicators");

    let chart = build_chart(&series, &indicators, &request.toggles, request.theme)?;
    let metrics = MetricsSummary::compute(series.bars());
    let quote = PriceQuote::from_bars(series.bars());

    Ok(Analysis {
        series,
        fundamentals,
        quote,
        metrics,
        indicators,
        chart,
    })
}

/// Human-readable dashboard text for one analysis.
pub fn render_dashboard(analysis: &Analysis) -> String {
    let symbol = analysis.series.symbol();
    let f = &analysis.fundamentals;
    let mut out = String::new();

    let _ = writeln!(out, "=== {} ({}) ===", f.display_name(symbol), symbol);
    let _ = writeln!(out, "{}", f.sector_line());
    let _ = writeln!(
        out,
        "{} bars, {} to {}",
        analysis.series.len(),
        analysis.series.first_date(),
        analysis.series.last_date()
    );

    if let Some(quote) = &analysis.quote {
        match quote.change_pct {
            Some(pct) => {
                let _ = writeln!(
                    out,
                    "Current Price:    {} ({})",
                    format_price(quote.current_price),
                    format_change_pct(pct)
                );
            }
            None => {
                let _ = writeln!(out, "Current Price:    {}", format_price(quote.current_price));
            }
        }
    }

    let _ = writeln!(out, "\n--- Key Metrics ---");
    for (label, value) in f.key_metrics() {
        let _ = writeln!(out, "{:<18}{}", format!("{label}:"), value);
    }

    let _ = writeln!(out, "\n--- Summary Statistics ---");
    for (label, value) in analysis.metrics.rows() {
        let text = match (label, value) {
            (_, None) => "n/a".to_string(),
            ("Daily Returns" | "Volatility", Some(v)) => format!("{v:.2}%"),
            ("Average Volume", Some(v)) => format_large_number(v),
            (_, Some(v)) => format_price(v),
        };
        let _ = writeln!(out, "{:<18}{}", format!("{label}:"), text);
    }

    if !analysis.indicators.is_empty() {
        let _ = writeln!(out, "\n--- Latest Indicators ---");
        for (indicator_type, _) in analysis.indicators.iter() {
            let text = match analysis.indicators.latest(indicator_type) {
                Some((_, v)) => format!("{v:.2}"),
                None => "warming up".to_string(),
            };
            let _ = writeln!(out, "{:<22}{}", format!("{indicator_type}:"), text);
        }
    }

    let _ = writeln!(out, "\n--- Financial Metrics ---");
    for (label, value) in f.financial_metrics() {
        let _ = writeln!(out, "{:<18}{}", format!("{label}:"), value);
    }

    let _ = writeln!(out, "\n--- Business Summary ---");
    let _ = writeln!(out, "{}", f.business_summary());
    out
}

fn run_analyze(
    config_path: &Path,
    symbol: Option<&str>,
    period: Option<&str>,
    flags: IndicatorFlags,
    light: bool,
    output_path: Option<&Path>,
) -> Result<(), StockdashError> {
    let config = load_config(config_path)?;
    let settings = DashboardSettings::from_config(&config)?;
    let request = AnalysisRequest::resolve(&settings, symbol, period, flags, light)?;

    record_search(&config, &request)?;

    let csv_dir = settings
        .csv_dir
        .as_deref()
        .ok_or_else(|| StockdashError::ConfigMissing {
            section: "data".into(),
            key: "csv_dir".into(),
        })?;
    let data_port = CsvAdapter::new(PathBuf::from(csv_dir));

    let analysis = run_analysis_pipeline(&data_port, &request)?;
    eprint!("{}", render_dashboard(&analysis));

    let json = analysis.chart.to_json()?;
    match output_path {
        Some(path) => {
            fs::write(path, &json)?;
            eprintln!("\nChart written to: {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(feature = "sqlite")]
fn open_store(
    config: &dyn crate::ports::config_port::ConfigPort,
) -> Result<crate::adapters::sqlite_adapter::SqliteAdapter, StockdashError> {
    use crate::adapters::sqlite_adapter::SqliteAdapter;

    let store = SqliteAdapter::from_config(config)?;
    store.initialize_schema()?;
    Ok(store)
}

/// Searches are only recorded when a store is configured.
fn record_search(config: &FileConfigAdapter, request: &AnalysisRequest) -> Result<(), StockdashError> {
    #[cfg(feature = "sqlite")]
    {
        use crate::ports::config_port::ConfigPort;
        use crate::ports::store_port::WatchlistStore;

        if config.get_string("sqlite", "path").is_none() {
            debug!("no [sqlite] path, search not recorded");
            return Ok(());
        }
        let store = open_store(config)?;
        store.add_search(&request.symbol, request.period)?;
        Ok(())
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = (config, request);
        debug!("sqlite feature disabled, search not recorded");
        Ok(())
    }
}

fn run_watchlist(action: WatchlistAction) -> Result<(), StockdashError> {
    #[cfg(feature = "sqlite")]
    {
        use crate::ports::store_port::WatchlistStore;

        match action {
            WatchlistAction::Add {
                symbol,
                config,
                notes,
            } => {
                let symbol = symbol.trim().to_uppercase();
                validate_symbol(&symbol)?;
                let store = open_store(&load_config(&config)?)?;
                store.add_to_watchlist(&symbol, notes.as_deref())?;
                eprintln!("Added {} to watchlist", symbol);
            }
            WatchlistAction::Remove { symbol, config } => {
                let symbol = symbol.trim().to_uppercase();
                let store = open_store(&load_config(&config)?)?;
                let removed = store.remove_from_watchlist(&symbol)?;
                if removed == 0 {
                    eprintln!("{} is not on the watchlist", symbol);
                } else {
                    eprintln!("Removed {} from watchlist", symbol);
                }
            }
            WatchlistAction::List { config } => {
                let store = open_store(&load_config(&config)?)?;
                let entries = store.watchlist()?;
                if entries.is_empty() {
                    eprintln!("Watchlist is empty");
                }
                for entry in &entries {
                    println!(
                        "{}\t{}\t{}",
                        entry.symbol,
                        entry.added_date.format("%Y-%m-%d %H:%M"),
                        entry.notes.as_deref().unwrap_or("")
                    );
                }
            }
        }
        Ok(())
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = action;
        Err(StockdashError::Database {
            reason: "sqlite feature is required for watchlist".into(),
        })
    }
}

fn run_history(config_path: &Path, limit: Option<usize>) -> Result<(), StockdashError> {
    let config = load_config(config_path)?;
    let settings = DashboardSettings::from_config(&config)?;
    let limit = limit.unwrap_or(settings.recent_searches);

    #[cfg(feature = "sqlite")]
    {
        use crate::ports::store_port::WatchlistStore;

        let store = open_store(&config)?;
        let searches = store.recent_searches(limit)?;
        if searches.is_empty() {
            eprintln!("No recent searches");
        }
        for search in &searches {
            println!(
                "{}\t{}\t{}",
                search.search_date.format("%Y-%m-%d %H:%M"),
                search.symbol,
                search.period
            );
        }
        Ok(())
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = (config, limit);
        Err(StockdashError::Database {
            reason: "sqlite feature is required for history".into(),
        })
    }
}

fn run_validate(config_path: &Path) -> Result<(), StockdashError> {
    eprintln!("Validating config: {}", config_path.display());
    let config = load_config(config_path)?;
    let settings = DashboardSettings::from_config(&config)?;

    eprintln!("  Default symbol:   {}", settings.default_symbol);
    eprintln!("  Default period:   {}", settings.default_period);
    eprintln!("  Recent searches:  {}", settings.recent_searches);
    eprintln!(
        "  Theme:            {}",
        match settings.theme {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    );
    let enabled: Vec<String> = settings
        .indicators
        .enabled_groups()
        .iter()
        .map(|g| g.to_string())
        .collect();
    eprintln!(
        "  Indicators:       {}",
        if enabled.is_empty() {
            "none".to_string()
        } else {
            enabled.join(", ")
        }
    );
    match settings.csv_dir.as_deref() {
        Some(dir) if !Path::new(dir).is_dir() => {
            eprintln!("warning: csv_dir {} is not a directory", dir)
        }
        Some(dir) => eprintln!("  Data directory:   {}", dir),
        None => eprintln!("warning: [data] csv_dir is not set, analyze will fail"),
    }

    eprintln!("Configuration is valid.");
    Ok(())
}
