//! Putspread CLI: evaluate price history for bull put credit spread entries.
//!
//! Commands:
//! - `evaluate`: evaluate one or more CSV files (in parallel) and print JSON reports
//! - `fetch`: load a symbol from Alpha Vantage, evaluate it, optionally save the CSV
//! - `screen`: filter many symbols by RSI and period drop, then evaluate the matches
//! - `rules`: print the active tier rules and field descriptions

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use putspread_core::components::{
    rule_table, AlgorithmicScorer, NarrativeScorer, OpenAiNarrative,
};
use putspread_core::data::{
    normalize_symbol, read_csv, write_csv, AlphaVantageLoader, CsvLoader, SeriesLoader,
};
use putspread_core::domain::FIELD_DESCRIPTIONS;
use putspread_core::engine::{ScreenFilter, ScreenHit, ScreenPeriod, Screener};
use putspread_core::{Assessment, Evaluator, EvaluatorConfig, PriceSeries};

#[derive(Parser)]
#[command(
    name = "putspread",
    version,
    about = "Putspread CLI: bull put credit spread evaluator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate daily price history from CSV files.
    Evaluate {
        /// CSV files with date,open,high,low,close[,volume] columns.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Ticker to report (single file only). Defaults to the file stem.
        #[arg(long)]
        ticker: Option<String>,

        /// TOML file overriding thresholds, weights and credit parameters.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Ask OpenAI for commentary and confidence (needs OPENAI_API_KEY).
        #[arg(long, default_value_t = false)]
        ai: bool,

        /// Pretty-print JSON.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Fetch daily history from Alpha Vantage and evaluate it.
    Fetch {
        /// Ticker symbol (e.g., SPY).
        symbol: String,

        /// Also save the fetched series as CSV.
        #[arg(long)]
        output: Option<PathBuf>,

        /// TOML file overriding thresholds, weights and credit parameters.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Ask OpenAI for commentary and confidence (needs OPENAI_API_KEY).
        #[arg(long, default_value_t = false)]
        ai: bool,

        /// Pretty-print JSON.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Screen symbols for oversold pullbacks and evaluate the matches.
    Screen {
        /// Ticker symbols to scan.
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Skip symbols whose RSI is above this.
        #[arg(long, default_value_t = 40.0)]
        max_rsi: f64,

        /// Minimum period drop in percent (positive).
        #[arg(long, default_value_t = 5.0)]
        min_drop: f64,

        /// Period to scan: today, 1d, 3d, 1w, 2w, 1m, 3m or ytd.
        #[arg(long, default_value = "1w")]
        period: ScreenPeriod,

        /// Skip symbols that traded less than this on the latest day.
        #[arg(long)]
        min_volume: Option<u64>,

        /// Keep at most this many matches, deepest drop first.
        #[arg(long, default_value_t = 50)]
        max_results: usize,

        /// Read <DIR>/<SYMBOL>.csv instead of fetching from Alpha Vantage.
        #[arg(long)]
        dir: Option<PathBuf>,

        /// TOML file overriding thresholds, weights and credit parameters.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Ask OpenAI for commentary and confidence (needs OPENAI_API_KEY).
        #[arg(long, default_value_t = false)]
        ai: bool,

        /// Pretty-print JSON.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Print the active tier rules in priority order.
    Rules {
        /// TOML config to show instead of the defaults.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            files,
            ticker,
            config,
            ai,
            pretty,
        } => run_evaluate(&files, ticker, config.as_deref(), ai, pretty),
        Commands::Fetch {
            symbol,
            output,
            config,
            ai,
            pretty,
        } => run_fetch(&symbol, output.as_deref(), config.as_deref(), ai, pretty),
        Commands::Screen {
            symbols,
            max_rsi,
            min_drop,
            period,
            min_volume,
            max_results,
            dir,
            config,
            ai,
            pretty,
        } => {
            let filter = ScreenFilter {
                max_rsi,
                min_drop_pct: min_drop,
                period,
                min_volume,
                max_results,
            };
            run_screen(&symbols, filter, dir.as_deref(), config.as_deref(), ai, pretty)
        }
        Commands::Rules { config } => run_rules(config.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<EvaluatorConfig> {
    match path {
        Some(p) => EvaluatorConfig::from_file(p)
            .with_context(|| format!("failed to load config {}", p.display())),
        None => Ok(EvaluatorConfig::default()),
    }
}

/// Evaluator with the algorithmic scorer, or the OpenAI narrative scorer
/// when `ai` is set and a key is available.
fn build_evaluator(config: EvaluatorConfig, ai: bool) -> Result<Evaluator> {
    let scoring = config.scoring.clone();
    let evaluator = Evaluator::new(config)?;
    if !ai {
        return Ok(evaluator);
    }

    match OpenAiNarrative::from_env() {
        Ok(source) => {
            info!(model = source.model(), "AI narrative enabled");
            Ok(evaluator.with_scorer(NarrativeScorer::new(
                source,
                AlgorithmicScorer::new(scoring),
            )))
        }
        Err(e) => {
            warn!(error = %e, "AI narrative unavailable, using algorithmic confidence");
            Ok(evaluator)
        }
    }
}

fn run_evaluate(
    files: &[PathBuf],
    ticker: Option<String>,
    config_path: Option<&Path>,
    ai: bool,
    pretty: bool,
) -> Result<()> {
    if ticker.is_some() && files.len() > 1 {
        bail!("--ticker can only be used with a single file");
    }

    let evaluator = build_evaluator(load_config(config_path)?, ai)?;

    let results: Vec<(PathBuf, Result<Assessment>)> = files
        .par_iter()
        .map(|path| {
            let result = evaluate_file(&evaluator, path, ticker.as_deref());
            (path.clone(), result)
        })
        .collect();

    let mut failed = 0usize;
    for (path, result) in results {
        match result {
            Ok(assessment) => print_json(&report(&assessment, ai), pretty)?,
            Err(e) => {
                failed += 1;
                eprintln!("Error for {}: {e:#}", path.display());
            }
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn evaluate_file(evaluator: &Evaluator, path: &Path, ticker: Option<&str>) -> Result<Assessment> {
    let symbol = match ticker {
        Some(t) => normalize_symbol(t)?,
        None => {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .with_context(|| format!("cannot derive a ticker from {}", path.display()))?;
            normalize_symbol(stem)?
        }
    };
    let series = read_csv(path, &symbol)?;
    Ok(evaluator.assess(&series)?)
}

fn run_fetch(
    symbol: &str,
    output: Option<&Path>,
    config_path: Option<&Path>,
    ai: bool,
    pretty: bool,
) -> Result<()> {
    let evaluator = build_evaluator(load_config(config_path)?, ai)?;
    let loader = AlphaVantageLoader::from_env()?;

    let series = loader.load(symbol)?;
    info!(
        symbol = series.symbol(),
        points = series.len(),
        last = %series.last_date(),
        "fetched"
    );

    if let Some(path) = output {
        write_csv(&series, path)?;
        info!(path = %path.display(), "saved CSV");
    }

    let assessment = evaluator.assess(&series)?;
    print_json(&report(&assessment, ai), pretty)
}

fn run_screen(
    symbols: &[String],
    filter: ScreenFilter,
    dir: Option<&Path>,
    config_path: Option<&Path>,
    ai: bool,
    pretty: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let screener = Screener::new(filter, config.indicators.rsi_period)?;
    let evaluator = build_evaluator(config, ai)?;
    let loader: Box<dyn SeriesLoader> = match dir {
        Some(d) => Box::new(CsvLoader::new(d)),
        None => Box::new(AlphaVantageLoader::from_env()?),
    };

    let output = screen_symbols(loader.as_ref(), &screener, &evaluator, symbols, ai);
    print_json(&output, pretty)
}

/// Load and screen every symbol, then evaluate the ranked matches.
///
/// Symbols that fail to load are logged and skipped.
fn screen_symbols(
    loader: &dyn SeriesLoader,
    screener: &Screener,
    evaluator: &Evaluator,
    symbols: &[String],
    ai: bool,
) -> Value {
    let matched: Vec<(ScreenHit, PriceSeries)> = symbols
        .par_iter()
        .filter_map(|symbol| match loader.load(symbol) {
            Ok(series) => screener.screen(&series).map(|hit| (hit, series)),
            Err(e) => {
                warn!(symbol = symbol.as_str(), error = %e, "skipping symbol");
                None
            }
        })
        .collect();
    info!(scanned = symbols.len(), matched = matched.len(), "screen complete");

    let (hits, series): (Vec<_>, Vec<_>) = matched.into_iter().unzip();
    let by_ticker: HashMap<String, PriceSeries> = series
        .into_iter()
        .map(|s| (s.symbol().to_string(), s))
        .collect();

    let results: Vec<Value> = screener
        .rank(hits)
        .par_iter()
        .filter_map(|hit| {
            let series = by_ticker.get(&hit.ticker)?;
            let analysis = match evaluator.assess(series) {
                Ok(a) => report(&a, ai),
                Err(e) => json!({ "error": e.to_string() }),
            };
            let mut entry = json!(hit);
            entry["analysis"] = analysis;
            Some(entry)
        })
        .collect();

    let f = screener.filter();
    json!({
        "total_found": results.len(),
        "filters_applied": {
            "max_rsi": f.max_rsi,
            "min_drop": f.min_drop_pct,
            "period": f.period,
            "min_volume": f.min_volume,
            "max_results": f.max_results,
        },
        "results": results,
        "scan_timestamp": chrono::Utc::now().to_rfc3339(),
        "data_source": loader.name(),
    })
}

fn run_rules(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    println!("Tier rules (first match wins):");
    for (i, (rule, tier, condition)) in rule_table(&config.rules).iter().enumerate() {
        let rule = serde_json::to_value(rule)?;
        println!(
            "  {}. {:<28} {:<8} {condition}",
            i + 1,
            rule.as_str().unwrap_or_default(),
            tier.as_str()
        );
    }

    println!();
    println!("Fields:");
    for f in FIELD_DESCRIPTIONS {
        println!("  {:<18} {}", f.field, f.description);
        if let Some(ideal) = f.ideal {
            println!("  {:<18}   ideal: {ideal}", "");
        }
        if let Some(warning) = f.warning {
            println!("  {:<18}   warning: {warning}", "");
        }
    }

    Ok(())
}

/// One JSON report per ticker.
fn report(a: &Assessment, ai_requested: bool) -> Value {
    let ai_analysis = match (&a.commentary, ai_requested) {
        (Some(text), _) => json!({ "analysis": text, "model": a.model }),
        (None, true) => json!({ "error": "AI analysis unavailable; see log for details" }),
        (None, false) => Value::Null,
    };

    json!({
        "ticker": a.ticker,
        "play": a.decision.play,
        "tier": a.decision.tier,
        "metrics": a.metrics,
        "reason": a.decision.reason,
        "confidence_score": round2(a.decision.confidence_score),
        "confidence_source": a.decision.confidence_source,
        "estimated_credit": a.decision.estimated_credit,
        "ai_analysis": ai_analysis,
        "fingerprint": a.fingerprint,
    })
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn print_json(value: &Value, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
