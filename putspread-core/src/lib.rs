//! Putspread Core: indicator engine, tier rules, confidence and credit for
//! bull put credit spreads.
//!
//! This crate contains everything needed to turn a daily price series into a
//! trade decision:
//! - Domain types (price points, series, metric set, decision)
//! - Indicators (Wilder RSI, SMA, rate of change, drawdown, oversold streak)
//! - Ordered tier rules with a first-match-wins classifier
//! - Confidence scoring, algorithmic or narrative-backed with fail-open
//! - Black–Scholes credit estimate for the spread
//! - A screener that filters many tickers by RSI and period drop
//! - Loaders for CSV files and Alpha Vantage
//!
//! ```no_run
//! use putspread_core::data::read_csv;
//! use putspread_core::evaluate;
//!
//! let series = read_csv(std::path::Path::new("SPY.csv"), "SPY")?;
//! let decision = evaluate(&series)?;
//! println!("{} {}", decision.tier, decision.reason);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod components;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;

pub use components::{classify, estimate_credit, score};
pub use config::EvaluatorConfig;
pub use domain::{ConfidenceSource, Decision, MetricSet, PricePoint, PriceSeries, Tier};
pub use engine::{compute_metrics, evaluate, Assessment, Evaluator, ScreenFilter, Screener};
pub use error::{EvaluationError, InputError};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything handed across threads is Send + Sync.
    ///
    /// The CLI evaluates files on a rayon pool with one shared `Evaluator`.
    /// If any of these types loses Send or Sync the build breaks here first.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::PricePoint>();
        require_sync::<domain::PricePoint>();
        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();
        require_send::<domain::MetricSet>();
        require_sync::<domain::MetricSet>();
        require_send::<domain::Decision>();
        require_sync::<domain::Decision>();

        // Components
        require_send::<components::Classification>();
        require_sync::<components::Classification>();
        require_send::<components::AlgorithmicScorer>();
        require_sync::<components::AlgorithmicScorer>();
        require_send::<components::NarrativeScorer<components::OpenAiNarrative>>();
        require_sync::<components::NarrativeScorer<components::OpenAiNarrative>>();

        // Engine
        require_send::<engine::Evaluator>();
        require_sync::<engine::Evaluator>();
        require_send::<engine::Screener>();
        require_sync::<engine::Screener>();
        require_send::<engine::Assessment>();
        require_sync::<engine::Assessment>();

        // Loaders
        require_send::<data::CsvLoader>();
        require_sync::<data::CsvLoader>();
        require_send::<data::AlphaVantageLoader>();
        require_sync::<data::AlphaVantageLoader>();

        // Errors
        require_send::<error::EvaluationError>();
        require_sync::<error::EvaluationError>();
        require_send::<data::DataError>();
        require_sync::<data::DataError>();
    }

    /// Architecture contract: the decision components never see the series.
    ///
    /// classify, score and estimate_credit take only the metric set (plus the
    /// tier where needed), so nothing but `compute_metrics` can look at
    /// price history.
    #[test]
    fn components_read_only_metrics() {
        fn _check_signatures(
            m: &MetricSet,
            config: &EvaluatorConfig,
        ) -> (components::Classification, f64, f64) {
            let c = classify(m, &config.rules);
            let s = score(m, c.tier, &config.scoring);
            let credit = estimate_credit(m, c.tier, &config.credit);
            (c, s, credit)
        }
    }
}
