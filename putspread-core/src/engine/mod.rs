//! Evaluation engine.
//!
//! The pipeline is strictly one-way:
//!
//! 1. `compute_metrics`: price series → `MetricSet`
//! 2. classifier, confidence scorer and credit estimator read the metrics
//! 3. `Evaluator` assembles the `Decision` (and the richer `Assessment`)
//!
//! `Screener` sits in front of the pipeline: it filters many tickers down
//! to the ones worth evaluating.
//!
//! Every stage is a pure synchronous function of its inputs; evaluations
//! for different tickers can run in parallel with no coordination.

pub mod evaluator;
pub mod metrics;
pub mod screener;

pub use evaluator::{evaluate, Assessment, Evaluator};
pub use metrics::compute_metrics;
pub use screener::{period_drop, ScreenFilter, ScreenHit, ScreenPeriod, Screener};
