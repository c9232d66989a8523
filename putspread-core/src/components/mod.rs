//! Decision components: each reads a `MetricSet` and contributes one part
//! of the `Decision`.
//!
//! - Classifier: ordered rules, first match picks the tier and reason
//! - Confidence: algorithmic score, optionally combined with a narrative source
//! - Credit: Black–Scholes estimate of the spread credit
//!
//! None of them see the price series, and none depend on each other's output
//! beyond the tier.

pub mod classifier;
pub mod confidence;
pub mod credit;

pub use classifier::{classify, rule_table, Classification, Rule};
pub use confidence::{
    score, AlgorithmicScorer, Confidence, ConfidenceScorer, Narrative, NarrativeError,
    NarrativeMode, NarrativeScorer, NarrativeSource, OpenAiNarrative,
};
pub use credit::estimate_credit;
