//! Evaluator: runs the pipeline for one series and assembles the result.

use serde::Serialize;
use tracing::debug;

use crate::components::classifier::{classify, Rule};
use crate::components::confidence::{AlgorithmicScorer, ConfidenceScorer};
use crate::components::credit::estimate_credit;
use crate::config::{ConfigError, EvaluatorConfig};
use crate::domain::{Decision, MetricSet, PriceSeries, Symbol};
use crate::engine::metrics::compute_metrics;
use crate::error::EvaluationError;

/// A `Decision` plus everything that went into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub ticker: Symbol,
    pub metrics: MetricSet,
    pub decision: Decision,
    pub rule: Rule,
    /// Narrative commentary, when the scorer obtained one.
    pub commentary: Option<String>,
    /// Model behind the commentary.
    pub model: Option<String>,
    /// blake3 hash of the input series.
    pub fingerprint: String,
}

/// Holds a validated configuration and the confidence scorer to use.
///
/// Stateless between calls; one `Evaluator` can be shared across threads.
pub struct Evaluator {
    config: EvaluatorConfig,
    scorer: Box<dyn ConfidenceScorer>,
}

impl Evaluator {
    /// Validates `config` and uses the algorithmic scorer.
    pub fn new(config: EvaluatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let scorer = Box::new(AlgorithmicScorer::new(config.scoring.clone()));
        Ok(Self { config, scorer })
    }

    pub fn with_scorer(mut self, scorer: impl ConfidenceScorer + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn evaluate(&self, series: &PriceSeries) -> Result<Decision, EvaluationError> {
        self.assess(series).map(|a| a.decision)
    }

    pub fn assess(&self, series: &PriceSeries) -> Result<Assessment, EvaluationError> {
        let metrics = compute_metrics(series, &self.config.indicators)?;
        let classification = classify(&metrics, &self.config.rules);
        let confidence = self.scorer.assess(&metrics, &classification);
        let estimated_credit = estimate_credit(&metrics, classification.tier, &self.config.credit);

        debug!(
            symbol = series.symbol(),
            rule = ?classification.rule,
            tier = %classification.tier,
            confidence = confidence.score,
            source = ?confidence.source,
            estimated_credit,
            "evaluated"
        );

        let decision = Decision {
            play: classification.play,
            tier: classification.tier,
            reason: classification.reason,
            confidence_score: confidence.score,
            confidence_source: confidence.source,
            estimated_credit,
        };

        Ok(Assessment {
            ticker: series.symbol().to_string(),
            metrics,
            decision,
            rule: classification.rule,
            commentary: confidence.commentary,
            model: confidence.model,
            fingerprint: series.fingerprint(),
        })
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        let config = EvaluatorConfig::default();
        let scorer = Box::new(AlgorithmicScorer::new(config.scoring.clone()));
        Self { config, scorer }
    }
}

/// Evaluate `series` with the default configuration and algorithmic confidence.
pub fn evaluate(series: &PriceSeries) -> Result<Decision, EvaluationError> {
    Evaluator::default().evaluate(series)
}
