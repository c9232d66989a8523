//! Algorithmic confidence score.
//!
//! score = rsi_weight · rsi_strength
//!       + drop_weight · drop_strength
//!       + oversold bonus (cap · (1 − 0.5^days), diminishing)
//!       then a tier adjustment (bonus for plays, factor for no-play)
//!       clamped to [0, 1].
//!
//! rsi_strength = (rsi_ceiling − RSI) / rsi_ceiling, clamped to [0, 1]
//! drop_strength = −percent_drop / drop_saturation_pct, clamped to [0, 1]
//!
//! Each component is non-increasing in RSI and non-increasing in
//! percent_drop, so the whole score is monotonic in both.

use super::{unit, Confidence, ConfidenceScorer};
use crate::components::classifier::Classification;
use crate::config::ScoringConfig;
use crate::domain::{ConfidenceSource, MetricSet, Tier};

/// Confidence in [0, 1] for `metrics` classified as `tier`.
pub fn score(metrics: &MetricSet, tier: Tier, config: &ScoringConfig) -> f64 {
    let rsi_strength = unit((config.rsi_ceiling - metrics.rsi) / config.rsi_ceiling);
    let drop_strength = unit(-metrics.percent_drop / config.drop_saturation_pct);
    let oversold = oversold_bonus(metrics.days_oversold, config.oversold_bonus_cap);

    let base = config.rsi_weight * rsi_strength + config.drop_weight * drop_strength + oversold;

    let adjusted = match tier {
        Tier::Tier1 => base + config.tier1_bonus,
        Tier::Tier2 => base + config.tier2_bonus,
        Tier::Tier3 => base + config.tier3_bonus,
        Tier::NoPlay => base * config.no_play_factor,
    };

    unit(adjusted)
}

fn oversold_bonus(days: u32, cap: f64) -> f64 {
    // 0.5^64 is already below f64 resolution next to 1.0
    let days = days.min(64) as i32;
    cap * (1.0 - 0.5_f64.powi(days))
}

/// Scores from the metrics alone; never fails.
#[derive(Debug, Clone, Default)]
pub struct AlgorithmicScorer {
    config: ScoringConfig,
}

impl AlgorithmicScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }
}

impl ConfidenceScorer for AlgorithmicScorer {
    fn assess(&self, metrics: &MetricSet, classification: &Classification) -> Confidence {
        Confidence {
            score: score(metrics, classification.tier, &self.config),
            source: ConfidenceSource::Algorithmic,
            commentary: None,
            model: None,
        }
    }
}
