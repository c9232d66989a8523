//! Narrative-backed confidence.
//!
//! A `NarrativeSource` is anything that can read a classified metric set
//! and return commentary plus its own confidence figure. `NarrativeScorer`
//! combines that figure with the algorithmic score and fails open: when the
//! source errors or asserts a confidence outside [0, 1], the algorithmic
//! result is returned unchanged.

use thiserror::Error;
use tracing::{debug, warn};

use super::algorithmic::AlgorithmicScorer;
use super::{unit, Confidence, ConfidenceScorer};
use crate::components::classifier::Classification;
use crate::domain::{ConfidenceSource, MetricSet};

#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("narrative source requires an API key ({0} is not set)")]
    MissingApiKey(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("narrative service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unusable narrative response: {0}")]
    BadResponse(String),
}

/// Everything a narrative source gets to see.
#[derive(Debug, Clone, Copy)]
pub struct NarrativeRequest<'a> {
    pub metrics: &'a MetricSet,
    pub classification: &'a Classification,
    pub algorithmic_confidence: f64,
}

/// Commentary returned by a narrative source.
#[derive(Debug, Clone, PartialEq)]
pub struct Narrative {
    pub commentary: String,
    /// The source's own confidence; `None` if it declined to give one.
    pub confidence: Option<f64>,
    pub model: Option<String>,
}

pub trait NarrativeSource: Send + Sync {
    fn name(&self) -> &str;
    fn narrate(&self, request: &NarrativeRequest<'_>) -> Result<Narrative, NarrativeError>;
}

/// How the narrative confidence is combined with the algorithmic one.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum NarrativeMode {
    /// Use the narrative confidence as-is.
    #[default]
    Replace,
    /// `(1 - weight) * algorithmic + weight * narrative`.
    Blend { weight: f64 },
}

pub struct NarrativeScorer<N> {
    source: N,
    fallback: AlgorithmicScorer,
    mode: NarrativeMode,
}

impl<N: NarrativeSource> NarrativeScorer<N> {
    pub fn new(source: N, fallback: AlgorithmicScorer) -> Self {
        Self {
            source,
            fallback,
            mode: NarrativeMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: NarrativeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn source(&self) -> &N {
        &self.source
    }

    fn combine(&self, algorithmic: f64, narrative: f64) -> f64 {
        match self.mode {
            NarrativeMode::Replace => narrative,
            NarrativeMode::Blend { weight } => {
                let w = unit(weight);
                unit((1.0 - w) * algorithmic + w * narrative)
            }
        }
    }
}

impl<N: NarrativeSource> ConfidenceScorer for NarrativeScorer<N> {
    fn assess(&self, metrics: &MetricSet, classification: &Classification) -> Confidence {
        let algorithmic = self.fallback.assess(metrics, classification);
        let request = NarrativeRequest {
            metrics,
            classification,
            algorithmic_confidence: algorithmic.score,
        };

        let narrative = match self.source.narrate(&request) {
            Ok(narrative) => narrative,
            Err(err) => {
                warn!(
                    source = self.source.name(),
                    error = %err,
                    "narrative unavailable, using algorithmic confidence"
                );
                return algorithmic;
            }
        };

        match narrative.confidence {
            Some(c) if (0.0..=1.0).contains(&c) => {
                let score = self.combine(algorithmic.score, c);
                debug!(
                    source = self.source.name(),
                    algorithmic = algorithmic.score,
                    narrative = c,
                    score,
                    "narrative confidence applied"
                );
                Confidence {
                    score,
                    source: ConfidenceSource::Ai,
                    commentary: Some(narrative.commentary),
                    model: narrative.model,
                }
            }
            other => {
                warn!(
                    source = self.source.name(),
                    confidence = ?other,
                    "narrative confidence missing or out of range, using algorithmic confidence"
                );
                Confidence {
                    commentary: Some(narrative.commentary),
                    model: narrative.model,
                    ..algorithmic
                }
            }
        }
    }
}
