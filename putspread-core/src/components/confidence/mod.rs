//! Confidence scoring.
//!
//! `ConfidenceScorer` is the seam: the caller picks `AlgorithmicScorer` or a
//! `NarrativeScorer` wrapping some `NarrativeSource`. The scorer records
//! which path produced the value in `Confidence::source`.

pub mod algorithmic;
pub mod narrative;
pub mod openai;

pub use algorithmic::{score, AlgorithmicScorer};
pub use narrative::{
    Narrative, NarrativeError, NarrativeMode, NarrativeRequest, NarrativeScorer, NarrativeSource,
};
pub use openai::OpenAiNarrative;

use serde::{Deserialize, Serialize};

use crate::components::classifier::Classification;
use crate::domain::{ConfidenceSource, MetricSet};

/// A confidence value in [0, 1] plus its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    pub score: f64,
    pub source: ConfidenceSource,
    /// Free-text commentary from a narrative source, when one answered.
    pub commentary: Option<String>,
    /// Model that wrote the commentary.
    pub model: Option<String>,
}

/// Produces a confidence value for a classified metric set.
pub trait ConfidenceScorer: Send + Sync {
    fn assess(&self, metrics: &MetricSet, classification: &Classification) -> Confidence;
}

impl<T: ConfidenceScorer + ?Sized> ConfidenceScorer for Box<T> {
    fn assess(&self, metrics: &MetricSet, classification: &Classification) -> Confidence {
        (**self).assess(metrics, classification)
    }
}

/// Clamp into [0, 1]; NaN maps to 0.
pub(crate) fn unit(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_clamps_and_zeroes_nan() {
        assert_eq!(unit(-0.5), 0.0);
        assert_eq!(unit(1.5), 1.0);
        assert_eq!(unit(0.25), 0.25);
        assert_eq!(unit(f64::NAN), 0.0);
        assert_eq!(unit(f64::INFINITY), 1.0);
    }
}
