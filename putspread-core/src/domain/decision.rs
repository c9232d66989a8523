//! Decision: tiered play/no-play outcome of one evaluation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete confidence bucket. `Tier1` is the strongest signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "tier_1")]
    Tier1,
    #[serde(rename = "tier_2")]
    Tier2,
    #[serde(rename = "tier_3")]
    Tier3,
    #[serde(rename = "no_play")]
    NoPlay,
}

impl Tier {
    pub fn is_play(self) -> bool {
        !matches!(self, Tier::NoPlay)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Tier1 => "tier_1",
            Tier::Tier2 => "tier_2",
            Tier::Tier3 => "tier_3",
            Tier::NoPlay => "no_play",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which path produced `confidence_score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceSource {
    Algorithmic,
    Ai,
}

/// Final evaluation outcome. Produced once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub play: bool,
    pub tier: Tier,
    pub reason: String,
    pub confidence_score: f64,
    pub confidence_source: ConfidenceSource,
    pub estimated_credit: f64,
}
