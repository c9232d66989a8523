//! Tier classifier: ordered rule evaluation over a `MetricSet`.
//!
//! Rules are tried in the fixed order of `PRIORITY`; the first one that
//! applies wins. The overbought veto comes first so that no drop, however
//! large, can promote an overbought ticker. Tiers follow from tightest to
//! loosest RSI band. When nothing applies, `explain_no_play` names the
//! condition that failed.

use serde::{Deserialize, Serialize};

use crate::config::RuleConfig;
use crate::domain::{MetricSet, Tier};

/// Which rule produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// RSI above the overbought line.
    Overbought,
    /// Oversold RSI with a significant drop.
    OversoldSignificantDrop,
    /// Near-oversold RSI with a moderate drop.
    NearOversoldModerateDrop,
    /// Neutral-weak RSI with a minor drop.
    PullbackMinorDrop,
    /// Oversold RSI, but the drop is shallower than the significant threshold.
    OversoldShallowDrop,
    /// Near-oversold RSI, but the drop is shallower than the moderate threshold.
    NearOversoldShallowDrop,
    /// Neutral-weak RSI, but the drop is shallower than the minor threshold.
    PullbackShallowDrop,
    /// RSI at or above the highest tier band: no pullback to trade.
    NoPullback,
}

/// Output of `classify`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub play: bool,
    pub tier: Tier,
    pub reason: String,
    pub rule: Rule,
}

struct TierRule {
    rule: Rule,
    tier: Tier,
    applies: fn(&MetricSet, &RuleConfig) -> bool,
    reason: fn(&MetricSet, &RuleConfig) -> String,
    condition: fn(&RuleConfig) -> String,
}

/// Rule order is part of the contract: first match wins.
const PRIORITY: [TierRule; 4] = [
    TierRule {
        rule: Rule::Overbought,
        tier: Tier::NoPlay,
        applies: |m, c| m.rsi > c.overbought_rsi,
        reason: |m, c| {
            format!(
                "RSI above {:.0} (overbought territory): RSI {:.1}",
                c.overbought_rsi, m.rsi
            )
        },
        condition: |c| format!("RSI > {:.0}", c.overbought_rsi),
    },
    TierRule {
        rule: Rule::OversoldSignificantDrop,
        tier: Tier::Tier1,
        applies: |m, c| m.rsi < c.oversold_rsi && m.percent_drop <= c.significant_drop_pct,
        reason: |m, c| {
            format!(
                "RSI {:.1} below {:.0} (oversold) with significant drop {:.1}% from recent high",
                m.rsi, c.oversold_rsi, m.percent_drop
            )
        },
        condition: |c| {
            format!(
                "RSI < {:.0} and percent_drop <= {:.1}%",
                c.oversold_rsi, c.significant_drop_pct
            )
        },
    },
    TierRule {
        rule: Rule::NearOversoldModerateDrop,
        tier: Tier::Tier2,
        applies: |m, c| {
            in_band(m.rsi, c.oversold_rsi, c.tier2_rsi_ceiling)
                && m.percent_drop <= c.moderate_drop_pct
        },
        reason: |m, c| {
            format!(
                "RSI {:.1} in {:.0}-{:.0} (near oversold) with moderate drop {:.1}% from recent high",
                m.rsi, c.oversold_rsi, c.tier2_rsi_ceiling, m.percent_drop
            )
        },
        condition: |c| {
            format!(
                "{:.0} <= RSI < {:.0} and percent_drop <= {:.1}%",
                c.oversold_rsi, c.tier2_rsi_ceiling, c.moderate_drop_pct
            )
        },
    },
    TierRule {
        rule: Rule::PullbackMinorDrop,
        tier: Tier::Tier3,
        applies: |m, c| {
            in_band(m.rsi, c.tier2_rsi_ceiling, c.tier3_rsi_ceiling)
                && m.percent_drop <= c.minor_drop_pct
        },
        reason: |m, c| {
            format!(
                "RSI {:.1} in {:.0}-{:.0} (pullback) with minor drop {:.1}% from recent high",
                m.rsi, c.tier2_rsi_ceiling, c.tier3_rsi_ceiling, m.percent_drop
            )
        },
        condition: |c| {
            format!(
                "{:.0} <= RSI < {:.0} and percent_drop <= {:.1}%",
                c.tier2_rsi_ceiling, c.tier3_rsi_ceiling, c.minor_drop_pct
            )
        },
    },
];

/// Classify `metrics` into exactly one tier.
pub fn classify(metrics: &MetricSet, config: &RuleConfig) -> Classification {
    for entry in &PRIORITY {
        if (entry.applies)(metrics, config) {
            return Classification {
                play: entry.tier.is_play(),
                tier: entry.tier,
                reason: (entry.reason)(metrics, config),
                rule: entry.rule,
            };
        }
    }

    let (rule, reason) = explain_no_play(metrics, config);
    Classification {
        play: false,
        tier: Tier::NoPlay,
        reason,
        rule,
    }
}

/// Rules in priority order, for display, closed by the no-play fallback.
pub fn rule_table(config: &RuleConfig) -> Vec<(Rule, Tier, String)> {
    PRIORITY
        .iter()
        .map(|entry| (entry.rule, entry.tier, (entry.condition)(config)))
        .chain(std::iter::once((
            Rule::NoPullback,
            Tier::NoPlay,
            "otherwise".to_string(),
        )))
        .collect()
}

fn in_band(rsi: f64, low: f64, high: f64) -> bool {
    rsi >= low && rsi < high
}

fn explain_no_play(m: &MetricSet, c: &RuleConfig) -> (Rule, String) {
    let shallow = |band: &str, label: &str, threshold: f64| {
        format!(
            "RSI {:.1} {band} but drop {:.1}% is shallower than the {label} threshold {:.1}%",
            m.rsi, m.percent_drop, threshold
        )
    };

    if m.rsi < c.oversold_rsi {
        (
            Rule::OversoldShallowDrop,
            shallow("oversold", "significant-drop", c.significant_drop_pct),
        )
    } else if in_band(m.rsi, c.oversold_rsi, c.tier2_rsi_ceiling) {
        (
            Rule::NearOversoldShallowDrop,
            shallow("near oversold", "moderate-drop", c.moderate_drop_pct),
        )
    } else if in_band(m.rsi, c.tier2_rsi_ceiling, c.tier3_rsi_ceiling) {
        (
            Rule::PullbackShallowDrop,
            shallow("in pullback band", "minor-drop", c.minor_drop_pct),
        )
    } else {
        (
            Rule::NoPullback,
            format!(
                "RSI above {:.0} or uptrend: RSI {:.1}, drop {:.1}% from recent high",
                c.tier3_rsi_ceiling, m.rsi, m.percent_drop
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(rsi: f64, percent_drop: f64) -> MetricSet {
        MetricSet {
            current_price: 100.0,
            rsi,
            percent_drop,
            distance_from_low: 1.0,
            ma200: 100.0,
            max_recent_drop: percent_drop,
            rolling_5d_drop: percent_drop,
            rolling_10d_drop: percent_drop,
            days_oversold: 0,
            price_vs_200ma: 0.0,
        }
    }

    fn run(rsi: f64, drop: f64) -> Classification {
        classify(&metrics(rsi, drop), &RuleConfig::default())
    }

    #[test]
    fn overbought_vetoes_any_drop() {
        let c = run(75.0, -40.0);
        assert_eq!(c.rule, Rule::Overbought);
        assert_eq!(c.tier, Tier::NoPlay);
        assert!(!c.play);
        assert!(c.reason.starts_with("RSI above 70 (overbought territory)"));
    }

    #[test]
    fn tier1_needs_oversold_and_significant_drop() {
        let c = run(22.0, -8.0);
        assert_eq!(c.tier, Tier::Tier1);
        assert_eq!(c.rule, Rule::OversoldSignificantDrop);
        assert!(c.play);
        assert!(c.reason.contains("oversold"));
        assert!(c.reason.contains("significant drop"));
    }

    #[test]
    fn tier1_boundary_is_inclusive_on_drop() {
        assert_eq!(run(29.9, -5.0).tier, Tier::Tier1);
        assert_eq!(run(30.0, -5.0).tier, Tier::Tier2);
    }

    #[test]
    fn tier2_band() {
        let c = run(35.0, -3.5);
        assert_eq!(c.tier, Tier::Tier2);
        assert_eq!(c.rule, Rule::NearOversoldModerateDrop);
        assert!(c.reason.contains("near oversold"));
    }

    #[test]
    fn tier3_band() {
        let c = run(45.0, -2.0);
        assert_eq!(c.tier, Tier::Tier3);
        assert_eq!(c.rule, Rule::PullbackMinorDrop);
        assert!(c.reason.contains("pullback"));
    }

    #[test]
    fn oversold_with_shallow_drop_names_drop_condition() {
        let c = run(25.0, -1.0);
        assert_eq!(c.tier, Tier::NoPlay);
        assert_eq!(c.rule, Rule::OversoldShallowDrop);
        assert!(c.reason.contains("significant-drop threshold"));
    }

    #[test]
    fn near_oversold_with_shallow_drop() {
        let c = run(38.0, -2.9);
        assert_eq!(c.rule, Rule::NearOversoldShallowDrop);
        assert!(c.reason.contains("moderate-drop threshold"));
    }

    #[test]
    fn pullback_with_shallow_drop() {
        let c = run(48.0, -0.5);
        assert_eq!(c.rule, Rule::PullbackShallowDrop);
        assert!(c.reason.contains("minor-drop threshold"));
    }

    #[test]
    fn neutral_rsi_is_no_pullback() {
        let c = run(60.0, -12.0);
        assert_eq!(c.rule, Rule::NoPullback);
        assert!(c.reason.contains("RSI above 50 or uptrend"));
    }

    #[test]
    fn exactly_70_is_not_overbought() {
        assert_eq!(run(70.0, 0.0).rule, Rule::NoPullback);
    }

    #[test]
    fn nan_rsi_still_classifies() {
        let c = run(f64::NAN, -20.0);
        assert_eq!(c.tier, Tier::NoPlay);
        assert_eq!(c.rule, Rule::NoPullback);
    }

    #[test]
    fn rule_table_lists_priority_order() {
        let table = rule_table(&RuleConfig::default());
        assert_eq!(table.len(), 5);
        assert_eq!(table[0].0, Rule::Overbought);
        assert_eq!(table[1].1, Tier::Tier1);
        assert_eq!(table[4].0, Rule::NoPullback);
    }

    #[test]
    fn rule_table_follows_configured_thresholds() {
        let config = RuleConfig {
            overbought_rsi: 75.0,
            significant_drop_pct: -6.5,
            ..RuleConfig::default()
        };
        let table = rule_table(&config);
        assert_eq!(table[0].2, "RSI > 75");
        assert!(table[1].2.contains("-6.5%"), "{}", table[1].2);
        for (entry, row) in PRIORITY.iter().zip(&table) {
            assert_eq!(entry.rule, row.0);
            assert_eq!(entry.tier, row.1);
        }
    }
}
