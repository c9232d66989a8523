//! Evaluator configuration.
//!
//! Every threshold the engine uses lives here with a documented default, so
//! a TOML file can override any subset:
//!
//! ```toml
//! [rules]
//! significant_drop_pct = -6.0
//!
//! [credit]
//! min_credit = 50.0
//! ```
//!
//! Missing sections and fields fall back to `Default`.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Rolling-change horizons reported as `rolling_5d_drop` / `rolling_10d_drop`.
pub const SHORT_ROLLING_DAYS: usize = 5;
pub const LONG_ROLLING_DAYS: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Lookback windows for the indicator engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// RSI period (Wilder smoothing).
    pub rsi_period: usize,
    /// Moving-average window reported as `ma200`.
    pub ma_window: usize,
    /// Window for the reference high (`percent_drop`) and low (`distance_from_low`).
    pub drop_window: usize,
    /// Window scanned for the worst peak-to-trough decline.
    pub drawdown_window: usize,
    /// RSI below this counts as an oversold day.
    pub oversold_threshold: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            ma_window: 200,
            drop_window: 20,
            drawdown_window: 30,
            oversold_threshold: 30.0,
        }
    }
}

impl IndicatorConfig {
    /// Minimum number of points a series needs for every metric to be defined.
    pub fn min_series_len(&self) -> usize {
        self.ma_window
            .max(self.rsi_period + 1)
            .max(self.drop_window)
            .max(self.drawdown_window)
            .max(LONG_ROLLING_DAYS + 1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rsi_period == 0 || self.ma_window == 0 || self.drop_window == 0 {
            return Err(invalid("indicator windows must be >= 1"));
        }
        if self.drawdown_window < 2 {
            return Err(invalid("drawdown_window must be >= 2"));
        }
        if !(0.0..=100.0).contains(&self.oversold_threshold) {
            return Err(invalid("oversold_threshold must be within [0, 100]"));
        }
        Ok(())
    }
}

/// RSI bands and percent-drop thresholds for the tier rules.
///
/// Drop thresholds are signed percents; a play requires
/// `percent_drop <= threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub overbought_rsi: f64,
    pub oversold_rsi: f64,
    pub tier2_rsi_ceiling: f64,
    pub tier3_rsi_ceiling: f64,
    pub significant_drop_pct: f64,
    pub moderate_drop_pct: f64,
    pub minor_drop_pct: f64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            overbought_rsi: 70.0,
            oversold_rsi: 30.0,
            tier2_rsi_ceiling: 40.0,
            tier3_rsi_ceiling: 50.0,
            significant_drop_pct: -5.0,
            moderate_drop_pct: -3.0,
            minor_drop_pct: -2.0,
        }
    }
}

/// Weights for the algorithmic confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// RSI at or above this contributes nothing.
    pub rsi_ceiling: f64,
    pub rsi_weight: f64,
    /// Drop magnitude (percent) at which the drop component saturates.
    pub drop_saturation_pct: f64,
    pub drop_weight: f64,
    /// Upper bound of the oversold-streak bonus.
    pub oversold_bonus_cap: f64,
    pub tier1_bonus: f64,
    pub tier2_bonus: f64,
    pub tier3_bonus: f64,
    /// Multiplier applied to the score of a no-play.
    pub no_play_factor: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rsi_ceiling: 70.0,
            rsi_weight: 0.45,
            drop_saturation_pct: 15.0,
            drop_weight: 0.35,
            oversold_bonus_cap: 0.10,
            tier1_bonus: 0.10,
            tier2_bonus: 0.05,
            tier3_bonus: 0.0,
            no_play_factor: 0.5,
        }
    }
}

/// Put-spread pricing parameters for the credit estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditConfig {
    /// Distance between short and long strikes, in dollars.
    pub spread_width: f64,
    /// Short strike distance below the current price, in percent.
    pub short_strike_otm_pct: f64,
    pub days_to_expiration: u32,
    pub risk_free_rate: f64,
    /// Annualised volatility floor.
    pub min_volatility: f64,
    pub max_volatility: f64,
    /// Volatility added per percent of average rolling-drop magnitude.
    pub volatility_per_drop_pct: f64,
    /// Per-contract credit floor for any play.
    pub min_credit: f64,
}

impl Default for CreditConfig {
    fn default() -> Self {
        Self {
            spread_width: 2.5,
            short_strike_otm_pct: 10.0,
            days_to_expiration: 30,
            risk_free_rate: 0.05,
            min_volatility: 0.30,
            max_volatility: 1.50,
            volatility_per_drop_pct: 0.02,
            min_credit: 80.0,
        }
    }
}

/// Top-level configuration for an `Evaluator`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub indicators: IndicatorConfig,
    pub rules: RuleConfig,
    pub scoring: ScoringConfig,
    pub credit: CreditConfig,
}

impl EvaluatorConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.indicators.validate()?;

        let r = &self.rules;
        if !(r.oversold_rsi <= r.tier2_rsi_ceiling
            && r.tier2_rsi_ceiling <= r.tier3_rsi_ceiling
            && r.tier3_rsi_ceiling <= r.overbought_rsi)
        {
            return Err(invalid(
                "RSI bands must satisfy oversold <= tier2 ceiling <= tier3 ceiling <= overbought",
            ));
        }
        if r.significant_drop_pct > 0.0 || r.moderate_drop_pct > 0.0 || r.minor_drop_pct > 0.0 {
            return Err(invalid("drop thresholds must be <= 0"));
        }

        let s = &self.scoring;
        let weights = [
            s.rsi_weight,
            s.drop_weight,
            s.oversold_bonus_cap,
            s.tier1_bonus,
            s.tier2_bonus,
            s.tier3_bonus,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(invalid("scoring weights must be finite and >= 0"));
        }
        if s.rsi_ceiling <= 0.0 || s.drop_saturation_pct <= 0.0 {
            return Err(invalid("rsi_ceiling and drop_saturation_pct must be > 0"));
        }
        if !(0.0..=1.0).contains(&s.no_play_factor) {
            return Err(invalid("no_play_factor must be within [0, 1]"));
        }

        let c = &self.credit;
        if c.spread_width <= 0.0 || c.days_to_expiration == 0 {
            return Err(invalid("spread_width and days_to_expiration must be > 0"));
        }
        if !(0.0..100.0).contains(&c.short_strike_otm_pct) {
            return Err(invalid("short_strike_otm_pct must be within [0, 100)"));
        }
        if c.min_volatility <= 0.0 || c.max_volatility < c.min_volatility {
            return Err(invalid("volatility bounds must satisfy 0 < min <= max"));
        }
        if c.volatility_per_drop_pct < 0.0 || c.min_credit < 0.0 {
            return Err(invalid("volatility_per_drop_pct and min_credit must be >= 0"));
        }

        Ok(())
    }
}

fn invalid(msg: &str) -> ConfigError {
    ConfigError::Invalid(msg.to_string())
}
