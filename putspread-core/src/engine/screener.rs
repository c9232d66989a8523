//! Screener: RSI and period-drop filters over many tickers.
//!
//! A ticker passes when its latest RSI is at or below `max_rsi` and its
//! period drop is at least `min_drop_pct` deep. The period drop is the most
//! negative of three readings over the last `lookback + 1` points:
//!
//! 1. latest close vs the highest high in the window
//! 2. the worst close-to-close return in the window
//! 3. latest close vs the first close in the window
//!
//! Screening needs only two points. Hits are handed to the `Evaluator` by
//! the caller, which enforces its own minimum length.

use std::fmt;
use std::str::FromStr;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::ConfigError;
use crate::domain::{PricePoint, PriceSeries, Symbol};
use crate::indicators::{pct_change, Indicator, Rsi};

/// RSI assumed when the series is too short to define one.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Trailing period scanned for a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScreenPeriod {
    #[serde(rename = "1d", alias = "today")]
    OneDay,
    #[serde(rename = "3d")]
    ThreeDays,
    #[default]
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "2w")]
    TwoWeeks,
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "ytd")]
    YearToDate,
}

impl ScreenPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::ThreeDays => "3d",
            Self::OneWeek => "1w",
            Self::TwoWeeks => "2w",
            Self::OneMonth => "1m",
            Self::ThreeMonths => "3m",
            Self::YearToDate => "ytd",
        }
    }

    /// Number of trailing daily changes the period covers in `points`.
    ///
    /// Fixed periods count rows, not calendar days. `YearToDate` counts the
    /// points dated in the year of the latest point, so the window starts at
    /// the last close of the previous year when the series has one.
    pub fn lookback(self, points: &[PricePoint]) -> usize {
        match self {
            Self::OneDay => 1,
            Self::ThreeDays => 3,
            Self::OneWeek => 7,
            Self::TwoWeeks => 14,
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::YearToDate => match points.last() {
                Some(last) => points
                    .iter()
                    .rev()
                    .take_while(|p| p.date.year() == last.date.year())
                    .count(),
                None => 0,
            },
        }
    }
}

impl fmt::Display for ScreenPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown screen period '{0}' (expected today, 1d, 3d, 1w, 2w, 1m, 3m or ytd)")]
pub struct UnknownPeriod(pub String);

impl FromStr for ScreenPeriod {
    type Err = UnknownPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" | "1d" => Ok(Self::OneDay),
            "3d" => Ok(Self::ThreeDays),
            "1w" => Ok(Self::OneWeek),
            "2w" => Ok(Self::TwoWeeks),
            "1m" => Ok(Self::OneMonth),
            "3m" => Ok(Self::ThreeMonths),
            "ytd" => Ok(Self::YearToDate),
            _ => Err(UnknownPeriod(s.to_string())),
        }
    }
}

/// Most negative of drop-from-high, worst daily return and drop-from-start
/// over the last `lookback + 1` points, in signed percent.
///
/// Fewer than two points give 0.0. A lookback of zero still compares the
/// last two closes.
pub fn period_drop(points: &[PricePoint], lookback: usize) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    let window = &points[n - lookback.saturating_add(1).clamp(2, n)..];
    let current = window[window.len() - 1].close;

    let high = window
        .iter()
        .map(|p| p.high)
        .fold(f64::NEG_INFINITY, f64::max);
    let worst_day = window
        .windows(2)
        .map(|w| pct_change(w[1].close, w[0].close))
        .fold(f64::INFINITY, f64::min);

    pct_change(current, high)
        .min(worst_day)
        .min(pct_change(current, window[0].close))
}

/// Screening thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenFilter {
    /// Tickers whose RSI is above this are skipped.
    pub max_rsi: f64,
    /// Required depth of the period drop, as a positive percent.
    pub min_drop_pct: f64,
    pub period: ScreenPeriod,
    /// Skip tickers that traded less than this on the latest day. Points
    /// without volume are never skipped.
    pub min_volume: Option<u64>,
    pub max_results: usize,
}

impl Default for ScreenFilter {
    fn default() -> Self {
        Self {
            max_rsi: 40.0,
            min_drop_pct: 5.0,
            period: ScreenPeriod::OneWeek,
            min_volume: None,
            max_results: 50,
        }
    }
}

impl ScreenFilter {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.max_rsi) {
            return Err(ConfigError::Invalid(
                "max_rsi must be within [0, 100]".to_string(),
            ));
        }
        if !self.min_drop_pct.is_finite() || self.min_drop_pct < 0.0 {
            return Err(ConfigError::Invalid(
                "min_drop_pct must be a finite percent >= 0".to_string(),
            ));
        }
        if self.max_results == 0 {
            return Err(ConfigError::Invalid("max_results must be >= 1".to_string()));
        }
        Ok(())
    }
}

/// A ticker that passed every filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenHit {
    pub ticker: Symbol,
    pub current_price: f64,
    pub previous_price: f64,
    /// Period drop in signed percent.
    #[serde(rename = "daily_change_pct")]
    pub period_drop_pct: f64,
    pub rsi: f64,
    pub volume: u64,
    #[serde(rename = "period_analyzed")]
    pub period: ScreenPeriod,
}

#[derive(Debug, Clone)]
pub struct Screener {
    filter: ScreenFilter,
    rsi: Rsi,
}

impl Screener {
    pub fn new(filter: ScreenFilter, rsi_period: usize) -> Result<Self, ConfigError> {
        filter.validate()?;
        if rsi_period == 0 {
            return Err(ConfigError::Invalid("rsi_period must be >= 1".to_string()));
        }
        Ok(Self {
            filter,
            rsi: Rsi::new(rsi_period),
        })
    }

    pub fn filter(&self) -> &ScreenFilter {
        &self.filter
    }

    /// `Some` when `series` passes every filter.
    pub fn screen(&self, series: &PriceSeries) -> Option<ScreenHit> {
        let points = series.points();
        if points.len() < 2 {
            debug!(symbol = series.symbol(), "too few points to screen");
            return None;
        }

        let rsi = self.rsi.latest(points).unwrap_or(NEUTRAL_RSI);
        if rsi > self.filter.max_rsi {
            debug!(symbol = series.symbol(), rsi, "screened out: RSI");
            return None;
        }

        let drop = period_drop(points, self.filter.period.lookback(points));
        if drop > -self.filter.min_drop_pct {
            debug!(symbol = series.symbol(), drop, "screened out: drop");
            return None;
        }

        let last = series.last();
        if let Some(min) = self.filter.min_volume {
            if last.volume > 0 && last.volume < min {
                debug!(symbol = series.symbol(), volume = last.volume, "screened out: volume");
                return None;
            }
        }

        Some(ScreenHit {
            ticker: series.symbol().to_string(),
            current_price: last.close,
            previous_price: points[points.len() - 2].close,
            period_drop_pct: drop,
            rsi,
            volume: last.volume,
            period: self.filter.period,
        })
    }

    /// Deepest drops first, capped at `max_results`.
    pub fn rank(&self, mut hits: Vec<ScreenHit>) -> Vec<ScreenHit> {
        hits.sort_by(|a, b| a.period_drop_pct.total_cmp(&b.period_drop_pct));
        hits.truncate(self.filter.max_results);
        hits
    }
}
