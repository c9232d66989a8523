//! PricePoint: one trading day of OHLCV data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV point for a single ticker.
///
/// Immutable once produced by a loader. Prices are strictly positive and
/// open/close sit inside [low, high]; `defect()` reports the first violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: u64,
}

impl PricePoint {
    /// Returns true if any OHLC field is NaN or infinite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite())
    }

    /// First sanity violation, if any.
    pub fn defect(&self) -> Option<&'static str> {
        if self.is_void() {
            return Some("non-finite price");
        }
        if self.close <= 0.0 {
            return Some("close must be positive");
        }
        if self.open <= 0.0 || self.high <= 0.0 || self.low <= 0.0 {
            return Some("open/high/low must be positive");
        }
        if self.high < self.low {
            return Some("high below low");
        }
        if self.close > self.high || self.close < self.low {
            return Some("close outside high/low");
        }
        if self.open > self.high || self.open < self.low {
            return Some("open outside high/low");
        }
        None
    }

    pub fn is_sane(&self) -> bool {
        self.defect().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_point() -> PricePoint {
        PricePoint {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            volume: 50_000,
        }
    }

    #[test]
    fn point_is_sane() {
        assert!(sample_point().is_sane());
    }

    #[test]
    fn point_detects_void() {
        let mut point = sample_point();
        point.open = f64::NAN;
        assert!(point.is_void());
        assert_eq!(point.defect(), Some("non-finite price"));
    }

    #[test]
    fn point_detects_inverted_range() {
        let mut point = sample_point();
        point.high = 97.0;
        assert_eq!(point.defect(), Some("high below low"));
    }

    #[test]
    fn point_rejects_close_above_high() {
        let mut point = sample_point();
        point.close = 150.0;
        assert_eq!(point.defect(), Some("close outside high/low"));
        point.close = 90.0;
        assert_eq!(point.defect(), Some("close outside high/low"));
    }

    #[test]
    fn point_rejects_open_outside_range() {
        let mut point = sample_point();
        point.open = 106.0;
        assert_eq!(point.defect(), Some("open outside high/low"));
        point.open = 97.5;
        assert_eq!(point.defect(), Some("open outside high/low"));
    }

    #[test]
    fn point_accepts_prices_on_the_bounds() {
        let mut point = sample_point();
        point.open = point.low;
        point.close = point.high;
        assert!(point.is_sane());
    }

    #[test]
    fn point_rejects_zero_close() {
        let mut point = sample_point();
        point.close = 0.0;
        assert_eq!(point.defect(), Some("close must be positive"));
    }

    #[test]
    fn volume_defaults_when_missing() {
        let json = r#"{"date":"2024-01-02","open":1.0,"high":2.0,"low":0.5,"close":1.5}"#;
        let point: PricePoint = serde_json::from_str(json).unwrap();
        assert_eq!(point.volume, 0);
    }
}
