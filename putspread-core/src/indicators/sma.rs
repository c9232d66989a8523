//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a lookback window.
//! Lookback: period - 1 (first valid value at index period-1).

use super::Indicator;
use crate::domain::PricePoint;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, points: &[PricePoint]) -> Vec<f64> {
        let n = points.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        // Summed fresh per window; no rolling-sum drift
        for i in (self.period - 1)..n {
            let start = i + 1 - self.period;
            let sum: f64 = points[start..=i].iter().map(|p| p.close).sum();
            result[i] = sum / self.period as f64;
        }

        result
    }
}
