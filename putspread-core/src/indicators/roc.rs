//! Rate of Change (ROC).
//!
//! Percentage price change over N points.
//! ROC[t] = (close[t] - close[t-period]) / close[t-period] * 100
//! Lookback: period.
//!
//! Feeds `rolling_5d_drop` and `rolling_10d_drop`.

use super::{pct_change, Indicator};
use crate::domain::PricePoint;

#[derive(Debug, Clone)]
pub struct Roc {
    period: usize,
    name: String,
}

impl Roc {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ROC period must be >= 1");
        Self {
            period,
            name: format!("roc_{period}"),
        }
    }
}

impl Indicator for Roc {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, points: &[PricePoint]) -> Vec<f64> {
        let n = points.len();
        let mut result = vec![f64::NAN; n];

        for i in self.period..n {
            let prev = points[i - self.period].close;
            let curr = points[i].close;
            if prev.is_nan() || curr.is_nan() {
                result[i] = f64::NAN;
            } else {
                result[i] = pct_change(curr, prev);
            }
        }

        result
    }
}
