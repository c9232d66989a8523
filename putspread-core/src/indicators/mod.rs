//! Indicator implementations.
//!
//! Series indicators (RSI, SMA, ROC) implement the `Indicator` trait: full
//! price history in, one value per point out, warmup values `f64::NAN`.
//! Window statistics that only matter at the latest point (reference high,
//! reference low, peak-to-trough decline, oversold streak) are plain
//! functions over closing prices.
//!
//! # Look-ahead guard
//! No indicator value at point t may depend on data from t+1 or later. The
//! oversold streak relies on this: RSI at each earlier day is read straight
//! from the full-series output instead of being recomputed on a truncated
//! series.

pub mod drawdown;
pub mod oversold;
pub mod roc;
pub mod rsi;
pub mod sma;

pub use drawdown::{distance_from_low, drop_from_high, max_drawdown_pct};
pub use oversold::oversold_streak;
pub use roc::Roc;
pub use rsi::Rsi;
pub use sma::Sma;

use crate::domain::PricePoint;

/// Trait for series indicators.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "rsi_14", "sma_200").
    fn name(&self) -> &str;

    /// Number of points needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire series.
    ///
    /// Returns a `Vec<f64>` of the same length as `points`.
    /// The first `lookback()` values are `f64::NAN`.
    fn compute(&self, points: &[PricePoint]) -> Vec<f64>;

    /// Value at the most recent point, if defined.
    fn latest(&self, points: &[PricePoint]) -> Option<f64> {
        self.compute(points).last().copied().filter(|v| !v.is_nan())
    }
}

/// Signed percent change of `current` relative to `reference`.
///
/// A zero or non-finite reference yields 0.0 instead of ±∞/NaN.
pub fn pct_change(current: f64, reference: f64) -> f64 {
    if reference == 0.0 || !reference.is_finite() || !current.is_finite() {
        return 0.0;
    }
    (current - reference) / reference * 100.0
}

/// Last `window` elements of `values` (all of them if shorter).
pub(crate) fn tail(values: &[f64], window: usize) -> &[f64] {
    &values[values.len().saturating_sub(window)..]
}

/// Create synthetic points from close prices for testing.
///
/// open = prev_close (or close for the first point),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0 (floored at 0.01).
#[cfg(test)]
pub fn make_points(closes: &[f64]) -> Vec<PricePoint> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PricePoint {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: (open.min(close) - 1.0).max(0.01),
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pct_change_signed() {
        assert_approx(pct_change(85.0, 100.0), -15.0, DEFAULT_EPSILON);
        assert_approx(pct_change(110.0, 100.0), 10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn pct_change_zero_reference_falls_back_to_zero() {
        assert_eq!(pct_change(5.0, 0.0), 0.0);
        assert_eq!(pct_change(5.0, f64::NAN), 0.0);
    }

    #[test]
    fn tail_clamps_to_length() {
        let v = [1.0, 2.0, 3.0];
        assert_eq!(tail(&v, 2), &[2.0, 3.0]);
        assert_eq!(tail(&v, 10), &v);
    }

    #[test]
    fn latest_skips_warmup_only_series() {
        let points = make_points(&[10.0, 11.0]);
        assert_eq!(Sma::new(5).latest(&points), None);
        assert_eq!(Sma::new(2).latest(&points), Some(10.5));
    }
}
