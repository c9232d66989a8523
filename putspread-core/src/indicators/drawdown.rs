//! Window statistics measured from recent highs and lows.
//!
//! - `drop_from_high`: last close vs the highest close in the window (≤ 0).
//! - `distance_from_low`: last close vs the lowest close in the window (≥ 0).
//! - `max_drawdown_pct`: worst peak-to-trough decline inside the window (≤ 0).
//!
//! Windows include the latest close, so the two reference-based values are
//! bounded by construction.

use super::{pct_change, tail};

/// Percent change of the last close relative to the highest close among the
/// last `window` closes.
pub fn drop_from_high(closes: &[f64], window: usize) -> f64 {
    let recent = tail(closes, window);
    let Some(&current) = recent.last() else {
        return 0.0;
    };
    let high = recent.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    pct_change(current, high).min(0.0)
}

/// Percent the last close sits above the lowest close among the last
/// `window` closes.
pub fn distance_from_low(closes: &[f64], window: usize) -> f64 {
    let recent = tail(closes, window);
    let Some(&current) = recent.last() else {
        return 0.0;
    };
    let low = recent.iter().copied().fold(f64::INFINITY, f64::min);
    pct_change(current, low).max(0.0)
}

/// Worst peak-to-trough decline (percent) among the last `window` closes.
///
/// Scans forward keeping the running peak; every later close is measured
/// against the highest close seen before it.
pub fn max_drawdown_pct(closes: &[f64], window: usize) -> f64 {
    let recent = tail(closes, window);
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &close in recent {
        if close > peak {
            peak = close;
            continue;
        }
        worst = worst.min(pct_change(close, peak));
    }
    worst
}
