//! Look-ahead contamination tests for the series indicators.
//!
//! No indicator value at point t may depend on price data from t+1 or later.
//! The oversold streak reads earlier RSI values straight from the full-series
//! output, so a leak here would silently change `days_oversold`.
//!
//! Method: compute on a truncated series (points 0..100) and the full series
//! (points 0..200). Points 0..100 must be identical in both runs.

use chrono::NaiveDate;
use putspread_core::domain::PricePoint;
use putspread_core::indicators::{oversold_streak, Indicator, Roc, Rsi, Sma};

/// N points of a deterministic pseudo-random walk.
fn make_test_points(n: usize) -> Vec<PricePoint> {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut points = Vec::with_capacity(n);
    let mut price: f64 = 100.0;

    for i in 0..n {
        // Simple LCG; any fixed sequence with both gains and losses will do
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.05;
        price = (price + change).max(10.0);

        let open = price - 0.5;
        let close = price + 0.3;
        points.push(PricePoint {
            date: base_date + chrono::Duration::days(i as i64),
            open,
            high: open.max(close) + 2.0,
            low: open.min(close) - 2.0,
            close,
            volume: 1000 + i as u64 * 100,
        });
    }

    points
}

fn assert_no_lookahead(indicator: &dyn Indicator, full: &[PricePoint], truncated_len: usize) {
    let truncated_result = indicator.compute(&full[..truncated_len]);
    let full_result = indicator.compute(full);

    assert_eq!(truncated_result.len(), truncated_len, "{}", indicator.name());
    assert_eq!(full_result.len(), full.len(), "{}", indicator.name());

    for i in 0..truncated_len {
        let t = truncated_result[i];
        let f = full_result[i];

        if t.is_nan() && f.is_nan() {
            continue;
        }

        assert!(
            !t.is_nan() && !f.is_nan(),
            "{}: NaN mismatch at point {i} (truncated={t}, full={f})",
            indicator.name()
        );
        assert!(
            (t - f).abs() < 1e-10,
            "{}: look-ahead contamination at point {i}: truncated={t}, full={f}",
            indicator.name()
        );
    }
}

#[test]
fn lookahead_rsi() {
    let points = make_test_points(200);
    assert_no_lookahead(&Rsi::new(14), &points, 100);
    assert_no_lookahead(&Rsi::new(7), &points, 100);
}

#[test]
fn lookahead_sma() {
    let points = make_test_points(200);
    assert_no_lookahead(&Sma::new(10), &points, 100);
    assert_no_lookahead(&Sma::new(50), &points, 100);
}

#[test]
fn lookahead_roc() {
    let points = make_test_points(200);
    assert_no_lookahead(&Roc::new(5), &points, 100);
    assert_no_lookahead(&Roc::new(10), &points, 100);
}

#[test]
fn oversold_streak_at_t_ignores_later_points() {
    let points = make_test_points(200);
    let rsi = Rsi::new(14);
    for cut in [60, 100, 150] {
        let truncated = rsi.compute(&points[..cut]);
        let full = rsi.compute(&points);
        assert_eq!(
            oversold_streak(&truncated, 30.0),
            oversold_streak(&full[..cut], 30.0),
            "streak differs at cut {cut}"
        );
    }
}
