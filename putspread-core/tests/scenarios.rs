//! End-to-end scenarios through the public API.

use chrono::NaiveDate;
use putspread_core::components::Rule;
use putspread_core::{
    evaluate, ConfidenceSource, EvaluationError, Evaluator, EvaluatorConfig, InputError,
    PricePoint, PriceSeries, Tier,
};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
}

fn series(closes: &[f64]) -> PriceSeries {
    PriceSeries::from_closes("TEST", start(), closes).unwrap()
}

fn flat_then(last: &[f64]) -> PriceSeries {
    let mut closes = vec![100.0; 200];
    closes.extend_from_slice(last);
    series(&closes)
}

#[test]
fn sharp_drop_after_flat_history_is_tier1() {
    let s = flat_then(&[85.0]);
    let a = Evaluator::default().assess(&s).unwrap();

    assert!(a.metrics.rsi < 30.0);
    assert!((a.metrics.percent_drop + 15.0).abs() < 1e-9);
    assert_eq!(a.decision.tier, Tier::Tier1);
    assert!(a.decision.play);
    assert_eq!(a.decision.confidence_source, ConfidenceSource::Algorithmic);
    assert!(a.decision.estimated_credit > 0.0);
}

#[test]
fn rising_closes_are_overbought() {
    let closes: Vec<f64> = (0..260).map(|i| 50.0 * 1.002_f64.powi(i)).collect();
    let d = evaluate(&series(&closes)).unwrap();
    assert!(!d.play);
    assert_eq!(d.tier, Tier::NoPlay);
    assert!(d.reason.contains("overbought"));
    assert_eq!(d.estimated_credit, 0.0);
}

#[test]
fn pullback_in_strong_uptrend_stays_overbought() {
    // Steady climb, then a one-day dip that leaves RSI above the overbought line.
    let mut closes: Vec<f64> = (0..240).map(|i| 100.0 + i as f64 * 2.0).collect();
    closes.push(closes[closes.len() - 1] * 0.99);
    let a = Evaluator::default().assess(&series(&closes)).unwrap();
    assert!(a.metrics.rsi > 70.0, "rsi = {}", a.metrics.rsi);
    assert_eq!(a.rule, Rule::Overbought);
    assert!(!a.decision.play);
}

#[test]
fn short_history_is_input_error() {
    let err = evaluate(&series(&vec![100.0; 150])).unwrap_err();
    assert!(err.is_input_error());
    assert_eq!(
        err,
        EvaluationError::Input(InputError::TooShort {
            required: 200,
            actual: 150
        })
    );
}

#[test]
fn exactly_minimum_length_is_accepted() {
    assert!(evaluate(&series(&vec![100.0; 200])).is_ok());
}

#[test]
fn flat_history_is_neutral_no_play() {
    let d = evaluate(&series(&vec![42.0; 220])).unwrap();
    // No losses at all: RSI 100, which is overbought by the rules.
    assert_eq!(d.tier, Tier::NoPlay);
    assert_eq!(d.estimated_credit, 0.0);
}

#[test]
fn non_finite_price_never_reaches_the_engine() {
    let mut points: Vec<PricePoint> = series(&vec![100.0; 210]).points().to_vec();
    points[205].close = f64::NAN;
    let err = PriceSeries::new("TEST", points).unwrap_err();
    assert!(matches!(err, InputError::MalformedPoint { index: 205, .. }));
}

#[test]
fn same_series_gives_bit_identical_decisions() {
    let s = flat_then(&[97.0, 93.0, 90.0, 91.0]);
    let a = evaluate(&s).unwrap();
    let b = evaluate(&s).unwrap();
    assert_eq!(a.confidence_score.to_bits(), b.confidence_score.to_bits());
    assert_eq!(a.estimated_credit.to_bits(), b.estimated_credit.to_bits());
    assert_eq!(a.reason, b.reason);
    assert_eq!(a, b);
}

#[test]
fn stricter_threshold_from_toml_changes_outcome() {
    let config = EvaluatorConfig::from_toml("[rules]\nsignificant_drop_pct = -20.0\n").unwrap();
    let a = Evaluator::new(config)
        .unwrap()
        .assess(&flat_then(&[85.0]))
        .unwrap();
    assert_eq!(a.decision.tier, Tier::NoPlay);
    assert_eq!(a.rule, Rule::OversoldShallowDrop);
    assert!(a.decision.reason.contains("significant-drop threshold"));
}

#[test]
fn custom_credit_floor_is_applied() {
    let config = EvaluatorConfig::from_toml("[credit]\nmin_credit = 125.0\n").unwrap();
    let d = Evaluator::new(config)
        .unwrap()
        .evaluate(&flat_then(&[85.0]))
        .unwrap();
    assert!(d.estimated_credit >= 125.0);
}

#[test]
fn decision_serializes_in_report_shape() {
    let d = evaluate(&flat_then(&[85.0])).unwrap();
    let v = serde_json::to_value(&d).unwrap();
    for key in [
        "play",
        "tier",
        "reason",
        "confidence_score",
        "confidence_source",
        "estimated_credit",
    ] {
        assert!(v.get(key).is_some(), "missing {key}");
    }
    assert_eq!(v["tier"], "tier_1");
    assert_eq!(v["confidence_source"], "algorithmic");
}

#[test]
fn assessment_metrics_use_report_names() {
    let a = Evaluator::default().assess(&flat_then(&[85.0])).unwrap();
    let v = serde_json::to_value(&a).unwrap();
    assert!(v["metrics"].get("RSI").is_some());
    assert!(v["metrics"].get("days_oversold").is_some());
    assert_eq!(v["ticker"], "TEST");
    assert_eq!(v["rule"], "oversold_significant_drop");
}
