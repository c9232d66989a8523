//! MetricSet: fixed technical snapshot computed per evaluation.

use serde::{Deserialize, Serialize};

/// Technical metrics derived from one price series.
///
/// All percentage fields are signed percents: −2.3 means a 2.3 % decline.
/// Serialized field names match the JSON metrics block returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    pub current_price: f64,
    #[serde(rename = "RSI")]
    pub rsi: f64,
    pub percent_drop: f64,
    pub distance_from_low: f64,
    pub ma200: f64,
    pub max_recent_drop: f64,
    pub rolling_5d_drop: f64,
    pub rolling_10d_drop: f64,
    pub days_oversold: u32,
    pub price_vs_200ma: f64,
}

impl MetricSet {
    /// Name of the first non-finite field, if any.
    pub fn first_non_finite(&self) -> Option<&'static str> {
        [
            ("current_price", self.current_price),
            ("rsi", self.rsi),
            ("percent_drop", self.percent_drop),
            ("distance_from_low", self.distance_from_low),
            ("ma200", self.ma200),
            ("max_recent_drop", self.max_recent_drop),
            ("rolling_5d_drop", self.rolling_5d_drop),
            ("rolling_10d_drop", self.rolling_10d_drop),
            ("price_vs_200ma", self.price_vs_200ma),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MetricSet {
        MetricSet {
            current_price: 85.0,
            rsi: 12.0,
            percent_drop: -15.0,
            distance_from_low: 0.0,
            ma200: 99.925,
            max_recent_drop: -15.0,
            rolling_5d_drop: -15.0,
            rolling_10d_drop: -15.0,
            days_oversold: 1,
            price_vs_200ma: -14.9,
        }
    }

    #[test]
    fn finite_metrics_pass() {
        assert_eq!(sample().first_non_finite(), None);
    }

    #[test]
    fn reports_first_non_finite_field() {
        let mut m = sample();
        m.ma200 = f64::NAN;
        m.price_vs_200ma = f64::INFINITY;
        assert_eq!(m.first_non_finite(), Some("ma200"));
    }

    #[test]
    fn rsi_serializes_under_upper_case_key() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["RSI"], 12.0);
        assert!(json.get("rsi").is_none());
    }
}
