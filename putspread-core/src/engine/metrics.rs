//! Indicator engine: price series in, `MetricSet` out.

use tracing::debug;

use crate::config::{IndicatorConfig, LONG_ROLLING_DAYS, SHORT_ROLLING_DAYS};
use crate::domain::{MetricSet, PriceSeries};
use crate::error::{EvaluationError, InputError};
use crate::indicators::{
    distance_from_low, drop_from_high, max_drawdown_pct, oversold_streak, pct_change, Indicator,
    Roc, Rsi, Sma,
};

/// Compute the full metric set for `series`.
///
/// Fails with `InputError::TooShort` if the series is shorter than
/// `config.min_series_len()` (200 points with defaults), and with
/// `InvalidConfig` if a lookback window is unusable. Any metric that still
/// ends up non-finite is reported as `ComputationDegenerate` rather than
/// returned.
pub fn compute_metrics(
    series: &PriceSeries,
    config: &IndicatorConfig,
) -> Result<MetricSet, EvaluationError> {
    config
        .validate()
        .map_err(|e| EvaluationError::InvalidConfig(e.to_string()))?;

    let required = config.min_series_len();
    if series.len() < required {
        return Err(InputError::TooShort {
            required,
            actual: series.len(),
        }
        .into());
    }

    let points = series.points();
    let closes = series.closes();
    let current_price = series.last().close;

    let rsi_series = Rsi::new(config.rsi_period).compute(points);
    let rsi = rsi_series
        .last()
        .copied()
        .ok_or(EvaluationError::ComputationDegenerate { metric: "rsi" })?;
    let days_oversold = oversold_streak(&rsi_series, config.oversold_threshold);

    let ma200 = Sma::new(config.ma_window)
        .latest(points)
        .ok_or(EvaluationError::ComputationDegenerate { metric: "ma200" })?;

    let rolling_5d_drop = Roc::new(SHORT_ROLLING_DAYS).latest(points).ok_or(
        EvaluationError::ComputationDegenerate {
            metric: "rolling_5d_drop",
        },
    )?;
    let rolling_10d_drop = Roc::new(LONG_ROLLING_DAYS).latest(points).ok_or(
        EvaluationError::ComputationDegenerate {
            metric: "rolling_10d_drop",
        },
    )?;

    let metrics = MetricSet {
        current_price,
        rsi,
        percent_drop: drop_from_high(&closes, config.drop_window),
        distance_from_low: distance_from_low(&closes, config.drop_window),
        ma200,
        max_recent_drop: max_drawdown_pct(&closes, config.drawdown_window),
        rolling_5d_drop,
        rolling_10d_drop,
        days_oversold,
        price_vs_200ma: pct_change(current_price, ma200),
    };

    if let Some(metric) = metrics.first_non_finite() {
        return Err(EvaluationError::ComputationDegenerate { metric });
    }

    debug!(
        symbol = series.symbol(),
        points = series.len(),
        rsi = metrics.rsi,
        percent_drop = metrics.percent_drop,
        days_oversold = metrics.days_oversold,
        "computed metrics"
    );

    Ok(metrics)
}
