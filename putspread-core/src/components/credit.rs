//! Credit estimate for a bull put spread.
//!
//! Short put `short_strike_otm_pct` below the current price, long put one
//! spread width lower, both priced with Black–Scholes. Volatility is a proxy
//! built from the rolling-drop magnitudes:
//!
//! ```text
//! σ = clamp(min_vol + per_drop · mean(|rolling_5d|, |rolling_10d|), min_vol, max_vol)
//! ```
//!
//! The per-contract credit (premium × 100) is floored at `min_credit` and
//! rounded to cents. No-play decisions are always priced at exactly zero.

use tracing::debug;

use crate::config::CreditConfig;
use crate::domain::{MetricSet, Tier};

const CONTRACT_MULTIPLIER: f64 = 100.0;
const DAYS_PER_YEAR: f64 = 365.0;
/// Smallest quotable credit, one cent.
const MIN_TICK: f64 = 0.01;

/// Strikes chosen for a spread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadStrikes {
    pub short_strike: f64,
    pub long_strike: f64,
}

/// Estimated per-contract credit in dollars.
pub fn estimate_credit(metrics: &MetricSet, tier: Tier, config: &CreditConfig) -> f64 {
    if !tier.is_play() {
        return 0.0;
    }

    let spot = metrics.current_price;
    if !(spot.is_finite() && spot > 0.0) {
        return 0.0;
    }

    let strikes = strikes(spot, config);
    let sigma = volatility_proxy(metrics, config);
    let t = config.days_to_expiration as f64 / DAYS_PER_YEAR;
    let r = config.risk_free_rate;

    let short_put = black_scholes_put(spot, strikes.short_strike, t, r, sigma);
    let long_put = black_scholes_put(spot, strikes.long_strike, t, r, sigma);
    let premium = (short_put - long_put).max(0.0);

    let raw = premium * CONTRACT_MULTIPLIER;
    let credit = round_cents(raw.max(config.min_credit).max(MIN_TICK));

    debug!(
        tier = %tier,
        short_strike = strikes.short_strike,
        long_strike = strikes.long_strike,
        sigma,
        raw,
        credit,
        "estimated credit"
    );

    credit
}

/// Short strike below spot; width narrowed if it would push the long strike to zero.
pub fn strikes(spot: f64, config: &CreditConfig) -> SpreadStrikes {
    let short_strike = spot * (1.0 - config.short_strike_otm_pct / 100.0);
    let width = config.spread_width.min(short_strike / 2.0);
    SpreadStrikes {
        short_strike,
        long_strike: short_strike - width,
    }
}

/// Annualised volatility proxy from recent price behaviour.
pub fn volatility_proxy(metrics: &MetricSet, config: &CreditConfig) -> f64 {
    let magnitude = (metrics.rolling_5d_drop.abs() + metrics.rolling_10d_drop.abs()) / 2.0;
    let sigma = config.min_volatility + config.volatility_per_drop_pct * magnitude;
    if sigma.is_finite() {
        sigma.clamp(config.min_volatility, config.max_volatility)
    } else {
        config.min_volatility
    }
}

/// European put price.
pub fn black_scholes_put(spot: f64, strike: f64, t: f64, r: f64, sigma: f64) -> f64 {
    if t <= 0.0 || sigma <= 0.0 {
        return (strike - spot).max(0.0);
    }
    let sqrt_t = t.sqrt();
    let d1 = ((spot / strike).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * sqrt_t);
    let d2 = d1 - sigma * sqrt_t;
    strike * (-r * t).exp() * norm_cdf(-d2) - spot * norm_cdf(-d1)
}

/// Standard normal CDF.
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

// Abramowitz & Stegun 7.1.26, |error| < 1.5e-7.
fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

fn round_cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
