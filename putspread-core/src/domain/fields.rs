//! Human-readable descriptions of every reported field.

use serde::Serialize;

/// Description and reading guide for one report field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescription {
    pub field: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ideal: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

const fn field(
    field: &'static str,
    description: &'static str,
    ideal: Option<&'static str>,
    warning: Option<&'static str>,
) -> FieldDescription {
    FieldDescription {
        field,
        description,
        ideal,
        warning,
    }
}

pub const FIELD_DESCRIPTIONS: &[FieldDescription] = &[
    field(
        "RSI",
        "Relative Strength Index (14-day, Wilder) - measures if the stock is oversold",
        Some("< 30 (oversold)"),
        Some("> 70 (overbought)"),
    ),
    field(
        "percent_drop",
        "Change of the latest close from the highest close in the last 20 days",
        Some("-5% or more"),
        Some("above -2%"),
    ),
    field(
        "rolling_5d_drop",
        "Change of the latest close versus the close 5 trading days earlier",
        Some("-7% or more"),
        Some("above -5%"),
    ),
    field(
        "rolling_10d_drop",
        "Change of the latest close versus the close 10 trading days earlier",
        None,
        None,
    ),
    field(
        "max_recent_drop",
        "Worst peak-to-trough decline over the last 30 closes",
        Some("-10% or more"),
        Some("above -5%"),
    ),
    field(
        "days_oversold",
        "Consecutive most recent days with RSI < 30",
        Some("2+ days"),
        Some("1 day"),
    ),
    field(
        "distance_from_low",
        "Latest close above the lowest close in the last 20 days",
        Some("0-3%"),
        Some("> 5%"),
    ),
    field(
        "price_vs_200ma",
        "Latest close relative to the 200-day moving average",
        Some("within 5%"),
        Some("> 10% below"),
    ),
    field("current_price", "Latest close", None, None),
    field("ma200", "200-day simple moving average of closes", None, None),
    field("confidence_score", "Confidence in the decision (0-1)", None, None),
    field(
        "confidence_source",
        "Whether the confidence came from the algorithm or an AI narrative",
        None,
        None,
    ),
    field(
        "estimated_credit",
        "Estimated per-contract credit for a 2.5-wide bull put (~30 DTE, ~10% OTM)",
        None,
        None,
    ),
    field("tier", "Trade quality classification", None, None),
    field("play", "Whether the ticker qualifies as a trade", None, None),
    field("reason", "Explanation for PLAY/PASS", None, None),
];

pub fn describe(name: &str) -> Option<&'static FieldDescription> {
    FIELD_DESCRIPTIONS.iter().find(|f| f.field == name)
}
