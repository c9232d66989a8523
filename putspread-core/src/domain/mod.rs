//! Domain types: price data in, metrics and decisions out.

pub mod decision;
pub mod fields;
pub mod metrics;
pub mod point;
pub mod series;

pub use decision::{ConfidenceSource, Decision, Tier};
pub use fields::{describe, FieldDescription, FIELD_DESCRIPTIONS};
pub use metrics::MetricSet;
pub use point::PricePoint;
pub use series::PriceSeries;

/// Ticker symbol type alias
pub type Symbol = String;
