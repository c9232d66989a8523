//! PriceSeries: validated, ordered daily history for one ticker.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

use super::point::PricePoint;
use crate::error::InputError;

/// Ordered (oldest → newest) daily points for a single ticker.
///
/// Construction validates every point and the date ordering, so downstream
/// indicator code can assume finite positive prices. Minimum length is not
/// checked here; it depends on the indicator windows and is enforced by
/// `compute_metrics`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, InputError> {
        if points.is_empty() {
            return Err(InputError::EmptySeries);
        }

        for (index, point) in points.iter().enumerate() {
            if let Some(reason) = point.defect() {
                return Err(InputError::MalformedPoint {
                    index,
                    date: point.date,
                    reason,
                });
            }
        }

        for (index, pair) in points.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(InputError::NonMonotonicDates {
                    index: index + 1,
                    previous: pair[0].date,
                    current: pair[1].date,
                });
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            points,
        })
    }

    /// Build a series from closing prices alone, one per weekday from `start`.
    ///
    /// open = previous close (or close for the first point),
    /// high/low = max/min of open and close, volume = 0.
    pub fn from_closes(
        symbol: impl Into<String>,
        start: NaiveDate,
        closes: &[f64],
    ) -> Result<Self, InputError> {
        let mut date = next_weekday(start);
        let mut points = Vec::with_capacity(closes.len());
        for (i, &close) in closes.iter().enumerate() {
            let open = if i == 0 { close } else { closes[i - 1] };
            points.push(PricePoint {
                date,
                open,
                high: open.max(close),
                low: open.min(close),
                close,
                volume: 0,
            });
            date = next_weekday(date + Duration::days(1));
        }
        Self::new(symbol, points)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closing prices in series order.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Most recent point. Always present: construction rejects empty input.
    pub fn last(&self) -> &PricePoint {
        &self.points[self.points.len() - 1]
    }

    pub fn first_date(&self) -> NaiveDate {
        self.points[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.last().date
    }

    /// BLAKE3 content hash over symbol and every point.
    ///
    /// Two series with identical content always share a fingerprint, which
    /// lets callers tag a report with the exact data it was computed from.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.symbol.as_bytes());
        for p in &self.points {
            hasher.update(p.date.to_string().as_bytes());
            hasher.update(&p.open.to_le_bytes());
            hasher.update(&p.high.to_le_bytes());
            hasher.update(&p.low.to_le_bytes());
            hasher.update(&p.close.to_le_bytes());
            hasher.update(&p.volume.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}

fn next_weekday(mut date: NaiveDate) -> NaiveDate {
    while matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        date += Duration::days(1);
    }
    date
}
