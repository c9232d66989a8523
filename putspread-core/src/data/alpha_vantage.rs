//! Alpha Vantage `TIME_SERIES_DAILY` loader.
//!
//! One blocking request per symbol with `outputsize=full`. The API reports
//! problems inside a 200 response: `Error Message` for bad calls and
//! `Note` / `Information` for rate limits and plan restrictions.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

use super::provider::{normalize_symbol, DataError, SeriesLoader};
use crate::domain::{PricePoint, PriceSeries};

pub const API_KEY_VAR: &str = "VANTAGE_API_KEY";
const BASE_URL: &str = "https://www.alphavantage.co/query";

#[derive(Debug, Deserialize)]
struct DailyResponse {
    #[serde(rename = "Time Series (Daily)")]
    series: Option<BTreeMap<String, DailyBar>>,
    #[serde(rename = "Error Message")]
    error: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DailyBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

pub struct AlphaVantageLoader {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageLoader {
    pub fn new(api_key: impl Into<String>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Reads the key from `VANTAGE_API_KEY`.
    pub fn from_env() -> Result<Self, DataError> {
        match std::env::var(API_KEY_VAR) {
            Ok(key) if !key.trim().is_empty() => Self::new(key),
            _ => Err(DataError::MissingApiKey(API_KEY_VAR)),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn fetch_json(&self, symbol: &str) -> Result<DailyResponse, DataError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", "full"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited(format!("HTTP {status} for {symbol}")));
        }
        if !status.is_success() {
            return Err(DataError::Provider(format!("HTTP {status} for {symbol}")));
        }

        resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })
    }
}

impl SeriesLoader for AlphaVantageLoader {
    fn name(&self) -> &str {
        "alpha_vantage"
    }

    fn load(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        let symbol = normalize_symbol(symbol)?;
        debug!(symbol = %symbol, "fetching TIME_SERIES_DAILY");
        let resp = self.fetch_json(&symbol)?;
        let series = parse_response(&symbol, resp)?;
        debug!(
            symbol = %symbol,
            points = series.len(),
            first = %series.first_date(),
            last = %series.last_date(),
            "fetched daily series"
        );
        Ok(series)
    }
}

fn parse_response(symbol: &str, resp: DailyResponse) -> Result<PriceSeries, DataError> {
    if let Some(msg) = resp.error {
        warn!(symbol, message = %msg, "Alpha Vantage error");
        return Err(DataError::Provider(msg));
    }
    if let Some(msg) = resp.note.or(resp.information) {
        warn!(symbol, message = %msg, "Alpha Vantage rate limit");
        return Err(DataError::RateLimited(msg));
    }

    let raw = resp.series.ok_or_else(|| DataError::SymbolNotFound {
        symbol: symbol.to_string(),
    })?;
    if raw.is_empty() {
        return Err(DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        });
    }

    // BTreeMap keys are ISO dates, so iteration is already oldest first.
    let mut points = Vec::with_capacity(raw.len());
    for (date, bar) in &raw {
        let date = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| DataError::ResponseFormatChanged(format!("bad date '{date}': {e}")))?;
        points.push(PricePoint {
            date,
            open: number(&bar.open, "open")?,
            high: number(&bar.high, "high")?,
            low: number(&bar.low, "low")?,
            close: number(&bar.close, "close")?,
            volume: bar.volume.trim().parse().map_err(|_| {
                DataError::ResponseFormatChanged(format!(
                    "volume is not an integer: '{}'",
                    bar.volume
                ))
            })?,
        });
    }

    Ok(PriceSeries::new(symbol, points)?)
}

fn number(raw: &str, field: &str) -> Result<f64, DataError> {
    raw.trim()
        .parse()
        .map_err(|_| DataError::ResponseFormatChanged(format!("{field} is not a number: '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<PriceSeries, DataError> {
        let resp: DailyResponse = serde_json::from_str(json).unwrap();
        parse_response("IBM", resp)
    }

    #[test]
    fn parses_daily_series_oldest_first() {
        let s = parse(
            r#"{
                "Meta Data": {"2. Symbol": "IBM"},
                "Time Series (Daily)": {
                    "2024-01-03": {"1. open": "161.0", "2. high": "162.0", "3. low": "160.0", "4. close": "160.5", "5. volume": "4200000"},
                    "2024-01-02": {"1. open": "162.8", "2. high": "163.3", "3. low": "160.7", "4. close": "161.5", "5. volume": "3100000"}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(s.symbol(), "IBM");
        assert_eq!(s.closes(), vec![161.5, 160.5]);
        assert_eq!(s.points()[1].volume, 4_200_000);
    }

    #[test]
    fn error_message_is_provider_error() {
        let err = parse(r#"{"Error Message": "Invalid API call."}"#).unwrap_err();
        assert!(matches!(err, DataError::Provider(ref m) if m.contains("Invalid API call")));
    }

    #[test]
    fn note_is_rate_limit() {
        let err = parse(r#"{"Note": "Thank you for using Alpha Vantage! 5 calls per minute."}"#)
            .unwrap_err();
        assert!(matches!(err, DataError::RateLimited(_)));
    }

    #[test]
    fn information_is_rate_limit() {
        let err = parse(r#"{"Information": "premium endpoint"}"#).unwrap_err();
        assert!(matches!(err, DataError::RateLimited(_)));
    }

    #[test]
    fn missing_series_is_symbol_not_found() {
        let err = parse(r#"{"Meta Data": {}}"#).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { .. }));
    }

    #[test]
    fn non_numeric_price_is_format_change() {
        let err = parse(
            r#"{"Time Series (Daily)": {"2024-01-02": {"1. open": "x", "2. high": "1", "3. low": "1", "4. close": "1", "5. volume": "0"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::ResponseFormatChanged(_)));
    }

    #[test]
    fn malformed_volume_is_format_change() {
        let err = parse(
            r#"{"Time Series (Daily)": {"2024-01-02": {"1. open": "10", "2. high": "11", "3. low": "9", "4. close": "10", "5. volume": "n/a"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::ResponseFormatChanged(ref m) if m.contains("volume")));
    }

    #[test]
    fn from_env_requires_key() {
        // Only checks the error path when the variable is absent.
        if std::env::var(API_KEY_VAR).is_err() {
            assert!(matches!(
                AlphaVantageLoader::from_env(),
                Err(DataError::MissingApiKey(_))
            ));
        }
    }
}
