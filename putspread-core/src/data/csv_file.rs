//! CSV import and export of daily series.
//!
//! Expected header: `date,open,high,low,close[,volume]`. Capitalised names
//! (`Date,Open,...`) are accepted and extra columns such as `Adj Close` are
//! ignored. Rows may appear in any date order; they are sorted before the
//! series is validated.

use chrono::NaiveDate;
use serde::Deserialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::provider::{normalize_symbol, DataError, SeriesLoader};
use crate::domain::{PricePoint, PriceSeries};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume", default)]
    volume: Option<f64>,
}

impl From<CsvRow> for PricePoint {
    fn from(row: CsvRow) -> Self {
        PricePoint {
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume.map(|v| v.max(0.0) as u64).unwrap_or(0),
        }
    }
}

/// Parse a CSV stream into a validated series.
pub fn read_series<R: Read>(reader: R, symbol: &str) -> Result<PriceSeries, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut points: Vec<PricePoint> = Vec::new();
    for row in rdr.deserialize::<CsvRow>() {
        points.push(row?.into());
    }
    points.sort_by_key(|p| p.date);

    Ok(PriceSeries::new(symbol, points)?)
}

/// Read `path` as the series for `symbol`.
pub fn read_csv(path: &Path, symbol: &str) -> Result<PriceSeries, DataError> {
    let file = File::open(path)?;
    let series = read_series(file, symbol)?;
    debug!(path = %path.display(), symbol, points = series.len(), "loaded CSV");
    Ok(series)
}

/// Write `series` with the header `date,open,high,low,close,volume`.
pub fn write_series<W: Write>(series: &PriceSeries, writer: W) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for point in series.points() {
        wtr.serialize(point)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv(series: &PriceSeries, path: &Path) -> Result<(), DataError> {
    write_series(series, File::create(path)?)
}

/// Loads `<dir>/<SYMBOL>.csv`.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    dir: PathBuf,
}

impl CsvLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

impl SeriesLoader for CsvLoader {
    fn name(&self) -> &str {
        "csv"
    }

    fn load(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        let symbol = normalize_symbol(symbol)?;
        let path = self.path_for(&symbol);
        if !path.exists() {
            return Err(DataError::SymbolNotFound { symbol });
        }
        read_csv(&path, &symbol)
    }
}
