//! Data loading: CSV files and Alpha Vantage.

pub mod alpha_vantage;
pub mod csv_file;
pub mod provider;

pub use alpha_vantage::AlphaVantageLoader;
pub use csv_file::{read_csv, read_series, write_csv, write_series, CsvLoader};
pub use provider::{normalize_symbol, DataError, SeriesLoader};
