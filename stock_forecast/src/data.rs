//! Closing-price series handling for forecasting

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Chronologically ordered closing prices indexed by date
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    /// Observation dates, strictly increasing
    dates: Vec<NaiveDate>,
    /// Observed values, one per date
    values: Vec<f64>,
}

/// Last close together with the move from the previous session
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LastCloseSummary {
    /// Date of the last observation
    pub date: NaiveDate,
    /// Last observed close
    pub close: f64,
    /// Close before the last one
    pub previous_close: f64,
    /// `close - previous_close`
    pub change: f64,
}

impl TimeSeries {
    /// Create a series from parallel date and value vectors.
    ///
    /// Non-finite values are dropped together with their dates, the remaining
    /// dates must be strictly increasing. Gaps between dates are allowed.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::DataError(format!(
                "Dates length ({}) doesn't match values length ({})",
                dates.len(),
                values.len()
            )));
        }

        let (dates, values): (Vec<NaiveDate>, Vec<f64>) = dates
            .into_iter()
            .zip(values)
            .filter(|(_, v)| v.is_finite())
            .unzip();

        if let Some(pair) = dates.windows(2).find(|pair| pair[1] <= pair[0]) {
            return Err(ForecastError::DataError(format!(
                "Dates must be strictly increasing: {} is followed by {}",
                pair[0], pair[1]
            )));
        }

        Ok(Self { dates, values })
    }

    /// Load a series from a CSV file with a date column and a close column
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading close prices");
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a series from any CSV source.
    ///
    /// The date column is the first header containing "date" or "time". The
    /// value column is the header named "close"; failing that, the first
    /// unadjusted header containing "close", then one containing "price".
    /// Rows whose close is empty, `NaN` or unparsable are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader.headers()?.clone();

        let date_idx = find_column(&headers, &["date", "time"]).ok_or_else(|| {
            ForecastError::DataError("No date column found in data".to_string())
        })?;
        let close_idx = find_close_column(&headers)
            .or_else(|| find_column(&headers, &["price"]))
            .ok_or_else(|| ForecastError::DataError("No close column found in data".to_string()))?;

        let mut dates = Vec::new();
        let mut values = Vec::new();
        let mut skipped = 0usize;

        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let raw_date = record.get(date_idx).unwrap_or_default();
            let date = parse_date(raw_date).ok_or_else(|| {
                ForecastError::DataError(format!("Row {}: invalid date '{}'", row + 1, raw_date))
            })?;

            match record.get(close_idx).and_then(|s| s.trim().parse::<f64>().ok()) {
                Some(close) if close.is_finite() => {
                    dates.push(date);
                    values.push(close);
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(skipped, "dropped rows without a valid close");
        }

        Self::new(dates, values)
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Observed values, oldest first
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Observation dates, oldest first
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Date of the most recent observation
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// The most recent `n` values, or all of them if the series is shorter
    pub fn tail(&self, n: usize) -> &[f64] {
        &self.values[self.values.len().saturating_sub(n)..]
    }

    /// Last close and its change against the previous one, if there are two observations
    pub fn last_close_summary(&self) -> Option<LastCloseSummary> {
        let n = self.values.len();
        if n < 2 {
            return None;
        }

        let close = self.values[n - 1];
        let previous_close = self.values[n - 2];
        Some(LastCloseSummary {
            date: self.dates[n - 1],
            close,
            previous_close,
            change: close - previous_close,
        })
    }
}

fn find_column(headers: &csv::StringRecord, needles: &[&str]) -> Option<usize> {
    headers.iter().position(|name| {
        let lower = name.trim().to_lowercase();
        needles.iter().any(|needle| lower.contains(needle))
    })
}

// An exact "close" header wins over "Adj Close" wherever it sits
fn find_close_column(headers: &csv::StringRecord) -> Option<usize> {
    headers
        .iter()
        .position(|name| name.trim().eq_ignore_ascii_case("close"))
        .or_else(|| {
            headers.iter().position(|name| {
                let lower = name.trim().to_lowercase();
                lower.contains("close") && !lower.contains("adj")
            })
        })
}

// Accepts plain dates as well as timestamps that start with one
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}
