mod common;

use approx::assert_relative_eq;
use common::date;
use std::io::Write;
use stock_forecast::{ForecastError, TimeSeries};
use tempfile::NamedTempFile;

#[test]
fn test_from_csv_with_market_export_header() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Date,Open,High,Low,Close,Adj Close,Volume").unwrap();
    writeln!(file, "2024-01-08,9500,9600,9450,9575,9400,1000").unwrap();
    writeln!(file, "2024-01-09,9575,9700,9550,9650,9480,1200").unwrap();
    writeln!(file, "2024-01-10,9650,9700,9600,9625,9455,900").unwrap();

    let series = TimeSeries::from_csv(file.path()).unwrap();

    assert_eq!(series.len(), 3);
    assert_eq!(series.values(), &[9575.0, 9650.0, 9625.0]);
    assert_eq!(series.last_date(), Some(date(2024, 1, 10)));
}

#[test]
fn test_close_preferred_over_earlier_adj_close() {
    let csv = "Date,Adj Close,Close,High,Low,Open,Volume\n\
               2024-01-09,9480,9650,9700,9550,9575,1200\n\
               2024-01-10,9455,9625,9700,9600,9650,900\n";

    let series = TimeSeries::from_reader(csv.as_bytes()).unwrap();

    assert_eq!(series.values(), &[9650.0, 9625.0]);
}

#[test]
fn test_adjusted_column_skipped_in_fallback() {
    let csv = "date,adj_close,close_price\n2024-01-09,1.0,10.0\n2024-01-10,2.0,20.0\n";

    let series = TimeSeries::from_reader(csv.as_bytes()).unwrap();

    assert_eq!(series.values(), &[10.0, 20.0]);
}

#[test]
fn test_rows_without_close_are_dropped() {
    let csv = "date,close\n\
               2024-01-01,100.0\n\
               2024-01-02,\n\
               2024-01-03,NaN\n\
               2024-01-04,103.5\n";

    let series = TimeSeries::from_reader(csv.as_bytes()).unwrap();

    assert_eq!(series.len(), 2);
    assert_eq!(series.dates(), &[date(2024, 1, 1), date(2024, 1, 4)]);
}

#[test]
fn test_price_column_fallback() {
    let csv = "timestamp,price\n2024-03-01 00:00:00+07:00,50\n2024-03-04 00:00:00+07:00,51\n";
    let series = TimeSeries::from_reader(csv.as_bytes()).unwrap();
    assert_eq!(series.values(), &[50.0, 51.0]);
    assert_eq!(series.last_date(), Some(date(2024, 3, 4)));
}

#[test]
fn test_missing_columns() {
    let result = TimeSeries::from_reader("date,volume\n2024-01-01,10\n".as_bytes());
    assert!(matches!(result, Err(ForecastError::DataError(_))));

    let result = TimeSeries::from_reader("open,close\n1,2\n".as_bytes());
    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[test]
fn test_invalid_date_is_rejected() {
    let result = TimeSeries::from_reader("date,close\nyesterday,10\n".as_bytes());
    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[test]
fn test_dates_must_increase() {
    let dates = vec![date(2024, 1, 2), date(2024, 1, 2)];
    let result = TimeSeries::new(dates, vec![1.0, 2.0]);
    assert!(matches!(result, Err(ForecastError::DataError(_))));

    let dates = vec![date(2024, 1, 3), date(2024, 1, 1)];
    assert!(TimeSeries::new(dates, vec![1.0, 2.0]).is_err());
}

#[test]
fn test_gaps_are_tolerated() {
    let dates = vec![date(2024, 1, 1), date(2024, 1, 15), date(2024, 3, 1)];
    let series = TimeSeries::new(dates, vec![1.0, 2.0, 3.0]).unwrap();
    assert_eq!(series.len(), 3);
}

#[test]
fn test_length_mismatch() {
    let result = TimeSeries::new(vec![date(2024, 1, 1)], vec![1.0, 2.0]);
    assert!(result.is_err());
}

#[test]
fn test_last_close_summary() {
    let dates = vec![date(2024, 1, 9), date(2024, 1, 10)];
    let series = TimeSeries::new(dates, vec![9650.0, 9625.0]).unwrap();

    let summary = series.last_close_summary().unwrap();
    assert_eq!(summary.date, date(2024, 1, 10));
    assert_relative_eq!(summary.close, 9625.0);
    assert_relative_eq!(summary.previous_close, 9650.0);
    assert_relative_eq!(summary.change, -25.0);

    let single = TimeSeries::new(vec![date(2024, 1, 9)], vec![1.0]).unwrap();
    assert!(single.last_close_summary().is_none());
}

#[test]
fn test_missing_file() {
    let result = TimeSeries::from_csv("nonexistent_file.csv");
    assert!(matches!(result, Err(ForecastError::IoError(_))));
}
