#![allow(dead_code)]

use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use stock_forecast::{ModelError, Regressor, TimeSeries};

/// Regressor that records every window it sees and counts its calls
pub struct RecordingRegressor<F> {
    f: F,
    calls: AtomicUsize,
    windows: Mutex<Vec<Vec<f64>>>,
}

impl<F> RecordingRegressor<F>
where
    F: Fn(&[f64]) -> Result<f64, ModelError>,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            calls: AtomicUsize::new(0),
            windows: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn windows(&self) -> Vec<Vec<f64>> {
        self.windows.lock().unwrap().clone()
    }
}

impl<F> Regressor for RecordingRegressor<F>
where
    F: Fn(&[f64]) -> Result<f64, ModelError>,
{
    fn predict(&self, window: &[f64]) -> Result<f64, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.windows.lock().unwrap().push(window.to_vec());
        (self.f)(window)
    }
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Regressor returning the mean of the scaled window
pub fn mean_regressor() -> RecordingRegressor<fn(&[f64]) -> Result<f64, ModelError>> {
    let f: fn(&[f64]) -> Result<f64, ModelError> = |w| Ok(mean(w));
    RecordingRegressor::new(f)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive daily closes `start, start + 1, ...` ending on `last`
pub fn daily_series(last: NaiveDate, start: f64, len: usize) -> TimeSeries {
    let dates = (0..len)
        .map(|i| last - chrono::Duration::days((len - 1 - i) as i64))
        .collect();
    let values = (0..len).map(|i| start + i as f64).collect();
    TimeSeries::new(dates, values).unwrap()
}

/// The closes 100, 101, ..., 124
pub fn ramp_25() -> Vec<f64> {
    (0..25).map(|i| 100.0 + i as f64).collect()
}
