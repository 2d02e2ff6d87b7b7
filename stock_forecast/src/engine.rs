//! Iterative multi-step forecasting
//!
//! The engine scales the most recent window, asks the regressor for the next
//! value, appends that prediction to the window (still in the scaled domain)
//! and repeats until the horizon is reached. Only the first step sees purely
//! observed data; each later step carries one more predicted value than the
//! last, so errors compound with the horizon.
//!
//! The engine holds no state between calls and never logs. Every failure is
//! returned as a [`ForecastError`] and no partial result is produced.

use crate::artifacts::InstrumentArtifacts;
use crate::config::ForecastConfig;
use crate::data::TimeSeries;
use crate::error::{ForecastError, ModelError, Result};
use crate::horizon;
use crate::normalizer::Normalizer;
use crate::regressor::Regressor;
use crate::window::Window;
use chrono::NaiveDate;
use serde::Serialize;

/// Inputs of a single forecast
#[derive(Debug, Clone, Copy)]
pub struct ForecastRequest<'a> {
    series: &'a [f64],
    window_size: usize,
    horizon: usize,
}

impl<'a> ForecastRequest<'a> {
    /// Create a request; window size and horizon must both be at least 1
    pub fn new(series: &'a [f64], window_size: usize, horizon: usize) -> Result<Self> {
        validate_parameters(window_size, horizon)?;
        Ok(Self {
            series,
            window_size,
            horizon,
        })
    }

    pub fn series(&self) -> &'a [f64] {
        self.series
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }
}

/// Outcome of a forecast, in the series' original units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastResult {
    /// Predicted value for the last step
    pub value: f64,
    /// Number of rollout steps performed
    pub horizon: usize,
    /// Calendar date the forecast was requested for, when resolved from one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
}

fn validate_parameters(window_size: usize, horizon: usize) -> Result<()> {
    if window_size == 0 {
        return Err(ForecastError::InvalidParameter(
            "Window size must be positive".to_string(),
        ));
    }
    if horizon == 0 {
        return Err(ForecastError::InvalidParameter(
            "Horizon must be at least one step".to_string(),
        ));
    }
    Ok(())
}

fn failure(step: usize) -> impl Fn(ModelError) -> ForecastError {
    move |source| ForecastError::PredictionFailure { step, source }
}

/// Run the rollout and return the scaled prediction of every step
fn rollout<N, R>(
    series: &[f64],
    normalizer: &N,
    regressor: &R,
    window_size: usize,
    horizon: usize,
) -> Result<Vec<f64>>
where
    N: Normalizer + ?Sized,
    R: Regressor + ?Sized,
{
    validate_parameters(window_size, horizon)?;
    let window = Window::initial(series, window_size)?;

    if let Some(expected) = regressor.input_len() {
        if expected != window_size {
            return Err(ForecastError::InvalidParameter(format!(
                "Regressor expects windows of {}, configured window size is {}",
                expected, window_size
            )));
        }
    }

    // Step 0 is the forward transform of the observed window
    let scaled = normalizer.forward(window.values()).map_err(failure(0))?;
    if scaled.len() != window_size {
        return Err(failure(0)(ModelError::ShapeMismatch {
            expected: window_size,
            actual: scaled.len(),
        }));
    }
    let mut window = Window::from_values(scaled)?;

    let mut predictions = Vec::with_capacity(horizon);
    for step in 1..=horizon {
        let predicted = regressor.predict(window.values()).map_err(failure(step))?;
        if !predicted.is_finite() {
            return Err(failure(step)(ModelError::NonFinite(format!(
                "regressor returned {}",
                predicted
            ))));
        }
        predictions.push(predicted);

        if step < horizon {
            window = window.advance(predicted);
        }
    }

    Ok(predictions)
}

/// Forecast `horizon` steps past the end of `series`.
///
/// Performs exactly `horizon` regressor calls. Window size, horizon and
/// history length are checked before the first one.
pub fn forecast<N, R>(
    series: &[f64],
    normalizer: &N,
    regressor: &R,
    window_size: usize,
    horizon: usize,
) -> Result<f64>
where
    N: Normalizer + ?Sized,
    R: Regressor + ?Sized,
{
    let predictions = rollout(series, normalizer, regressor, window_size, horizon)?;
    let final_scaled = predictions[predictions.len() - 1];
    normalizer.inverse(final_scaled).map_err(failure(horizon))
}

/// Like [`forecast`] but returns the denormalized prediction of every step.
///
/// The last element equals what [`forecast`] returns for the same inputs.
pub fn forecast_path<N, R>(
    series: &[f64],
    normalizer: &N,
    regressor: &R,
    window_size: usize,
    horizon: usize,
) -> Result<Vec<f64>>
where
    N: Normalizer + ?Sized,
    R: Regressor + ?Sized,
{
    let predictions = rollout(series, normalizer, regressor, window_size, horizon)?;
    predictions
        .iter()
        .enumerate()
        .map(|(i, &scaled)| normalizer.inverse(scaled).map_err(failure(i + 1)))
        .collect()
}

/// Forecast engine bound to a configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct ForecastEngine {
    config: ForecastConfig,
}

impl ForecastEngine {
    /// Create an engine from a validated configuration
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn window_size(&self) -> usize {
        self.config.window_size
    }

    /// Forecast `horizon` steps with the configured window size
    pub fn forecast<N, R>(
        &self,
        series: &[f64],
        normalizer: &N,
        regressor: &R,
        horizon: usize,
    ) -> Result<f64>
    where
        N: Normalizer + ?Sized,
        R: Regressor + ?Sized,
    {
        forecast(series, normalizer, regressor, self.window_size(), horizon)
    }

    /// Run a prepared request; the request's own window size wins
    pub fn forecast_request<N, R>(
        &self,
        request: &ForecastRequest<'_>,
        normalizer: &N,
        regressor: &R,
    ) -> Result<ForecastResult>
    where
        N: Normalizer + ?Sized,
        R: Regressor + ?Sized,
    {
        let value = forecast(
            request.series(),
            normalizer,
            regressor,
            request.window_size(),
            request.horizon(),
        )?;
        Ok(ForecastResult {
            value,
            horizon: request.horizon(),
            target_date: None,
        })
    }

    /// Denormalized prediction of every step up to `horizon`
    pub fn forecast_path<N, R>(
        &self,
        series: &[f64],
        normalizer: &N,
        regressor: &R,
        horizon: usize,
    ) -> Result<Vec<f64>>
    where
        N: Normalizer + ?Sized,
        R: Regressor + ?Sized,
    {
        forecast_path(series, normalizer, regressor, self.window_size(), horizon)
    }

    fn last_known(&self, series: &TimeSeries) -> Result<NaiveDate> {
        series
            .last_date()
            .ok_or_else(|| ForecastError::InsufficientHistory {
                required: self.window_size(),
                available: 0,
            })
    }

    /// Forecast the close on `target`, one step per calendar day after the last observation
    pub fn forecast_for_date(
        &self,
        series: &TimeSeries,
        artifacts: &InstrumentArtifacts,
        target: NaiveDate,
    ) -> Result<ForecastResult> {
        let last_known = self.last_known(series)?;
        let steps = horizon::resolve(last_known, target)?;

        let value = self.forecast(
            series.values(),
            artifacts.normalizer(),
            artifacts.regressor(),
            steps,
        )?;
        Ok(ForecastResult {
            value,
            horizon: steps,
            target_date: Some(target),
        })
    }

    /// Forecast the next calendar day's close
    pub fn forecast_next(
        &self,
        series: &TimeSeries,
        artifacts: &InstrumentArtifacts,
    ) -> Result<ForecastResult> {
        let last_known = self.last_known(series)?;
        self.forecast_for_date(series, artifacts, horizon::default_target(last_known)?)
    }
}
