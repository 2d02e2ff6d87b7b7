//! Window regressors
//!
//! The engine treats a regressor as a black box mapping one scaled window to
//! one scaled prediction. How it was trained is not this crate's business.

use crate::error::{ForecastError, ModelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maps one window (oldest first) to the next value, both in the scaled domain
pub trait Regressor {
    /// Predict the value following `window`
    fn predict(&self, window: &[f64]) -> std::result::Result<f64, ModelError>;

    /// Window length the regressor was fitted on, if it knows it
    fn input_len(&self) -> Option<usize> {
        None
    }
}

impl<T: Regressor + ?Sized> Regressor for &T {
    fn predict(&self, window: &[f64]) -> std::result::Result<f64, ModelError> {
        (**self).predict(window)
    }

    fn input_len(&self) -> Option<usize> {
        (**self).input_len()
    }
}

/// Adapter turning a closure into a [`Regressor`]
pub struct FnRegressor<F> {
    f: F,
}

impl<F> FnRegressor<F>
where
    F: Fn(&[f64]) -> std::result::Result<f64, ModelError>,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Regressor for FnRegressor<F>
where
    F: Fn(&[f64]) -> std::result::Result<f64, ModelError>,
{
    fn predict(&self, window: &[f64]) -> std::result::Result<f64, ModelError> {
        (self.f)(window)
    }
}

impl<F> fmt::Debug for FnRegressor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRegressor").finish_non_exhaustive()
    }
}

/// Linear autoregressor: dot product of the window with fixed weights plus a bias
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegressor {
    weights: Vec<f64>,
    bias: f64,
}

impl LinearRegressor {
    /// Create a regressor; `weights[0]` applies to the oldest value
    pub fn new(weights: Vec<f64>, bias: f64) -> Result<Self> {
        if weights.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Linear regressor needs at least one weight".to_string(),
            ));
        }
        if !bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(ForecastError::InvalidParameter(
                "Linear regressor parameters must be finite".to_string(),
            ));
        }
        Ok(Self { weights, bias })
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }
}

impl Regressor for LinearRegressor {
    fn predict(&self, window: &[f64]) -> std::result::Result<f64, ModelError> {
        if window.len() != self.weights.len() {
            return Err(ModelError::ShapeMismatch {
                expected: self.weights.len(),
                actual: window.len(),
            });
        }

        let dot: f64 = self.weights.iter().zip(window).map(|(w, x)| w * x).sum();
        Ok(dot + self.bias)
    }

    fn input_len(&self) -> Option<usize> {
        Some(self.weights.len())
    }
}

/// Serialized form of a regressor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear {
        weights: Vec<f64>,
        #[serde(default)]
        bias: f64,
    },
}

impl ModelArtifact {
    /// Validate the parameters and build the regressor
    pub fn build(&self) -> Result<LinearRegressor> {
        match self {
            ModelArtifact::Linear { weights, bias } => LinearRegressor::new(weights.clone(), *bias),
        }
    }
}
