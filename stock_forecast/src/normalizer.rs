//! Fitted scalar normalizers
//!
//! Normalizers are always received already fitted: their parameters come from
//! the training run that produced the regressor. This module only applies them.

use crate::error::{ForecastError, ModelError, Result};
use serde::{Deserialize, Serialize};

/// Forward/inverse scalar transform shared by the regressor's training data
pub trait Normalizer {
    /// Scale every value, leaving the input untouched
    fn forward(&self, values: &[f64]) -> std::result::Result<Vec<f64>, ModelError>;

    /// Map one scaled value back to original units
    fn inverse(&self, scaled: f64) -> std::result::Result<f64, ModelError>;
}

impl<T: Normalizer + ?Sized> Normalizer for &T {
    fn forward(&self, values: &[f64]) -> std::result::Result<Vec<f64>, ModelError> {
        (**self).forward(values)
    }

    fn inverse(&self, scaled: f64) -> std::result::Result<f64, ModelError> {
        (**self).inverse(scaled)
    }
}

fn ensure_finite(value: f64, what: &str) -> std::result::Result<f64, ModelError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::NonFinite(format!("{} is {}", what, value)))
    }
}

/// Min-max scaler mapping `[data_min, data_max]` onto `feature_range`.
///
/// Values outside the fitted range extrapolate linearly, nothing is clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMaxScaler {
    data_min: f64,
    data_max: f64,
    feature_range: (f64, f64),
    scale: f64,
    offset: f64,
}

impl MinMaxScaler {
    /// Create a scaler from fitted parameters
    pub fn new(data_min: f64, data_max: f64, feature_range: (f64, f64)) -> Result<Self> {
        let params = [data_min, data_max, feature_range.0, feature_range.1];
        if params.iter().any(|p| !p.is_finite()) {
            return Err(ForecastError::InvalidParameter(
                "Min-max parameters must be finite".to_string(),
            ));
        }
        if data_max <= data_min {
            return Err(ForecastError::InvalidParameter(format!(
                "data_max ({}) must be greater than data_min ({})",
                data_max, data_min
            )));
        }
        if feature_range.1 <= feature_range.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Feature range ({}, {}) must be increasing",
                feature_range.0, feature_range.1
            )));
        }

        let scale = (feature_range.1 - feature_range.0) / (data_max - data_min);
        Ok(Self {
            data_min,
            data_max,
            feature_range,
            scale,
            offset: feature_range.0 - data_min * scale,
        })
    }

    /// Scaler onto the unit interval
    pub fn unit(data_min: f64, data_max: f64) -> Result<Self> {
        Self::new(data_min, data_max, (0.0, 1.0))
    }

    /// Lowest value seen when fitting
    pub fn data_min(&self) -> f64 {
        self.data_min
    }

    /// Highest value seen when fitting
    pub fn data_max(&self) -> f64 {
        self.data_max
    }

    /// Target interval
    pub fn feature_range(&self) -> (f64, f64) {
        self.feature_range
    }
}

impl Normalizer for MinMaxScaler {
    fn forward(&self, values: &[f64]) -> std::result::Result<Vec<f64>, ModelError> {
        values
            .iter()
            .map(|&x| ensure_finite(x, "input").map(|x| x * self.scale + self.offset))
            .collect()
    }

    fn inverse(&self, scaled: f64) -> std::result::Result<f64, ModelError> {
        let scaled = ensure_finite(scaled, "scaled value")?;
        Ok((scaled - self.offset) / self.scale)
    }
}

/// Z-score scaler `(x - mean) / std`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardScaler {
    mean: f64,
    std: f64,
}

impl StandardScaler {
    /// Create a scaler from fitted parameters
    pub fn new(mean: f64, std: f64) -> Result<Self> {
        if !mean.is_finite() || !std.is_finite() {
            return Err(ForecastError::InvalidParameter(
                "Standard scaler parameters must be finite".to_string(),
            ));
        }
        if std <= 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Standard deviation must be positive, got {}",
                std
            )));
        }
        Ok(Self { mean, std })
    }

    /// Fitted mean
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Fitted standard deviation
    pub fn std(&self) -> f64 {
        self.std
    }
}

impl Normalizer for StandardScaler {
    fn forward(&self, values: &[f64]) -> std::result::Result<Vec<f64>, ModelError> {
        values
            .iter()
            .map(|&x| ensure_finite(x, "input").map(|x| (x - self.mean) / self.std))
            .collect()
    }

    fn inverse(&self, scaled: f64) -> std::result::Result<f64, ModelError> {
        let scaled = ensure_finite(scaled, "scaled value")?;
        Ok(scaled * self.std + self.mean)
    }
}

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// Serialized form of a fitted scaler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    MinMax {
        data_min: f64,
        data_max: f64,
        #[serde(default = "default_feature_range")]
        feature_range: (f64, f64),
    },
    Standard {
        mean: f64,
        std: f64,
    },
}

impl ScalerArtifact {
    /// Validate the parameters and build the scaler
    pub fn build(&self) -> Result<Scaler> {
        match *self {
            ScalerArtifact::MinMax {
                data_min,
                data_max,
                feature_range,
            } => Ok(Scaler::MinMax(MinMaxScaler::new(
                data_min,
                data_max,
                feature_range,
            )?)),
            ScalerArtifact::Standard { mean, std } => {
                Ok(Scaler::Standard(StandardScaler::new(mean, std)?))
            }
        }
    }
}

/// Any of the supported fitted scalers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scaler {
    MinMax(MinMaxScaler),
    Standard(StandardScaler),
}

impl Normalizer for Scaler {
    fn forward(&self, values: &[f64]) -> std::result::Result<Vec<f64>, ModelError> {
        match self {
            Scaler::MinMax(s) => s.forward(values),
            Scaler::Standard(s) => s.forward(values),
        }
    }

    fn inverse(&self, scaled: f64) -> std::result::Result<f64, ModelError> {
        match self {
            Scaler::MinMax(s) => s.inverse(scaled),
            Scaler::Standard(s) => s.inverse(scaled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn min_max_maps_fitted_range_onto_feature_range() {
        let scaler = MinMaxScaler::new(100.0, 200.0, (-1.0, 1.0)).unwrap();
        let scaled = scaler.forward(&[100.0, 150.0, 200.0]).unwrap();
        assert_relative_eq!(scaled[0], -1.0);
        assert_relative_eq!(scaled[1], 0.0);
        assert_relative_eq!(scaled[2], 1.0);
    }

    #[test]
    fn min_max_extrapolates_without_clamping() {
        let scaler = MinMaxScaler::unit(100.0, 200.0).unwrap();
        let scaled = scaler.forward(&[250.0]).unwrap();
        assert_relative_eq!(scaled[0], 1.5);
        assert_relative_eq!(scaler.inverse(-0.5).unwrap(), 50.0);
    }

    #[test]
    fn degenerate_parameters_are_rejected() {
        assert!(MinMaxScaler::unit(5.0, 5.0).is_err());
        assert!(MinMaxScaler::new(0.0, 1.0, (1.0, 0.0)).is_err());
        assert!(StandardScaler::new(0.0, 0.0).is_err());
        assert!(StandardScaler::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn non_finite_inputs_fail() {
        let scaler = StandardScaler::new(10.0, 2.0).unwrap();
        assert!(matches!(
            scaler.forward(&[1.0, f64::NAN]),
            Err(ModelError::NonFinite(_))
        ));
        assert!(scaler.inverse(f64::INFINITY).is_err());
    }
}
