//! Fixed-length observation window fed to the regressor

use crate::error::{ForecastError, Result};

/// The most recent `W` observations, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    values: Vec<f64>,
}

impl Window {
    /// Take the last `size` observations of `series` in chronological order
    pub fn initial(series: &[f64], size: usize) -> Result<Self> {
        if size == 0 {
            return Err(ForecastError::InvalidParameter(
                "Window size must be positive".to_string(),
            ));
        }
        if series.len() < size {
            return Err(ForecastError::InsufficientHistory {
                required: size,
                available: series.len(),
            });
        }

        Ok(Self {
            values: series[series.len() - size..].to_vec(),
        })
    }

    /// Wrap already-ordered values as a window
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Window must hold at least one value".to_string(),
            ));
        }
        Ok(Self { values })
    }

    /// New window with the oldest value dropped and `new_value` appended.
    ///
    /// The length never changes and `self` is left untouched.
    pub fn advance(&self, new_value: f64) -> Self {
        let mut values = Vec::with_capacity(self.values.len());
        values.extend_from_slice(&self.values[1..]);
        values.push(new_value);
        Self { values }
    }

    /// Number of values, always the configured window size
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a constructed window
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values, oldest first
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Newest value
    pub fn newest(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    /// Consume the window, returning its values
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_keeps_length_for_single_slot() {
        let window = Window::initial(&[1.0, 2.0], 1).unwrap();
        let next = window.advance(9.0);
        assert_eq!(next.values(), &[9.0]);
        assert_eq!(window.values(), &[2.0]);
    }

    #[test]
    fn zero_size_is_rejected() {
        let err = Window::initial(&[1.0], 0).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidParameter(_)));
    }
}
