//! # Stock Forecast
//!
//! Iterative multi-step forecasting of daily closing prices from a fitted
//! scaler and a window regressor.
//!
//! ## Features
//!
//! - Closing-price series loaded from CSV (rows without a valid close are dropped)
//! - Fixed-length windows with append-and-evict advancement
//! - Min-max and standard scalers built from fitted parameters
//! - Regressors as a trait, with a serde-loadable linear artifact format
//! - Calendar-date horizons: one model step per calendar day
//! - A file artifact store that loads each instrument's model and scaler once
//!
//! ## Rollout
//!
//! For a horizon of `N` the engine calls the regressor exactly `N` times. The
//! first call sees the last `W` observed closes; every later call sees the
//! previous predictions appended in the scaled domain. The final scaled
//! prediction is mapped back to price units.
//!
//! ## Quick Start
//!
//! ```rust
//! use stock_forecast::normalizer::MinMaxScaler;
//! use stock_forecast::regressor::FnRegressor;
//! use stock_forecast::{ForecastConfig, ForecastEngine};
//!
//! let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
//! let scaler = MinMaxScaler::unit(90.0, 140.0)?;
//! let last_value = FnRegressor::new(|w: &[f64]| Ok(w[w.len() - 1]));
//!
//! let engine = ForecastEngine::new(ForecastConfig::new(25)?)?;
//! let price = engine.forecast(&closes, &scaler, &last_value, 3)?;
//! assert!((price - 129.0).abs() < 1e-9);
//! # Ok::<(), stock_forecast::ForecastError>(())
//! ```

pub mod artifacts;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod horizon;
pub mod normalizer;
pub mod regressor;
pub mod window;

// Re-export commonly used types
pub use crate::artifacts::{
    ArtifactProvider, FileArtifactStore, InMemoryArtifacts, InstrumentArtifacts,
};
pub use crate::config::{ForecastConfig, Instrument, InstrumentCatalog, DEFAULT_WINDOW_SIZE};
pub use crate::data::{LastCloseSummary, TimeSeries};
pub use crate::engine::{ForecastEngine, ForecastRequest, ForecastResult};
pub use crate::error::{ForecastError, ModelError, Result};
pub use crate::normalizer::Normalizer;
pub use crate::regressor::Regressor;
pub use crate::window::Window;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
