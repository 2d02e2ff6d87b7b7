//! # Blue Stock
//!
//! Workspace entry point re-exporting the `stock_forecast` library.
//!
//! ## Example
//!
//! ```
//! use blue_stock_workspace::prelude::*;
//!
//! let catalog = InstrumentCatalog::blue_chips("artifacts");
//! assert_eq!(catalog.keys(), vec!["BBCA", "BBRI", "TLKM", "BMRI", "ASII"]);
//! assert_eq!(ForecastEngine::default().window_size(), DEFAULT_WINDOW_SIZE);
//! ```

pub use stock_forecast as forecast;

/// The types most callers need
pub mod prelude {
    pub use stock_forecast::{
        ArtifactProvider, FileArtifactStore, ForecastConfig, ForecastEngine, ForecastError,
        ForecastResult, InstrumentArtifacts, InstrumentCatalog, Normalizer, Regressor,
        TimeSeries, DEFAULT_WINDOW_SIZE,
    };
}
