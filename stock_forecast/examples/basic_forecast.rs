use chrono::{Duration, NaiveDate};
use stock_forecast::normalizer::MinMaxScaler;
use stock_forecast::regressor::LinearRegressor;
use stock_forecast::{ForecastEngine, InstrumentArtifacts, TimeSeries};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Stock Forecast: Basic Forecasting Example");
    println!("=========================================\n");

    // Create sample data
    let series = create_sample_daily_data()?;
    let summary = series
        .last_close_summary()
        .ok_or("need at least two closes")?;
    println!(
        "Last close {}: {:.2} ({:+.2})\n",
        summary.date, summary.close, summary.change
    );

    // Artifacts normally come from a trained model; here a weighted average of the last 5 closes
    let mut weights = vec![0.0; 25];
    for (i, w) in weights.iter_mut().skip(20).enumerate() {
        *w = (i + 1) as f64 / 15.0;
    }
    let artifacts = InstrumentArtifacts::new(
        "DEMO",
        Arc::new(MinMaxScaler::unit(9_000.0, 10_000.0)?),
        Arc::new(LinearRegressor::new(weights, 0.002)?),
    );

    let engine = ForecastEngine::default();
    let last = series.last_date().ok_or("empty series")?;

    for days in [1, 3, 7, 14] {
        let target = last + Duration::days(days);
        let result = engine.forecast_for_date(&series, &artifacts, target)?;
        println!(
            "  {} ({:>2} steps): {:.2}",
            target, result.horizon, result.value
        );
    }

    Ok(())
}

fn create_sample_daily_data() -> Result<TimeSeries, Box<dyn std::error::Error>> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?;
    let dates = (0..60).map(|i| start + Duration::days(i)).collect();
    let values = (0..60)
        .map(|i| 9_400.0 + (i as f64 * 0.3).sin() * 120.0 + i as f64 * 2.0)
        .collect();
    Ok(TimeSeries::new(dates, values)?)
}
