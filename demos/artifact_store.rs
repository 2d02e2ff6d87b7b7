//! Write artifacts for one instrument, load them through the store and forecast.

use std::fs;
use stock_forecast::{
    ArtifactProvider, FileArtifactStore, ForecastEngine, InstrumentCatalog, TimeSeries,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;

    fs::write(
        dir.path().join("TLKM.JK_scaler.json"),
        r#"{"kind": "min_max", "data_min": 2800.0, "data_max": 4200.0}"#,
    )?;
    let model = serde_json::json!({
        "kind": "linear",
        "weights": vec![1.0 / 25.0; 25],
        "bias": 0.0,
    });
    fs::write(dir.path().join("TLKM.JK_model.json"), model.to_string())?;

    let mut csv = String::from("Date,Close\n");
    for day in 1..=31 {
        csv.push_str(&format!("2024-01-{:02},{}\n", day, 3_900 - day * 10));
    }
    let series = TimeSeries::from_reader(csv.as_bytes())?;

    let store = FileArtifactStore::new(InstrumentCatalog::blue_chips(dir.path()));
    let artifacts = store.artifacts("TLKM")?;

    let result = ForecastEngine::default().forecast_next(&series, &artifacts)?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
