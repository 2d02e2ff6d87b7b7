//! # stock-predict
//!
//! Command-line front end for `stock_forecast`: loads a close-price CSV and an
//! instrument's artifacts, then prints the forecast for a calendar date.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use stock_forecast::{
    ArtifactProvider, FileArtifactStore, ForecastConfig, ForecastEngine, ForecastError,
    ForecastResult, InstrumentCatalog, LastCloseSummary, TimeSeries,
};
use tracing::debug;

/// Closes shown before the forecast
const RECENT_CLOSES: usize = 5;

#[derive(Parser)]
#[command(name = "stock-predict")]
#[command(about = "Iterative closing-price forecasts", long_about = None)]
struct Cli {
    /// Instrument catalog (JSON); defaults to the built-in blue chips
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Artifacts directory used with the built-in catalog
    #[arg(long, global = true, default_value = "artifacts")]
    artifacts_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast the close of one instrument
    Predict {
        /// Instrument key or ticker, e.g. BBCA
        #[arg(short, long)]
        instrument: String,

        /// CSV file with date and close columns
        #[arg(short, long)]
        data: PathBuf,

        /// Target date (YYYY-MM-DD); defaults to the day after the last close
        #[arg(short, long)]
        target: Option<NaiveDate>,

        /// Window length the model was trained with
        #[arg(short, long)]
        window_size: Option<usize>,

        /// Engine config file (JSON)
        #[arg(long, conflicts_with = "window_size")]
        config: Option<PathBuf>,

        /// Also print the prediction of every intermediate day
        #[arg(long)]
        path: bool,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List catalogued instruments
    List,
}

/// Everything handed to the presentation layer for one forecast
#[derive(Debug, Serialize)]
struct Report {
    instrument: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_close: Option<LastCloseSummary>,
    recent_closes: Vec<f64>,
    forecast: ForecastResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<Vec<f64>>,
}

fn load_catalog(cli: &Cli) -> stock_forecast::Result<InstrumentCatalog> {
    match &cli.catalog {
        Some(path) => InstrumentCatalog::from_json_file(path),
        None => Ok(InstrumentCatalog::blue_chips(cli.artifacts_dir.clone())),
    }
}

fn engine_config(
    window_size: Option<usize>,
    config: Option<&Path>,
) -> stock_forecast::Result<ForecastConfig> {
    match (window_size, config) {
        (Some(size), _) => ForecastConfig::new(size),
        (None, Some(path)) => ForecastConfig::from_json_file(path),
        (None, None) => Ok(ForecastConfig::default()),
    }
}

fn predict(
    catalog: InstrumentCatalog,
    instrument: &str,
    data: &Path,
    target: Option<NaiveDate>,
    config: ForecastConfig,
    with_path: bool,
) -> stock_forecast::Result<Report> {
    let store = FileArtifactStore::new(catalog);
    let artifacts = store.artifacts(instrument)?;
    let series = TimeSeries::from_csv(data)?;
    debug!(observations = series.len(), "series loaded");

    let engine = ForecastEngine::new(config)?;
    let forecast = match target {
        Some(date) => engine.forecast_for_date(&series, &artifacts, date)?,
        None => engine.forecast_next(&series, &artifacts)?,
    };

    let path = if with_path {
        Some(engine.forecast_path(
            series.values(),
            artifacts.normalizer(),
            artifacts.regressor(),
            forecast.horizon,
        )?)
    } else {
        None
    };

    Ok(Report {
        instrument: artifacts.instrument().to_string(),
        last_close: series.last_close_summary(),
        recent_closes: series.tail(RECENT_CLOSES).to_vec(),
        forecast,
        path,
    })
}

fn render_text(report: &Report) -> String {
    let mut lines = Vec::new();

    if let Some(last) = &report.last_close {
        lines.push(format!(
            "{} last close ({}): {:.2} ({:+.2})",
            report.instrument, last.date, last.close, last.change
        ));
    }

    if !report.recent_closes.is_empty() {
        let closes: Vec<String> = report
            .recent_closes
            .iter()
            .map(|c| format!("{:.2}", c))
            .collect();
        lines.push(format!("Recent closes: {}", closes.join(", ")));
    }

    let when = report
        .forecast
        .target_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| format!("+{} steps", report.forecast.horizon));
    lines.push(format!(
        "Predicted close for {} on {}: {:.2} ({} step{})",
        report.instrument,
        when,
        report.forecast.value,
        report.forecast.horizon,
        if report.forecast.horizon == 1 { "" } else { "s" }
    ));

    if let Some(path) = &report.path {
        for (i, value) in path.iter().enumerate() {
            lines.push(format!("  step {:>3}: {:.2}", i + 1, value));
        }
    }

    lines.join("\n")
}

fn run(cli: Cli) -> stock_forecast::Result<()> {
    let catalog = load_catalog(&cli)?;

    match cli.command {
        Commands::List => {
            for instrument in &catalog.instruments {
                println!(
                    "{:<8} {:<10} {}",
                    instrument.key,
                    instrument.ticker,
                    instrument.model_path(&catalog.artifacts_dir).display()
                );
            }
        }
        Commands::Predict {
            instrument,
            data,
            target,
            window_size,
            config,
            path,
            json,
        } => {
            let config = engine_config(window_size, config.as_deref())?;
            let report = predict(catalog, &instrument, &data, target, config, path)?;
            if json {
                let text = serde_json::to_string_pretty(&report)
                    .map_err(|e| ForecastError::DataError(e.to_string()))?;
                println!("{}", text);
            } else {
                println!("{}", render_text(&report));
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_user_input() => {
            eprintln!("warning: {}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::fs;
    use tempfile::TempDir;

    fn report(path: Option<Vec<f64>>) -> Report {
        let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        Report {
            instrument: "BBCA".to_string(),
            last_close: Some(LastCloseSummary {
                date: day,
                close: 9625.0,
                previous_close: 9650.0,
                change: -25.0,
            }),
            recent_closes: vec![9575.0, 9650.0, 9625.0],
            forecast: ForecastResult {
                value: 9631.25,
                horizon: 2,
                target_date: NaiveDate::from_ymd_opt(2024, 1, 12),
            },
            path,
        }
    }

    #[test]
    fn parses_predict_arguments() {
        let cli = Cli::try_parse_from([
            "stock-predict",
            "predict",
            "-i",
            "BBCA",
            "-d",
            "closes.csv",
            "--target",
            "2024-01-15",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Predict {
                instrument,
                target,
                json,
                window_size,
                ..
            } => {
                assert_eq!(instrument, "BBCA");
                assert_eq!(target, NaiveDate::from_ymd_opt(2024, 1, 15));
                assert!(json);
                assert_eq!(window_size, None);
            }
            Commands::List => panic!("expected predict"),
        }
        assert_eq!(cli.artifacts_dir, PathBuf::from("artifacts"));
    }

    #[test]
    fn window_size_and_config_conflict() {
        let parsed = Cli::try_parse_from([
            "stock-predict",
            "predict",
            "-i",
            "BBCA",
            "-d",
            "closes.csv",
            "-w",
            "30",
            "--config",
            "engine.json",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn renders_summary_and_forecast() {
        let text = render_text(&report(None));
        assert!(text.contains("BBCA last close (2024-01-10): 9625.00 (-25.00)"));
        assert!(text.contains("Recent closes: 9575.00, 9650.00, 9625.00"));
        assert!(text.contains("Predicted close for BBCA on 2024-01-12: 9631.25 (2 steps)"));
    }

    #[test]
    fn renders_every_step_of_the_path() {
        let text = render_text(&report(Some(vec![9630.0, 9631.25])));
        assert!(text.contains("step   1: 9630.00"));
        assert!(text.contains("step   2: 9631.25"));
    }

    // Persistence model over 40 closes 9000, 9010, .., 9390 ending 2024-01-10
    fn write_fixture(dir: &Path) -> PathBuf {
        fs::write(
            dir.join("BBCA.JK_scaler.json"),
            r#"{"kind": "min_max", "data_min": 8000.0, "data_max": 10000.0}"#,
        )
        .unwrap();
        let mut weights = vec![0.0; 25];
        weights[24] = 1.0;
        let model = serde_json::json!({ "kind": "linear", "weights": weights, "bias": 0.0 });
        fs::write(dir.join("BBCA.JK_model.json"), model.to_string()).unwrap();

        let last = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let mut csv = String::from("Date,Close\n");
        for i in 0..40u64 {
            let day = last.checked_sub_days(chrono::Days::new(39 - i)).unwrap();
            csv.push_str(&format!("{},{}\n", day, 9000 + 10 * i));
        }
        let data = dir.join("BBCA.JK.csv");
        fs::write(&data, csv).unwrap();
        data
    }

    #[test]
    fn predict_runs_against_artifacts_dir() {
        let dir = TempDir::new().unwrap();
        let data = write_fixture(dir.path());
        let catalog = InstrumentCatalog::blue_chips(dir.path());
        let target = NaiveDate::from_ymd_opt(2024, 1, 13);

        let report = predict(
            catalog,
            "bbca",
            &data,
            target,
            ForecastConfig::default(),
            true,
        )
        .unwrap();

        assert_eq!(report.instrument, "BBCA");
        assert_eq!(report.forecast.horizon, 3);
        assert_eq!(report.forecast.target_date, target);
        assert_relative_eq!(report.forecast.value, 9390.0, epsilon = 1e-6);
        assert_eq!(report.recent_closes, vec![9350.0, 9360.0, 9370.0, 9380.0, 9390.0]);

        let path = report.path.unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.last().copied(), Some(report.forecast.value));
    }

    #[test]
    fn predict_without_path_defaults_to_next_day() {
        let dir = TempDir::new().unwrap();
        let data = write_fixture(dir.path());
        let catalog = InstrumentCatalog::blue_chips(dir.path());

        let report = predict(catalog, "BBCA.JK", &data, None, ForecastConfig::default(), false)
            .unwrap();

        assert_eq!(report.forecast.horizon, 1);
        assert_eq!(report.forecast.target_date, NaiveDate::from_ymd_opt(2024, 1, 11));
        assert!(report.path.is_none());
    }

    #[test]
    fn default_engine_config() {
        assert_eq!(engine_config(None, None).unwrap().window_size, 25);
        assert_eq!(engine_config(Some(10), None).unwrap().window_size, 10);
        assert!(engine_config(Some(0), None).is_err());
    }
}
