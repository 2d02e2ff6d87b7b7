//! Step through a rollout and show how predictions replace observed closes.

use stock_forecast::engine::forecast_path;
use stock_forecast::normalizer::StandardScaler;
use stock_forecast::regressor::FnRegressor;
use stock_forecast::{Normalizer, Window};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let closes: Vec<f64> = (0..30).map(|i| 4_500.0 + (i % 5) as f64 * 20.0).collect();
    let scaler = StandardScaler::new(4_540.0, 30.0)?;

    // Damped momentum on the two newest values
    let model = FnRegressor::new(|w: &[f64]| {
        let n = w.len();
        Ok(w[n - 1] + 0.5 * (w[n - 1] - w[n - 2]))
    });

    let window = Window::initial(&closes, 25)?;
    println!("Observed window tail: {:?}", &window.values()[20..]);
    println!(
        "Scaled tail:          {:?}",
        &scaler.forward(window.values())?[20..]
    );

    let path = forecast_path(&closes, &scaler, &model, 25, 10)?;
    for (step, value) in path.iter().enumerate() {
        println!(
            "step {:>2}: {:.2} ({} of 25 inputs predicted)",
            step + 1,
            value,
            step.min(25)
        );
    }

    Ok(())
}
