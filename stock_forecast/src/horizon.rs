//! Conversion of a calendar target date into a rollout step count
//!
//! The horizon counts calendar days, weekends and holidays included, and each
//! day is one model step. A target three days after a Friday close is three
//! rollouts even though only one trading session lies in between.

use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};

/// Number of rollout steps from `last_known` to `target`
pub fn resolve(last_known: NaiveDate, target: NaiveDate) -> Result<usize> {
    let days = target.signed_duration_since(last_known).num_days();

    match days {
        d if d < 0 => Err(ForecastError::TargetBeforeHistory { last_known, target }),
        0 => Err(ForecastError::TargetIsLastKnownDate(target)),
        d => usize::try_from(d).map_err(|_| {
            ForecastError::InvalidParameter(format!("Horizon of {} days is too large", d))
        }),
    }
}

/// Earliest date that can be forecast: the day after the last observation
pub fn default_target(last_known: NaiveDate) -> Result<NaiveDate> {
    last_known.checked_add_days(Days::new(1)).ok_or_else(|| {
        ForecastError::InvalidParameter(format!("No calendar day follows {}", last_known))
    })
}
