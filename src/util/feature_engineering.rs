// External crates
use chrono::NaiveDateTime;
use log::warn;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

// Internal modules
use crate::error::{ExcursionError, Result};

/// Which extreme a window statistic tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Max,
    Min,
}

impl Extreme {
    /// Strict comparison, so ties keep the earliest occurrence
    fn beats(self, candidate: f64, current: f64) -> bool {
        match self {
            Extreme::Max => candidate > current,
            Extreme::Min => candidate < current,
        }
    }
}

/// What to do when a percentage difference would divide by zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DenominatorPolicy {
    /// Return `ExcursionError::DegenerateDenominator`
    #[default]
    Fail,
    /// Record the cell as null and keep going
    Null,
}

fn fixed_window(window: usize) -> RollingOptionsFixedWindow {
    RollingOptionsFixedWindow {
        window_size: window,
        min_periods: window,
        center: false,
        weights: None,
        fn_params: None,
    }
}

/// Trailing window extreme over `window` rows ending at each row (inclusive)
///
/// Rows without a full window are null. A series shorter than the window is all null.
pub fn rolling_extreme(series: &Series, window: usize, extreme: Extreme) -> PolarsResult<Series> {
    let series = series.cast(&DataType::Float64)?;

    if series.len() < window {
        return Ok(Series::full_null(
            series.name().clone(),
            series.len(),
            &DataType::Float64,
        ));
    }

    match extreme {
        Extreme::Max => series.rolling_max(fixed_window(window)),
        Extreme::Min => series.rolling_min(fixed_window(window)),
    }
}

/// Extreme over the `window` rows strictly after each row
///
/// The trailing extreme at row `t + window` covers rows `t+1 ..= t+window`,
/// so the trailing result is shifted back by `window`. The last `window`
/// rows are null.
pub fn forward_extreme(series: &Series, window: usize, extreme: Extreme) -> PolarsResult<Series> {
    let trailing = rolling_extreme(series, window, extreme)?;
    Ok(trailing.shift(-(window as i64)))
}

/// Whole days between each row and the expanding extreme seen so far
///
/// The window grows from the first row, unlike `rolling_extreme`.
pub fn expanding_days_since(
    series: &Series,
    dates: &[NaiveDateTime],
    extreme: Extreme,
) -> PolarsResult<Series> {
    let values = series.cast(&DataType::Float64)?;
    let values = values.f64()?;

    if values.len() != dates.len() {
        return Err(PolarsError::ShapeMismatch(
            format!(
                "{} values but {} dates for expanding window",
                values.len(),
                dates.len()
            )
            .into(),
        ));
    }

    let mut best: Option<(f64, NaiveDateTime)> = None;
    let mut days = Vec::with_capacity(values.len());

    for (value, date) in values.into_iter().zip(dates.iter()) {
        if let Some(v) = value {
            match best {
                Some((current, _)) if !extreme.beats(v, current) => {}
                _ => best = Some((v, *date)),
            }
        }
        days.push(best.map(|(_, at)| (*date - at).num_days()));
    }

    Ok(Series::new(series.name().clone(), days))
}

/// `(close - reference) / reference * 100`, null wherever either side is null
///
/// # Arguments
///
/// * `name` - Name of the output column, also used in error reports
/// * `close` - Closing prices
/// * `reference` - Denominator series (window extreme)
/// * `policy` - Handling of zero denominators
pub fn pct_diff(
    name: &str,
    close: &Series,
    reference: &Series,
    policy: DenominatorPolicy,
) -> Result<Series> {
    let close = close.cast(&DataType::Float64)?;
    let reference = reference.cast(&DataType::Float64)?;

    let mut out = Vec::with_capacity(close.len());
    let mut degenerate = 0usize;

    for (row, (c, r)) in close
        .f64()?
        .into_iter()
        .zip(reference.f64()?.into_iter())
        .enumerate()
    {
        let value = match (c, r) {
            (Some(_), Some(r)) if r == 0.0 => match policy {
                DenominatorPolicy::Fail => {
                    return Err(ExcursionError::DegenerateDenominator {
                        column: name.to_string(),
                        row,
                    })
                }
                DenominatorPolicy::Null => {
                    degenerate += 1;
                    None
                }
            },
            (Some(c), Some(r)) => Some((c - r) / r * 100.0),
            _ => None,
        };
        out.push(value);
    }

    if degenerate > 0 {
        warn!("{}: {} degenerate denominators recorded as null", name, degenerate);
    }

    Ok(Series::new(name.into(), out))
}
