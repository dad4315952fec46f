// External crates
use chrono::{DateTime, NaiveDateTime, Utc};
use log::debug;
use polars::prelude::*;

// Internal modules
use crate::constants::{DATE_COLUMN, DATE_FORMAT, PRICE_COLUMNS};
use crate::daily::excursion::step_1_price_fetch::PricePoint;
use crate::error::{ExcursionError, ProviderError, Result};

/// Builds the uniform price frame from raw provider observations
///
/// Rows are sorted by timestamp and every price column (`Open`, `High`,
/// `Low`, `Close`) is filled from the single reported price.
///
/// # Arguments
///
/// * `points` - Observations as reported by the provider, in any order
///
/// # Returns
///
/// A DataFrame with a string `Date` column followed by the four Float64 price columns
pub fn build_price_frame(points: &[PricePoint]) -> Result<DataFrame> {
    let mut sorted = points.to_vec();
    sorted.sort_by_key(|point| point.timestamp_ms);

    let mut dates = Vec::with_capacity(sorted.len());
    let mut prices = Vec::with_capacity(sorted.len());

    for (i, point) in sorted.iter().enumerate() {
        if i > 0 && sorted[i - 1].timestamp_ms == point.timestamp_ms {
            return Err(ProviderError::Contract(format!(
                "duplicate timestamp {} ms",
                point.timestamp_ms
            ))
            .into());
        }
        if !point.price.is_finite() {
            return Err(ProviderError::Contract(format!(
                "non-finite price at {} ms",
                point.timestamp_ms
            ))
            .into());
        }
        let date = DateTime::<Utc>::from_timestamp_millis(point.timestamp_ms).ok_or_else(|| {
            ProviderError::Contract(format!("timestamp {} ms out of range", point.timestamp_ms))
        })?;
        dates.push(date.naive_utc().format(DATE_FORMAT).to_string());
        prices.push(point.price);
    }

    let mut columns: Vec<Column> = vec![Series::new(DATE_COLUMN.into(), dates).into_column()];
    for name in PRICE_COLUMNS {
        columns.push(Series::new(name.into(), prices.clone()).into_column());
    }

    let df = DataFrame::new(columns)?;
    debug!("Built price frame with {} rows", df.height());
    Ok(df)
}

/// Fails with a schema mismatch naming every required column the frame lacks
pub fn ensure_columns(df: &DataFrame, required: &[&str]) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| df.column(name).is_err())
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ExcursionError::SchemaMismatch { missing })
    }
}

/// Reads a numeric column as Float64 values, nulls preserved
pub fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = df
        .column(name)
        .map_err(|_| ExcursionError::SchemaMismatch {
            missing: vec![name.to_string()],
        })?
        .as_materialized_series()
        .cast(&DataType::Float64)
        .map_err(|_| ExcursionError::SchemaMismatch {
            missing: vec![name.to_string()],
        })?;

    Ok(series.f64()?.into_iter().collect())
}

/// Parses the `Date` column and checks the series ordering invariant
///
/// # Returns
///
/// One timestamp per row, guaranteed strictly increasing
pub fn parse_dates(df: &DataFrame) -> Result<Vec<NaiveDateTime>> {
    ensure_columns(df, &[DATE_COLUMN])?;
    let date_col = df.column(DATE_COLUMN)?.str()?;

    let mut dates = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let raw = date_col
            .get(i)
            .ok_or_else(|| ExcursionError::InvalidSeries(format!("missing date at row {}", i)))?;
        let date = NaiveDateTime::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
            ExcursionError::InvalidSeries(format!("unparseable date '{}' at row {}: {}", raw, i, e))
        })?;
        if let Some(prev) = dates.last() {
            if *prev >= date {
                return Err(ExcursionError::InvalidSeries(format!(
                    "dates not strictly increasing at row {}",
                    i
                )));
            }
        }
        dates.push(date);
    }

    Ok(dates)
}
