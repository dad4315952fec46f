// External imports
use log::{info, warn};
use ndarray::Array2;
use polars::prelude::*;

// Internal imports
use super::step_3_linear_regression::{OlsRegressor, Regressor};
use super::step_4_train_model::{LinearModel, TrainedModel};
use crate::constants::DATE_COLUMN;
use crate::error::{ExcursionError, Result};
use crate::util::pre_processor::{ensure_columns, float_values};

/// Name of the prediction column for a target
pub fn prediction_column(target: &str) -> String {
    format!("Predicted{}", target)
}

/// Predict both excursion targets for every supplied row
///
/// # Arguments
///
/// * `model` - Model returned by `train` or loaded from disk
/// * `rows` - Feature rows holding at least the model's four input columns
///
/// # Returns
///
/// One row per input row: the `Date` column when present, then one
/// `Predicted*` column per target. Rows with an undefined input get nulls.
pub fn predict(model: &LinearModel, rows: &DataFrame) -> Result<DataFrame> {
    predict_with(&OlsRegressor::default(), model, rows)
}

/// Predict with any regression capability
pub fn predict_with<R: Regressor>(
    regressor: &R,
    model: &TrainedModel<R::Model>,
    rows: &DataFrame,
) -> Result<DataFrame> {
    let inputs: Vec<&str> = model.feature_names.iter().map(|s| s.as_str()).collect();
    ensure_columns(rows, &inputs)?;

    let columns = inputs
        .iter()
        .map(|name| float_values(rows, name))
        .collect::<Result<Vec<_>>>()?;

    let mut complete = Vec::with_capacity(rows.height());
    let mut x_values = Vec::with_capacity(rows.height() * inputs.len());
    for row in 0..rows.height() {
        let values: Option<Vec<f64>> = columns
            .iter()
            .map(|column| column[row].filter(|v| v.is_finite()))
            .collect();
        if let Some(values) = values {
            complete.push(row);
            x_values.extend(values);
        }
    }

    let skipped = rows.height() - complete.len();
    if skipped > 0 {
        warn!("{} of {} rows have undefined inputs; predicting null", skipped, rows.height());
    }

    let x = Array2::from_shape_vec((complete.len(), inputs.len()), x_values)
        .map_err(|e| ExcursionError::Regression(e.to_string()))?;
    let y = if complete.is_empty() {
        Array2::<f64>::zeros((0, model.target_names.len()))
    } else {
        regressor.predict(&model.model, &x)?
    };

    if y.ncols() != model.target_names.len() {
        return Err(ExcursionError::Regression(format!(
            "model produced {} outputs for {} targets",
            y.ncols(),
            model.target_names.len()
        )));
    }

    let mut output: Vec<Column> = Vec::with_capacity(model.target_names.len() + 1);
    if let Ok(date) = rows.column(DATE_COLUMN) {
        output.push(date.clone());
    }
    for (t, target) in model.target_names.iter().enumerate() {
        let mut values: Vec<Option<f64>> = vec![None; rows.height()];
        for (i, &row) in complete.iter().enumerate() {
            values[row] = Some(y[[i, t]]);
        }
        output.push(Series::new(prediction_column(target).into(), values).into_column());
    }

    info!("Predicted {} of {} rows", complete.len(), rows.height());
    Ok(DataFrame::new(output)?)
}
