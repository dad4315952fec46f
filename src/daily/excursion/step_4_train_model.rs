// External imports
use log::{info, warn};
use ndarray::Array2;
use polars::prelude::DataFrame;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

// Internal imports
use super::step_2_feature_engine::FeatureColumns;
use super::step_3_linear_regression::{r2_score, LinearFit, OlsRegressor, Regressor};
use crate::constants::{DEFAULT_LOOKBACK, DEFAULT_LOOKFORWARD, SPLIT_SEED, TEST_SPLIT_RATIO};
use crate::error::{ExcursionError, Result};
use crate::util::pre_processor::{ensure_columns, float_values};

/// Training configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictorConfig {
    pub lookback: usize,
    pub lookforward: usize,
    /// Share of complete rows held out for scoring
    pub test_ratio: f64,
    pub seed: u64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            lookback: DEFAULT_LOOKBACK,
            lookforward: DEFAULT_LOOKFORWARD,
            test_ratio: TEST_SPLIT_RATIO,
            seed: SPLIT_SEED,
        }
    }
}

impl PredictorConfig {
    pub fn columns(&self) -> FeatureColumns {
        FeatureColumns::new(self.lookback, self.lookforward)
    }
}

/// A fitted mapping plus its held-out score and the schema it was fitted on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel<M> {
    pub model: M,
    /// R² on the held-out subset
    pub score: f64,
    pub feature_names: Vec<String>,
    pub target_names: Vec<String>,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Rows dropped before splitting because an input or target was undefined
    pub excluded_rows: usize,
}

/// The production model type
pub type LinearModel = TrainedModel<LinearFit>;

/// Complete rows pulled out of a feature frame
pub(crate) struct Matrices {
    pub x: Array2<f64>,
    pub y: Array2<f64>,
    pub excluded: usize,
}

/// Collects rows where every named column holds a finite value
pub(crate) fn complete_rows(df: &DataFrame, inputs: &[&str], targets: &[&str]) -> Result<Matrices> {
    let mut required: Vec<&str> = inputs.to_vec();
    required.extend_from_slice(targets);
    ensure_columns(df, &required)?;

    let columns = required
        .iter()
        .map(|name| float_values(df, name))
        .collect::<Result<Vec<_>>>()?;

    let mut x_values = Vec::new();
    let mut y_values = Vec::new();
    let mut excluded = 0;

    for row in 0..df.height() {
        let values: Option<Vec<f64>> = columns
            .iter()
            .map(|column| column[row].filter(|v| v.is_finite()))
            .collect();
        match values {
            Some(values) => {
                x_values.extend_from_slice(&values[..inputs.len()]);
                y_values.extend_from_slice(&values[inputs.len()..]);
            }
            None => excluded += 1,
        }
    }

    let n = df.height() - excluded;
    let x = Array2::from_shape_vec((n, inputs.len()), x_values)
        .map_err(|e| ExcursionError::Regression(e.to_string()))?;
    let y = Array2::from_shape_vec((n, targets.len()), y_values)
        .map_err(|e| ExcursionError::Regression(e.to_string()))?;

    Ok(Matrices { x, y, excluded })
}

/// Shuffled train/test split of `n` row indices
///
/// The test subset takes the first `ceil(n * test_ratio)` indices of a
/// permutation drawn from `StdRng::seed_from_u64(seed)`.
pub fn split_indices(n: usize, test_ratio: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(ExcursionError::InvalidParameter(format!(
            "test ratio must be in (0, 1), got {}",
            test_ratio
        )));
    }

    let n_test = (n as f64 * test_ratio).ceil() as usize;
    if n < 2 || n_test >= n {
        return Err(ExcursionError::InsufficientData { needed: 2, got: n });
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok((train, indices))
}

/// Train the linear excursion model on a feature frame
///
/// # Arguments
///
/// * `features` - Frame produced by the feature engine, or re-read from disk
/// * `config` - Window sizes naming the columns, split ratio and seed
///
/// # Returns
///
/// The fitted model; `score` is R² on the held-out rows
pub fn train(features: &DataFrame, config: &PredictorConfig) -> Result<LinearModel> {
    train_with(&OlsRegressor::default(), features, config)
}

/// Train with any regression capability
pub fn train_with<R: Regressor>(
    regressor: &R,
    features: &DataFrame,
    config: &PredictorConfig,
) -> Result<TrainedModel<R::Model>> {
    let names = config.columns();
    let inputs = names.inputs();
    let targets = names.targets();

    info!("Selecting inputs {:?} and targets {:?}", inputs, targets);
    let matrices = complete_rows(features, &inputs, &targets)?;

    if matrices.excluded > 0 {
        warn!(
            "Excluded {} of {} rows with undefined inputs or targets",
            matrices.excluded,
            features.height()
        );
    }
    if matrices.x.nrows() == 0 {
        return Err(ExcursionError::IncompleteRows {
            total: features.height(),
        });
    }

    info!("Splitting {} complete rows into training and test sets", matrices.x.nrows());
    let (train_idx, test_idx) = split_indices(matrices.x.nrows(), config.test_ratio, config.seed)?;

    let x_train = matrices.x.select(ndarray::Axis(0), &train_idx);
    let y_train = matrices.y.select(ndarray::Axis(0), &train_idx);
    let x_test = matrices.x.select(ndarray::Axis(0), &test_idx);
    let y_test = matrices.y.select(ndarray::Axis(0), &test_idx);

    info!("Fitting on {} rows", x_train.nrows());
    let model = regressor.fit(&x_train, &y_train)?;

    let predictions = regressor.predict(&model, &x_test)?;
    let score = r2_score(&y_test, &predictions);
    info!("Held-out R^2 on {} rows: {:.4}", x_test.nrows(), score);

    Ok(TrainedModel {
        model,
        score,
        feature_names: inputs.iter().map(|s| s.to_string()).collect(),
        target_names: targets.iter().map(|s| s.to_string()).collect(),
        train_rows: x_train.nrows(),
        test_rows: x_test.nrows(),
        excluded_rows: matrices.excluded,
    })
}
