//! Regression capability behind a minimal fit/predict interface
//!
//! `OlsRegressor` solves the normal equations `(X'X) B = X'Y` for every
//! target column at once, with an intercept row prepended to `B`.

// External crates
use ndarray::{concatenate, Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

// Internal modules
use crate::error::{ExcursionError, Result};

/// Diagonal jitter added to `X'X` before solving
const RIDGE_JITTER: f64 = 1e-10;
const PIVOT_TOLERANCE: f64 = 1e-14;

/// Anything that can fit a multi-output mapping `X -> Y` and apply it
pub trait Regressor {
    type Model;

    /// Fit on `x` (`n_samples x n_features`) and `y` (`n_samples x n_targets`)
    fn fit(&self, x: &Array2<f64>, y: &Array2<f64>) -> Result<Self::Model>;

    /// Apply a fitted model, returning `n_samples x n_targets`
    fn predict(&self, model: &Self::Model, x: &Array2<f64>) -> Result<Array2<f64>>;
}

/// Fitted linear coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    /// `coefficients[target][feature]`
    pub coefficients: Vec<Vec<f64>>,
    /// One intercept per target
    pub intercepts: Vec<f64>,
}

impl LinearFit {
    pub fn n_features(&self) -> usize {
        self.coefficients.first().map_or(0, |row| row.len())
    }

    pub fn n_targets(&self) -> usize {
        self.intercepts.len()
    }

    /// `x . W' + b`
    pub fn apply(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.n_features() {
            return Err(ExcursionError::Regression(format!(
                "expected {} features, got {}",
                self.n_features(),
                x.ncols()
            )));
        }

        let mut out = Array2::<f64>::zeros((x.nrows(), self.n_targets()));
        for (t, (weights, intercept)) in self
            .coefficients
            .iter()
            .zip(self.intercepts.iter())
            .enumerate()
        {
            let w = Array1::from(weights.clone());
            let column = x.dot(&w) + *intercept;
            out.column_mut(t).assign(&column);
        }
        Ok(out)
    }
}

/// Ordinary least squares
#[derive(Debug, Clone, Copy)]
pub struct OlsRegressor {
    pub fit_intercept: bool,
}

impl Default for OlsRegressor {
    fn default() -> Self {
        Self {
            fit_intercept: true,
        }
    }
}

impl Regressor for OlsRegressor {
    type Model = LinearFit;

    fn fit(&self, x: &Array2<f64>, y: &Array2<f64>) -> Result<LinearFit> {
        if x.nrows() != y.nrows() {
            return Err(ExcursionError::Regression(format!(
                "{} feature rows but {} target rows",
                x.nrows(),
                y.nrows()
            )));
        }
        if x.nrows() == 0 {
            return Err(ExcursionError::InsufficientData { needed: 1, got: 0 });
        }

        let design = if self.fit_intercept {
            let ones = Array2::<f64>::ones((x.nrows(), 1));
            concatenate(Axis(1), &[ones.view(), x.view()])
                .map_err(|e| ExcursionError::Regression(e.to_string()))?
        } else {
            x.to_owned()
        };

        let mut xtx = design.t().dot(&design);
        for i in 0..xtx.nrows() {
            xtx[[i, i]] += RIDGE_JITTER;
        }
        let xty = design.t().dot(y);

        let beta = solve_linear_system(xtx, xty)?;

        let offset = usize::from(self.fit_intercept);
        let mut coefficients = Vec::with_capacity(y.ncols());
        let mut intercepts = Vec::with_capacity(y.ncols());
        for t in 0..y.ncols() {
            let column = beta.column(t);
            intercepts.push(if self.fit_intercept { column[0] } else { 0.0 });
            coefficients.push(column.iter().skip(offset).copied().collect());
        }

        Ok(LinearFit {
            coefficients,
            intercepts,
        })
    }

    fn predict(&self, model: &LinearFit, x: &Array2<f64>) -> Result<Array2<f64>> {
        model.apply(x)
    }
}

/// Gaussian elimination with partial pivoting, solving `a . X = b` for all columns of `b`
fn solve_linear_system(mut a: Array2<f64>, mut b: Array2<f64>) -> Result<Array2<f64>> {
    let n = a.nrows();

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))
            .unwrap_or(col);

        if a[[pivot_row, col]].abs() < PIVOT_TOLERANCE {
            return Err(ExcursionError::Regression(
                "normal equations are singular".into(),
            ));
        }

        if pivot_row != col {
            for k in 0..n {
                a.swap([col, k], [pivot_row, k]);
            }
            for k in 0..b.ncols() {
                b.swap([col, k], [pivot_row, k]);
            }
        }

        for row in (col + 1)..n {
            let factor = a[[row, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[[row, k]] -= factor * a[[col, k]];
            }
            for k in 0..b.ncols() {
                b[[row, k]] -= factor * b[[col, k]];
            }
        }
    }

    // Back substitution
    let mut x = Array2::<f64>::zeros((n, b.ncols()));
    for k in 0..b.ncols() {
        for i in (0..n).rev() {
            let mut sum = b[[i, k]];
            for j in (i + 1)..n {
                sum -= a[[i, j]] * x[[j, k]];
            }
            x[[i, k]] = sum / a[[i, i]];
        }
    }

    Ok(x)
}

/// Coefficient of determination, averaged uniformly over target columns
///
/// A constant target column scores 1.0 when predicted exactly and 0.0 otherwise.
pub fn r2_score(y_true: &Array2<f64>, y_pred: &Array2<f64>) -> f64 {
    if y_true.ncols() == 0 || y_true.nrows() == 0 {
        return 0.0;
    }

    let mut total = 0.0;
    for t in 0..y_true.ncols() {
        let truth = y_true.column(t);
        let pred = y_pred.column(t);
        let mean = truth.mean().unwrap_or(0.0);

        let ss_res: f64 = truth
            .iter()
            .zip(pred.iter())
            .map(|(y, p)| (y - p).powi(2))
            .sum();
        let ss_tot: f64 = truth.iter().map(|y| (y - mean).powi(2)).sum();

        total += if ss_tot == 0.0 {
            if ss_res == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - ss_res / ss_tot
        };
    }

    total / y_true.ncols() as f64
}
