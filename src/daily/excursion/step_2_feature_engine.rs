// External crates
use log::info;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

// Internal modules
use crate::constants::{DATE_COLUMN, DEFAULT_LOOKBACK, DEFAULT_LOOKFORWARD};
use crate::error::{ExcursionError, Result};
use crate::util::feature_engineering::{
    expanding_days_since, forward_extreme, pct_diff, rolling_extreme, Extreme,
};
use crate::util::pre_processor::{ensure_columns, parse_dates};

pub use crate::util::feature_engineering::DenominatorPolicy;

/// Window sizes and zero-denominator handling for the feature engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Trailing rows, current row included
    pub lookback: usize,
    /// Rows strictly after the current row
    pub lookforward: usize,
    #[serde(default)]
    pub denominator_policy: DenominatorPolicy,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKBACK, DEFAULT_LOOKFORWARD)
    }
}

impl FeatureConfig {
    pub fn new(lookback: usize, lookforward: usize) -> Self {
        Self {
            lookback,
            lookforward,
            denominator_policy: DenominatorPolicy::Fail,
        }
    }

    pub fn with_denominator_policy(mut self, policy: DenominatorPolicy) -> Self {
        self.denominator_policy = policy;
        self
    }

    pub fn columns(&self) -> FeatureColumns {
        FeatureColumns::new(self.lookback, self.lookforward)
    }

    fn validate(&self) -> Result<()> {
        if self.lookback == 0 {
            return Err(ExcursionError::InvalidParameter(
                "lookback window must be at least 1".into(),
            ));
        }
        if self.lookforward == 0 {
            return Err(ExcursionError::InvalidParameter(
                "lookforward window must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Output column names with the window sizes substituted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureColumns {
    pub high_last: String,
    pub days_since_high_last: String,
    pub pct_diff_high_last: String,
    pub low_last: String,
    pub days_since_low_last: String,
    pub pct_diff_low_last: String,
    pub high_next: String,
    pub pct_diff_high_next: String,
    pub low_next: String,
    pub pct_diff_low_next: String,
}

impl FeatureColumns {
    pub fn new(lookback: usize, lookforward: usize) -> Self {
        Self {
            high_last: format!("HighLast{}", lookback),
            days_since_high_last: format!("DaysSinceHighLast{}", lookback),
            pct_diff_high_last: format!("PctDiffHighLast{}", lookback),
            low_last: format!("LowLast{}", lookback),
            days_since_low_last: format!("DaysSinceLowLast{}", lookback),
            pct_diff_low_last: format!("PctDiffLowLast{}", lookback),
            high_next: format!("HighNext{}", lookforward),
            pct_diff_high_next: format!("PctDiffHighNext{}", lookforward),
            low_next: format!("LowNext{}", lookforward),
            pct_diff_low_next: format!("PctDiffLowNext{}", lookforward),
        }
    }

    /// All derived columns in output order
    pub fn all(&self) -> [&str; 10] {
        [
            self.high_last.as_str(),
            self.days_since_high_last.as_str(),
            self.pct_diff_high_last.as_str(),
            self.low_last.as_str(),
            self.days_since_low_last.as_str(),
            self.pct_diff_low_last.as_str(),
            self.high_next.as_str(),
            self.pct_diff_high_next.as_str(),
            self.low_next.as_str(),
            self.pct_diff_low_next.as_str(),
        ]
    }

    /// The four backward-looking predictor inputs
    pub fn inputs(&self) -> [&str; 4] {
        [
            self.days_since_high_last.as_str(),
            self.pct_diff_high_last.as_str(),
            self.days_since_low_last.as_str(),
            self.pct_diff_low_last.as_str(),
        ]
    }

    /// The two forward-looking predictor targets
    pub fn targets(&self) -> [&str; 2] {
        [self.pct_diff_high_next.as_str(), self.pct_diff_low_next.as_str()]
    }
}

/// Adds the lookback/lookahead excursion features to a price frame
///
/// The frame must hold `Date`, `High`, `Low` and `Close`; any other columns
/// (such as `Open`) pass through untouched. Output has the same rows in the
/// same order.
///
/// `DaysSince*` uses an expanding window over all history up to each row,
/// while `HighLast*`/`LowLast*` use the trailing `lookback` rows.
///
/// # Arguments
///
/// * `df` - Price frame as produced by the fetcher
/// * `config` - Window sizes and denominator policy
///
/// # Returns
///
/// The price frame with ten derived columns appended
pub fn compute_features(df: &DataFrame, config: &FeatureConfig) -> Result<DataFrame> {
    config.validate()?;
    ensure_columns(df, &[DATE_COLUMN, "High", "Low", "Close"])?;

    let dates = parse_dates(df)?;
    let names = config.columns();
    let policy = config.denominator_policy;
    let (lookback, lookforward) = (config.lookback, config.lookforward);

    let high = df.column("High")?.as_materialized_series().cast(&DataType::Float64)?;
    let low = df.column("Low")?.as_materialized_series().cast(&DataType::Float64)?;
    let close = df.column("Close")?.as_materialized_series().cast(&DataType::Float64)?;

    info!(
        "Computing excursion features for {} rows (lookback={}, lookforward={})",
        df.height(),
        lookback,
        lookforward
    );

    // Backward-looking
    let high_last = rolling_extreme(&high, lookback, Extreme::Max)?;
    let days_since_high = expanding_days_since(&high, &dates, Extreme::Max)?;
    let pct_high_last = pct_diff(&names.pct_diff_high_last, &close, &high_last, policy)?;

    let low_last = rolling_extreme(&low, lookback, Extreme::Min)?;
    let days_since_low = expanding_days_since(&low, &dates, Extreme::Min)?;
    let pct_low_last = pct_diff(&names.pct_diff_low_last, &close, &low_last, policy)?;

    // Forward-looking
    let high_next = forward_extreme(&high, lookforward, Extreme::Max)?;
    let pct_high_next = pct_diff(&names.pct_diff_high_next, &close, &high_next, policy)?;

    let low_next = forward_extreme(&low, lookforward, Extreme::Min)?;
    let pct_low_next = pct_diff(&names.pct_diff_low_next, &close, &low_next, policy)?;

    let features: Vec<Column> = vec![
        high_last.with_name(names.high_last.as_str().into()),
        days_since_high.with_name(names.days_since_high_last.as_str().into()),
        pct_high_last,
        low_last.with_name(names.low_last.as_str().into()),
        days_since_low.with_name(names.days_since_low_last.as_str().into()),
        pct_low_last,
        high_next.with_name(names.high_next.as_str().into()),
        pct_high_next,
        low_next.with_name(names.low_next.as_str().into()),
        pct_low_next,
    ]
    .into_iter()
    .map(|s| s.into_column())
    .collect();

    let result = df.hstack(&features)?;
    info!("Feature frame columns: {:?}", result.get_column_names());
    Ok(result)
}
