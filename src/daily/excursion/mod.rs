/// # Daily Excursion Pipeline
///
/// Fetches a daily price series, derives lookback/lookahead excursion
/// features and fits a linear model from the backward-looking features to
/// the forward-looking percentage excursions.
///
/// ## Module Structure:
///
/// 1. **step_1_price_fetch**: Blocking provider client and response parsing
/// 2. **step_2_feature_engine**: Trailing, expanding and forward window features
/// 3. **step_3_linear_regression**: `Regressor` trait, OLS and R²
/// 4. **step_4_train_model**: Complete-row selection, seeded split and fitting
/// 5. **step_5_prediction**: Applying a trained model to feature rows
/// 6. **step_6_model_serialization**: Model saving and loading
///
pub mod step_1_price_fetch;
pub mod step_2_feature_engine;
pub mod step_3_linear_regression;
pub mod step_4_train_model;
pub mod step_5_prediction;
pub mod step_6_model_serialization;
