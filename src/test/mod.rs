/// Test modules for the excursion pipeline
///
/// * `feature_engine_tests` - Window edges, constant series, idempotence and the worked scenarios
/// * `predictor_tests` - Complete-row selection, seeded training, stub regressors and prediction schema
/// * `file_utils_tests` - Feature file round trips through CSV and Parquet
/// * `fetcher_tests` - Provider failures surfacing as provider errors
pub mod feature_engine_tests;
