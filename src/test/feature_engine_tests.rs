#[cfg(test)]
mod tests {
    use crate::daily::excursion::step_2_feature_engine::{
        compute_features, DenominatorPolicy, FeatureColumns, FeatureConfig,
    };
    use crate::error::ExcursionError;
    use crate::util::test_utils::{column_values, price_frame, random_walk_prices};
    use approx::assert_abs_diff_eq;
    use polars::prelude::*;

    #[test]
    fn test_first_lookback_rows_undefined() {
        let df = price_frame(&random_walk_prices(30, 1));

        for lookback in 1..=8 {
            let config = FeatureConfig::new(lookback, 3);
            let features = compute_features(&df, &config).unwrap();
            let names = config.columns();

            for column in [&names.high_last, &names.low_last, &names.pct_diff_high_last, &names.pct_diff_low_last] {
                let values = column_values(&features, column);
                assert!(
                    values[..lookback - 1].iter().all(|v| v.is_none()),
                    "{} should be null for the first {} rows",
                    column,
                    lookback - 1
                );
                assert!(
                    values[lookback - 1..].iter().all(|v| v.is_some()),
                    "{} should be defined once the window is full",
                    column
                );
            }
        }
    }

    #[test]
    fn test_last_lookforward_rows_undefined() {
        let df = price_frame(&random_walk_prices(30, 2));

        for lookforward in 1..=8 {
            let config = FeatureConfig::new(3, lookforward);
            let features = compute_features(&df, &config).unwrap();
            let names = config.columns();
            let split = 30 - lookforward;

            for column in [&names.high_next, &names.low_next, &names.pct_diff_high_next, &names.pct_diff_low_next] {
                let values = column_values(&features, column);
                assert!(
                    values[..split].iter().all(|v| v.is_some()),
                    "{} should be defined while {} future rows exist",
                    column,
                    lookforward
                );
                assert!(
                    values[split..].iter().all(|v| v.is_none()),
                    "{} should be null for the last {} rows",
                    column,
                    lookforward
                );
            }
        }
    }

    #[test]
    fn test_days_since_is_expanding_from_first_row() {
        let df = price_frame(&random_walk_prices(20, 3));
        let features = compute_features(&df, &FeatureConfig::default()).unwrap();
        let names = FeatureColumns::new(7, 5);

        for column in [&names.days_since_high_last, &names.days_since_low_last] {
            let values = column_values(&features, column);
            assert!(values.iter().all(|v| v.is_some()));
            assert_eq!(values[0], Some(0.0));
        }
    }

    #[test]
    fn test_days_since_can_exceed_lookback_window() {
        // The high on day 0 stays the expanding max for the whole series
        let df = price_frame(&[100.0, 90.0, 80.0, 85.0, 70.0, 75.0]);
        let features = compute_features(&df, &FeatureConfig::new(2, 1)).unwrap();

        assert_eq!(
            column_values(&features, "DaysSinceHighLast2"),
            vec![Some(0.0), Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)]
        );
        assert_eq!(
            column_values(&features, "HighLast2"),
            vec![None, Some(100.0), Some(90.0), Some(85.0), Some(85.0), Some(75.0)]
        );
    }

    #[test]
    fn test_constant_series_has_zero_pct_diffs() {
        let df = price_frame(&[42.0; 20]);
        let config = FeatureConfig::default();
        let features = compute_features(&df, &config).unwrap();
        let names = config.columns();

        for column in [
            &names.pct_diff_high_last,
            &names.pct_diff_low_last,
            &names.pct_diff_high_next,
            &names.pct_diff_low_next,
        ] {
            for value in column_values(&features, column).into_iter().flatten() {
                assert_eq!(value, 0.0, "{} should be zero on a constant series", column);
            }
        }
    }

    #[test]
    fn test_recomputing_is_byte_identical() {
        let df = price_frame(&random_walk_prices(60, 4));
        let config = FeatureConfig::default();

        let mut first = compute_features(&df, &config).unwrap();
        let mut second = compute_features(&df, &config).unwrap();
        assert!(first.equals_missing(&second));

        let mut first_bytes: Vec<u8> = Vec::new();
        let mut second_bytes: Vec<u8> = Vec::new();
        CsvWriter::new(&mut first_bytes).finish(&mut first).unwrap();
        CsvWriter::new(&mut second_bytes).finish(&mut second).unwrap();
        assert_eq!(first_bytes, second_bytes);
    }

    #[test]
    fn test_worked_scenario_lookback_2_lookforward_2() {
        let df = price_frame(&[10.0, 12.0, 8.0, 15.0, 9.0]);
        let features = compute_features(&df, &FeatureConfig::new(2, 2)).unwrap();
        let day2 = 2;

        assert_eq!(column_values(&features, "HighLast2")[day2], Some(12.0));
        assert_abs_diff_eq!(
            column_values(&features, "PctDiffHighLast2")[day2].unwrap(),
            -33.333_333,
            epsilon = 1e-4
        );
        assert_eq!(column_values(&features, "HighNext2")[day2], Some(15.0));
        assert_abs_diff_eq!(
            column_values(&features, "PctDiffHighNext2")[day2].unwrap(),
            -46.666_667,
            epsilon = 1e-4
        );

        assert_eq!(column_values(&features, "LowLast2")[day2], Some(8.0));
        assert_eq!(column_values(&features, "PctDiffLowLast2")[day2], Some(0.0));
        assert_eq!(column_values(&features, "DaysSinceHighLast2")[day2], Some(1.0));
        assert_eq!(column_values(&features, "DaysSinceLowLast2")[day2], Some(0.0));
        assert_eq!(column_values(&features, "LowNext2")[day2], Some(9.0));
    }

    #[test]
    fn test_zero_low_ahead_is_degenerate_denominator() {
        // Lookback longer than the series keeps the backward features null
        let df = price_frame(&[5.0, 4.0, 3.0, 0.0]);
        let config = FeatureConfig::new(10, 2);

        match compute_features(&df, &config) {
            Err(ExcursionError::DegenerateDenominator { column, row }) => {
                assert_eq!(column, "PctDiffLowNext2");
                assert_eq!(row, 1);
            }
            other => panic!("expected degenerate denominator, got {:?}", other),
        }
    }

    #[test]
    fn test_null_policy_records_degenerate_cells_as_null() {
        let df = price_frame(&[5.0, 4.0, 3.0, 0.0]);
        let config = FeatureConfig::new(10, 2).with_denominator_policy(DenominatorPolicy::Null);
        let features = compute_features(&df, &config).unwrap();

        let pct = column_values(&features, "PctDiffLowNext2");
        assert_abs_diff_eq!(pct[0].unwrap(), (5.0 - 3.0) / 3.0 * 100.0, epsilon = 1e-9);
        assert_eq!(pct[1], None);
        assert_eq!(column_values(&features, "LowNext2")[1], Some(0.0));
    }

    #[test]
    fn test_output_preserves_rows_and_input_columns() {
        let df = price_frame(&random_walk_prices(15, 5));
        let features = compute_features(&df, &FeatureConfig::default()).unwrap();

        assert_eq!(features.height(), df.height());
        assert_eq!(features.width(), df.width() + 10);
        for name in ["Date", "Open", "High", "Low", "Close"] {
            assert!(features.column(name).unwrap().as_materialized_series().equals_missing(
                df.column(name).unwrap().as_materialized_series()
            ));
        }
    }

    #[test]
    fn test_series_shorter_than_windows() {
        let df = price_frame(&[1.0, 2.0, 3.0]);
        let features = compute_features(&df, &FeatureConfig::default()).unwrap();
        assert_eq!(features.height(), 3);
        assert_eq!(features.column("HighLast7").unwrap().null_count(), 3);
        assert_eq!(features.column("LowNext5").unwrap().null_count(), 3);
    }

    #[test]
    fn test_unordered_dates_rejected() {
        let df = price_frame(&[1.0, 2.0, 3.0]);
        let reversed = df.reverse();
        assert!(matches!(
            compute_features(&reversed, &FeatureConfig::new(2, 1)),
            Err(ExcursionError::InvalidSeries(_))
        ));
    }
}
