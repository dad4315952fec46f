// External imports
use chrono::{Duration, NaiveDateTime};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Internal imports
use crate::constants::{DATE_COLUMN, DATE_FORMAT, PRICE_COLUMNS};

fn base_date() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2024-01-01 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
}

/// Price frame with one row per consecutive day and all four prices equal
pub fn price_frame(prices: &[f64]) -> DataFrame {
    let dates: Vec<String> = (0..prices.len())
        .map(|i| (base_date() + Duration::days(i as i64)).format(DATE_FORMAT).to_string())
        .collect();

    let mut columns = vec![Series::new(DATE_COLUMN.into(), dates).into_column()];
    for name in PRICE_COLUMNS {
        columns.push(Series::new(name.into(), prices.to_vec()).into_column());
    }
    DataFrame::new(columns).unwrap()
}

/// Seeded random walk with moves between -3% and +3%
pub fn random_walk_prices(num_rows: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut price: f64 = 100.0 + rng.random::<f64>() * 50.0;

    (0..num_rows)
        .map(|_| {
            let movement = (rng.random::<f64>() * 2.0 - 1.0) * 0.03;
            price *= 1.0 + movement;
            price
        })
        .collect()
}

/// Column values as `Option<f64>`, whatever the numeric dtype
pub fn column_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}
