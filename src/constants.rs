// Provider defaults
pub const DEFAULT_ENDPOINT_TEMPLATE: &str =
    "https://api.coingecko.com/api/v3/coins/{asset_id}/market_chart";
pub const ASSET_ID_PLACEHOLDER: &str = "{asset_id}";
pub const DEFAULT_VS_CURRENCY: &str = "usd";
pub const DEFAULT_DAYS: &str = "max"; // all available history

// Feature windows
pub const DEFAULT_LOOKBACK: usize = 7; // trailing days, inclusive of the current day
pub const DEFAULT_LOOKFORWARD: usize = 5; // days strictly after the current day

// Price frame layout
pub const DATE_COLUMN: &str = "Date";
pub const PRICE_COLUMNS: [&str; 4] = ["Open", "High", "Low", "Close"];
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

// Data preprocessing
pub const TEST_SPLIT_RATIO: f64 = 0.2; // 20% of complete rows held out for scoring
pub const SPLIT_SEED: u64 = 42;

// Output paths
pub const DEFAULT_FEATURE_FILE: &str = "crypto_data.csv";
pub const MODEL_PATH: &str = "models";
pub const MODEL_FILE_NAME: &str = "_excursion_model";
pub const EXPERIMENT_PATH: &str = "experiments";
