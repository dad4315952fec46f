// External crates
use serde::{Deserialize, Serialize};

// Internal modules
use crate::constants::{
    DEFAULT_DAYS, DEFAULT_LOOKBACK, DEFAULT_LOOKFORWARD, DEFAULT_VS_CURRENCY, SPLIT_SEED,
    TEST_SPLIT_RATIO,
};
use crate::daily::excursion::step_1_price_fetch::FetchRequest;
use crate::daily::excursion::step_2_feature_engine::FeatureConfig;
use crate::daily::excursion::step_4_train_model::PredictorConfig;

/// Function-style configuration for one pipeline run
///
/// `asset_id` is the only required value; everything else falls back to
/// the provider and window defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub asset_id: String,
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,
    #[serde(default = "default_days")]
    pub days: String,
    #[serde(default = "default_lookback")]
    pub lookback: usize,
    #[serde(default = "default_lookforward")]
    pub lookforward: usize,
}

fn default_vs_currency() -> String {
    DEFAULT_VS_CURRENCY.to_string()
}

fn default_days() -> String {
    DEFAULT_DAYS.to_string()
}

fn default_lookback() -> usize {
    DEFAULT_LOOKBACK
}

fn default_lookforward() -> usize {
    DEFAULT_LOOKFORWARD
}

impl PipelineConfig {
    pub fn new(asset_id: &str) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            vs_currency: default_vs_currency(),
            days: default_days(),
            lookback: DEFAULT_LOOKBACK,
            lookforward: DEFAULT_LOOKFORWARD,
        }
    }

    pub fn with_windows(mut self, lookback: usize, lookforward: usize) -> Self {
        self.lookback = lookback;
        self.lookforward = lookforward;
        self
    }

    pub fn fetch_request(&self) -> FetchRequest {
        FetchRequest {
            asset_id: self.asset_id.clone(),
            vs_currency: self.vs_currency.clone(),
            days: self.days.clone(),
        }
    }

    pub fn feature_config(&self) -> FeatureConfig {
        FeatureConfig::new(self.lookback, self.lookforward)
    }

    pub fn predictor_config(&self) -> PredictorConfig {
        PredictorConfig {
            lookback: self.lookback,
            lookforward: self.lookforward,
            test_ratio: TEST_SPLIT_RATIO,
            seed: SPLIT_SEED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_constants() {
        let config = PipelineConfig::new("bitcoin");
        assert_eq!(config.vs_currency, "usd");
        assert_eq!(config.days, "max");
        assert_eq!(config.lookback, 7);
        assert_eq!(config.lookforward, 5);
    }

    #[test]
    fn test_deserialize_with_only_asset_id() {
        let config: PipelineConfig = serde_json::from_str(r#"{"asset_id": "ethereum"}"#).unwrap();
        assert_eq!(config, PipelineConfig::new("ethereum"));
    }

    #[test]
    fn test_derived_configs_share_windows() {
        let config = PipelineConfig::new("solana").with_windows(14, 3);
        let features = config.feature_config();
        let predictor = config.predictor_config();
        assert_eq!((features.lookback, features.lookforward), (14, 3));
        assert_eq!((predictor.lookback, predictor.lookforward), (14, 3));
        assert_eq!(predictor.seed, 42);
        assert_eq!(config.fetch_request().asset_id, "solana");
    }
}
