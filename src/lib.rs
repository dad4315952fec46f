pub mod config;
pub mod constants;
pub mod daily;
pub mod error;
#[cfg(test)]
pub mod test;
pub mod util {
    pub mod feature_engineering;
    pub mod file_utils;
    pub mod model_logger;
    pub mod pre_processor;
    #[cfg(test)]
    pub mod test_utils;
}

/// Package metadata generated by the build script
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub use config::PipelineConfig;
pub use daily::excursion::step_1_price_fetch::{FetchRequest, FetcherConfig, PriceFetcher};
pub use daily::excursion::step_2_feature_engine::{compute_features, FeatureColumns, FeatureConfig};
pub use daily::excursion::step_4_train_model::{train, LinearModel, PredictorConfig, TrainedModel};
pub use daily::excursion::step_5_prediction::predict;
pub use error::{ExcursionError, ProviderError, Result};
