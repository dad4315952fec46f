// External crates
use anyhow::{Context, Result};
use log::info;
use polars::prelude::DataFrame;
use std::env;
use std::path::Path;

// Local crate
use crypto_excursion::built_info;
use crypto_excursion::constants::{DEFAULT_FEATURE_FILE, EXPERIMENT_PATH};
use crypto_excursion::daily::excursion::step_6_model_serialization::{
    get_model_path, is_model_current, load_model, save_model,
};
use crypto_excursion::util::file_utils::{load_feature_file, save_feature_file};
use crypto_excursion::util::model_logger::{create_experiment_dir, TrainingRecord};
use crypto_excursion::{
    compute_features, predict, train, FetcherConfig, LinearModel, PipelineConfig, PriceFetcher,
};

fn main() -> Result<()> {
    env_logger::init();

    // Accept asset id and feature file as command-line arguments
    let args: Vec<String> = env::args().collect();
    let asset_id = args.get(1).map(|s| s.as_str()).unwrap_or("bitcoin");
    let feature_file = args.get(2).map(|s| s.as_str()).unwrap_or(DEFAULT_FEATURE_FILE);
    println!("Using asset: {} | feature file: {}", asset_id, feature_file);

    let config = PipelineConfig::new(asset_id);

    // Fetch and build features
    let fetcher = PriceFetcher::new(FetcherConfig::default())?;
    let prices = fetcher
        .fetch_price_series(&config.fetch_request())
        .with_context(|| format!("Failed to fetch prices for {}", asset_id))?;
    println!("Fetched {} daily prices", prices.height());

    let features = compute_features(&prices, &config.feature_config())?;
    let saved_to = save_feature_file(&features, feature_file)?;
    println!("Feature data saved to {}", saved_to.display());

    // Train from the persisted file, not the in-memory frame
    let features = load_feature_file(&saved_to)?;
    let model = train_or_reuse(&config, &features)?;
    println!(
        "R^2 on {} held-out rows: {:.4} ({} rows excluded)",
        model.test_rows, model.score, model.excluded_rows
    );

    let predictions = predict(&model, &features.slice(0, 5))?;
    println!("Predictions for the first rows:\n{}", predictions);

    Ok(())
}

fn train_or_reuse(config: &PipelineConfig, features: &DataFrame) -> Result<LinearModel> {
    let model_path = get_model_path(&config.asset_id);

    if is_model_current(&model_path, built_info::PKG_VERSION) {
        info!("Reusing model trained today at {}", model_path.display());
        let (model, _) = load_model(&model_path)?;
        return Ok(model);
    }

    let model = train(features, &config.predictor_config())?;
    let model_path = save_model(&model, &config.asset_id, &model_path)?;
    println!("Model saved at: {}", model_path.display());

    let mut record = TrainingRecord::new(&config.asset_id, config.lookback, config.lookforward, &model);
    record.add_note(&format!("features: {} rows", features.height()));
    let experiment_dir = create_experiment_dir(Path::new(EXPERIMENT_PATH))?;
    let record_path = record.save(&experiment_dir)?;
    info!("Training record written to {}", record_path.display());

    Ok(model)
}
