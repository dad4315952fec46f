// External imports
use chrono::{DateTime, Local, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// Internal imports
use super::step_4_train_model::LinearModel;
use crate::built_info;
use crate::constants::{MODEL_FILE_NAME, MODEL_PATH};
use crate::error::Result;

/// Provenance stored next to the coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Package version that wrote the file
    pub version: String,
    /// Unix seconds at save time
    pub timestamp: i64,
    pub asset_id: String,
}

impl ModelMetadata {
    pub fn new(asset_id: &str) -> Self {
        Self {
            version: built_info::PKG_VERSION.to_string(),
            timestamp: Utc::now().timestamp(),
            asset_id: asset_id.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct SavedModel {
    metadata: ModelMetadata,
    model: LinearModel,
}

/// Default location for an asset's model file
pub fn get_model_path(asset_id: &str) -> PathBuf {
    PathBuf::from(MODEL_PATH)
        .join(asset_id)
        .join(format!("{}{}", asset_id, MODEL_FILE_NAME))
        .with_extension("json")
}

/// Save a trained model as pretty JSON, creating parent directories
pub fn save_model(model: &LinearModel, asset_id: &str, path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let saved = SavedModel {
        metadata: ModelMetadata::new(asset_id),
        model: model.clone(),
    };
    fs::write(path, serde_json::to_string_pretty(&saved)?)?;

    info!("Model saved to {}", path.display());
    Ok(path.to_path_buf())
}

/// Load a model saved by `save_model`
pub fn load_model(path: impl AsRef<Path>) -> Result<(LinearModel, ModelMetadata)> {
    let path = path.as_ref();
    info!("Loading model from {}", path.display());
    let saved: SavedModel = serde_json::from_str(&fs::read_to_string(path)?)?;
    Ok((saved.model, saved.metadata))
}

/// True when the saved model was written today by `current_version`
pub fn is_model_current(path: impl AsRef<Path>, current_version: &str) -> bool {
    let Ok((_, metadata)) = load_model(path) else {
        return false;
    };
    if metadata.version != current_version {
        return false;
    }
    match DateTime::<Utc>::from_timestamp(metadata.timestamp, 0) {
        Some(saved_at) => saved_at.with_timezone(&Local).date_naive() == Local::now().date_naive(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daily::excursion::step_3_linear_regression::LinearFit;
    use crate::daily::excursion::step_4_train_model::TrainedModel;
    use tempfile::tempdir;

    fn model() -> LinearModel {
        TrainedModel {
            model: LinearFit {
                coefficients: vec![vec![0.1, -0.2, 0.3, -0.4], vec![1.0, 2.0, 3.0, 4.0]],
                intercepts: vec![0.25, -0.75],
            },
            score: 0.42,
            feature_names: vec![
                "DaysSinceHighLast7".into(),
                "PctDiffHighLast7".into(),
                "DaysSinceLowLast7".into(),
                "PctDiffLowLast7".into(),
            ],
            target_names: vec!["PctDiffHighNext5".into(), "PctDiffLowNext5".into()],
            train_rows: 80,
            test_rows: 20,
            excluded_rows: 11,
        }
    }

    #[test]
    fn test_model_save_load() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("bitcoin").join("model.json");

        let saved_path = save_model(&model(), "bitcoin", &path)?;
        assert!(saved_path.exists());

        let (loaded, metadata) = load_model(&saved_path)?;
        assert_eq!(loaded, model());
        assert_eq!(metadata.asset_id, "bitcoin");
        assert_eq!(metadata.version, built_info::PKG_VERSION);

        assert!(is_model_current(&saved_path, built_info::PKG_VERSION));
        assert!(!is_model_current(&saved_path, "0.0.0-other"));
        assert!(!is_model_current(dir.path().join("missing.json"), built_info::PKG_VERSION));
        Ok(())
    }

    #[test]
    fn test_get_model_path() {
        assert_eq!(
            get_model_path("bitcoin"),
            PathBuf::from("models/bitcoin/bitcoin_excursion_model.json")
        );
    }
}
