use std::fs;
use std::path::{Path, PathBuf};
use chrono::Local;
use serde::{Serialize, Deserialize};
use anyhow::Result;

use crate::daily::excursion::step_4_train_model::TrainedModel;

/// One training run, as written to the experiments directory
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub timestamp: String,
    pub asset_id: String,
    pub lookback: usize,
    pub lookforward: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub excluded_rows: usize,
    pub r2_score: f64,
    pub notes: String,
}

impl TrainingRecord {
    pub fn new<M>(asset_id: &str, lookback: usize, lookforward: usize, model: &TrainedModel<M>) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            asset_id: asset_id.to_string(),
            lookback,
            lookforward,
            train_rows: model.train_rows,
            test_rows: model.test_rows,
            excluded_rows: model.excluded_rows,
            r2_score: model.score,
            notes: String::new(),
        }
    }

    pub fn add_note(&mut self, note: &str) {
        if !self.notes.is_empty() {
            self.notes.push('\n');
        }
        self.notes.push_str(note);
    }

    pub fn save(&self, experiment_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(experiment_dir)?;

        let filename = format!(
            "{}_l{}_f{}_training.json",
            self.asset_id, self.lookback, self.lookforward,
        );
        let file_path = experiment_dir.join(filename);

        fs::write(&file_path, serde_json::to_string_pretty(&self)?)?;
        Ok(file_path)
    }
}

pub fn create_experiment_dir(root: &Path) -> Result<PathBuf> {
    let dir = root.join(Local::now().format("%Y%m%d_%H%M%S").to_string());
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_training_record_save() -> Result<()> {
        let model = TrainedModel {
            model: (),
            score: 0.125,
            feature_names: vec![],
            target_names: vec![],
            train_rows: 40,
            test_rows: 10,
            excluded_rows: 12,
        };
        let mut record = TrainingRecord::new("bitcoin", 7, 5, &model);
        record.add_note("first run");
        record.add_note("defaults");

        let dir = tempdir()?;
        let experiment_dir = create_experiment_dir(dir.path())?;
        let path = record.save(&experiment_dir)?;
        assert!(path.ends_with("bitcoin_l7_f5_training.json"));

        let loaded: TrainingRecord = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(loaded.train_rows, 40);
        assert_eq!(loaded.excluded_rows, 12);
        assert_eq!(loaded.r2_score, 0.125);
        assert_eq!(loaded.notes, "first run\ndefaults");
        Ok(())
    }
}
