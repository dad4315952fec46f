// External crates
use log::info;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

// Internal modules
use crate::error::{ExcursionError, Result};

/// On-disk layout of a feature file, picked from the extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Parquet,
}

impl FileFormat {
    /// Detect the format from a path; anything other than `.parquet` is CSV
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref()
        {
            Some("parquet") => FileFormat::Parquet,
            _ => FileFormat::Csv,
        }
    }
}

/// Write a feature frame to disk, one row per timestamp
///
/// # Arguments
///
/// * `df` - Frame to persist; nulls are written as empty CSV cells
/// * `path` - Destination; `.parquet` selects Parquet, otherwise CSV
///
/// # Returns
///
/// The path written to
pub fn save_feature_file<P: AsRef<Path>>(df: &DataFrame, path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut df = df.clone();
    let mut file = File::create(path)?;
    match FileFormat::from_path(path) {
        FileFormat::Csv => {
            CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
        }
        FileFormat::Parquet => {
            ParquetWriter::new(&mut file).finish(&mut df)?;
        }
    }

    info!("Saved {} rows x {} columns to {}", df.height(), df.width(), path.display());
    Ok(path.to_path_buf())
}

/// Read a feature file written by `save_feature_file`
pub fn load_feature_file<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ExcursionError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )));
    }

    let file = File::open(path)?;
    let df = match FileFormat::from_path(path) {
        FileFormat::Csv => CsvReader::new(file).finish()?,
        FileFormat::Parquet => ParquetReader::new(file).finish()?,
    };

    info!("Loaded {} rows from {}", df.height(), path.display());
    Ok(df)
}
