// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};
use crate::edgar::models::HoldingRecord;
use crate::utils::error::StorageError;

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager writing into `base_dir`
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Path of the CSV artifact for a fund identifier.
    pub fn holdings_path(&self, identifier: &str) -> PathBuf {
        self.base_dir.join(format!("{}_data.csv", identifier))
    }

    /// Writes the holdings to `<identifier>_data.csv`, replacing any existing file.
    /// The header row is written even when there are no records.
    pub fn save_holdings(&self, identifier: &str, records: &[HoldingRecord]) -> Result<PathBuf, StorageError> {
        let file_path = self.holdings_path(identifier);

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false) // Header written explicitly below
            .from_path(&file_path)?;

        writer.write_record(HoldingRecord::HEADERS)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        tracing::info!("Saved {} holdings to {}", records.len(), file_path.display());

        Ok(file_path)
    }
}
