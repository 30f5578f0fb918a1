use super::{KMeans, MinMaxScaler};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The persisted model artifact: a fitted scaler and a fitted k-means model,
/// serialized together as one JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    pub min_max_scaler: MinMaxScaler,
    pub model: KMeans,
}

impl ModelBundle {
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Could not write model bundle to {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<ModelBundle> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read model bundle at {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed model bundle at {}", path.display()))
    }
}
