mod cache;
mod song;
mod stats;
pub(crate) mod table;

pub use cache::CachedTable;
pub use song::{Song, SongSummary, AUDIO_FEATURES};
pub use stats::{correlation, describe, ColumnSummary, CorrelationMatrix};
pub use table::SongTable;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File name of the raw tabular extract inside the data directory.
pub const RAW_DATA_FILE: &str = "songs.csv";
/// File name of the clusterized table written by the clusterization step.
pub const CLUSTERIZED_DATA_FILE: &str = "clusterized_data.csv";
/// File name of the persisted scaler + k-means bundle.
pub const MODEL_FILE: &str = "kmeans_model_with_scaler.json";

/// All persisted datasets of one data directory: the raw extract, the
/// clusterized table and the model artifact path. Tables are memoized, see
/// [`CachedTable`].
#[derive(Debug)]
pub struct DataStore {
    data_dir: PathBuf,
    raw: CachedTable,
    clusterized: CachedTable,
}

impl DataStore {
    pub fn new(data_dir: &Path) -> DataStore {
        DataStore {
            data_dir: data_dir.to_owned(),
            raw: CachedTable::new(data_dir.join(RAW_DATA_FILE)),
            clusterized: CachedTable::new(data_dir.join(CLUSTERIZED_DATA_FILE)),
        }
    }

    pub fn model_path(&self) -> PathBuf {
        self.data_dir.join(MODEL_FILE)
    }

    pub fn clusterized_path(&self) -> PathBuf {
        self.data_dir.join(CLUSTERIZED_DATA_FILE)
    }

    /// The raw extract; an error when the input file is missing.
    pub fn raw_table(&mut self) -> Result<Arc<SongTable>> {
        self.raw.load()
    }

    /// The clusterized table, `None` until the clusterization step has run.
    pub fn clusterized_table(&mut self) -> Result<Option<Arc<SongTable>>> {
        self.clusterized.load_if_present()
    }
}
