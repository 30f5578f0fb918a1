use super::table::SongTable;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

/// Memoized CSV loading, keyed on the file's modification time.
///
/// An unchanged file is parsed once per process; rewriting it (as the
/// clusterization step does) invalidates the cached table.
#[derive(Debug)]
pub struct CachedTable {
    path: PathBuf,
    cached: Option<(SystemTime, Arc<SongTable>)>,
}

impl CachedTable {
    pub fn new(path: PathBuf) -> CachedTable {
        CachedTable { path, cached: None }
    }

    /// The table behind this file, re-read only when the file changed.
    pub fn load(&mut self) -> Result<Arc<SongTable>> {
        let modified = std::fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .with_context(|| format!("Could not stat dataset at {}", self.path.display()))?;

        if let Some((cached_modified, table)) = &self.cached {
            if *cached_modified == modified {
                return Ok(table.clone());
            }
            debug!("Dataset at {} changed, reloading", self.path.display());
        }

        let table = Arc::new(SongTable::load_csv(&self.path)?);
        self.cached = Some((modified, table.clone()));
        Ok(table)
    }

    /// Like [`CachedTable::load`] but a missing file is `None`, not an error.
    pub fn load_if_present(&mut self) -> Result<Option<Arc<SongTable>>> {
        if !self.path.exists() {
            self.cached = None;
            return Ok(None);
        }
        self.load().map(Some)
    }
}
