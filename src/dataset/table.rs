use super::song::Song;
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// The full song table, loaded once and treated as immutable afterwards.
///
/// Rows keep their file order; an id index gives O(1) lookup. Derived views
/// (match sets, pages) borrow from the table and are never persisted.
#[derive(Debug, Clone)]
pub struct SongTable {
    songs: Vec<Song>,
    index: HashMap<String, usize>,
}

impl SongTable {
    /// Builds a table from rows, rejecting duplicate ids.
    pub fn from_songs(songs: Vec<Song>) -> Result<SongTable> {
        let mut index = HashMap::with_capacity(songs.len());
        for (position, song) in songs.iter().enumerate() {
            if index.insert(song.id.clone(), position).is_some() {
                bail!("Duplicate song id \"{}\" in dataset", song.id);
            }
        }
        Ok(SongTable { songs, index })
    }

    /// Reads a CSV file into a table.
    pub fn load_csv(path: &Path) -> Result<SongTable> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Could not open dataset at {}", path.display()))?;
        let mut songs = Vec::new();
        for record in reader.deserialize() {
            let song: Song = record
                .with_context(|| format!("Malformed row in {}", path.display()))?;
            songs.push(song);
        }
        SongTable::from_songs(songs)
    }

    /// Writes the table back out as CSV, keeping row order.
    pub fn save_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Could not write dataset to {}", path.display()))?;
        for song in &self.songs {
            writer.serialize(song)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Song> {
        self.index.get(id).map(|&position| &self.songs[position])
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Song> {
        self.songs.iter()
    }

    /// One page of rows, 1-based. Pages past the end are empty.
    pub fn page(&self, page: usize, page_size: usize) -> &[Song] {
        if page == 0 || page_size == 0 {
            return &[];
        }
        let start = (page - 1).saturating_mul(page_size).min(self.songs.len());
        let end = start.saturating_add(page_size).min(self.songs.len());
        &self.songs[start..end]
    }

    /// The audio features of every row, one vector per row in table order.
    pub fn feature_matrix(&self) -> Vec<Vec<f64>> {
        self.songs.iter().map(Song::features).collect()
    }

    /// Returns a copy of this table with cluster labels attached row by row.
    pub fn with_clusters(&self, labels: &[usize]) -> Result<SongTable> {
        if labels.len() != self.songs.len() {
            bail!(
                "Got {} cluster labels for {} rows",
                labels.len(),
                self.songs.len()
            );
        }
        let songs = self
            .songs
            .iter()
            .zip(labels)
            .map(|(song, &label)| {
                let mut song = song.clone();
                song.cluster = Some(label as u32);
                song
            })
            .collect();
        SongTable::from_songs(songs)
    }
}
