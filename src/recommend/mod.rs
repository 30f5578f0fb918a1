use crate::dataset::{Song, SongTable};
use rand::seq::IndexedRandom;
use rand::RngCore;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecommendError {
    #[error("No song with id \"{0}\"")]
    UnknownSong(String),

    #[error("Song \"{0}\" has no cluster label, clusterize the data first")]
    NotClusterized(String),

    #[error("No recommendation found")]
    NoRecommendation,
}

/// Rows whose `name` or `artists` contain the given filters,
/// case-insensitively. An empty filter imposes no constraint; the result
/// keeps table order and may be empty.
pub fn find_matches<'a>(table: &'a SongTable, title: &str, artists: &str) -> Vec<&'a Song> {
    let title = title.to_lowercase();
    let artists = artists.to_lowercase();

    table
        .iter()
        .filter(|song| {
            (title.is_empty() || song.name.to_lowercase().contains(&title))
                && (artists.is_empty() || song.artists.to_lowercase().contains(&artists))
        })
        .collect()
}

/// Uniformly samples one song from the selected song's cluster, excluding
/// the selected song itself.
pub fn recommend<'a>(
    table: &'a SongTable,
    song_id: &str,
    rng: &mut dyn RngCore,
) -> Result<&'a Song, RecommendError> {
    let selected = table
        .get(song_id)
        .ok_or_else(|| RecommendError::UnknownSong(song_id.to_owned()))?;
    let cluster = selected
        .cluster
        .ok_or_else(|| RecommendError::NotClusterized(song_id.to_owned()))?;

    let candidates: Vec<&Song> = table
        .iter()
        .filter(|song| song.cluster == Some(cluster) && song.id != song_id)
        .collect();

    candidates
        .choose(rng)
        .copied()
        .ok_or(RecommendError::NoRecommendation)
}
