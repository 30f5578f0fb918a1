//! Dataset fixtures written into each test server's data directory.

use discoteca_server::dataset::{Song, SongTable, CLUSTERIZED_DATA_FILE, RAW_DATA_FILE};
use std::path::Path;

/// Builds one song row with sensible audio-feature defaults.
pub fn song(id: &str, name: &str, artists: &str, cluster: Option<u32>) -> Song {
    Song {
        id: id.to_owned(),
        name: name.to_owned(),
        artists: artists.to_owned(),
        danceability: 0.5,
        energy: 0.5,
        key: 5.0,
        loudness: -7.0,
        mode: 1.0,
        speechiness: 0.05,
        acousticness: 0.2,
        instrumentalness: 0.0,
        liveness: 0.1,
        valence: 0.5,
        tempo: 120.0,
        duration_ms: 200_000.0,
        time_signature: 4.0,
        cluster,
    }
}

/// What to place in the data directory before the server starts.
#[derive(Default)]
pub struct Fixture {
    pub raw: Option<Vec<Song>>,
    pub clusterized: Option<Vec<Song>>,
}

impl Fixture {
    pub fn write(&self, data_dir: &Path) {
        if let Some(songs) = &self.raw {
            SongTable::from_songs(songs.clone())
                .unwrap()
                .save_csv(&data_dir.join(RAW_DATA_FILE))
                .unwrap();
        }
        if let Some(songs) = &self.clusterized {
            SongTable::from_songs(songs.clone())
                .unwrap()
                .save_csv(&data_dir.join(CLUSTERIZED_DATA_FILE))
                .unwrap();
        }
    }
}

/// The canonical three-song scenario: cluster 0 holds "Yesterday" and
/// "Let It Be", cluster 1 holds only "Help".
pub fn clusterized_beatles() -> Vec<Song> {
    vec![
        song("1", "Yesterday", "The Beatles", Some(0)),
        song("2", "Let It Be", "The Beatles", Some(0)),
        song("3", "Help", "The Beatles", Some(1)),
    ]
}

/// A raw, unclustered library with enough spread to clusterize.
pub fn raw_library(n: usize) -> Vec<Song> {
    (0..n)
        .map(|i| {
            let mut row = song(
                &format!("song-{}", i),
                &format!("Song number {}", i),
                "Various Artists",
                None,
            );
            row.tempo = 60.0 + 10.0 * (i % 10) as f64;
            row.energy = (i % 5) as f64 / 5.0;
            row.valence = (i % 7) as f64 / 7.0;
            row
        })
        .collect()
}
