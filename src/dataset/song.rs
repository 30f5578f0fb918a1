use serde::{Deserialize, Serialize};

/// Names of the numeric audio-feature columns, in the order they appear in
/// the dataset and in [`Song::features`].
pub const AUDIO_FEATURES: [&str; 13] = [
    "danceability",
    "energy",
    "key",
    "loudness",
    "mode",
    "speechiness",
    "acousticness",
    "instrumentalness",
    "liveness",
    "valence",
    "tempo",
    "duration_ms",
    "time_signature",
];

/// One row of the song table.
///
/// The `cluster` column is absent until the clusterization step has run;
/// a raw extract deserializes with `cluster: None`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Song {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub artists: String,

    pub danceability: f64,
    pub energy: f64,
    pub key: f64,
    pub loudness: f64,
    pub mode: f64,
    pub speechiness: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub valence: f64,
    pub tempo: f64,
    pub duration_ms: f64,
    pub time_signature: f64,

    #[serde(default)]
    pub cluster: Option<u32>,
}

impl Song {
    /// The numeric audio features of this song, ordered as [`AUDIO_FEATURES`].
    pub fn features(&self) -> Vec<f64> {
        vec![
            self.danceability,
            self.energy,
            self.key,
            self.loudness,
            self.mode,
            self.speechiness,
            self.acousticness,
            self.instrumentalness,
            self.liveness,
            self.valence,
            self.tempo,
            self.duration_ms,
            self.time_signature,
        ]
    }
}

/// The columns the recommender flow displays: id, name and artists, plus the
/// cluster when present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SongSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub artists: String,
    pub cluster: Option<u32>,
}

impl From<&Song> for SongSummary {
    fn from(song: &Song) -> Self {
        SongSummary {
            id: song.id.clone(),
            name: song.name.clone(),
            artists: song.artists.clone(),
            cluster: song.cluster,
        }
    }
}
