mod kmeans;
mod model;
mod scaler;

pub use kmeans::KMeans;
pub use model::ModelBundle;
pub use scaler::MinMaxScaler;

use crate::dataset::SongTable;
use rand::RngCore;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ClusteringError {
    #[error("Cannot fit on an empty feature matrix")]
    EmptyInput,

    #[error("Got {n_samples} samples for {n_clusters} clusters")]
    TooFewSamples { n_samples: usize, n_clusters: usize },

    #[error("Expected rows of width {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Model not fitted")]
    NotFitted,
}

/// What the clusterization step produced, also the API response body.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterizeReport {
    pub n_songs: usize,
    pub n_clusters: usize,
    /// Row count per cluster id.
    pub cluster_sizes: Vec<usize>,
    pub inertia: f64,
    pub n_iter: usize,
}

/// Scales the audio features, fits k-means and attaches a cluster label to
/// every row. Every returned row has a non-null cluster in `[0, n_clusters)`.
pub fn clusterize(
    table: &SongTable,
    n_clusters: usize,
    rng: &mut dyn RngCore,
) -> Result<(SongTable, ModelBundle, ClusterizeReport), ClusteringError> {
    let features = table.feature_matrix();

    let mut scaler = MinMaxScaler::new();
    let normalized = scaler.fit_transform(&features)?;

    let mut model = KMeans::new(n_clusters);
    model.fit(&normalized, rng)?;
    let labels = model.predict(&normalized)?;

    let mut cluster_sizes = vec![0usize; n_clusters];
    for &label in &labels {
        cluster_sizes[label] += 1;
    }

    info!(
        "Clusterized {} songs into {} clusters in {} iterations (inertia {:.3})",
        table.len(),
        n_clusters,
        model.n_iter(),
        model.inertia()
    );

    let report = ClusterizeReport {
        n_songs: table.len(),
        n_clusters,
        cluster_sizes,
        inertia: model.inertia(),
        n_iter: model.n_iter(),
    };

    let clusterized = table
        .with_clusters(&labels)
        .expect("predict returns one label per row");

    let bundle = ModelBundle {
        min_max_scaler: scaler,
        model,
    };

    Ok((clusterized, bundle, report))
}
