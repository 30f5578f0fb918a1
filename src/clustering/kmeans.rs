use super::ClusteringError;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// K-means clustering, Lloyd's algorithm with k-means++ initialization.
///
/// Labels are dense integers in `[0, n_clusters)`. Initialization draws from
/// the RNG handed to [`KMeans::fit`], so a seeded RNG gives reproducible
/// clusterings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KMeans {
    n_clusters: usize,
    max_iter: usize,
    tol: f64,
    centroids: Option<Vec<Vec<f64>>>,
    inertia: f64,
    n_iter: usize,
}

impl KMeans {
    pub fn new(n_clusters: usize) -> KMeans {
        KMeans {
            n_clusters,
            max_iter: 300,
            tol: 1e-4,
            centroids: None,
            inertia: 0.0,
            n_iter: 0,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> KMeans {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> KMeans {
        self.tol = tol;
        self
    }

    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Within-cluster sum of squared distances after fit.
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    pub fn is_fitted(&self) -> bool {
        self.centroids.is_some()
    }

    fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
        a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
    }

    /// k-means++: first centroid uniform, the rest drawn with probability
    /// proportional to the squared distance from the nearest chosen centroid.
    fn plusplus_init(&self, rows: &[Vec<f64>], rng: &mut dyn RngCore) -> Vec<Vec<f64>> {
        let mut centroids: Vec<Vec<f64>> = Vec::with_capacity(self.n_clusters);
        centroids.push(rows[rng.random_range(0..rows.len())].clone());

        while centroids.len() < self.n_clusters {
            let weights: Vec<f64> = rows
                .iter()
                .map(|row| {
                    centroids
                        .iter()
                        .map(|centroid| Self::squared_distance(row, centroid))
                        .fold(f64::INFINITY, f64::min)
                })
                .collect();

            let total: f64 = weights.iter().sum();
            let picked = if total > 0.0 {
                let mut threshold = rng.random::<f64>() * total;
                let mut picked = rows.len() - 1;
                for (i, &weight) in weights.iter().enumerate() {
                    threshold -= weight;
                    if threshold <= 0.0 {
                        picked = i;
                        break;
                    }
                }
                picked
            } else {
                // All remaining points coincide with a centroid.
                rng.random_range(0..rows.len())
            };
            centroids.push(rows[picked].clone());
        }

        centroids
    }

    fn assign_labels(&self, rows: &[Vec<f64>], centroids: &[Vec<f64>]) -> Vec<usize> {
        rows.iter()
            .map(|row| {
                let mut best = 0;
                let mut best_distance = f64::INFINITY;
                for (k, centroid) in centroids.iter().enumerate() {
                    let distance = Self::squared_distance(row, centroid);
                    if distance < best_distance {
                        best_distance = distance;
                        best = k;
                    }
                }
                best
            })
            .collect()
    }

    fn update_centroids(
        &self,
        rows: &[Vec<f64>],
        labels: &[usize],
        old: &[Vec<f64>],
    ) -> Vec<Vec<f64>> {
        let n_features = rows[0].len();
        let mut sums = vec![vec![0.0; n_features]; self.n_clusters];
        let mut counts = vec![0usize; self.n_clusters];

        for (row, &label) in rows.iter().zip(labels) {
            counts[label] += 1;
            for (j, &value) in row.iter().enumerate() {
                sums[label][j] += value;
            }
        }

        sums.into_iter()
            .zip(counts)
            .enumerate()
            .map(|(k, (sum, count))| {
                if count == 0 {
                    // Empty cluster keeps its previous centroid.
                    old[k].clone()
                } else {
                    sum.into_iter().map(|v| v / count as f64).collect()
                }
            })
            .collect()
    }

    fn converged(&self, old: &[Vec<f64>], new: &[Vec<f64>]) -> bool {
        old.iter()
            .zip(new)
            .all(|(a, b)| Self::squared_distance(a, b) <= self.tol * self.tol)
    }

    /// Fits centroids to `rows`. Needs at least `n_clusters` rows.
    pub fn fit(&mut self, rows: &[Vec<f64>], rng: &mut dyn RngCore) -> Result<(), ClusteringError> {
        if rows.is_empty() || rows[0].is_empty() {
            return Err(ClusteringError::EmptyInput);
        }
        if self.n_clusters == 0 || rows.len() < self.n_clusters {
            return Err(ClusteringError::TooFewSamples {
                n_samples: rows.len(),
                n_clusters: self.n_clusters,
            });
        }

        let mut centroids = self.plusplus_init(rows, rng);
        let mut labels = vec![0; rows.len()];

        for iteration in 0..self.max_iter {
            labels = self.assign_labels(rows, &centroids);
            let new_centroids = self.update_centroids(rows, &labels, &centroids);
            let done = self.converged(&centroids, &new_centroids);
            centroids = new_centroids;
            self.n_iter = iteration + 1;
            if done {
                break;
            }
        }

        self.inertia = rows
            .iter()
            .zip(&labels)
            .map(|(row, &label)| Self::squared_distance(row, &centroids[label]))
            .sum();
        self.centroids = Some(centroids);
        Ok(())
    }

    /// Labels for `rows` against the fitted centroids.
    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<usize>, ClusteringError> {
        let centroids = self.centroids.as_ref().ok_or(ClusteringError::NotFitted)?;
        if let Some(row) = rows.iter().find(|row| row.len() != centroids[0].len()) {
            return Err(ClusteringError::DimensionMismatch {
                expected: centroids[0].len(),
                got: row.len(),
            });
        }
        Ok(self.assign_labels(rows, centroids))
    }
}
