use super::ClusteringError;
use serde::{Deserialize, Serialize};

/// Min-max feature scaling to [0, 1].
///
/// Fit learns per-column minima and maxima; transform maps each value to
/// `(v - min) / (max - min)`. A constant column maps to 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinMaxScaler {
    data_min: Option<Vec<f64>>,
    data_max: Option<Vec<f64>>,
}

impl MinMaxScaler {
    pub fn new() -> MinMaxScaler {
        MinMaxScaler::default()
    }

    pub fn is_fitted(&self) -> bool {
        self.data_min.is_some()
    }

    /// Learns column ranges from `rows`. Every row must have the same width.
    pub fn fit(&mut self, rows: &[Vec<f64>]) -> Result<(), ClusteringError> {
        let first = rows.first().ok_or(ClusteringError::EmptyInput)?;
        let n_features = first.len();
        if n_features == 0 {
            return Err(ClusteringError::EmptyInput);
        }

        let mut data_min = vec![f64::INFINITY; n_features];
        let mut data_max = vec![f64::NEG_INFINITY; n_features];
        for row in rows {
            if row.len() != n_features {
                return Err(ClusteringError::DimensionMismatch {
                    expected: n_features,
                    got: row.len(),
                });
            }
            for (j, &value) in row.iter().enumerate() {
                data_min[j] = data_min[j].min(value);
                data_max[j] = data_max[j].max(value);
            }
        }

        self.data_min = Some(data_min);
        self.data_max = Some(data_max);
        Ok(())
    }

    pub fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ClusteringError> {
        let data_min = self.data_min.as_ref().ok_or(ClusteringError::NotFitted)?;
        let data_max = self.data_max.as_ref().ok_or(ClusteringError::NotFitted)?;

        rows.iter()
            .map(|row| {
                if row.len() != data_min.len() {
                    return Err(ClusteringError::DimensionMismatch {
                        expected: data_min.len(),
                        got: row.len(),
                    });
                }
                Ok(row
                    .iter()
                    .enumerate()
                    .map(|(j, &value)| {
                        let range = data_max[j] - data_min[j];
                        if range == 0.0 {
                            0.0
                        } else {
                            (value - data_min[j]) / range
                        }
                    })
                    .collect())
            })
            .collect()
    }

    pub fn fit_transform(&mut self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ClusteringError> {
        self.fit(rows)?;
        self.transform(rows)
    }
}
