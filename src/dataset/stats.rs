use super::song::AUDIO_FEATURES;
use super::table::SongTable;
use serde::Serialize;

/// Summary statistics for one numeric column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Pearson correlation over the numeric columns, the data behind the
/// dashboard heatmap. `values[i][j]` correlates column i with column j.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

fn column(table: &SongTable, feature_index: usize) -> Vec<f64> {
    table
        .iter()
        .map(|song| song.features()[feature_index])
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation; 0 for fewer than two values.
fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Per-column count / mean / std / min / max, one entry per audio feature.
pub fn describe(table: &SongTable) -> Vec<ColumnSummary> {
    AUDIO_FEATURES
        .iter()
        .enumerate()
        .map(|(feature_index, &name)| {
            let values = column(table, feature_index);
            let mean = mean(&values);
            ColumnSummary {
                column: name.to_owned(),
                count: values.len(),
                mean,
                std: std_dev(&values, mean),
                min: values.iter().copied().fold(f64::INFINITY, f64::min),
                max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            }
        })
        .collect()
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let mean_a = mean(a);
    let mean_b = mean(b);
    let mut covariance = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        covariance += (x - mean_a) * (y - mean_b);
        var_a += (x - mean_a).powi(2);
        var_b += (y - mean_b).powi(2);
    }
    let denominator = (var_a * var_b).sqrt();
    if denominator == 0.0 {
        // Constant column, correlation is undefined.
        return 0.0;
    }
    covariance / denominator
}

pub fn correlation(table: &SongTable) -> CorrelationMatrix {
    let columns: Vec<Vec<f64>> = (0..AUDIO_FEATURES.len())
        .map(|feature_index| column(table, feature_index))
        .collect();

    let values = columns
        .iter()
        .map(|a| columns.iter().map(|b| pearson(a, b)).collect())
        .collect();

    CorrelationMatrix {
        columns: AUDIO_FEATURES.iter().map(|&name| name.to_owned()).collect(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::table::tests::make_song;

    fn fixture_table() -> SongTable {
        let mut songs = Vec::new();
        for (i, tempo) in [100.0, 120.0, 140.0].iter().enumerate() {
            let mut song = make_song(&i.to_string(), "song", "artist");
            song.tempo = *tempo;
            // Energy moves with tempo, valence against it.
            song.energy = tempo / 200.0;
            song.valence = 1.0 - tempo / 200.0;
            songs.push(song);
        }
        SongTable::from_songs(songs).unwrap()
    }

    #[test]
    fn describe_covers_every_feature() {
        let summaries = describe(&fixture_table());
        assert_eq!(summaries.len(), AUDIO_FEATURES.len());

        let tempo = summaries.iter().find(|s| s.column == "tempo").unwrap();
        assert_eq!(tempo.count, 3);
        assert!((tempo.mean - 120.0).abs() < 1e-9);
        assert!((tempo.std - 20.0).abs() < 1e-9);
        assert_eq!(tempo.min, 100.0);
        assert_eq!(tempo.max, 140.0);
    }

    #[test]
    fn correlation_diagonal_is_one_for_varying_columns() {
        let matrix = correlation(&fixture_table());
        let tempo = matrix.columns.iter().position(|c| c == "tempo").unwrap();
        assert!((matrix.values[tempo][tempo] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn correlation_signs_match_the_data() {
        let matrix = correlation(&fixture_table());
        let tempo = matrix.columns.iter().position(|c| c == "tempo").unwrap();
        let energy = matrix.columns.iter().position(|c| c == "energy").unwrap();
        let valence = matrix.columns.iter().position(|c| c == "valence").unwrap();

        assert!((matrix.values[tempo][energy] - 1.0).abs() < 1e-9);
        assert!((matrix.values[tempo][valence] + 1.0).abs() < 1e-9);
    }

    #[test]
    fn constant_column_correlates_to_zero() {
        let matrix = correlation(&fixture_table());
        let tempo = matrix.columns.iter().position(|c| c == "tempo").unwrap();
        let mode = matrix.columns.iter().position(|c| c == "mode").unwrap();
        assert_eq!(matrix.values[tempo][mode], 0.0);
    }
}
