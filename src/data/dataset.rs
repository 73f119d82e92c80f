use crate::*;

/// Column-major feature matrix with one class label per row.
///
/// Every column remembers which feature of the full dataset it holds,
/// so a restricted view still reports original feature indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Vec<Feature>,
    columns: Vec<Vec<f32>>,
    labels: Vec<Label>,
}

impl Dataset {
    /// Build from row-major samples.
    pub fn new(rows: Vec<Vec<f32>>, labels: Vec<Label>) -> Result<Self, SelectionError> {
        if rows.len() != labels.len() {
            return Err(SelectionError::InvalidDataset(format!(
                "{} rows but {} labels",
                rows.len(),
                labels.len()
            )));
        }
        let width = rows.first().map_or(0, Vec::len);
        if let Some(i) = rows.iter().position(|r| r.len() != width) {
            return Err(SelectionError::InvalidDataset(format!(
                "row {} has {} values, expected {}",
                i,
                rows[i].len(),
                width
            )));
        }
        if rows.iter().flatten().any(|x| !x.is_finite()) {
            return Err(SelectionError::InvalidDataset("non-finite feature value".into()));
        }
        let columns = (0..width)
            .map(|j| rows.iter().map(|r| r[j]).collect())
            .collect();
        Ok(Self {
            features: (0..width).collect(),
            columns,
            labels,
        })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.labels.len()
    }
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
    /// Number of feature columns in this view.
    pub fn width(&self) -> usize {
        self.columns.len()
    }
    /// Original feature index of each column.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }
    pub fn column(&self, j: usize) -> &[f32] {
        &self.columns[j]
    }
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }
    /// Number of distinct classes, assuming labels are dense from zero.
    pub fn classes(&self) -> usize {
        self.labels.iter().max().map_or(0, |&l| l + 1)
    }
    /// Row `i` as a fresh vector, in column order.
    pub fn row(&self, i: usize) -> Vec<f32> {
        self.columns.iter().map(|c| c[i]).collect()
    }

    /// Restrict to the given original features, in the given order.
    /// Features absent from this view are ignored.
    pub fn select(&self, subset: &[Feature]) -> Self {
        let (features, columns): (Vec<Feature>, Vec<Vec<f32>>) = subset
            .iter()
            .filter_map(|f| self.features.iter().position(|g| g == f))
            .map(|j| (self.features[j], self.columns[j].clone()))
            .unzip();
        Self {
            features,
            columns,
            labels: self.labels.clone(),
        }
    }

    /// Keep the given rows, in the given order.
    pub fn rows(&self, indices: &[usize]) -> Self {
        Self {
            features: self.features.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| indices.iter().map(|&i| c[i]).collect())
                .collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(
            vec![
                vec![1.0, 2.0, 3.0],
                vec![4.0, 5.0, 6.0],
                vec![7.0, 8.0, 9.0],
            ],
            vec![0, 1, 1],
        )
        .unwrap()
    }

    #[test]
    fn column_major() {
        let data = sample();
        assert_eq!(data.width(), 3);
        assert_eq!(data.len(), 3);
        assert_eq!(data.column(1), &[2.0, 5.0, 8.0]);
        assert_eq!(data.row(2), vec![7.0, 8.0, 9.0]);
        assert_eq!(data.classes(), 2);
    }

    #[test]
    fn select_keeps_original_indices() {
        let view = sample().select(&[2, 0]);
        assert_eq!(view.features(), &[2, 0]);
        assert_eq!(view.column(0), &[3.0, 6.0, 9.0]);
        let nested = view.select(&[0]);
        assert_eq!(nested.features(), &[0]);
        assert_eq!(nested.column(0), &[1.0, 4.0, 7.0]);
        assert_eq!(sample().select(&[]).width(), 0);
    }

    #[test]
    fn rows_subset() {
        let part = sample().rows(&[2, 0]);
        assert_eq!(part.labels(), &[1, 0]);
        assert_eq!(part.column(0), &[7.0, 1.0]);
    }

    #[test]
    fn rejects_ragged_rows() {
        let ragged = Dataset::new(vec![vec![1.0, 2.0], vec![3.0]], vec![0, 1]);
        assert!(matches!(ragged, Err(SelectionError::InvalidDataset(_))));
        let short = Dataset::new(vec![vec![1.0]], vec![0, 1]);
        assert!(matches!(short, Err(SelectionError::InvalidDataset(_))));
        let nan = Dataset::new(vec![vec![f32::NAN]], vec![0]);
        assert!(matches!(nan, Err(SelectionError::InvalidDataset(_))));
    }
}
