//! Classifiers that score feature subsets.

mod forest;
mod tree;

pub use forest::*;
pub use tree::*;

use crate::data::Dataset;
use crate::*;

/// Anything that can be trained on a dataset and report held-out quality.
///
/// The search only ever calls `fit` followed by `score`, always with
/// datasets restricted to the same feature subset.
pub trait Classifier {
    /// Train from scratch on `train`, discarding any previous fit.
    fn fit(&mut self, train: &Dataset) -> Result<(), SelectionError>;
    /// Predicted label of row `i` of `data`.
    fn predict(&self, data: &Dataset, i: usize) -> Label;
    /// Share of rows of `test` predicted correctly.
    fn score(&self, test: &Dataset) -> Result<Reward, SelectionError> {
        if test.is_empty() {
            return Err(SelectionError::EvaluationFailure("empty test set".into()));
        }
        let hits = (0..test.len())
            .filter(|&i| self.predict(test, i) == test.labels()[i])
            .count();
        Ok(hits as Reward / test.len() as Reward)
    }
}
