use crate::data::*;
use crate::model::*;
use crate::*;

/// Recursive feature elimination with a step of one.
///
/// Repeatedly fits a forest on the surviving features and drops the one
/// with the lowest impurity importance until `keep` remain.
#[derive(Debug, Clone)]
pub struct Rfe {
    keep: usize,
    forest: Forest,
}

impl Rfe {
    pub fn new(keep: usize, seed: u64) -> Self {
        Self {
            keep,
            forest: Forest::new(FOREST_TREES, BASELINE_DEPTH, seed),
        }
    }

    /// Surviving features of `train`, in their original order.
    pub fn select(&mut self, train: &Dataset) -> Result<Vec<Feature>, SelectionError> {
        if self.keep == 0 || self.keep > train.width() {
            return Err(SelectionError::InvalidConfiguration(format!(
                "cannot keep {} of {} features",
                self.keep,
                train.width()
            )));
        }
        let mut survivors = train.features().to_vec();
        while survivors.len() > self.keep {
            self.forest.fit(&train.select(&survivors))?;
            let weakest = self
                .forest
                .importances()
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| a.total_cmp(b))
                .map(|(j, _)| j)
                .expect("at least two survivors");
            log::trace!("rfe drops feature {}", survivors[weakest]);
            survivors.remove(weakest);
        }
        Ok(survivors)
    }

    /// Select on the training half, refit on the survivors and score the
    /// held-out half.
    pub fn score(&mut self, split: &Split) -> Result<(Vec<Feature>, Reward), SelectionError> {
        let survivors = self.select(split.train())?;
        let ref view = split.select(&survivors);
        self.forest.fit(view.train())?;
        let accuracy = self.forest.score(view.test())?;
        Ok((survivors, accuracy))
    }
}
