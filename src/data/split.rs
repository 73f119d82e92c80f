use super::*;
use crate::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// A seeded train/test partition of one dataset.
///
/// The same dataset, fraction and seed always produce the same partition.
#[derive(Debug, Clone)]
pub struct Split {
    train: Dataset,
    test: Dataset,
}

impl Split {
    /// Shuffle rows with `seed` and hold out `ceil(fraction * len)` of them.
    pub fn new(data: &Dataset, fraction: f32, seed: u64) -> Result<Self, SelectionError> {
        let n = data.len();
        // f32 fractions like 0.33 sit slightly above their decimal value
        let held = (fraction as f64 * n as f64 - 1e-6).ceil().max(0.0) as usize;
        if held == 0 || held >= n {
            return Err(SelectionError::InvalidDataset(format!(
                "cannot hold out {} of {} samples",
                held, n
            )));
        }
        let ref mut rng = SmallRng::seed_from_u64(seed);
        let mut order = (0..n).collect::<Vec<_>>();
        order.shuffle(rng);
        let (test, train) = order.split_at(held);
        Ok(Self {
            train: data.rows(train),
            test: data.rows(test),
        })
    }

    pub fn train(&self) -> &Dataset {
        &self.train
    }
    pub fn test(&self) -> &Dataset {
        &self.test
    }

    /// Both halves restricted to `subset`.
    pub fn select(&self, subset: &[Feature]) -> Self {
        Self {
            train: self.train.select(subset),
            test: self.test.select(subset),
        }
    }
}
