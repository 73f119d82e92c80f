use super::*;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Bagged ensemble of shallow [`Tree`]s voting by majority.
///
/// Each fit reseeds from the configured seed and the identity of the
/// training features, so refitting the same subset reproduces the same
/// forest regardless of how many other subsets were fitted before.
#[derive(Debug, Clone)]
pub struct Forest {
    trees: usize,
    depth: usize,
    seed: u64,
    classes: usize,
    fitted: Vec<Tree>,
}

impl Forest {
    pub fn new(trees: usize, depth: usize, seed: u64) -> Self {
        Self {
            trees,
            depth,
            seed,
            classes: 0,
            fitted: Vec::new(),
        }
    }

    /// Mean normalized importance of each training column.
    pub fn importances(&self) -> Vec<f32> {
        let width = self.fitted.first().map_or(0, |t| t.importances().len());
        let n = self.fitted.len().max(1) as f32;
        (0..width)
            .map(|j| self.fitted.iter().map(|t| t.importances()[j]).sum::<f32>() / n)
            .collect()
    }

    /// deterministically seeding the same Forest for the same feature subset
    /// requires the rng to depend on nothing but the seed and the subset
    fn rng(&self, train: &Dataset) -> SmallRng {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::Hash;
        use std::hash::Hasher;
        let ref mut hasher = DefaultHasher::new();
        self.seed.hash(hasher);
        train.features().hash(hasher);
        SmallRng::seed_from_u64(hasher.finish())
    }
}

impl Default for Forest {
    fn default() -> Self {
        Self::new(FOREST_TREES, FOREST_DEPTH, SEED)
    }
}

impl Classifier for Forest {
    fn fit(&mut self, train: &Dataset) -> Result<(), SelectionError> {
        if train.is_empty() {
            return Err(SelectionError::EvaluationFailure("empty training set".into()));
        }
        let ref mut rng = self.rng(train);
        let n = train.len();
        let mtry = (train.width() as f32).sqrt().ceil().max(1.0) as usize;
        self.classes = train.classes();
        self.fitted = (0..self.trees.max(1))
            .map(|_| {
                let rows = (0..n).map(|_| rng.random_range(0..n)).collect::<Vec<_>>();
                Tree::grow(train, &rows, self.depth, mtry, rng)
            })
            .collect();
        Ok(())
    }

    fn predict(&self, data: &Dataset, i: usize) -> Label {
        let mut votes = vec![0; self.classes.max(1)];
        self.fitted
            .iter()
            .map(|tree| tree.predict(data, i))
            .for_each(|label| votes[label] += 1);
        majority(&votes)
    }
}
