use crate::data::Dataset;
use crate::*;
use rand::rngs::SmallRng;

/// One node of a [`Tree`], stored in a flat arena.
#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf(Label),
    Split {
        column: usize,
        threshold: f32,
        lo: usize,
        hi: usize,
    },
}

/// Depth-limited CART classification tree with Gini impurity.
///
/// Columns are addressed by position in the training view, so the tree
/// must be queried with a dataset restricted to the same features.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    importances: Vec<f32>,
}

/// Best split found at one node.
struct Cut {
    column: usize,
    threshold: f32,
    gain: f32,
}

impl Tree {
    /// Grow a tree over `rows` of `data`, trying `mtry` random columns per node.
    pub fn grow(
        data: &Dataset,
        rows: &[usize],
        depth: usize,
        mtry: usize,
        rng: &mut SmallRng,
    ) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            importances: vec![0.0; data.width()],
        };
        tree.build(data, rows.to_vec(), depth, mtry, rng);
        let total = tree.importances.iter().sum::<f32>();
        if total > 0.0 {
            tree.importances.iter_mut().for_each(|x| *x /= total);
        }
        tree
    }

    /// Normalized impurity decrease attributed to each column.
    pub fn importances(&self) -> &[f32] {
        &self.importances
    }

    pub fn depth(&self) -> usize {
        self.measure(0)
    }

    pub fn predict(&self, data: &Dataset, i: usize) -> Label {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                Node::Leaf(label) => return label,
                Node::Split {
                    column,
                    threshold,
                    lo,
                    hi,
                } => index = if data.column(column)[i] <= threshold { lo } else { hi },
            }
        }
    }

    fn measure(&self, index: usize) -> usize {
        match self.nodes[index] {
            Node::Leaf(_) => 0,
            Node::Split { lo, hi, .. } => 1 + self.measure(lo).max(self.measure(hi)),
        }
    }

    /// Push the subtree over `rows` and return its root index.
    fn build(
        &mut self,
        data: &Dataset,
        rows: Vec<usize>,
        depth: usize,
        mtry: usize,
        rng: &mut SmallRng,
    ) -> usize {
        let ref counts = tally(data, &rows);
        let index = self.nodes.len();
        self.nodes.push(Node::Leaf(majority(counts)));
        if depth == 0 || rows.len() < 2 || gini(counts, rows.len()) == 0.0 {
            return index;
        }
        let columns = rand::seq::index::sample(rng, data.width(), mtry.min(data.width()));
        let Some(cut) = columns
            .iter()
            .filter_map(|column| best(data, &rows, column, counts))
            .fold(None, |best: Option<Cut>, cut| match best {
                Some(b) if b.gain >= cut.gain => Some(b),
                _ => Some(cut),
            })
        else {
            return index;
        };
        self.importances[cut.column] += cut.gain;
        let (lo, hi) = rows
            .into_iter()
            .partition::<Vec<_>, _>(|&i| data.column(cut.column)[i] <= cut.threshold);
        let lo = self.build(data, lo, depth - 1, mtry, rng);
        let hi = self.build(data, hi, depth - 1, mtry, rng);
        self.nodes[index] = Node::Split {
            column: cut.column,
            threshold: cut.threshold,
            lo,
            hi,
        };
        index
    }
}

/// Best threshold on one column by weighted Gini decrease.
fn best(data: &Dataset, rows: &[usize], column: usize, counts: &[usize]) -> Option<Cut> {
    let values = data.column(column);
    let mut sorted = rows.to_vec();
    sorted.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    let n = sorted.len();
    let parent = n as f32 * gini(counts, n);
    let mut lo = vec![0; counts.len()];
    let mut hi = counts.to_vec();
    let mut best: Option<Cut> = None;
    for k in 1..n {
        let label = data.labels()[sorted[k - 1]];
        lo[label] += 1;
        hi[label] -= 1;
        let (a, b) = (values[sorted[k - 1]], values[sorted[k]]);
        if a == b {
            continue;
        }
        let gain = parent - k as f32 * gini(&lo, k) - (n - k) as f32 * gini(&hi, n - k);
        if gain > 1e-6 && best.as_ref().map_or(true, |c| gain > c.gain) {
            best = Some(Cut {
                column,
                threshold: a + (b - a) / 2.0,
                gain,
            });
        }
    }
    best
}

fn tally(data: &Dataset, rows: &[usize]) -> Vec<usize> {
    let mut counts = vec![0; data.classes()];
    rows.iter().for_each(|&i| counts[data.labels()[i]] += 1);
    counts
}

/// Most frequent label, lowest label on ties.
pub(crate) fn majority(counts: &[usize]) -> Label {
    counts
        .iter()
        .enumerate()
        .fold((0, 0), |(l, c), (label, &count)| if count > c { (label, count) } else { (l, c) })
        .0
}

fn gini(counts: &[usize], n: usize) -> f32 {
    if n == 0 {
        return 0.0;
    }
    1.0 - counts
        .iter()
        .map(|&c| c as f32 / n as f32)
        .map(|p| p * p)
        .sum::<f32>()
}
