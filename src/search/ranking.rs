use super::*;
use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// Final feature ranking read off the AOR table.
///
/// `index`, `plays` and `rewards` are aligned by feature index. `order`
/// lists features from least to most important by average reward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub index: Vec<Feature>,
    pub plays: Vec<u32>,
    pub rewards: Vec<Value>,
    pub order: Vec<Feature>,
}

impl From<&AorTable> for Ranking {
    fn from(aor: &AorTable) -> Self {
        let mut order = (0..aor.len()).collect::<Vec<_>>();
        order.sort_by(|&a, &b| aor.reward(a).total_cmp(&aor.reward(b)));
        Self {
            index: (0..aor.len()).collect(),
            plays: aor.plays().to_vec(),
            rewards: aor.rewards().to_vec(),
            order,
        }
    }
}

impl Ranking {
    /// The `k` most important features, most important last.
    pub fn top(&self, k: usize) -> &[Feature] {
        &self.order[self.order.len().saturating_sub(k)..]
    }
    /// Features left after dropping the `k` least important.
    pub fn without_least(&self, k: usize) -> &[Feature] {
        &self.order[k.min(self.order.len())..]
    }
}

#[rustfmt::skip]
impl std::fmt::Display for Ranking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "┌──────┬─────────┬─────────┬──────────┐")?;
        writeln!(f, "│ Rank │ Feature │   Plays │  Average │")?;
        writeln!(f, "├──────┼─────────┼─────────┼──────────┤")?;
        for (rank, &feature) in self.order.iter().rev().enumerate() {
            writeln!(
                f,
                "│ {:>4} │ {:>7} │ {:>7} │ {:>+8.4} │",
                rank + 1,
                feature,
                self.plays[feature],
                self.rewards[feature],
            )?;
        }
        writeln!(f, "└──────┴─────────┴─────────┴──────────┘")?;
        Ok(())
    }
}
