use super::*;
use crate::data::*;
use crate::model::*;
use crate::search::Ranking;
use crate::*;
use rayon::prelude::*;
use serde::Serialize;

/// Learned and eliminated subsets of the same size, scored on the same split.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Round {
    /// Number of features each side keeps.
    pub size: usize,
    pub learned: Vec<Feature>,
    pub eliminated: Vec<Feature>,
    pub learned_accuracy: Reward,
    pub eliminated_accuracy: Reward,
    /// Whether the learned subset scored at least as well.
    pub is_better: bool,
}

/// The learned ranking against recursive elimination, one round per
/// subset size from `n - 1` features down to one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub rounds: Vec<Round>,
    pub learned_average: Reward,
    pub eliminated_average: Reward,
}

impl Comparison {
    /// Rounds are independent, so they are scored in parallel.
    pub fn new(split: &Split, ranking: &Ranking, seed: u64) -> Result<Self, SelectionError> {
        let n = ranking.order.len();
        if n < 2 || n != split.train().width() {
            return Err(SelectionError::InvalidConfiguration(format!(
                "ranking over {} features cannot be compared on {} columns",
                n,
                split.train().width()
            )));
        }
        let rounds = (1..n)
            .into_par_iter()
            .map(|k| Self::round(split, ranking.without_least(k), seed))
            .collect::<Result<Vec<_>, _>>()?;
        let mean = |f: fn(&Round) -> Reward| rounds.iter().map(f).sum::<Reward>() / rounds.len() as Reward;
        let comparison = Self {
            learned_average: mean(|r| r.learned_accuracy),
            eliminated_average: mean(|r| r.eliminated_accuracy),
            rounds,
        };
        log::info!(
            "average accuracy: learned {:.4}, eliminated {:.4}",
            comparison.learned_average,
            comparison.eliminated_average
        );
        Ok(comparison)
    }

    fn round(split: &Split, learned: &[Feature], seed: u64) -> Result<Round, SelectionError> {
        let ref view = split.select(learned);
        let mut forest = Forest::new(FOREST_TREES, BASELINE_DEPTH, seed);
        forest.fit(view.train())?;
        let learned_accuracy = forest.score(view.test())?;
        let (eliminated, eliminated_accuracy) = Rfe::new(learned.len(), seed).score(split)?;
        log::debug!(
            "{} features: learned {:?} {:.4}, eliminated {:?} {:.4}",
            learned.len(),
            learned,
            learned_accuracy,
            eliminated,
            eliminated_accuracy
        );
        Ok(Round {
            size: learned.len(),
            learned: learned.to_vec(),
            eliminated,
            learned_accuracy,
            eliminated_accuracy,
            is_better: learned_accuracy >= eliminated_accuracy,
        })
    }

    /// Rounds where the learned subset held its own.
    pub fn wins(&self) -> usize {
        self.rounds.iter().filter(|r| r.is_better).count()
    }
}

#[rustfmt::skip]
impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "┌──────┬──────────┬────────────┬────────┐")?;
        writeln!(f, "│ Size │  Learned │ Eliminated │ Better │")?;
        writeln!(f, "├──────┼──────────┼────────────┼────────┤")?;
        for round in self.rounds.iter() {
            writeln!(
                f,
                "│ {:>4} │ {:>8.4} │ {:>10.4} │ {:>6} │",
                round.size,
                round.learned_accuracy,
                round.eliminated_accuracy,
                if round.is_better { "yes" } else { "no" },
            )?;
        }
        writeln!(f, "├──────┼──────────┼────────────┼────────┤")?;
        writeln!(
            f,
            "│  avg │ {:>8.4} │ {:>10.4} │ {:>3}/{:<2} │",
            self.learned_average,
            self.eliminated_average,
            self.wins(),
            self.rounds.len(),
        )?;
        writeln!(f, "└──────┴──────────┴────────────┴────────┘")?;
        Ok(())
    }
}
