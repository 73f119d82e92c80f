use super::*;
use crate::data::Split;
use crate::model::Classifier;
use crate::*;
use rand::Rng;
use rand::seq::IndexedRandom;

/// Where a state sits in the memo: subset size and slot within that depth.
///
/// A weak reference, not an identity. Fresh states claim ordinal 0 until
/// the memo files them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub depth: usize,
    pub ordinal: usize,
}

impl From<(usize, usize)> for Position {
    fn from((depth, ordinal): (usize, usize)) -> Self {
        Self { depth, ordinal }
    }
}

/// A node of the subset lattice visited by the search.
///
/// `features` keeps insertion order: the last element is the feature
/// whose addition produced this state.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeState {
    position: Position,
    features: Vec<Feature>,
    value: Value,
    quality: Option<Reward>,
    visits: usize,
}

impl EpisodeState {
    /// The empty subset at (0, 0).
    pub fn empty() -> Self {
        Self::new(Position::default(), Vec::new())
    }

    pub fn new(position: Position, features: Vec<Feature>) -> Self {
        debug_assert!(position.depth == features.len());
        Self {
            position,
            features,
            value: 0.0,
            quality: None,
            visits: 0,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }
    pub fn depth(&self) -> usize {
        self.position.depth
    }
    pub fn features(&self) -> &[Feature] {
        &self.features
    }
    /// The feature added last along the trajectory.
    pub fn last(&self) -> Option<Feature> {
        self.features.last().copied()
    }
    pub fn value(&self) -> Value {
        self.value
    }
    /// Held-out score, once evaluated.
    pub fn quality(&self) -> Option<Reward> {
        self.quality
    }
    pub fn visits(&self) -> usize {
        self.visits
    }

    pub(crate) fn place(&mut self, ordinal: usize) {
        self.position.ordinal = ordinal;
    }

    #[cfg(test)]
    pub(crate) fn with_value(mut self, value: Value) -> Self {
        self.value = value;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_visits(mut self, visits: usize) -> Self {
        self.visits = visits;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_quality(mut self, quality: Reward) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Score this subset with `classifier`, training at most once per state.
    pub fn evaluate_quality<C>(&mut self, split: &Split, classifier: &mut C) -> Result<Reward, SelectionError>
    where
        C: Classifier,
    {
        if let Some(quality) = self.quality {
            return Ok(quality);
        }
        let ref view = split.select(&self.features);
        classifier.fit(view.train())?;
        let quality = classifier.score(view.test())?;
        if !quality.is_finite() {
            return Err(SelectionError::EvaluationFailure(format!(
                "non-finite score {} for {:?}",
                quality, self.features
            )));
        }
        log::trace!("evaluated {:?} -> {:.4}", self.features, quality);
        self.quality = Some(quality);
        Ok(quality)
    }

    /// Known successors one level deeper: memo entries whose features
    /// minus the last one equal ours.
    pub fn children<'memo>(
        &self,
        memo: &'memo StateMemo,
    ) -> impl Iterator<Item = &'memo EpisodeState> + use<'memo> {
        let prefix = self.features.clone();
        memo.depth(self.depth() + 1)
            .iter()
            .filter(move |child| child.features.split_last().map(|(_, head)| head) == Some(&prefix[..]))
    }

    /// Pick the successor state and count the visit.
    ///
    /// An unvisited state, or one with no known children, appends a feature
    /// drawn uniformly from those not yet included. Otherwise the known child
    /// whose last feature has the highest average observed reward wins,
    /// first in memo order on ties. The exploration rate is carried but the
    /// epsilon-greedy branch is inactive.
    pub fn choose_next<R>(
        &mut self,
        memo: &StateMemo,
        _exploration: f32,
        aor: &AorTable,
        rng: &mut R,
    ) -> Result<EpisodeState, SelectionError>
    where
        R: Rng,
    {
        let greedy = match self.visits {
            0 => None,
            _ => self.children(memo).fold(None, |best: Option<&EpisodeState>, child| {
                match best {
                    Some(b) if aor.reward(tail(b)) >= aor.reward(tail(child)) => Some(b),
                    _ => Some(child),
                }
            }),
        };
        let next = match greedy {
            Some(child) => child.clone(),
            None => {
                let choices = (0..aor.len())
                    .filter(|f| !self.features.contains(f))
                    .collect::<Vec<_>>();
                let feature = *choices
                    .choose(rng)
                    .ok_or(SelectionError::ExplorationExhausted { depth: self.depth() })?;
                let features = self.features.iter().copied().chain(Some(feature)).collect();
                EpisodeState::new(Position::from((self.depth() + 1, 0)), features)
            }
        };
        debug_assert!(next.features.len() == self.features.len() + 1);
        debug_assert!(next.features.starts_with(&self.features));
        self.visits += 1;
        Ok(next)
    }

    /// One-step TD update bootstrapped from the successor's value, with
    /// this state's own quality as the immediate reward.
    pub fn update_value(&mut self, alpha: f32, gamma: f32, next: Value) {
        debug_assert!(self.quality.is_some(), "update before evaluation");
        let reward = self.quality.unwrap_or_default();
        self.value += alpha * (reward + gamma * next - self.value);
    }

    /// Holds every feature the run allows.
    pub fn is_terminal(&self, max: usize) -> bool {
        self.features.len() == max
    }

    /// Same features in the same order at the same position.
    pub fn equals(&self, other: &Self) -> bool {
        self.features == other.features && self.position == other.position
    }
}

fn tail(state: &EpisodeState) -> Feature {
    state.last().expect("children are never empty")
}
