use super::*;
use crate::*;

/// Per-feature play counts and Average Observed Rewards.
///
/// The "reward" averaged here is the value estimate of the state a feature
/// was added from, not the quality of the state it led to.
#[derive(Debug, Clone, PartialEq)]
pub struct AorTable {
    plays: Vec<u32>,
    rewards: Vec<Value>,
}

impl AorTable {
    /// Zeroed table over features `0..n`.
    pub fn new(n: usize) -> Self {
        Self {
            plays: vec![0; n],
            rewards: vec![0.0; n],
        }
    }

    /// Number of features tracked.
    pub fn len(&self) -> usize {
        self.plays.len()
    }
    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }
    pub fn plays(&self) -> &[u32] {
        &self.plays
    }
    pub fn rewards(&self) -> &[Value] {
        &self.rewards
    }
    pub fn play(&self, feature: Feature) -> u32 {
        self.plays[feature]
    }
    pub fn reward(&self, feature: Feature) -> Value {
        self.rewards[feature]
    }

    /// Credit the added feature with the predecessor's value estimate.
    ///
    /// avg' = ((plays - 1) * avg + V(from)) / (plays + 1), using the play
    /// count from before the increment. The first play therefore stores
    /// V(from) outright and the second play halves the new value, dropping
    /// the first.
    pub fn record_transition(&mut self, transition: &Transition) -> Feature {
        let feature = transition.feature();
        let played = self.plays[feature] as Value;
        let average = self.rewards[feature];
        self.plays[feature] += 1;
        self.rewards[feature] =
            ((played - 1.0) * average + transition.source().value()) / (played + 1.0);
        log::trace!(
            "aor[{}] {:.4} -> {:.4} ({} plays)",
            feature,
            average,
            self.rewards[feature],
            self.plays[feature]
        );
        feature
    }

    #[cfg(test)]
    pub(crate) fn set(&mut self, feature: Feature, plays: u32, reward: Value) {
        self.plays[feature] = plays;
        self.rewards[feature] = reward;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A state with `features` whose value estimate is `value`.
    fn valued(features: &[Feature], value: Value) -> EpisodeState {
        EpisodeState::new(Position::from((features.len(), 0)), features.to_vec()).with_value(value)
    }

    #[test]
    fn first_play_stores_predecessor_value() {
        let mut aor = AorTable::new(4);
        let from = valued(&[1], 0.8);
        let to = valued(&[1, 3], 0.0);
        let feature = aor.record_transition(&Transition::from((&from, &to)));
        assert_eq!(feature, 3);
        assert_eq!(aor.play(3), 1);
        assert!((aor.reward(3) - 0.8).abs() < 1e-6);
        assert_eq!(aor.plays(), &[0, 0, 0, 1]);
        assert_eq!(&aor.rewards()[..3], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn second_play_discards_previous_average() {
        let mut aor = AorTable::new(2);
        let to = valued(&[0, 1], 0.0);
        aor.record_transition(&Transition::from((&valued(&[0], 0.8), &to)));
        aor.record_transition(&Transition::from((&valued(&[0], 0.6), &to)));
        assert_eq!(aor.play(1), 2);
        assert!((aor.reward(1) - 0.3).abs() < 1e-6, "(0 * 0.8 + 0.6) / 2");
    }

    #[test]
    fn third_play_weights_history() {
        let mut aor = AorTable::new(2);
        aor.set(1, 2, 0.3);
        let to = valued(&[1], 0.0);
        aor.record_transition(&Transition::from((&valued(&[], 0.9), &to)));
        assert_eq!(aor.play(1), 3);
        assert!((aor.reward(1) - (0.3 + 0.9) / 3.0).abs() < 1e-6);
    }

    #[test]
    fn plays_never_decrease() {
        let mut aor = AorTable::new(3);
        let to = valued(&[2], 0.0);
        let mut last = 0;
        for value in [0.5, -0.2, 0.0, 1.0] {
            aor.record_transition(&Transition::from((&valued(&[], value), &to)));
            assert!(aor.play(2) > last);
            last = aor.play(2);
        }
    }
}
