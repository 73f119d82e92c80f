use super::*;
use std::collections::BTreeMap;

/// Every state discovered so far, grouped by depth.
///
/// Within one depth no two entries hold the same feature sequence. A
/// state's ordinal is its slot in its depth's list, assigned when first
/// filed and kept across replacements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateMemo {
    depths: BTreeMap<usize, Vec<EpisodeState>>,
}

impl StateMemo {
    /// States recorded at `depth`, in discovery order.
    pub fn depth(&self, depth: usize) -> &[EpisodeState] {
        self.depths.get(&depth).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, position: Position) -> Option<&EpisodeState> {
        self.depth(position.depth).get(position.ordinal)
    }

    /// Stored state with exactly these features, if any.
    pub fn find(&self, features: &[crate::Feature]) -> Option<&EpisodeState> {
        self.depth(features.len())
            .iter()
            .find(|s| s.features() == features)
    }

    /// Slot the next new state at `depth` will occupy.
    pub fn next_ordinal(&self, depth: usize) -> usize {
        self.depth(depth).len()
    }

    /// Total states across all depths.
    pub fn len(&self) -> usize {
        self.depths.values().map(Vec::len).sum()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &EpisodeState> {
        self.depths.values().flatten()
    }

    /// Replace the entry with the same feature sequence, or append.
    /// Returns the position the state now occupies.
    pub fn upsert(&mut self, mut state: EpisodeState) -> Position {
        let list = self.depths.entry(state.depth()).or_default();
        let ordinal = list
            .iter()
            .position(|s| s.features() == state.features())
            .unwrap_or(list.len());
        state.place(ordinal);
        let position = state.position();
        match list.get_mut(ordinal) {
            Some(slot) => *slot = state,
            None => list.push(state),
        }
        position
    }

    /// Highest-valued non-empty subset, if any state has a positive value.
    pub fn best(&self) -> Option<&EpisodeState> {
        self.depths
            .range(1..)
            .flat_map(|(_, states)| states)
            .filter(|s| s.value() > 0.0)
            .fold(None, |best: Option<&EpisodeState>, s| match best {
                Some(b) if b.value() >= s.value() => Some(b),
                _ => Some(s),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(features: &[crate::Feature]) -> EpisodeState {
        EpisodeState::new(Position::from((features.len(), 0)), features.to_vec())
    }

    #[test]
    fn upsert_is_idempotent() {
        let mut memo = StateMemo::default();
        let a = memo.upsert(state(&[1, 2]));
        let b = memo.upsert(state(&[1, 2]));
        assert_eq!(a, b);
        assert_eq!(memo.depth(2).len(), 1);
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn order_matters_for_identity() {
        let mut memo = StateMemo::default();
        memo.upsert(state(&[1, 2]));
        memo.upsert(state(&[2, 1]));
        assert_eq!(memo.depth(2).len(), 2);
        assert_eq!(memo.get(Position::from((2, 1))).unwrap().features(), &[2, 1]);
    }

    #[test]
    fn replacement_keeps_slot() {
        let mut memo = StateMemo::default();
        memo.upsert(state(&[0]));
        memo.upsert(state(&[3]));
        memo.upsert(state(&[5]));
        let replaced = memo.upsert(state(&[3]).with_value(0.7));
        assert_eq!(replaced, Position::from((1, 1)));
        assert_eq!(memo.depth(1).len(), 3);
        assert_eq!(memo.find(&[3]).unwrap().value(), 0.7);
        assert_eq!(memo.next_ordinal(1), 3);
        assert_eq!(memo.next_ordinal(4), 0);
    }

    #[test]
    fn no_duplicates_after_many_upserts() {
        let mut memo = StateMemo::default();
        for round in 0..3 {
            for features in [vec![0], vec![1], vec![0, 1], vec![1, 0], vec![0, 1, 2]] {
                memo.upsert(state(&features).with_value(round as f32));
            }
        }
        for depth in 0..4 {
            let states = memo.depth(depth);
            for (i, a) in states.iter().enumerate() {
                assert_eq!(a.position(), Position::from((depth, i)));
                for b in &states[i + 1..] {
                    assert_ne!(a.features(), b.features());
                }
            }
        }
        assert_eq!(memo.len(), 5);
    }

    #[test]
    fn best_skips_root() {
        let mut memo = StateMemo::default();
        assert!(memo.best().is_none());
        memo.upsert(state(&[]).with_value(5.0));
        memo.upsert(state(&[2]));
        assert!(memo.best().is_none());
        memo.upsert(state(&[1]).with_value(0.4));
        memo.upsert(state(&[1, 0]).with_value(0.9));
        memo.upsert(state(&[2, 0]).with_value(0.9));
        assert_eq!(memo.best().unwrap().features(), &[1, 0]);
    }
}
