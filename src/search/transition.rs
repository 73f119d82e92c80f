use super::*;
use crate::*;

/// A step from one state to a successor holding exactly one more feature.
#[derive(Debug, Clone, Copy)]
pub struct Transition<'a> {
    from: &'a EpisodeState,
    to: &'a EpisodeState,
}

impl<'a> From<(&'a EpisodeState, &'a EpisodeState)> for Transition<'a> {
    fn from((from, to): (&'a EpisodeState, &'a EpisodeState)) -> Self {
        debug_assert!(to.features().len() == from.features().len() + 1);
        debug_assert!(to.features().starts_with(from.features()));
        Self { from, to }
    }
}

impl<'a> Transition<'a> {
    pub fn source(&self) -> &'a EpisodeState {
        self.from
    }
    pub fn target(&self) -> &'a EpisodeState {
        self.to
    }
    /// The feature this step adds.
    pub fn feature(&self) -> Feature {
        self.to.last().expect("successor holds at least one feature")
    }
}
