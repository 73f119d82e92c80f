use crate::*;

/// Single-shot early stop for one episode.
///
/// Only the second step of an episode is checked: if the current state's
/// freshly updated value sits below its successor's value, the episode
/// stops after that step. Every other step passes unchecked.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stagnation {
    steps: usize,
    stopped: bool,
}

impl Stagnation {
    /// Record one step. Returns true once the episode should stop.
    pub fn observe(&mut self, current: Value, successor: Value) -> bool {
        if self.steps == 1 && current < successor {
            log::warn!("value fell to {:.4} below successor {:.4}", current, successor);
            self.stopped = true;
        }
        self.steps += 1;
        self.stopped
    }
    pub fn stopped(&self) -> bool {
        self.stopped
    }
    pub fn steps(&self) -> usize {
        self.steps
    }
}
