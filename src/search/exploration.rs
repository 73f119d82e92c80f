use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// Running step counters across a run, split on whether the state a step
/// left from still had a zero value estimate.
///
/// `explored` counts steps taken from zero-valued states and
/// `not_explored` counts the rest. The curves hold both running totals
/// at the end of every episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exploration {
    pub explored: usize,
    pub not_explored: usize,
    pub explored_curve: Vec<usize>,
    pub not_explored_curve: Vec<usize>,
}

impl Exploration {
    /// Count one step leaving a state with this value estimate.
    pub fn observe(&mut self, value: Value) {
        if value == 0.0 {
            self.explored += 1;
        } else {
            self.not_explored += 1;
        }
    }
    /// Snapshot both totals at the end of an episode.
    pub fn close(&mut self) {
        self.explored_curve.push(self.explored);
        self.not_explored_curve.push(self.not_explored);
    }
    pub fn steps(&self) -> usize {
        self.explored + self.not_explored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curves_are_running_totals() {
        let mut exploration = Exploration::default();
        exploration.observe(0.0);
        exploration.observe(0.2);
        exploration.close();
        exploration.observe(0.0);
        exploration.close();
        assert_eq!(exploration.explored_curve, vec![1, 2]);
        assert_eq!(exploration.not_explored_curve, vec![1, 1]);
        assert_eq!(exploration.steps(), 3);
    }
}
