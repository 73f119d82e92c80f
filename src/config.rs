//! Run configuration.
use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// Where each episode begins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// The empty subset at (0, 0).
    #[default]
    Empty,
    /// A uniformly drawn non-empty subset below the cap.
    Random,
    /// The memo's empty-set state, carrying its visits and value.
    Resume,
}

/// Parameters of one selection run.
///
/// Missing fields fall back to the crate defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub episodes: usize,
    pub exploration: f32,
    pub alpha: f32,
    pub gamma: f32,
    /// Maximum subset size. `None` means every feature.
    pub cap: Option<usize>,
    pub seed: u64,
    pub origin: Origin,
    pub test_fraction: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            episodes: EPISODES,
            exploration: EXPLORATION_RATE,
            alpha: LEARNING_RATE,
            gamma: DISCOUNT,
            cap: None,
            seed: SEED,
            origin: Origin::Empty,
            test_fraction: TEST_FRACTION,
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file.
    pub fn load(path: &std::path::Path) -> Result<Self, SelectionError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SelectionError::InvalidConfiguration(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| SelectionError::InvalidConfiguration(format!("{}: {}", path.display(), e)))
    }

    /// Subset size at which an episode ends.
    pub fn cap(&self, n: usize) -> usize {
        self.cap.unwrap_or(n)
    }

    /// Deepest state from which the driver still steps.
    pub fn max_depth(&self, n: usize) -> usize {
        self.cap(n).saturating_sub(1)
    }

    /// Fail fast on anything that would make a run meaningless.
    pub fn validate(&self, n: usize) -> Result<(), SelectionError> {
        let invalid = |s: String| Err(SelectionError::InvalidConfiguration(s));
        let unit = |x: f32| x > 0.0 && x <= 1.0;
        if n <= 1 {
            return invalid(format!("need at least 2 features, got {}", n));
        }
        if self.episodes == 0 {
            return invalid("episode count must be positive".into());
        }
        if !unit(self.alpha) {
            return invalid(format!("learning rate {} outside (0, 1]", self.alpha));
        }
        if !unit(self.gamma) {
            return invalid(format!("discount {} outside (0, 1]", self.gamma));
        }
        if !(0.0..=1.0).contains(&self.exploration) {
            return invalid(format!("exploration rate {} outside [0, 1]", self.exploration));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return invalid(format!("test fraction {} outside (0, 1)", self.test_fraction));
        }
        match self.cap {
            Some(cap) if cap < 1 || cap > n => {
                invalid(format!("feature cap {} outside [1, {}]", cap, n))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Config::default().validate(14).is_ok());
        assert_eq!(Config::default().cap(14), 14);
        assert_eq!(Config::default().max_depth(14), 13);
    }

    #[test]
    fn rejects_bad_parameters() {
        let bad = [
            Config { episodes: 0, ..Config::default() },
            Config { alpha: 0.0, ..Config::default() },
            Config { alpha: 1.5, ..Config::default() },
            Config { gamma: -0.1, ..Config::default() },
            Config { exploration: 2.0, ..Config::default() },
            Config { test_fraction: 1.0, ..Config::default() },
            Config { cap: Some(0), ..Config::default() },
            Config { cap: Some(6), ..Config::default() },
        ];
        for config in bad {
            assert!(
                matches!(config.validate(5), Err(SelectionError::InvalidConfiguration(_))),
                "{:?} should be rejected",
                config
            );
        }
    }

    #[test]
    fn rejects_single_feature() {
        assert!(Config::default().validate(1).is_err());
        assert!(Config::default().validate(0).is_err());
    }

    #[test]
    fn unit_bounds_are_inclusive_above() {
        let config = Config {
            alpha: 1.0,
            gamma: 1.0,
            ..Config::default()
        };
        assert!(config.validate(3).is_ok());
    }

    #[test]
    fn partial_json() {
        let config: Config = serde_json::from_str(r#"{ "episodes": 7, "origin": "random" }"#)
            .expect("valid json");
        assert_eq!(config.episodes, 7);
        assert_eq!(config.origin, Origin::Random);
        assert_eq!(config.alpha, LEARNING_RATE);
    }
}
