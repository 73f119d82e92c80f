use super::*;
use crate::config::*;
use crate::data::*;
use crate::metrics::Progress;
use crate::model::Classifier;
use crate::*;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::time::Duration;
use std::time::Instant;

/// Runs selection episodes and owns everything they mutate.
///
/// The AOR table, state memo and rng live here and nowhere else, so
/// independent selectors never share search state. Episodes run strictly
/// in sequence because each one reads what the previous ones learned.
///
/// - Each episode starts at its origin and steps one feature at a time.
/// - Every step scores both ends, backs up the current state's value,
///   credits the added feature in the AOR table and files the current state.
/// - An episode ends when the successor would reach the cap, when no
///   feature is left to add, or when the second step shows stagnation.
pub struct Selector<C>
where
    C: Classifier,
{
    config: Config,
    n: usize,
    split: Split,
    classifier: C,
    aor: AorTable,
    memo: StateMemo,
    exploration: Exploration,
    rng: SmallRng,
    episodes: usize,
    steps: usize,
    start: Instant,
    checkpoint: Instant,
}

impl<C> Selector<C>
where
    C: Classifier,
{
    /// Validate `config` against `data` and split it once for the whole run.
    pub fn new(config: Config, data: &Dataset, classifier: C) -> Result<Self, SelectionError> {
        let n = data.width();
        config.validate(n)?;
        let split = Split::new(data, config.test_fraction, config.seed)?;
        Ok(Self {
            n,
            split,
            classifier,
            aor: AorTable::new(n),
            memo: StateMemo::default(),
            exploration: Exploration::default(),
            rng: SmallRng::seed_from_u64(config.seed),
            episodes: 0,
            steps: 0,
            start: Instant::now(),
            checkpoint: Instant::now(),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
    pub fn aor(&self) -> &AorTable {
        &self.aor
    }
    pub fn memo(&self) -> &StateMemo {
        &self.memo
    }
    pub fn exploration(&self) -> &Exploration {
        &self.exploration
    }
    pub fn split(&self) -> &Split {
        &self.split
    }
    /// Highest-valued subset found so far.
    pub fn best(&self) -> Option<&EpisodeState> {
        self.memo.best()
    }

    /// One full run of the configured number of episodes from a clean
    /// table. An evaluation failure aborts the run and leaves whatever
    /// the finished steps had already written.
    pub fn fit(&mut self) -> Result<Ranking, SelectionError> {
        self.reset();
        log::info!(
            "selecting over {} features for {} episodes (cap {}, α {}, γ {})",
            self.n,
            self.config.episodes,
            self.config.cap(self.n),
            self.config.alpha,
            self.config.gamma,
        );
        for _ in 0..self.config.episodes {
            self.episode()?;
            if let Some(stats) = self.report() {
                log::info!("{}", stats);
            }
            if crate::interrupted() {
                break;
            }
        }
        log::info!("{}", self.summary());
        Ok(Ranking::from(&self.aor))
    }

    /// Run a single episode against the current tables.
    pub fn episode(&mut self) -> Result<(), SelectionError> {
        let cap = self.config.cap(self.n);
        let max_depth = self.config.max_depth(self.n);
        let mut current = self.origin();
        let mut stagnation = Stagnation::default();
        while current.depth() <= max_depth && !stagnation.stopped() {
            current.evaluate_quality(&self.split, &mut self.classifier)?;
            let mut next = match current.choose_next(
                &self.memo,
                self.config.exploration,
                &self.aor,
                &mut self.rng,
            ) {
                Ok(next) => next,
                Err(SelectionError::ExplorationExhausted { depth }) => {
                    log::trace!("nothing left to add at depth {}", depth);
                    break;
                }
                Err(e) => return Err(e),
            };
            let successor = next.value();
            self.exploration.observe(current.value());
            self.steps += 1;
            if next.features().len() >= cap {
                break;
            }
            next.evaluate_quality(&self.split, &mut self.classifier)?;
            current.update_value(self.config.alpha, self.config.gamma, next.value());
            self.aor.record_transition(&Transition::from((&current, &next)));
            stagnation.observe(current.value(), successor);
            log::trace!(
                "{:?} -> {:?} V={:.4}",
                current.features(),
                next.features(),
                current.value()
            );
            self.memo.upsert(std::mem::replace(&mut current, next));
        }
        self.exploration.close();
        self.episodes += 1;
        log::debug!(
            "episode {} ended at {:?} ({} states)",
            self.episodes,
            current.features(),
            self.memo.len()
        );
        Ok(())
    }

    /// Where the next episode begins.
    fn origin(&mut self) -> EpisodeState {
        match self.config.origin {
            Origin::Empty => EpisodeState::empty(),
            Origin::Resume => self
                .memo
                .find(&[])
                .cloned()
                .unwrap_or_else(EpisodeState::empty),
            Origin::Random => {
                let cap = self.config.cap(self.n);
                if cap < 2 {
                    return EpisodeState::empty();
                }
                let depth = self.rng.random_range(1..cap);
                let features = rand::seq::index::sample(&mut self.rng, self.n, depth).into_vec();
                let ordinal = self.memo.next_ordinal(depth);
                EpisodeState::new(Position::from((depth, ordinal)), features)
            }
        }
    }

    /// Re-initialize all search state for a fresh run.
    fn reset(&mut self) {
        self.aor = AorTable::new(self.n);
        self.memo = StateMemo::default();
        self.exploration = Exploration::default();
        self.rng = SmallRng::seed_from_u64(self.config.seed);
        self.episodes = 0;
        self.steps = 0;
        self.start = Instant::now();
        self.checkpoint = Instant::now();
    }

    /// Progress line if the log interval has elapsed.
    fn report(&mut self) -> Option<String> {
        if self.checkpoint.elapsed() > PROGRESS_LOG_INTERVAL {
            self.checkpoint = Instant::now();
            Some(self.format())
        } else {
            None
        }
    }
}

impl<C> Progress for Selector<C>
where
    C: Classifier,
{
    fn episodes(&self) -> usize {
        self.episodes
    }
    fn steps(&self) -> usize {
        self.steps
    }
    fn states(&self) -> usize {
        self.memo.len()
    }
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Forest;
    use crate::model::canned::*;

    fn five() -> Dataset {
        Synthetic {
            samples: 60,
            informative: 2,
            noise: 3,
            ..Synthetic::default()
        }
        .generate()
    }

    fn config(episodes: usize) -> Config {
        Config {
            episodes,
            ..Config::default()
        }
    }

    #[test]
    fn end_to_end_five_features() {
        let ref data = five();
        let classifier = Forest::new(5, 2, 0);
        let mut selector = Selector::new(config(10), data, classifier).unwrap();
        let ranking = selector.fit().unwrap();
        assert_eq!(ranking.index.len(), 5);
        assert_eq!(ranking.plays.len(), 5);
        assert_eq!(ranking.rewards.len(), 5);
        assert_eq!(ranking.order.len(), 5);
        let plays = ranking.plays.iter().sum::<u32>();
        assert!((10..=50).contains(&plays), "{} plays", plays);
        let mut order = ranking.order.clone();
        order.sort();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
        assert_eq!(selector.episodes(), 10);
        assert_eq!(selector.exploration().explored_curve.len(), 10);
    }

    #[test]
    fn deterministic_given_seed() {
        let ref data = five();
        let run = || {
            let mut selector = Selector::new(config(10), data, Forest::new(5, 2, 0)).unwrap();
            let ranking = selector.fit().unwrap();
            (ranking, selector.aor().clone(), selector.memo().clone())
        };
        let (r1, a1, m1) = run();
        let (r2, a2, m2) = run();
        assert_eq!(r1, r2);
        assert_eq!(a1, a2);
        assert_eq!(m1, m2);
    }

    #[test]
    fn refit_starts_clean() {
        let ref data = five();
        let mut selector = Selector::new(config(5), data, Canned::weighted(&[0.2; 5])).unwrap();
        let first = selector.fit().unwrap();
        let second = selector.fit().unwrap();
        assert_eq!(first, second);
        assert_eq!(selector.episodes(), 5);
    }

    #[test]
    fn memo_holds_no_duplicates() {
        let ref data = five();
        let mut selector = Selector::new(config(30), data, Canned::weighted(&[0.1, 0.3, 0.2, 0.0, 0.4])).unwrap();
        selector.fit().unwrap();
        let memo = selector.memo();
        for depth in 0..=5 {
            let states = memo.depth(depth);
            for (i, a) in states.iter().enumerate() {
                assert_eq!(a.depth(), depth);
                assert!(states[i + 1..].iter().all(|b| b.features() != a.features()));
            }
        }
        assert!(memo.depth(5).is_empty(), "capped states are never filed");
    }

    #[test]
    fn cap_bounds_trajectories() {
        let ref data = five();
        let config = Config {
            cap: Some(3),
            ..config(20)
        };
        let mut selector = Selector::new(config, data, Canned::weighted(&[0.2; 5])).unwrap();
        selector.fit().unwrap();
        assert!(selector.memo().iter().all(|s| s.features().len() < 3));
        assert!(selector.aor().plays().iter().sum::<u32>() <= 40);
    }

    #[test]
    fn exploration_counts_every_step() {
        let ref data = five();
        let mut selector = Selector::new(config(10), data, Canned::weighted(&[0.2; 5])).unwrap();
        selector.fit().unwrap();
        let exploration = selector.exploration();
        assert_eq!(exploration.steps(), selector.steps());
        assert!(exploration.explored >= 10, "each episode leaves a zero-valued root");
        assert!(exploration.explored_curve.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn evaluation_failure_aborts() {
        let ref data = five();
        let mut selector = Selector::new(config(3), data, Canned::weighted(&[f32::INFINITY; 5])).unwrap();
        assert!(matches!(selector.fit(), Err(SelectionError::EvaluationFailure(_))));
    }

    #[test]
    fn invalid_configuration_fails_fast() {
        let ref data = five();
        let bad = Config {
            alpha: 0.0,
            ..Config::default()
        };
        assert!(matches!(
            Selector::new(bad, data, Canned::weighted(&[0.0; 5])),
            Err(SelectionError::InvalidConfiguration(_))
        ));
        let narrow = data.select(&[0]);
        assert!(matches!(
            Selector::new(Config::default(), &narrow, Canned::weighted(&[0.0; 1])),
            Err(SelectionError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn random_origin_starts_deeper() {
        let ref data = five();
        let config = Config {
            origin: Origin::Random,
            ..config(10)
        };
        let mut selector = Selector::new(config, data, Canned::weighted(&[0.2; 5])).unwrap();
        selector.fit().unwrap();
        assert!(selector.memo().depth(0).is_empty());
        assert!(!selector.memo().is_empty());
    }

    #[test]
    fn resumed_origin_exploits_known_children() {
        let ref data = five();
        let weights = [0.1, 0.5, 0.2, 0.05, 0.3];
        let config = Config {
            origin: Origin::Resume,
            ..config(40)
        };
        let mut selector = Selector::new(config, data, Canned::weighted(&weights)).unwrap();
        selector.fit().unwrap();
        let root = selector.memo().find(&[]).expect("root is filed");
        assert!(root.visits() > 1, "root visits accumulate");
        assert!(selector.exploration().not_explored > 0);
    }

    #[test]
    fn stagnation_ends_the_episode() {
        let ref data = five();
        let config = Config {
            origin: Origin::Resume,
            ..config(1)
        };
        let mut selector = Selector::new(config, data, Canned::weighted(&[0.1; 5])).unwrap();
        selector.memo.upsert(EpisodeState::empty().with_visits(1));
        selector.memo.upsert(
            EpisodeState::new(Position::from((1, 0)), vec![0])
                .with_value(0.9)
                .with_quality(0.1)
                .with_visits(1),
        );
        selector.memo.upsert(EpisodeState::new(Position::from((2, 0)), vec![0, 1]).with_value(2.0));
        selector.episode().unwrap();
        let ref memo = selector.memo;
        let updated = memo.find(&[0]).unwrap().value();
        assert!((updated - (0.9 + 0.5 * (0.1 + 0.99 * 2.0 - 0.9))).abs() < 1e-5);
        assert!(updated < 2.0, "second step falls below its successor");
        assert_eq!(memo.find(&[0, 1]).unwrap().value(), 2.0, "successor is never stepped from");
        assert!(memo.depth(3).is_empty());
        assert_eq!(selector.steps(), 2);
        assert_eq!(selector.aor().plays(), &[1, 1, 0, 0, 0]);
    }

    #[test]
    fn best_state_is_non_empty() {
        let ref data = five();
        let mut selector = Selector::new(config(10), data, Canned::weighted(&[0.2; 5])).unwrap();
        selector.fit().unwrap();
        let best = selector.best().expect("positive values were learned");
        assert!(!best.features().is_empty());
        assert!(selector.memo().iter().all(|s| s.depth() == 0 || s.value() <= best.value()));
    }
}
