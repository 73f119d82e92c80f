use std::time::Duration;

/// Unified trait for selection progress.
///
/// Provides core accessors for episodes, steps, states, and elapsed time,
/// with default implementations for formatted stats and summary output.
///
/// # Required Methods
///
/// - `episodes()`: Number of episodes completed
/// - `steps()`: Total transitions taken across all episodes
/// - `states()`: Distinct states held in the memo
/// - `elapsed()`: Wall-clock training duration
pub trait Progress {
    /// Number of episodes completed.
    fn episodes(&self) -> usize;
    /// Total transitions taken across all episodes.
    fn steps(&self) -> usize;
    /// Distinct states currently held in the memo.
    fn states(&self) -> usize;
    /// Wall-clock duration since training started.
    fn elapsed(&self) -> Duration;
    /// Formats stats as aligned columns with throughput calculation.
    fn format(&self) -> String {
        let rates = self.steps() as f64 / self.elapsed().as_secs_f64().max(1e-3);
        format!(
            "{:<20}{:<20}{:<20}{:<20}",
            format!("episode {}", self.episodes()),
            format!("steps {}", self.steps()),
            format!("states {}", self.states()),
            format!("S/sec {:.1}", rates),
        )
    }
    fn summary(&self) -> String {
        format!("selection stopped\n{}", self.format())
    }
}
