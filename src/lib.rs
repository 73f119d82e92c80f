//! Feature subset selection by reinforcement learning.
//!
//! A [`search::Selector`] walks the lattice of feature subsets one feature at a
//! time, learning a state-value table over the subsets it discovers. Each
//! feature accumulates an Average Observed Reward (AOR) that biases later
//! episodes toward informative continuations, and the final AOR table is the
//! feature ranking.
//!
//! # Module Structure
//!
//! - `search`: Episode states, transitions, AOR table, state memo, driver
//! - `data`: Datasets, column restriction, seeded train/test splits
//! - `model`: Classifier capability and a shallow decision forest
//! - `baseline`: Recursive feature elimination and the RL-vs-RFE comparison
//! - `config`: Run configuration and validation
//! - `metrics`: Training observability

pub mod baseline;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod model;
pub mod search;

pub use error::SelectionError;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Column index of a feature in the full dataset.
pub type Feature = usize;
/// Class label of a sample.
pub type Label = usize;
/// Held-out classifier quality of a feature subset, in [0, 1].
pub type Reward = f32;
/// Value estimates and running-average rewards.
pub type Value = f32;

// ============================================================================
// SEARCH PARAMETERS
// ============================================================================
/// Epsilon of the (inactive) epsilon-greedy branch. Accepted and carried.
pub const EXPLORATION_RATE: f32 = 0.1;
/// TD(0) step size (alpha).
pub const LEARNING_RATE: f32 = 0.5;
/// TD(0) discount on the successor's value (gamma).
pub const DISCOUNT: f32 = 0.99;
/// Episodes per selection run.
pub const EPISODES: usize = 100;
/// Seed shared by every sampling point of a run.
pub const SEED: u64 = 42;

// ============================================================================
// EVALUATION HARNESS
// ============================================================================
/// Held-out share of samples in the train/test split.
pub const TEST_FRACTION: f32 = 0.33;
/// Trees per forest.
pub const FOREST_TREES: usize = 10;
/// Depth of the forest used to score subsets during search.
pub const FOREST_DEPTH: usize = 2;
/// Depth of the forest used by the baseline comparison.
pub const BASELINE_DEPTH: usize = 4;

// ============================================================================
// TRAINING INFRASTRUCTURE
// ============================================================================
/// Interval between progress log messages during training.
pub const PROGRESS_LOG_INTERVAL: std::time::Duration = std::time::Duration::from_secs(10);

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() -> anyhow::Result<()> {
    std::fs::create_dir_all("logs")?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time))?,
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file])?;
    Ok(())
}

/// Global interrupt flag for graceful shutdown coordination.
static INTERRUPTED: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);
/// Optional training deadline from SELECT_DURATION env var.
static DEADLINE: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();

/// Check if graceful shutdown was requested (via stdin "Q") or deadline reached.
pub fn interrupted() -> bool {
    INTERRUPTED.load(std::sync::atomic::Ordering::Relaxed)
        || DEADLINE
            .get()
            .map_or(false, |d| std::time::Instant::now() >= *d)
}

/// Register graceful interrupt handler. Type "Q" + Enter to stop after current episode.
/// Optionally set SELECT_DURATION env var (e.g., "2h", "30m") for timed runs.
pub fn brb() {
    if let Ok(duration) = std::env::var("SELECT_DURATION") {
        if let Some(deadline) = parse_duration(&duration) {
            let _ = DEADLINE.set(std::time::Instant::now() + deadline);
            log::info!("selection will stop after {}", duration);
        }
    }
    std::thread::spawn(|| {
        loop {
            let ref mut buffer = String::new();
            match std::io::stdin().read_line(buffer) {
                Ok(0) | Err(_) => break,
                Ok(_) if buffer.trim().to_uppercase() == "Q" => {
                    log::warn!("graceful interrupt requested, finishing current episode...");
                    INTERRUPTED.store(true, std::sync::atomic::Ordering::Relaxed);
                    break;
                }
                Ok(_) => continue,
            }
        }
    });
}

/// Parse duration string like "30s", "5m", "2h", "1d" into Duration.
fn parse_duration(s: &str) -> Option<std::time::Duration> {
    let s = s.trim();
    let (num, unit) = s.split_at(s.len().saturating_sub(1));
    let value: u64 = num.parse().ok()?;
    match unit {
        "s" => Some(std::time::Duration::from_secs(value)),
        "m" => Some(std::time::Duration::from_secs(value * 60)),
        "h" => Some(std::time::Duration::from_secs(value * 3600)),
        "d" => Some(std::time::Duration::from_secs(value * 86400)),
        _ => None,
    }
}
