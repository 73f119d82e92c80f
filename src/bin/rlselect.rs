//! Selection Binary
//!
//! Ranks the features of a CSV (or synthetic) dataset by reinforcement
//! learning over the subset lattice and prints the ranking as JSON.
//!
//! Options: --csv, --synthetic, --episodes, --alpha, --gamma, --eps,
//! --cap, --seed, --random-origin, --resume, --compare, --config

use clap::Parser;
use rlselect::baseline::Comparison;
use rlselect::config::*;
use rlselect::data::*;
use rlselect::model::Forest;
use rlselect::search::Selector;
use rlselect::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, help = "CSV with a header row and the class in the last column")]
    csv: Option<PathBuf>,
    #[arg(long, conflicts_with = "csv", help = "Use the seeded synthetic dataset")]
    synthetic: bool,
    #[arg(long, help = "JSON configuration, overridden by any flag below")]
    config: Option<PathBuf>,
    #[arg(long)]
    episodes: Option<usize>,
    #[arg(long, help = "TD(0) step size")]
    alpha: Option<f32>,
    #[arg(long, help = "TD(0) discount")]
    gamma: Option<f32>,
    #[arg(long)]
    eps: Option<f32>,
    #[arg(long, help = "Maximum subset size")]
    cap: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, help = "Start each episode from a random subset")]
    random_origin: bool,
    #[arg(long, conflicts_with = "random_origin", help = "Start each episode from the learned empty-set state")]
    resume: bool,
    #[arg(long, help = "Compare the ranking against recursive feature elimination")]
    compare: bool,
}

impl Args {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match self.config {
            Some(ref path) => Config::load(path)?,
            None => Config::default(),
        };
        config.episodes = self.episodes.unwrap_or(config.episodes);
        config.alpha = self.alpha.unwrap_or(config.alpha);
        config.gamma = self.gamma.unwrap_or(config.gamma);
        config.exploration = self.eps.unwrap_or(config.exploration);
        config.cap = self.cap.or(config.cap);
        config.seed = self.seed.unwrap_or(config.seed);
        if self.random_origin {
            config.origin = Origin::Random;
        }
        if self.resume {
            config.origin = Origin::Resume;
        }
        Ok(config)
    }

    fn dataset(&self, seed: u64) -> anyhow::Result<Dataset> {
        match self.csv {
            Some(ref path) => Ok(Dataset::load(path)?),
            None if self.synthetic => Ok(Synthetic {
                seed,
                ..Synthetic::default()
            }
            .generate()),
            None => anyhow::bail!("either --csv <path> or --synthetic is required"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    log()?;
    brb();
    let args = Args::parse();
    let config = args.config()?;
    let ref data = args.dataset(config.seed)?;
    log::info!("{} samples, {} features", data.len(), data.width());
    let forest = Forest::new(FOREST_TREES, FOREST_DEPTH, config.seed);
    let mut selector = Selector::new(config, data, forest)?;
    let ranking = selector.fit()?;
    eprint!("{}", ranking);
    let best = selector
        .best()
        .map(|s| serde_json::json!({ "features": s.features(), "value": s.value() }));
    let comparison = match args.compare {
        true => Some(Comparison::new(selector.split(), &ranking, selector.config().seed)?),
        false => None,
    };
    if let Some(ref comparison) = comparison {
        eprint!("{}", comparison);
    }
    let output = serde_json::json!({
        "config": selector.config(),
        "ranking": ranking,
        "exploration": selector.exploration(),
        "best": best,
        "comparison": comparison,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
