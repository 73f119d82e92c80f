use super::*;
use crate::*;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Seeded generator of binary classification problems with a known
/// split between informative and noise features.
///
/// Informative feature `j` is drawn around `±(j + 1) * separation`
/// depending on the class, so lower indices are harder to use. Noise
/// features are standard normal and independent of the class. The
/// informative features come first.
#[derive(Debug, Clone, Copy)]
pub struct Synthetic {
    pub samples: usize,
    pub informative: usize,
    pub noise: usize,
    pub separation: f32,
    pub seed: u64,
}

impl Default for Synthetic {
    fn default() -> Self {
        Self {
            samples: 300,
            informative: 4,
            noise: 6,
            separation: 0.5,
            seed: SEED,
        }
    }
}

impl Synthetic {
    pub fn generate(&self) -> Dataset {
        let ref mut rng = SmallRng::seed_from_u64(self.seed);
        let labels = (0..self.samples)
            .map(|_| rng.random_range(0..2))
            .collect::<Vec<Label>>();
        let rows = labels
            .iter()
            .map(|&label| {
                let sign = if label == 0 { -1.0 } else { 1.0 };
                let signal = (0..self.informative)
                    .map(|j| sign * (j + 1) as f32 * self.separation + normal(rng))
                    .collect::<Vec<_>>();
                let noise = (0..self.noise).map(|_| normal(rng)).collect::<Vec<_>>();
                signal.into_iter().chain(noise).collect()
            })
            .collect();
        Dataset::new(rows, labels).expect("rectangular finite rows")
    }
}

/// Box-Muller standard normal.
fn normal(rng: &mut SmallRng) -> f32 {
    let u1 = rng.random::<f32>().max(f32::MIN_POSITIVE);
    let u2 = rng.random::<f32>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape() {
        let data = Synthetic {
            samples: 40,
            informative: 2,
            noise: 3,
            ..Synthetic::default()
        }
        .generate();
        assert_eq!(data.len(), 40);
        assert_eq!(data.width(), 5);
        assert!(data.labels().iter().all(|&l| l < 2));
    }

    #[test]
    fn seeded() {
        let a = Synthetic::default().generate();
        let b = Synthetic::default().generate();
        assert_eq!(a, b);
    }

    #[test]
    fn informative_columns_separate_classes() {
        let data = Synthetic::default().generate();
        let mean = |j: usize, class: Label| {
            let values = data
                .column(j)
                .iter()
                .zip(data.labels())
                .filter(|(_, l)| **l == class)
                .map(|(x, _)| *x)
                .collect::<Vec<_>>();
            values.iter().sum::<f32>() / values.len() as f32
        };
        assert!(mean(3, 1) - mean(3, 0) > 2.0);
        assert!((mean(9, 1) - mean(9, 0)).abs() < 1.0);
    }
}
