//! Randomized node heights.
//!
//! Every node sits on level 0; each further level holds a random subset of
//! the level below. With promotion probability `p` a node reaches height `k`
//! with probability `p^(k-1) * (1-p)`, truncated at the maximum level, which
//! keeps the expected search path logarithmic without any rebalancing.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skipscore_config::{DEFAULT_MAX_LEVEL, DEFAULT_PROBABILITY, SkipListConfig};

/// Source of heights for newly inserted nodes.
pub trait LevelGenerator {
    /// Number of levels this generator may produce.
    fn max_level(&self) -> usize;

    /// Draw a height in `1..=self.max_level()`.
    fn random_level(&mut self) -> usize;
}

/// Geometric height distribution driven by an injectable random source.
#[derive(Debug, Clone)]
pub struct GeometricLevelGenerator<R = StdRng> {
    max_level: usize,
    probability: f64,
    rng: R,
}

impl<R: Rng> GeometricLevelGenerator<R> {
    /// Create a generator, rejecting parameters outside the accepted range.
    pub fn new(max_level: usize, probability: f64, rng: R) -> anyhow::Result<Self> {
        SkipListConfig::new()
            .with_max_level(max_level)
            .with_probability(probability)
            .validate()?;
        Ok(Self {
            max_level,
            probability,
            rng,
        })
    }

    /// Generator with the default cap of 16 levels and `p = 0.25`.
    pub fn with_rng(rng: R) -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            probability: DEFAULT_PROBABILITY,
            rng,
        }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl GeometricLevelGenerator<StdRng> {
    /// Default parameters with a reproducible seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Default parameters seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Build from validated configuration; an absent seed draws one from the OS.
    pub fn from_config(config: &SkipListConfig) -> anyhow::Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::new(config.max_level, config.probability, rng)
    }
}

impl Default for GeometricLevelGenerator<StdRng> {
    fn default() -> Self {
        Self::from_os_rng()
    }
}

impl<R: Rng> LevelGenerator for GeometricLevelGenerator<R> {
    fn max_level(&self) -> usize {
        self.max_level
    }

    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while self.rng.random::<f64>() < self.probability && level < self.max_level {
            level += 1;
        }
        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_stay_within_bounds() {
        let mut levels = GeometricLevelGenerator::new(4, 0.9, StdRng::seed_from_u64(1)).unwrap();
        for _ in 0..1_000 {
            let level = levels.random_level();
            assert!((1..=4).contains(&level), "level {level} out of range");
        }
    }

    #[test]
    fn single_level_cap_always_yields_one() {
        let mut levels = GeometricLevelGenerator::new(1, 0.99, StdRng::seed_from_u64(3)).unwrap();
        assert!((0..100).all(|_| levels.random_level() == 1));
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = GeometricLevelGenerator::seeded(42);
        let mut b = GeometricLevelGenerator::seeded(42);
        let first: Vec<usize> = (0..64).map(|_| a.random_level()).collect();
        let second: Vec<usize> = (0..64).map(|_| b.random_level()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn distribution_is_roughly_geometric() {
        let mut levels = GeometricLevelGenerator::seeded(7);
        let draws = 20_000;
        let ones = (0..draws).filter(|_| levels.random_level() == 1).count();
        let share = ones as f64 / draws as f64;
        // P(level == 1) = 1 - p = 0.75
        assert!((share - 0.75).abs() < 0.02, "share of height 1 was {share}");
    }

    #[test]
    fn new_rejects_bad_parameters() {
        assert!(GeometricLevelGenerator::new(0, 0.25, StdRng::seed_from_u64(0)).is_err());
        assert!(GeometricLevelGenerator::new(16, 1.0, StdRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn from_config_uses_seed_and_limits() {
        let config = SkipListConfig::new().with_max_level(5).with_seed(9);
        let mut a = GeometricLevelGenerator::from_config(&config).unwrap();
        let mut b = GeometricLevelGenerator::from_config(&config).unwrap();
        assert_eq!(a.max_level(), 5);
        for _ in 0..32 {
            assert_eq!(a.random_level(), b.random_level());
        }
    }

    #[test]
    fn defaults_match_documented_constants() {
        let levels = GeometricLevelGenerator::<StdRng>::default();
        assert_eq!(levels.max_level(), 16);
        assert_eq!(levels.probability(), 0.25);
    }
}
