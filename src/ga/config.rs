//! Engine configuration.
//!
//! [`EvolutionConfig`] holds the tunables that control the evolutionary loop.

use crate::error::{Result, TspError};
use rand::Rng;
use u_numflow::random::create_rng;

/// Configuration for the [`EvolutionEngine`](super::EvolutionEngine).
///
/// # Defaults
///
/// ```
/// use tsp_evo::ga::EvolutionConfig;
///
/// let config = EvolutionConfig::default();
/// assert_eq!(config.stagnation_limit, 16);
/// assert!(config.population_size.is_none());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use tsp_evo::ga::EvolutionConfig;
///
/// let config = EvolutionConfig::default()
///     .with_mutation_chance(0.2)
///     .with_selection_fraction(0.4)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionConfig {
    /// Fraction of the population drawn as parents each generation.
    ///
    /// The resulting count is rounded up to an even number so that the
    /// draw splits into pairs.
    pub selection_fraction: f64,

    /// Probability that a child undergoes inversion mutation (0.0–1.0).
    pub mutation_chance: f64,

    /// Stagnation constant.
    ///
    /// The generation sequence ends once the best cost has been repeated
    /// `stagnation_limit - 2` times in a row, i.e. after
    /// `stagnation_limit - 1` generations sharing the same best cost.
    pub stagnation_limit: usize,

    /// Fixed population size.
    ///
    /// `None` derives it from the number of points: `N²` for `N > 4`,
    /// otherwise `N!` (every permutation of a small world).
    pub population_size: Option<usize>,

    /// Sampling budget per requested initial tour when collecting
    /// distinct random permutations.
    pub max_init_attempts_per_tour: usize,

    /// Whether to evaluate children's costs in parallel using rayon.
    ///
    /// Has no effect unless the crate is built with the `parallel` feature.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            selection_fraction: 0.5,
            mutation_chance: 0.1,
            stagnation_limit: 16,
            population_size: None,
            max_init_attempts_per_tour: 1_000,
            parallel: false,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Sets the selection fraction.
    pub fn with_selection_fraction(mut self, fraction: f64) -> Self {
        self.selection_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation chance.
    pub fn with_mutation_chance(mut self, chance: f64) -> Self {
        self.mutation_chance = chance.clamp(0.0, 1.0);
        self
    }

    /// Sets the stagnation constant.
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Overrides the derived population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = Some(n);
        self
    }

    /// Sets the per-tour sampling budget of the initial population.
    pub fn with_max_init_attempts_per_tour(mut self, attempts: usize) -> Self {
        self.max_init_attempts_per_tour = attempts;
        self
    }

    /// Enables or disables parallel cost evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of repeated best costs after which the sequence stops.
    pub fn stagnation_threshold(&self) -> usize {
        self.stagnation_limit.saturating_sub(2)
    }

    /// Population size for a world of `point_count` points.
    ///
    /// Uses the explicit override when set, otherwise `N²` for `N > 4`
    /// and `N!` for smaller worlds.
    pub fn population_size_for(&self, point_count: usize) -> usize {
        match self.population_size {
            Some(n) => n,
            None if point_count > 4 => point_count.saturating_mul(point_count),
            None => (1..=point_count).product::<usize>().max(1),
        }
    }

    /// Creates the random number generator described by [`seed`](Self::seed).
    pub fn create_rng(&self) -> impl Rng {
        match self.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// [`TspError::InvalidInput`] describing the first invalid parameter.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.selection_fraction) {
            return Err(TspError::invalid_input(
                "selection_fraction must be within 0.0..=1.0",
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_chance) {
            return Err(TspError::invalid_input(
                "mutation_chance must be within 0.0..=1.0",
            ));
        }
        if self.stagnation_limit < 2 {
            return Err(TspError::invalid_input(
                "stagnation_limit must be at least 2",
            ));
        }
        if self.population_size == Some(0) {
            return Err(TspError::invalid_input(
                "population_size must be positive or None",
            ));
        }
        if self.max_init_attempts_per_tour == 0 {
            return Err(TspError::invalid_input(
                "max_init_attempts_per_tour must be at least 1",
            ));
        }
        Ok(())
    }
}
