//! The evolutionary loop.
//!
//! [`EvolutionEngine`] owns the population and advances it one generation
//! per [`step`](EvolutionEngine::step):
//! selection → crossover → mutation → merge.
//!
//! [`EvolutionEngine::generations`] exposes the run as a lazy sequence of
//! best-of-generation tours that ends once the best cost stagnates.

use super::config::EvolutionConfig;
use super::operators;
use super::population::Population;
use super::selection::{select_pairs, selection_count};
use super::tour::{ScoredTour, Tour};
use crate::error::{Result, TspError};
use crate::geo::GeoWorld;
use rand::Rng;

/// Lifecycle of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Population sampled, no generation run yet.
    Initialized,
    /// At least one generation run, best cost still moving.
    Evolving,
    /// Stagnation threshold reached. Terminal.
    Converged,
}

/// Outcome of one [`step`](EvolutionEngine::step).
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// 1-based generation counter.
    pub index: usize,

    /// Best tour after the merge.
    pub best: Tour,

    /// Cost of [`best`](Self::best).
    pub cost: f64,

    /// Consecutive generations that repeated the previous best cost.
    pub stagnation: usize,

    /// Whether the caller should stop consuming generations.
    pub done: bool,
}

/// Genetic-algorithm engine for the open-path TSP.
///
/// # Usage
///
/// ```
/// use tsp_evo::ga::{EvolutionConfig, EvolutionEngine};
/// use tsp_evo::geo::GeoWorld;
///
/// let config = EvolutionConfig::default().with_seed(42);
/// let mut rng = config.create_rng();
/// let world = GeoWorld::random(6, &mut rng).unwrap();
///
/// let mut engine = EvolutionEngine::new(&world, config, &mut rng).unwrap();
/// let mut last = None;
/// for generation in engine.generations(&mut rng) {
///     last = Some(generation.unwrap());
/// }
/// assert!(last.unwrap().done);
/// ```
#[derive(Debug, Clone)]
pub struct EvolutionEngine<'w> {
    world: &'w GeoWorld,
    config: EvolutionConfig,
    population: Population,
    state: EngineState,
    generation: usize,
    last_best: Option<f64>,
    stagnation: usize,
}

impl<'w> EvolutionEngine<'w> {
    /// Validates `config` and samples the initial population.
    ///
    /// # Errors
    /// - [`TspError::InvalidInput`] for an invalid configuration
    /// - [`TspError::CapacityExceeded`] if the distinct initial tours cannot
    ///   be collected
    pub fn new<R: Rng>(world: &'w GeoWorld, config: EvolutionConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;

        let point_count = world.size();
        let target_size = config.population_size_for(point_count);
        let population = Population::random(
            world,
            target_size,
            config.max_init_attempts_per_tour,
            rng,
        )?;

        tracing::info!(
            points = point_count,
            population = target_size,
            "evolution engine initialized"
        );

        Ok(Self {
            world,
            config,
            population,
            state: EngineState::Initialized,
            generation: 0,
            last_best: None,
            stagnation: 0,
        })
    }

    /// The world tours are evaluated against.
    pub fn world(&self) -> &'w GeoWorld {
        self.world
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Current population, sorted by ascending cost.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Fixed population size.
    pub fn population_size(&self) -> usize {
        self.population.target_size()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Number of generations run so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Cheapest tour currently in the population.
    pub fn best(&self) -> Option<&ScoredTour> {
        self.population.best()
    }

    /// Runs one generation and returns the best member afterwards.
    ///
    /// Worlds with fewer than two points have nothing to recombine; the
    /// population is returned untouched.
    ///
    /// # Errors
    /// [`TspError::InvariantViolation`] if an operator produced a
    /// non-permutation.
    pub fn advance_generation<R: Rng>(&mut self, rng: &mut R) -> Result<&ScoredTour> {
        let point_count = self.world.size();

        if point_count >= 2 {
            // 1. Selection
            self.population.sort_by_cost();
            let count = selection_count(
                self.population.target_size(),
                self.config.selection_fraction,
            );
            let pairs = select_pairs(self.population.members(), point_count, count, rng);

            // 2. Crossover
            let members = self.population.members();
            let mut children: Vec<Tour> = Vec::with_capacity(pairs.len() * 2);
            for (a, b) in pairs {
                let (c1, c2) =
                    operators::crossover(&members[a].tour, &members[b].tour, point_count, rng)?;
                children.push(c1);
                children.push(c2);
            }

            // 3. Mutation
            for child in children.iter_mut() {
                if rng.random_range(0.0..1.0) < self.config.mutation_chance {
                    *child = operators::mutate(child, point_count, rng)?;
                }
            }

            // 4. Merge
            let scored = evaluate_children(self.world, children, self.config.parallel);
            self.population.merge(scored);
        }

        self.generation += 1;
        self.population.best().ok_or_else(|| TspError::InvariantViolation {
            operator: "merge",
            reason: "population is empty".to_string(),
        })
    }

    /// Runs one generation and applies the stagnation rule.
    ///
    /// The stagnation counter resets whenever the best cost differs from the
    /// previous generation's and grows by one when it repeats. The result is
    /// `done` once the counter reaches
    /// [`stagnation_threshold`](EvolutionConfig::stagnation_threshold), or
    /// immediately for worlds with fewer than two points.
    ///
    /// Stepping a converged engine keeps evolving; the state stays
    /// [`EngineState::Converged`].
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> Result<Generation> {
        let best = self.advance_generation(rng)?.clone();

        self.stagnation = match self.last_best {
            Some(last) if last == best.cost => self.stagnation + 1,
            _ => 0,
        };
        self.last_best = Some(match self.last_best {
            Some(last) => last.min(best.cost),
            None => best.cost,
        });

        let done = self.world.size() < 2
            || self.state == EngineState::Converged
            || self.stagnation >= self.config.stagnation_threshold();

        tracing::debug!(
            generation = self.generation,
            cost = best.cost,
            stagnation = self.stagnation,
            "generation complete"
        );

        if done {
            if self.state != EngineState::Converged {
                tracing::info!(
                    generations = self.generation,
                    cost = best.cost,
                    "evolution converged"
                );
            }
            self.state = EngineState::Converged;
        } else {
            self.state = EngineState::Evolving;
        }

        Ok(Generation {
            index: self.generation,
            best: best.tour,
            cost: best.cost,
            stagnation: self.stagnation,
            done,
        })
    }

    /// Lazy sequence of generations.
    ///
    /// Yields every generation up to and including the first one marked
    /// `done`, or a single error if an operator breaks the permutation
    /// invariant. Dropping the iterator early is the only cancellation
    /// needed.
    pub fn generations<'e, R: Rng>(&'e mut self, rng: &'e mut R) -> Generations<'e, 'w, R> {
        Generations {
            engine: self,
            rng,
            finished: false,
        }
    }

    /// Consumes generations until the sequence ends and returns the last one.
    ///
    /// # Errors
    /// Propagates the first [`TspError::InvariantViolation`].
    pub fn run<R: Rng>(&mut self, rng: &mut R) -> Result<Generation> {
        loop {
            let generation = self.step(rng)?;
            if generation.done {
                return Ok(generation);
            }
        }
    }
}

/// Iterator returned by [`EvolutionEngine::generations`].
pub struct Generations<'e, 'w, R> {
    engine: &'e mut EvolutionEngine<'w>,
    rng: &'e mut R,
    finished: bool,
}

impl<R: Rng> Iterator for Generations<'_, '_, R> {
    type Item = Result<Generation>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let item = self.engine.step(self.rng);
        self.finished = match &item {
            Ok(generation) => generation.done,
            Err(_) => true,
        };
        Some(item)
    }
}

impl<R: Rng> std::iter::FusedIterator for Generations<'_, '_, R> {}

/// Evaluate the children produced in one generation.
#[cfg(feature = "parallel")]
fn evaluate_children(world: &GeoWorld, children: Vec<Tour>, parallel: bool) -> Vec<ScoredTour> {
    use rayon::prelude::*;

    if parallel {
        children
            .into_par_iter()
            .map(|tour| ScoredTour::evaluate(tour, world))
            .collect()
    } else {
        children
            .into_iter()
            .map(|tour| ScoredTour::evaluate(tour, world))
            .collect()
    }
}

/// Evaluate the children produced in one generation.
#[cfg(not(feature = "parallel"))]
fn evaluate_children(world: &GeoWorld, children: Vec<Tour>, _parallel: bool) -> Vec<ScoredTour> {
    children
        .into_iter()
        .map(|tour| ScoredTour::evaluate(tour, world))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
