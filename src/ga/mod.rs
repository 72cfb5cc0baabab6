//! Genetic algorithm for the open-path TSP.
//!
//! A population of candidate [`Tour`]s evolves through fitness-proportionate
//! selection, single-point ordered crossover, inversion mutation and
//! elitist truncation until the best cost stops improving.
//!
//! # Key Types
//!
//! - [`EvolutionConfig`]: tunables (selection fraction, mutation chance,
//!   stagnation limit, seed)
//! - [`EvolutionEngine`]: owns the population and runs generations
//! - [`Generations`]: lazy sequence of best-of-generation results
//! - [`Population`]: cost-ranked tours with a fixed target size
//! - [`Tour`] / [`ScoredTour`]: immutable permutations, with cached cost
//!
//! # Submodules
//!
//! - [`operators`]: permutation crossover and mutation with invariant checks
//! - [`selection`]: roulette-wheel parent selection and pairing
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
mod engine;
pub mod operators;
mod population;
pub mod selection;
mod tour;

pub use config::EvolutionConfig;
pub use engine::{EngineState, EvolutionEngine, Generation, Generations};
pub use population::Population;
pub use tour::{ScoredTour, Tour};
