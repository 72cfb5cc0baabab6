//! Genetic-algorithm heuristic for the Euclidean Traveling Salesman Problem.
//!
//! Given `N` distinct points on an integer grid, the crate searches for a
//! short open path visiting every point exactly once. It makes no
//! optimality guarantee.
//!
//! - [`geo`]: the point set and its distance oracle
//! - [`ga`]: tours, populations, genetic operators and the evolution engine
//! - [`error`]: the crate-wide [`TspError`]
//!
//! # Example
//!
//! ```
//! use tsp_evo::ga::{EvolutionConfig, EvolutionEngine};
//! use tsp_evo::geo::GeoWorld;
//!
//! let config = EvolutionConfig::default().with_seed(7);
//! let mut rng = config.create_rng();
//! let world = GeoWorld::random(8, &mut rng)?;
//! let mut engine = EvolutionEngine::new(&world, config, &mut rng)?;
//! let last = engine.run(&mut rng)?;
//! assert_eq!(last.best.len(), 8);
//! # Ok::<(), tsp_evo::TspError>(())
//! ```

pub mod error;
pub mod ga;
pub mod geo;

pub use error::{Result, TspError};
