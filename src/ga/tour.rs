//! Candidate solutions.
//!
//! A [`Tour`] is an immutable permutation of point indices. Every operator
//! that "changes" a tour builds a new one, so tours can be shared freely
//! between the population and the children of a generation.

use crate::geo::GeoWorld;
use std::fmt;
use std::sync::Arc;

/// An open path visiting every point of a world exactly once.
///
/// Cloning is cheap: the path is reference-counted.
///
/// # Examples
///
/// ```
/// use tsp_evo::ga::Tour;
/// use tsp_evo::geo::{GeoWorld, Point};
///
/// let world = GeoWorld::from_points(vec![
///     Point::new(0, 0),
///     Point::new(1, 0),
///     Point::new(1, 1),
/// ]).unwrap();
/// let tour = Tour::new(vec![0, 1, 2]);
/// assert!((tour.cost(&world) - 2.0).abs() < 1e-12);
/// assert_eq!(tour.to_string(), "0->1->2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tour {
    path: Arc<[usize]>,
}

impl Tour {
    /// Wraps a permutation of `0..N`.
    ///
    /// The caller guarantees `path` is a permutation; operators inside the
    /// crate verify their outputs before constructing tours.
    pub fn new(path: Vec<usize>) -> Self {
        debug_assert!(
            super::operators::is_permutation(&path),
            "tour path is not a permutation: {path:?}"
        );
        Self { path: path.into() }
    }

    /// The identity tour `0, 1, ..., n - 1`.
    pub fn identity(n: usize) -> Self {
        Self::new((0..n).collect())
    }

    /// Point indices in visiting order.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Number of points visited.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Whether the tour visits no points.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Total length of the open path (no return edge).
    ///
    /// # Complexity
    /// O(n)
    pub fn cost(&self, world: &GeoWorld) -> f64 {
        self.path
            .windows(2)
            .map(|pair| world.distance(pair[0], pair[1]))
            .sum()
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, idx) in self.path.iter().enumerate() {
            if i > 0 {
                f.write_str("->")?;
            }
            write!(f, "{idx}")?;
        }
        Ok(())
    }
}

/// A tour together with its cost in the engine's world.
///
/// The engine computes the cost once when a tour enters the population;
/// sorting and selection read the cached value.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTour {
    pub tour: Tour,
    pub cost: f64,
}

impl ScoredTour {
    /// Evaluates `tour` against `world`.
    pub fn evaluate(tour: Tour, world: &GeoWorld) -> Self {
        let cost = tour.cost(world);
        Self { tour, cost }
    }
}
