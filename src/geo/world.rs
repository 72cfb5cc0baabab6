//! Point-set construction and the distance oracle.

use super::point::Point;
use crate::error::{Result, TspError};
use rand::Rng;
use std::collections::HashSet;
use std::ops::RangeInclusive;

/// Smallest coordinate produced by [`GeoWorld::random`].
pub const COORDINATE_MIN: i64 = 0;

/// Largest coordinate produced by [`GeoWorld::random`].
pub const COORDINATE_MAX: i64 = 69420;

/// Rejection-sampling budget per requested point.
const MAX_ATTEMPTS_PER_POINT: usize = 1_000;

/// An immutable, indexable set of distinct points.
///
/// # Examples
///
/// ```
/// use tsp_evo::geo::{GeoWorld, Point};
///
/// let world = GeoWorld::from_points(vec![Point::new(0, 0), Point::new(3, 4)]).unwrap();
/// assert_eq!(world.size(), 2);
/// assert!((world.distance(0, 1) - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct GeoWorld {
    points: Vec<Point>,
}

impl GeoWorld {
    /// Samples `count` distinct points with coordinates in
    /// `[COORDINATE_MIN, COORDINATE_MAX]`.
    ///
    /// # Errors
    /// - [`TspError::InvalidInput`] if `count == 0`
    /// - [`TspError::CapacityExceeded`] if the grid cannot hold `count`
    ///   distinct points or the sampling budget runs out
    pub fn random<R: Rng>(count: usize, rng: &mut R) -> Result<Self> {
        Self::random_in_range(count, COORDINATE_MIN..=COORDINATE_MAX, rng)
    }

    /// Samples `count` distinct points with both coordinates drawn
    /// uniformly from `range`.
    pub fn random_in_range<R: Rng>(
        count: usize,
        range: RangeInclusive<i64>,
        rng: &mut R,
    ) -> Result<Self> {
        if count == 0 {
            return Err(TspError::invalid_input("point count must be at least 1"));
        }
        if range.is_empty() {
            return Err(TspError::invalid_input(format!(
                "empty coordinate range {}..={}",
                range.start(),
                range.end()
            )));
        }

        let side = (*range.end() as i128 - *range.start() as i128 + 1) as u128;
        let capacity = side.saturating_mul(side);
        if count as u128 > capacity {
            return Err(TspError::CapacityExceeded {
                what: "points",
                requested: count,
                reached: capacity as usize,
            });
        }

        let max_attempts = count.saturating_mul(MAX_ATTEMPTS_PER_POINT);
        let mut seen: HashSet<Point> = HashSet::with_capacity(count);
        let mut points = Vec::with_capacity(count);
        let mut attempts = 0usize;

        while points.len() < count {
            if attempts >= max_attempts {
                return Err(TspError::CapacityExceeded {
                    what: "points",
                    requested: count,
                    reached: points.len(),
                });
            }
            attempts += 1;

            let p = Point::new(
                rng.random_range(range.clone()),
                rng.random_range(range.clone()),
            );
            if seen.insert(p) {
                points.push(p);
            }
        }

        tracing::debug!(count, attempts, "sampled world points");
        Ok(Self { points })
    }

    /// Builds a world from fixed points.
    ///
    /// # Errors
    /// [`TspError::InvalidInput`] if `points` is empty or contains the same
    /// coordinates twice.
    pub fn from_points(points: Vec<Point>) -> Result<Self> {
        if points.is_empty() {
            return Err(TspError::invalid_input("world needs at least one point"));
        }
        let mut seen = HashSet::with_capacity(points.len());
        for (i, p) in points.iter().enumerate() {
            if !seen.insert(*p) {
                return Err(TspError::invalid_input(format!(
                    "duplicate point {p} at index {i}"
                )));
            }
        }
        Ok(Self { points })
    }

    /// Number of points.
    pub fn size(&self) -> usize {
        self.points.len()
    }

    /// The `i`-th point.
    ///
    /// # Panics
    /// Panics if `i >= self.size()`.
    pub fn point(&self, i: usize) -> Point {
        self.points[i]
    }

    /// All points in index order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Euclidean distance between the `i`-th and `j`-th points.
    ///
    /// # Panics
    /// Panics if either index is out of range.
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.points[i].distance_to(&self.points[j])
    }
}
