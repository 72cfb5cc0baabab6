//! The working set of candidate tours.

use super::operators::check_permutation;
use super::tour::{ScoredTour, Tour};
use crate::error::{Result, TspError};
use crate::geo::GeoWorld;
use rand::Rng;
use std::collections::HashSet;

/// Upper bound on the up-front reservation for the initial tours.
const MAX_INITIAL_RESERVE: usize = 4096;

/// `n!`, or `None` when it does not fit in a `usize`.
fn permutation_count(n: usize) -> Option<usize> {
    (2..=n).try_fold(1usize, |acc, k| acc.checked_mul(k))
}

/// A cost-ranked collection of tours with a fixed target size.
///
/// After [`merge`](Population::merge) the members are sorted by ascending
/// cost and never exceed [`target_size`](Population::target_size).
/// Duplicates are avoided at initialisation only; children produced later
/// may coincide with existing members.
#[derive(Debug, Clone)]
pub struct Population {
    members: Vec<ScoredTour>,
    target_size: usize,
}

impl Population {
    /// Samples `target_size` distinct random permutations of the world's
    /// points and ranks them.
    ///
    /// # Errors
    /// [`TspError::CapacityExceeded`] if `target_size` distinct tours cannot
    /// be collected within `target_size * max_attempts_per_tour` draws
    /// (always the case when it exceeds `N!`).
    pub fn random<R: Rng>(
        world: &GeoWorld,
        target_size: usize,
        max_attempts_per_tour: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let n = world.size();
        if let Some(available) = permutation_count(n).filter(|&c| target_size > c) {
            return Err(TspError::CapacityExceeded {
                what: "initial tours",
                requested: target_size,
                reached: available,
            });
        }

        let max_attempts = target_size.saturating_mul(max_attempts_per_tour);
        let reserve = target_size.min(MAX_INITIAL_RESERVE);
        let mut seen: HashSet<Vec<usize>> = HashSet::with_capacity(reserve);
        let mut tours = Vec::with_capacity(reserve);
        let mut attempts = 0usize;

        while tours.len() < target_size {
            if attempts >= max_attempts {
                return Err(TspError::CapacityExceeded {
                    what: "initial tours",
                    requested: target_size,
                    reached: tours.len(),
                });
            }
            attempts += 1;

            let mut perm: Vec<usize> = (0..n).collect();
            u_numflow::random::shuffle(&mut perm, rng);
            if seen.insert(perm.clone()) {
                tours.push(Tour::new(perm));
            }
        }

        tracing::debug!(target_size, attempts, "sampled initial population");

        Ok(Self::from_tours(world, tours, target_size))
    }

    /// Ranks the given tours and truncates them to `target_size`.
    pub fn from_tours(world: &GeoWorld, tours: Vec<Tour>, target_size: usize) -> Self {
        let members = tours
            .into_iter()
            .map(|t| ScoredTour::evaluate(t, world))
            .collect();
        let mut population = Self {
            members,
            target_size,
        };
        population.sort_by_cost();
        population.truncate();
        population
    }

    /// Maximum number of members kept after a merge.
    pub fn target_size(&self) -> usize {
        self.target_size
    }

    /// Current number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the population holds no tours.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in their current order.
    pub fn members(&self) -> &[ScoredTour] {
        &self.members
    }

    /// The cheapest member, assuming the population is sorted.
    pub fn best(&self) -> Option<&ScoredTour> {
        self.members.first()
    }

    /// Sorts members by ascending cost. The sort is stable.
    pub fn sort_by_cost(&mut self) {
        self.members.sort_by(|a, b| a.cost.total_cmp(&b.cost));
    }

    /// Drops every member beyond the target size.
    pub fn truncate(&mut self) {
        self.members.truncate(self.target_size);
    }

    /// Elitist survivor selection: appends `children`, re-ranks, and keeps
    /// the `target_size` cheapest.
    pub fn merge(&mut self, children: Vec<ScoredTour>) {
        self.members.reserve(children.len());
        self.members.extend(children);
        self.sort_by_cost();
        self.truncate();
    }

    /// Verifies every member is a permutation of `0..point_count`.
    pub fn check(&self, point_count: usize) -> Result<()> {
        for member in &self.members {
            check_permutation(member.tour.path(), point_count, "population")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Point;
    use u_numflow::random::create_rng;

    fn line_world(n: usize) -> GeoWorld {
        GeoWorld::from_points((0..n as i64).map(|x| Point::new(x, 0)).collect()).unwrap()
    }

    fn scored(world: &GeoWorld, path: Vec<usize>) -> ScoredTour {
        ScoredTour::evaluate(Tour::new(path), world)
    }

    #[test]
    fn test_random_population_is_distinct_and_sorted() {
        let world = line_world(6);
        let mut rng = create_rng(42);
        let pop = Population::random(&world, 36, 1000, &mut rng).unwrap();

        assert_eq!(pop.len(), 36);
        let unique: HashSet<&Tour> = pop.members().iter().map(|m| &m.tour).collect();
        assert_eq!(unique.len(), 36);
        assert!(pop.members().windows(2).all(|w| w[0].cost <= w[1].cost));
        assert!(pop.check(6).is_ok());
    }

    #[test]
    fn test_small_world_enumerates_every_permutation() {
        let world = line_world(4);
        let mut rng = create_rng(7);
        let pop = Population::random(&world, 24, 1000, &mut rng).unwrap();
        let unique: HashSet<&Tour> = pop.members().iter().map(|m| &m.tour).collect();
        assert_eq!(unique.len(), 24);
    }

    #[test]
    fn test_more_tours_than_permutations_is_capacity_error() {
        let world = line_world(3);
        let mut rng = create_rng(42);
        let err = Population::random(&world, 7, 100, &mut rng).unwrap_err();
        assert_eq!(
            err,
            TspError::CapacityExceeded {
                what: "initial tours",
                requested: 7,
                reached: 6,
            }
        );
    }

    #[test]
    fn test_huge_target_fails_fast_without_reserving() {
        let world = line_world(3);
        let mut rng = create_rng(42);
        let err = Population::random(&world, usize::MAX, 1000, &mut rng).unwrap_err();
        assert_eq!(
            err,
            TspError::CapacityExceeded {
                what: "initial tours",
                requested: usize::MAX,
                reached: 6,
            }
        );
    }

    #[test]
    fn test_permutation_count() {
        assert_eq!(permutation_count(0), Some(1));
        assert_eq!(permutation_count(1), Some(1));
        assert_eq!(permutation_count(4), Some(24));
        assert_eq!(permutation_count(20), Some(2_432_902_008_176_640_000));
        assert_eq!(permutation_count(21), None);
    }

    #[test]
    fn test_merge_keeps_cheapest() {
        let world = line_world(4);
        let mut pop = Population::from_tours(
            &world,
            vec![
                Tour::new(vec![0, 2, 1, 3]), // 2 + 1 + 2 = 5
                Tour::new(vec![1, 0, 2, 3]), // 1 + 2 + 1 = 4
            ],
            2,
        );

        pop.merge(vec![
            scored(&world, vec![0, 1, 2, 3]), // 3
            scored(&world, vec![3, 0, 1, 2]), // 3 + 1 + 1 = 5
        ]);

        assert_eq!(pop.len(), 2);
        let costs: Vec<f64> = pop.members().iter().map(|m| m.cost).collect();
        assert_eq!(costs, vec![3.0, 4.0]);
        assert_eq!(pop.best().unwrap().tour.path(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_merge_never_exceeds_target() {
        let world = line_world(5);
        let mut rng = create_rng(3);
        let mut pop = Population::random(&world, 10, 1000, &mut rng).unwrap();
        let children: Vec<ScoredTour> = pop.members().to_vec();
        pop.merge(children);
        assert_eq!(pop.len(), 10);
    }

    #[test]
    fn test_from_tours_truncates() {
        let world = line_world(3);
        let pop = Population::from_tours(
            &world,
            vec![Tour::new(vec![2, 0, 1]), Tour::new(vec![0, 1, 2])],
            1,
        );
        assert_eq!(pop.len(), 1);
        assert_eq!(pop.best().unwrap().tour.path(), &[0, 1, 2]);
    }
}
