//! Fitness-proportionate parent selection.
//!
//! The population is ranked by cost, every tour gets a fitness of
//! `sqrt(2) * N - cost`, and a [`RouletteWheel`] over the normalised
//! fitnesses draws parents. The draw is split in half and the halves are
//! paired positionally.
//!
//! The `sqrt(2) * N` offset is not an upper bound on tour cost. Once costs
//! exceed it, fitness turns negative and the normalised shares no longer
//! favour cheap tours. This is a known approximation of the heuristic.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use super::tour::ScoredTour;
use rand::Rng;
use std::f64::consts::SQRT_2;

/// Fitness of a tour with `cost` in a world of `point_count` points.
///
/// Monotonically decreasing in cost.
pub fn fitness(cost: f64, point_count: usize) -> f64 {
    SQRT_2 * point_count as f64 - cost
}

/// Number of parents drawn from a population of `population_size`.
///
/// `population_size * fraction`, truncated, then bumped to the next even
/// number so the draw splits into pairs.
pub fn selection_count(population_size: usize, fraction: f64) -> usize {
    let count = (population_size as f64 * fraction) as usize;
    if count % 2 == 1 {
        count + 1
    } else {
        count
    }
}

/// Cumulative distribution over a cost-sorted population.
///
/// Draws never land past `max_index`, which defaults to the last slot.
#[derive(Debug, Clone)]
pub struct RouletteWheel {
    cumulative: Vec<f64>,
    max_index: usize,
}

impl RouletteWheel {
    /// Builds the wheel for `members`, which must already be sorted by
    /// ascending cost.
    ///
    /// Falls back to uniform shares when the total fitness is zero or not
    /// finite, so normalisation never divides by zero.
    pub fn new(members: &[ScoredTour], point_count: usize) -> Self {
        let fitnesses: Vec<f64> = members
            .iter()
            .map(|m| fitness(m.cost, point_count))
            .collect();
        let total: f64 = fitnesses.iter().sum();

        if total == 0.0 || !total.is_finite() {
            tracing::warn!(total, "degenerate total fitness, using uniform selection");
            let n = members.len() as f64;
            let cumulative = (1..=members.len()).map(|i| i as f64 / n).collect();
            return Self::from_cumulative(cumulative);
        }

        let mut cumulative = Vec::with_capacity(fitnesses.len());
        let mut running = 0.0;
        for f in fitnesses {
            running += f / total;
            cumulative.push(running);
        }
        Self::from_cumulative(cumulative)
    }

    fn from_cumulative(cumulative: Vec<f64>) -> Self {
        let max_index = cumulative.len().saturating_sub(1);
        Self {
            cumulative,
            max_index,
        }
    }

    /// Stops the scan at `max_index`, capped at the last slot.
    pub fn with_max_index(mut self, max_index: usize) -> Self {
        self.max_index = max_index.min(self.cumulative.len().saturating_sub(1));
        self
    }

    /// Highest index a draw can return.
    pub fn max_index(&self) -> usize {
        self.max_index
    }

    /// Cumulative probabilities, one per member.
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Index of the first slot whose cumulative probability reaches `p`.
    ///
    /// Clamped to [`max_index`](Self::max_index), which also covers rounding
    /// that leaves `p` above every entry.
    ///
    /// # Panics
    /// Panics if the wheel is empty.
    pub fn index_for(&self, p: f64) -> usize {
        assert!(!self.cumulative.is_empty(), "cannot spin an empty wheel");
        self.cumulative[..=self.max_index]
            .iter()
            .position(|&c| c >= p)
            .unwrap_or(self.max_index)
    }

    /// Draws one index with a uniform `[0, 1)` sample.
    pub fn spin<R: Rng>(&self, rng: &mut R) -> usize {
        let p: f64 = rng.random_range(0.0..1.0);
        self.index_for(p)
    }
}

/// Draws `count` parents and pairs the first half with the second half.
///
/// `members` must be sorted by ascending cost. Returns index pairs into
/// `members`: pair `i` is `(selected[i], selected[count / 2 + i])`.
/// No draw lands past index `count - 2`, so the tail of a large population
/// is never picked as a parent.
pub fn select_pairs<R: Rng>(
    members: &[ScoredTour],
    point_count: usize,
    count: usize,
    rng: &mut R,
) -> Vec<(usize, usize)> {
    if members.is_empty() || count < 2 {
        return Vec::new();
    }

    let wheel = RouletteWheel::new(members, point_count).with_max_index(count - 2);
    let selected: Vec<usize> = (0..count).map(|_| wheel.spin(rng)).collect();
    pair_halves(&selected)
}

/// Pairs `selected[i]` with `selected[len / 2 + i]`.
pub fn pair_halves(selected: &[usize]) -> Vec<(usize, usize)> {
    let (first, second) = selected.split_at(selected.len() / 2);
    first.iter().copied().zip(second.iter().copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::Tour;
    use u_numflow::random::create_rng;

    fn scored(costs: &[f64]) -> Vec<ScoredTour> {
        costs
            .iter()
            .map(|&cost| ScoredTour {
                tour: Tour::identity(3),
                cost,
            })
            .collect()
    }

    #[test]
    fn test_fitness_decreases_with_cost() {
        assert!((fitness(0.0, 4) - 4.0 * SQRT_2).abs() < 1e-12);
        assert!(fitness(1.0, 4) > fitness(2.0, 4));
    }

    #[test]
    fn test_selection_count_rounds_to_even() {
        assert_eq!(selection_count(24, 0.5), 12);
        assert_eq!(selection_count(6, 0.5), 4);
        assert_eq!(selection_count(2, 0.5), 2);
        assert_eq!(selection_count(25, 0.5), 12);
        assert_eq!(selection_count(1, 0.5), 0);
    }

    #[test]
    fn test_wheel_is_cumulative_and_normalised() {
        // N = 10: fitnesses 14.14 - cost, all positive
        let members = scored(&[1.0, 2.0, 4.0]);
        let wheel = RouletteWheel::new(&members, 10);
        let cum = wheel.cumulative();
        assert_eq!(cum.len(), 3);
        assert!(cum.windows(2).all(|w| w[0] <= w[1]));
        assert!((cum[2] - 1.0).abs() < 1e-12);
        // Cheapest tour carries the largest share
        assert!(cum[0] > cum[1] - cum[0]);
    }

    #[test]
    fn test_wheel_uniform_fallback_on_zero_total() {
        // No offset: fitnesses +1 and -1 cancel out
        let members = scored(&[-1.0, 1.0]);
        let wheel = RouletteWheel::new(&members, 0);
        assert_eq!(wheel.cumulative(), &[0.5, 1.0]);
    }

    #[test]
    fn test_index_for_picks_first_reaching_slot() {
        let wheel = RouletteWheel::from_cumulative(vec![0.25, 0.5, 1.0]);
        assert_eq!(wheel.index_for(0.0), 0);
        assert_eq!(wheel.index_for(0.25), 0);
        assert_eq!(wheel.index_for(0.26), 1);
        assert_eq!(wheel.index_for(0.99), 2);
    }

    #[test]
    fn test_index_for_clamps_at_tail() {
        // Rounding can leave the last entry just below 1.0
        let wheel = RouletteWheel::from_cumulative(vec![0.5, 0.999_999]);
        assert_eq!(wheel.index_for(0.999_999_9), 1);
    }

    #[test]
    fn test_index_for_stops_at_max_index() {
        let wheel = RouletteWheel::from_cumulative(vec![0.25, 0.5, 0.75, 1.0]).with_max_index(1);
        assert_eq!(wheel.max_index(), 1);
        assert_eq!(wheel.index_for(0.1), 0);
        assert_eq!(wheel.index_for(0.6), 1);
        assert_eq!(wheel.index_for(0.99), 1);

        // Capped at the last slot
        let wheel = RouletteWheel::from_cumulative(vec![0.5, 1.0]).with_max_index(10);
        assert_eq!(wheel.max_index(), 1);
    }

    #[test]
    fn test_roulette_favors_cheap_tours() {
        let members = scored(&[1.0, 5.0, 9.0, 13.0]);
        let wheel = RouletteWheel::new(&members, 10);
        let mut rng = create_rng(42);

        let mut counts = [0u32; 4];
        for _ in 0..10_000 {
            counts[wheel.spin(&mut rng)] += 1;
        }
        assert!(
            counts[0] > counts[3],
            "cheapest should be drawn more often: {counts:?}"
        );
    }

    #[test]
    fn test_pair_halves_is_positional() {
        let pairs = pair_halves(&[10, 11, 12, 20, 21, 22]);
        assert_eq!(pairs, vec![(10, 20), (11, 21), (12, 22)]);
    }

    #[test]
    fn test_select_pairs_count_and_bounds() {
        let members = scored(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut rng = create_rng(42);
        let pairs = select_pairs(&members, 10, 4, &mut rng);
        assert_eq!(pairs.len(), 2);
        for (a, b) in pairs {
            assert!(a < members.len());
            assert!(b < members.len());
        }
    }

    #[test]
    fn test_select_pairs_never_draws_past_count_minus_two() {
        // 24 members with near-equal costs; only indices 0..=10 are eligible
        let costs: Vec<f64> = (0..24).map(|i| 1.0 + i as f64 * 0.01).collect();
        let members = scored(&costs);
        let mut rng = create_rng(42);

        let mut highest = 0;
        for _ in 0..1_000 {
            for (a, b) in select_pairs(&members, 4, 12, &mut rng) {
                highest = highest.max(a).max(b);
            }
        }
        assert_eq!(highest, 10);
    }

    #[test]
    fn test_select_pairs_empty_inputs() {
        let mut rng = create_rng(42);
        assert!(select_pairs(&[], 3, 4, &mut rng).is_empty());
        assert!(select_pairs(&scored(&[1.0]), 3, 0, &mut rng).is_empty());
    }
}
