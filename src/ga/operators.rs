//! Permutation-preserving genetic operators.
//!
//! Crossover and mutation operate on `&[usize]` index vectors; the
//! [`crossover`] and [`mutate`] wrappers lift them to [`Tour`]s and verify
//! every result is still a permutation.
//!
//! # Crossover
//!
//! - [`single_point_crossover`]: one shared cut point, head copied from one
//!   parent, tail filled from the other parent in cyclic order
//!
//! # Mutation
//!
//! - [`invert_mutation`]: reverse a random contiguous segment (2-opt move)
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

use super::tour::Tour;
use crate::error::{Result, TspError};
use rand::Rng;

// ============================================================================
// Crossover operators
// ============================================================================

/// Single-point ordered crossover with a random cut in `1..n`.
///
/// Both children share the cut point. Returns the parents unchanged when
/// they have fewer than two genes.
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if parents have different lengths.
pub fn single_point_crossover<R: Rng>(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");

    if n < 2 {
        return (parent1.to_vec(), parent2.to_vec());
    }

    let cut = rng.random_range(1..n);
    single_point_crossover_at(parent1, parent2, cut)
}

/// Single-point ordered crossover at a fixed `cut`.
///
/// Child 1 takes `parent1[..cut]`, then scans `parent2` cyclically from
/// position `cut`, appending every gene not yet present. Child 2 is the
/// mirror image.
///
/// # Panics
/// Panics if parents have different lengths or `cut > n`.
pub fn single_point_crossover_at(
    parent1: &[usize],
    parent2: &[usize],
    cut: usize,
) -> (Vec<usize>, Vec<usize>) {
    assert_eq!(parent1.len(), parent2.len(), "parents must have equal length");
    assert!(cut <= parent1.len(), "cut point out of range");

    let child1 = ordered_fill(parent1, parent2, cut);
    let child2 = ordered_fill(parent2, parent1, cut);
    (child1, child2)
}

/// Build one child: head from `template`, tail from `donor`.
fn ordered_fill(template: &[usize], donor: &[usize], cut: usize) -> Vec<usize> {
    let n = template.len();
    let mut child = Vec::with_capacity(n);
    let mut present = vec![false; n];

    for &gene in &template[..cut] {
        child.push(gene);
        if let Some(slot) = present.get_mut(gene) {
            *slot = true;
        }
    }

    // One full lap over the donor is enough for valid parents; an invalid
    // donor leaves the child short, which the caller reports.
    for offset in 0..n {
        if child.len() == n {
            break;
        }
        let gene = donor[(cut + offset) % n];
        match present.get_mut(gene) {
            Some(slot) if !*slot => {
                *slot = true;
                child.push(gene);
            }
            _ => {}
        }
    }

    child
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Invert mutation: reverse a random segment of at least two genes.
///
/// # Complexity
/// O(n) worst case for segment reversal
pub fn invert_mutation<R: Rng>(perm: &mut [usize], rng: &mut R) {
    let n = perm.len();
    if n < 2 {
        return;
    }
    let (start, end) = random_segment(n, rng);
    invert_segment(perm, start, end);
}

/// Reverses `perm[start..=end]` in place.
///
/// # Panics
/// Panics if `start > end` or `end >= perm.len()`.
pub fn invert_segment(perm: &mut [usize], start: usize, end: usize) {
    perm[start..=end].reverse();
}

// ============================================================================
// Tour-level wrappers
// ============================================================================

/// Crosses two tours and verifies both children are permutations of
/// `0..point_count`.
///
/// # Errors
/// [`TspError::InvariantViolation`] if a child is not a valid permutation.
pub fn crossover<R: Rng>(
    parent1: &Tour,
    parent2: &Tour,
    point_count: usize,
    rng: &mut R,
) -> Result<(Tour, Tour)> {
    if parent1.len() != parent2.len() {
        return Err(TspError::InvariantViolation {
            operator: "crossover",
            reason: format!(
                "parents differ in length: {} vs {}",
                parent1.len(),
                parent2.len()
            ),
        });
    }
    let (c1, c2) = single_point_crossover(parent1.path(), parent2.path(), rng);
    check_permutation(&c1, point_count, "crossover")?;
    check_permutation(&c2, point_count, "crossover")?;
    Ok((Tour::new(c1), Tour::new(c2)))
}

/// Returns an inverted copy of `tour`, verified against `0..point_count`.
///
/// # Errors
/// [`TspError::InvariantViolation`] if the result is not a valid permutation.
pub fn mutate<R: Rng>(tour: &Tour, point_count: usize, rng: &mut R) -> Result<Tour> {
    let mut path = tour.path().to_vec();
    invert_mutation(&mut path, rng);
    check_permutation(&path, point_count, "mutation")?;
    Ok(Tour::new(path))
}

// ============================================================================
// Permutation checks
// ============================================================================

/// Whether `perm` contains every index in `0..perm.len()` exactly once.
pub fn is_permutation(perm: &[usize]) -> bool {
    find_defect(perm, perm.len()).is_none()
}

/// Verifies `perm` is a permutation of `0..n`.
///
/// # Errors
/// [`TspError::InvariantViolation`] naming `operator` and the first defect.
pub fn check_permutation(perm: &[usize], n: usize, operator: &'static str) -> Result<()> {
    match find_defect(perm, n) {
        None => Ok(()),
        Some(reason) => {
            tracing::error!(operator, %reason, "genetic operator broke the permutation invariant");
            Err(TspError::InvariantViolation { operator, reason })
        }
    }
}

fn find_defect(perm: &[usize], n: usize) -> Option<String> {
    if perm.len() != n {
        return Some(format!("expected {n} genes, found {}", perm.len()));
    }
    let mut seen = vec![false; n];
    for &gene in perm {
        match seen.get_mut(gene) {
            None => return Some(format!("gene {gene} out of range 0..{n}")),
            Some(true) => return Some(format!("gene {gene} repeated")),
            Some(slot) => *slot = true,
        }
    }
    None
}

// ============================================================================
// Helpers
// ============================================================================

/// Pick a random segment `[start, end]` with `start < end < n`.
///
/// Requires `n >= 2`.
fn random_segment<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let start = rng.random_range(0..n - 1);
    let end = rng.random_range(start + 1..n);
    (start, end)
}

// ============================================================================
// Tests
// ============================================================================
