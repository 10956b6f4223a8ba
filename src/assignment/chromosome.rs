//! Assignment chromosome and its genetic operators.
//!
//! A chromosome maps every student (by position in the input's student
//! list) to a group id. The representation strives for, but does not
//! enforce, size- and eligibility-feasibility; violations are
//! priced by the fitness function instead.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom, index};

use super::problem::AssignmentProblem;
use crate::ga::Individual;

/// One candidate assignment plus its cached fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentChromosome {
    genes: Vec<i64>,
    fitness: f64,
}

impl Individual for AssignmentChromosome {
    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

impl AssignmentChromosome {
    /// Wraps an explicit gene vector; fitness starts at `+∞` until the
    /// chromosome is evaluated.
    pub fn new(genes: Vec<i64>) -> Self {
        Self {
            genes,
            fitness: f64::INFINITY,
        }
    }

    /// The assigned group id per student position.
    pub fn genes(&self) -> &[i64] {
        &self.genes
    }

    /// Creates a size-balanced random assignment respecting
    /// `possible_groups` where capacity allows.
    ///
    /// Students are visited most-constrained-first (shuffled, then stably
    /// sorted by eligibility-list length) so tightly constrained students
    /// claim capacity before it runs out. Each student takes the eligible
    /// group with the most remaining capacity, ties broken uniformly at
    /// random; with no capacity left anywhere eligible, a uniform choice
    /// among the eligible groups is made and the size penalty is left to
    /// the fitness function. Students with no eligible groups at all land
    /// in the fallback group without consuming capacity.
    pub fn random<R: Rng + ?Sized>(problem: &AssignmentProblem, rng: &mut R) -> Self {
        let n = problem.possible.len();
        let mut remaining = problem.group_sizes.clone();

        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(rng);
        order.sort_by_key(|&s| problem.possible[s].len());

        let mut genes = vec![0i64; n];
        for &s in &order {
            let candidates = &problem.possible[s];
            if candidates.is_empty() {
                genes[s] = problem.fallback_group;
                continue;
            }

            let feasible: Vec<i64> = candidates
                .iter()
                .copied()
                .filter(|gid| {
                    problem
                        .group_of(*gid)
                        .is_some_and(|gi| remaining[gi] > 0)
                })
                .collect();

            let chosen = if feasible.is_empty() {
                *candidates
                    .choose(rng)
                    .expect("candidates checked non-empty")
            } else {
                let most = feasible
                    .iter()
                    .map(|gid| remaining[problem.group_of(*gid).expect("feasible group known")])
                    .max()
                    .expect("feasible checked non-empty");
                let best: Vec<i64> = feasible
                    .into_iter()
                    .filter(|gid| {
                        remaining[problem.group_of(*gid).expect("feasible group known")] == most
                    })
                    .collect();
                *best.choose(rng).expect("at least one maximum")
            };

            genes[s] = chosen;
            if let Some(gi) = problem.group_of(chosen) {
                remaining[gi] -= 1;
            }
        }

        Self::new(genes)
    }
}

/// Builds a child by copying each gene from either parent with equal
/// probability. The child covers exactly parent1's students.
pub fn uniform_crossover<R: Rng + ?Sized>(
    parent1: &AssignmentChromosome,
    parent2: &AssignmentChromosome,
    rng: &mut R,
) -> AssignmentChromosome {
    debug_assert_eq!(parent1.genes.len(), parent2.genes.len());
    let genes = parent1
        .genes
        .iter()
        .zip(&parent2.genes)
        .map(|(&a, &b)| if rng.random_bool(0.5) { a } else { b })
        .collect();
    AssignmentChromosome::new(genes)
}

/// Attempts one group swap between two random students.
///
/// The swap happens only when the students sit in different groups and
/// each is eligible for the other's group, so group sizes are preserved
/// exactly. Otherwise the chromosome is left unchanged.
pub fn swap_mutation<R: Rng + ?Sized>(
    chromosome: &mut AssignmentChromosome,
    problem: &AssignmentProblem,
    rng: &mut R,
) {
    let n = chromosome.genes.len();
    if n < 2 {
        return;
    }

    let pair = index::sample(rng, n, 2);
    let (s1, s2) = (pair.index(0), pair.index(1));
    let (g1, g2) = (chromosome.genes[s1], chromosome.genes[s2]);

    if g1 == g2 {
        return;
    }
    if problem.possible[s1].contains(&g2) && problem.possible[s2].contains(&g1) {
        chromosome.genes.swap(s1, s2);
    }
}

/// Reassigns one random student uniformly within its eligible groups.
///
/// Alternate operator; the default pipeline relies on [`swap_mutation`]
/// because it cannot disturb group sizes.
pub fn random_mutation<R: Rng + ?Sized>(
    chromosome: &mut AssignmentChromosome,
    problem: &AssignmentProblem,
    rng: &mut R,
) {
    if chromosome.genes.is_empty() {
        return;
    }
    let s = rng.random_range(0..chromosome.genes.len());
    if let Some(&gid) = problem.possible[s].choose(rng) {
        chromosome.genes[s] = gid;
    }
}
