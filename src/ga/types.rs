//! Core trait definitions for the GA engine.
//!
//! The two central traits, [`Individual`] and [`GaProblem`], define the
//! contract between the generic evolutionary loop and the domain-specific
//! problem implementation.

use rand::Rng;

/// A candidate solution in the GA population.
///
/// Individuals carry their own fitness value. The engine calls
/// [`GaProblem::evaluate`] to compute fitness, then stores it via
/// [`set_fitness`](Individual::set_fitness). Lower fitness is better;
/// an unevaluated individual reports `f64::INFINITY`.
pub trait Individual: Clone {
    /// Returns the current fitness of this individual.
    fn fitness(&self) -> f64;

    /// Sets the fitness of this individual.
    ///
    /// Called by the engine after evaluation.
    fn set_fitness(&mut self, fitness: f64);
}

/// Defines a GA optimization problem.
///
/// The problem supplies everything domain-specific:
///
/// 1. **Initialization**: how to create random individuals
/// 2. **Evaluation**: how to compute fitness (deterministic and pure)
/// 3. **Crossover**: how to recombine two parents into a child
/// 4. **Mutation**: how to perturb an individual in place
///
/// The engine owns the probabilistic gates: crossover runs with the
/// configured `crossover_rate` (otherwise the child is a copy of the first
/// parent) and `mutate` is invoked with the configured `mutation_rate`, so
/// implementations apply their operator unconditionally when called.
pub trait GaProblem {
    /// The individual (solution) type for this problem.
    type Individual: Individual;

    /// Creates a random individual.
    ///
    /// Called during population initialization. The implementation should
    /// produce a plausible (but not necessarily good) solution.
    fn create_individual<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Individual;

    /// Evaluates an individual and returns its fitness.
    ///
    /// Lower fitness values are considered better (minimization).
    fn evaluate(&self, individual: &Self::Individual) -> f64;

    /// Produces one child by recombining two parents.
    ///
    /// The default implementation clones parent1 (no crossover).
    fn crossover<R: Rng + ?Sized>(
        &self,
        parent1: &Self::Individual,
        _parent2: &Self::Individual,
        _rng: &mut R,
    ) -> Self::Individual {
        parent1.clone()
    }

    /// Mutates an individual in place.
    ///
    /// The default implementation is a no-op.
    fn mutate<R: Rng + ?Sized>(&self, _individual: &mut Self::Individual, _rng: &mut R) {}
}
