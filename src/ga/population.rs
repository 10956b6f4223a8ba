//! Population ownership and the generational replacement step.

use rand::Rng;

use super::config::GaConfig;
use super::selection::tournament;
use super::types::{GaProblem, Individual};

/// A population of candidate solutions for one GA run.
///
/// The population exclusively owns its individuals; [`evolve`](Self::evolve)
/// builds a full replacement set and swaps it in atomically, so no partially
/// evolved state is ever observable.
pub struct Population<'a, P: GaProblem> {
    problem: &'a P,
    size: usize,
    individuals: Vec<P::Individual>,
}

impl<'a, P: GaProblem> Population<'a, P> {
    /// Creates `size` independent random individuals and evaluates them all.
    pub fn new<R: Rng + ?Sized>(problem: &'a P, size: usize, rng: &mut R) -> Self {
        let individuals = (0..size).map(|_| problem.create_individual(rng)).collect();
        let mut population = Self {
            problem,
            size,
            individuals,
        };
        population.evaluate();
        population
    }

    /// Returns the individuals in their current order.
    pub fn individuals(&self) -> &[P::Individual] {
        &self.individuals
    }

    /// Returns the individual with the lowest fitness (first on ties).
    ///
    /// # Panics
    /// Panics if the population is empty.
    pub fn best(&self) -> &P::Individual {
        self.individuals
            .iter()
            .min_by(|a, b| {
                a.fitness()
                    .partial_cmp(&b.fitness())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .expect("population must not be empty")
    }

    /// Evaluates every individual and stores its fitness.
    fn evaluate(&mut self) {
        for individual in &mut self.individuals {
            let fitness = self.problem.evaluate(individual);
            individual.set_fitness(fitness);
        }
    }

    /// Produces the next generation.
    ///
    /// 1. Sort ascending by fitness.
    /// 2. Copy the top `elitism` individuals unchanged.
    /// 3. Fill the remainder with tournament-selected parents: crossover
    ///    with probability `crossover_rate` (else a copy of parent1), then
    ///    mutation with probability `mutation_rate`.
    /// 4. Replace the owned set and re-evaluate everything. Evaluation is
    ///    pure, so re-scoring the elites cannot change their fitness.
    pub fn evolve<R: Rng + ?Sized>(&mut self, config: &GaConfig, rng: &mut R) {
        self.individuals.sort_by(|a, b| {
            a.fitness()
                .partial_cmp(&b.fitness())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let elite_count = config.elitism.min(self.size);
        let mut next: Vec<P::Individual> = self.individuals[..elite_count].to_vec();

        while next.len() < self.size {
            let p1 = tournament(&self.individuals, config.tournament_size, rng);
            let p2 = tournament(&self.individuals, config.tournament_size, rng);

            let mut child = if rng.random::<f64>() < config.crossover_rate {
                self.problem
                    .crossover(&self.individuals[p1], &self.individuals[p2], rng)
            } else {
                self.individuals[p1].clone()
            };

            if rng.random::<f64>() < config.mutation_rate {
                self.problem.mutate(&mut child, rng);
            }

            next.push(child);
        }

        self.individuals = next;
        self.evaluate();
    }
}
