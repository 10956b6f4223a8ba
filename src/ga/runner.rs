//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates one complete run: initialization → evaluation →
//! generational replacement for a fixed budget, with an optional observer
//! hook for progress reporting.

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::config::GaConfig;
use super::population::Population;
use super::types::{GaProblem, Individual};

/// Result of a single GA run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The best individual in the final population.
    pub best: I,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: f64,

    /// Best fitness of the initial (generation 0) population.
    pub initial_fitness: f64,

    /// Number of generations executed.
    pub generations: usize,

    /// Best population fitness after each generation, starting with
    /// generation 0 (length `generations + 1`).
    pub fitness_history: Vec<f64>,
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```ignore
/// let problem = AssignmentProblem::new(&input);
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::run(&problem, &config);
/// println!("best fitness: {}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`GaConfig::validate`]
    /// first to get a descriptive error).
    pub fn run<P: GaProblem>(problem: &P, config: &GaConfig) -> GaResult<P::Individual> {
        Self::run_with_observer(problem, config, |_, _| {})
    }

    /// Runs the GA, invoking `on_generation(generation, best_fitness)` after
    /// every generation.
    ///
    /// The observer is a reporting hook only; it cannot influence the run.
    pub fn run_with_observer<P, F>(
        problem: &P,
        config: &GaConfig,
        mut on_generation: F,
    ) -> GaResult<P::Individual>
    where
        P: GaProblem,
        F: FnMut(usize, f64),
    {
        config.validate().expect("invalid GaConfig");

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut population = Population::new(problem, config.population_size, &mut rng);

        let initial_fitness = population.best().fitness();
        let mut fitness_history = Vec::with_capacity(config.generations + 1);
        fitness_history.push(initial_fitness);

        for generation in 1..=config.generations {
            population.evolve(config, &mut rng);
            let best_fitness = population.best().fitness();
            fitness_history.push(best_fitness);
            on_generation(generation, best_fitness);
        }

        let best = population.best().clone();
        GaResult {
            best_fitness: best.fitness(),
            initial_fitness,
            best,
            generations: config.generations,
            fitness_history,
        }
    }
}
