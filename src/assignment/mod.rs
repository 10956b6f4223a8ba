//! Student-to-group assignment domain.
//!
//! Chromosome representation and seeding, the penalty-method fitness, the
//! [`GaProblem`](crate::ga::GaProblem) bridge, the multi-run driver, and
//! the derived statistics report.

mod chromosome;
mod fitness;
mod problem;
mod solver;
mod stats;

pub use chromosome::{
    AssignmentChromosome, random_mutation, swap_mutation, uniform_crossover,
};
pub use fitness::{FitnessEvaluator, HARD_CONSTRAINT_PENALTY, SCALING_FACTOR};
pub use problem::AssignmentProblem;
pub use solver::{SolveOptions, SolveProgress, solve, solve_with_observer};
pub use stats::compute_stats;
