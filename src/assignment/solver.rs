//! Multi-run solver driver.
//!
//! Runs several independent GA instances over the same problem and keeps
//! the best final chromosome. Every run starts from a fresh random state;
//! a configured base seed gives each run its own deterministic stream.

use tracing::debug;

use super::chromosome::AssignmentChromosome;
use super::problem::AssignmentProblem;
use super::stats::compute_stats;
use crate::ga::{GaConfig, GaResult, GaRunner};
use crate::models::{Assignment, ProblemInput, ProblemOutput};

/// Driver options.
#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Number of independent GA runs; floored at 1.
    pub runs: usize,
    /// Base seed for reproducible solves. Run `i` uses `seed + i`;
    /// `None` draws fresh entropy per run.
    pub seed: Option<u64>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            runs: 5,
            seed: None,
        }
    }
}

/// Per-generation progress event forwarded to the observer.
#[derive(Debug, Clone, Copy)]
pub struct SolveProgress {
    /// 0-based index of the current run.
    pub run: usize,
    pub total_runs: usize,
    /// 1-based generation within the current run.
    pub generation: usize,
    pub generations: usize,
    /// Best fitness in the current population.
    pub best_fitness: f64,
}

/// Solves an assignment problem.
///
/// Never fails: an infeasible problem simply yields a best-effort
/// assignment whose fitness (reported in `status`) stays at or above the
/// hard-constraint penalty. The input is expected to be validated.
pub fn solve(input: &ProblemInput, options: &SolveOptions) -> ProblemOutput {
    solve_with_observer(input, options, |_| {})
}

/// [`solve`], with a progress observer invoked after every generation of
/// every run. The observer is how the CLI drives its progress bar; the
/// solver itself stays free of presentation concerns.
pub fn solve_with_observer<F>(
    input: &ProblemInput,
    options: &SolveOptions,
    mut observer: F,
) -> ProblemOutput
where
    F: FnMut(SolveProgress),
{
    let total_runs = options.runs.max(1);
    let problem = AssignmentProblem::new(input);

    let mut winner: Option<GaResult<AssignmentChromosome>> = None;
    let mut winning_run = 0;

    for run in 0..total_runs {
        let mut config = GaConfig::default();
        config.seed = options.seed.map(|seed| seed.wrapping_add(run as u64));
        let generations = config.generations;

        let result = GaRunner::run_with_observer(&problem, &config, |generation, best_fitness| {
            observer(SolveProgress {
                run,
                total_runs,
                generation,
                generations,
                best_fitness,
            });
        });
        debug!(
            run = run + 1,
            fitness = result.best_fitness,
            "ga run finished"
        );

        // Strict improvement only: the earliest best run wins ties.
        if winner
            .as_ref()
            .is_none_or(|best| result.best_fitness < best.best_fitness)
        {
            winning_run = run;
            winner = Some(result);
        }
    }

    let winner = winner.expect("at least one run was executed");
    debug!(
        run = winning_run + 1,
        fitness = winner.best_fitness,
        "selected winning run"
    );

    let mut assignments: Vec<Assignment> = problem
        .student_ids()
        .iter()
        .zip(winner.best.genes())
        .map(|(&student_id, &group_id)| Assignment {
            student_id,
            group_id,
        })
        .collect();
    assignments.sort_by_key(|assignment| assignment.student_id);

    let status = format!(
        "FITNESS: {}; INITIAL FITNESS: {}; ",
        winner.best_fitness, winner.initial_fitness
    );
    let stats = compute_stats(input, &assignments);

    ProblemOutput {
        assignments,
        status,
        stats,
    }
}
