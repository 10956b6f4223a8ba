//! Bridges the assignment domain to the GA engine.
//!
//! [`AssignmentProblem`] compiles a validated [`ProblemInput`] into the
//! compact lookup tables the operators and the fitness evaluator need, and
//! implements [`GaProblem`] on top of them.

use std::collections::HashMap;

use rand::Rng;

use super::chromosome::{AssignmentChromosome, swap_mutation, uniform_crossover};
use super::fitness::FitnessEvaluator;
use crate::ga::GaProblem;
use crate::models::ProblemInput;

/// GA problem definition for one assignment solve.
///
/// The compiled tables are read-only for the duration of the solve; nothing
/// here is shared across concurrent runs.
pub struct AssignmentProblem {
    /// Student ids in input order; gene position `s` belongs to
    /// `student_ids[s]`.
    pub(crate) student_ids: Vec<i64>,
    /// Eligible group ids per student position.
    pub(crate) possible: Vec<Vec<i64>>,
    /// Target size per group position.
    pub(crate) group_sizes: Vec<i64>,
    /// Group id → group position.
    group_index: HashMap<i64, usize>,
    /// Where students without any eligible group are parked: the first
    /// group's id, or 0 when there are no groups.
    pub(crate) fallback_group: i64,
    evaluator: FitnessEvaluator,
}

impl AssignmentProblem {
    pub fn new(input: &ProblemInput) -> Self {
        Self {
            student_ids: input.students.iter().map(|s| s.id).collect(),
            possible: input
                .students
                .iter()
                .map(|s| s.possible_groups.clone())
                .collect(),
            group_sizes: input.groups.iter().map(|g| g.size).collect(),
            group_index: input
                .groups
                .iter()
                .enumerate()
                .map(|(idx, g)| (g.id, idx))
                .collect(),
            fallback_group: input.groups.first().map_or(0, |g| g.id),
            evaluator: FitnessEvaluator::new(input),
        }
    }

    /// Student ids in gene order.
    pub fn student_ids(&self) -> &[i64] {
        &self.student_ids
    }

    /// Resolves a group id to its position, if the group exists.
    pub(crate) fn group_of(&self, group_id: i64) -> Option<usize> {
        self.group_index.get(&group_id).copied()
    }
}

impl GaProblem for AssignmentProblem {
    type Individual = AssignmentChromosome;

    fn create_individual<R: Rng + ?Sized>(&self, rng: &mut R) -> AssignmentChromosome {
        AssignmentChromosome::random(self, rng)
    }

    fn evaluate(&self, individual: &AssignmentChromosome) -> f64 {
        self.evaluator.penalty(individual.genes()) as f64
    }

    fn crossover<R: Rng + ?Sized>(
        &self,
        parent1: &AssignmentChromosome,
        parent2: &AssignmentChromosome,
        rng: &mut R,
    ) -> AssignmentChromosome {
        uniform_crossover(parent1, parent2, rng)
    }

    fn mutate<R: Rng + ?Sized>(&self, individual: &mut AssignmentChromosome, rng: &mut R) {
        swap_mutation(individual, self, rng);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::assignment::HARD_CONSTRAINT_PENALTY;
    use crate::ga::{GaConfig, GaRunner};
    use crate::models::{Group, Student};

    use super::*;

    fn two_group_input() -> ProblemInput {
        let groups = vec![
            Group {
                id: 10,
                size: 2,
                criteria: HashMap::new(),
            },
            Group {
                id: 20,
                size: 2,
                criteria: HashMap::new(),
            },
        ];
        let students = (1..=4)
            .map(|id| Student {
                id,
                possible_groups: vec![10, 20],
                values: HashMap::new(),
                rankings: None,
            })
            .collect();
        ProblemInput {
            num_students: 4,
            num_groups: 2,
            groups,
            students,
            exclude: vec![vec![1, 2]],
            ranking_percentage: 50.0,
        }
    }

    #[test]
    fn test_evaluate_matches_evaluator() {
        let input = two_group_input();
        let problem = AssignmentProblem::new(&input);
        let chromosome = AssignmentChromosome::new(vec![10, 10, 20, 20]);
        // Students 1 and 2 share group 10 and are excluded.
        assert_eq!(
            problem.evaluate(&chromosome),
            HARD_CONSTRAINT_PENALTY as f64
        );
    }

    #[test]
    fn test_fallback_group_is_first_group() {
        let input = two_group_input();
        let problem = AssignmentProblem::new(&input);
        assert_eq!(problem.fallback_group, 10);
    }

    #[test]
    fn test_ga_finds_feasible_assignment() {
        let input = two_group_input();
        let problem = AssignmentProblem::new(&input);
        let config = GaConfig::default()
            .with_population_size(30)
            .with_generations(40)
            .with_elitism(2)
            .with_seed(42);

        let result = GaRunner::run(&problem, &config);
        // Sizes and the exclusion are all satisfiable here, so the GA must
        // drive every hard term to zero.
        assert_eq!(result.best_fitness, 0.0);
    }

    #[test]
    fn test_infeasible_problem_still_returns_best_effort() {
        let mut input = two_group_input();
        // Nobody may join group 20, so its size constraint cannot be met.
        for student in &mut input.students {
            student.possible_groups = vec![10];
        }
        let problem = AssignmentProblem::new(&input);
        let config = GaConfig::default()
            .with_population_size(20)
            .with_generations(10)
            .with_seed(1);

        let result = GaRunner::run(&problem, &config);
        assert!(result.best_fitness >= HARD_CONSTRAINT_PENALTY as f64);
    }

    #[test]
    fn test_create_individual_uses_seeding() {
        let input = two_group_input();
        let problem = AssignmentProblem::new(&input);
        let mut rng = StdRng::seed_from_u64(3);
        let chromosome = problem.create_individual(&mut rng);
        assert_eq!(chromosome.genes().len(), 4);
    }
}
