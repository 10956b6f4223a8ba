//! Penalty-method fitness.
//!
//! All hard and soft constraints are folded into one additive scalar. Hard
//! violations each cost [`HARD_CONSTRAINT_PENALTY`], which dwarfs any
//! reachable soft total, so lexicographic ordering between constraint
//! satisfaction and objective quality emerges from magnitudes alone.
//!
//! Criterion values in `[0, 1]` are scaled by [`SCALING_FACTOR`] and
//! truncated to integers up front; evaluation itself is pure `i64`
//! arithmetic, so identical chromosomes always score identically.
//!
//! The evaluator precompiles the problem once (scaled value tables, per
//! group criterion slots, resolved exclusion pairs, the rankings weight);
//! [`FitnessEvaluator::penalty`] is the per-chromosome hot path.

use std::collections::{BTreeSet, HashMap};

use crate::models::{CriterionType, ProblemInput};

/// Converts `[0, 1]` criterion values to the integer domain.
pub const SCALING_FACTOR: i64 = 10_000;

/// Cost of one hard-constraint violation.
pub const HARD_CONSTRAINT_PENALTY: i64 = 1_000_000_000_000;

/// Everything attached to one criterion name on one group, with the
/// config-independent parts resolved at build time.
struct CriterionSlot {
    group: usize,
    criterion: usize,
    /// One precomputed target sum per MINIMIZE config.
    minimize_targets: Vec<i64>,
    /// Number of PULL configs; each adds the same spread penalty.
    pull_configs: i64,
    /// One scaled threshold per PREREQUISITE config carrying a min_ratio.
    prerequisite_thresholds: Vec<i64>,
}

struct RankingObjective {
    /// The scaled rankings weight `W`.
    weight: i64,
    /// Per student: assigned-group id → `⌊ranking · W⌋`.
    scaled: Vec<HashMap<i64, i64>>,
}

/// Compiled fitness function for one problem instance.
pub struct FitnessEvaluator {
    num_students: usize,
    group_sizes: Vec<i64>,
    group_index: HashMap<i64, usize>,
    /// Exclusion pairs as student positions; pairs naming unknown students
    /// are dropped here and therefore contribute nothing.
    exclusions: Vec<(usize, usize)>,
    /// `⌊value · SCALING_FACTOR⌋` per criterion per student.
    scaled_values: Vec<Vec<i64>>,
    slots: Vec<CriterionSlot>,
    slots_by_group: Vec<Vec<usize>>,
    ranking: Option<RankingObjective>,
}

impl FitnessEvaluator {
    pub fn new(input: &ProblemInput) -> Self {
        let num_students = input.students.len();

        let group_index: HashMap<i64, usize> = input
            .groups
            .iter()
            .enumerate()
            .map(|(idx, group)| (group.id, idx))
            .collect();
        let group_sizes: Vec<i64> = input.groups.iter().map(|group| group.size).collect();

        let student_index: HashMap<i64, usize> = input
            .students
            .iter()
            .enumerate()
            .map(|(idx, student)| (student.id, idx))
            .collect();

        // Pairs referencing unknown student ids contribute 0; extra
        // elements beyond the first two are ignored.
        let exclusions = input
            .exclude
            .iter()
            .filter(|pair| pair.len() >= 2)
            .filter_map(|pair| {
                let a = *student_index.get(&pair[0])?;
                let b = *student_index.get(&pair[1])?;
                Some((a, b))
            })
            .collect();

        // Criterion names in a stable order, with scaled value tables and
        // global means over the full student list (missing values are 0).
        let names: Vec<&String> = input
            .groups
            .iter()
            .flat_map(|group| group.criteria.keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let criterion_index: HashMap<&String, usize> = names
            .iter()
            .enumerate()
            .map(|(idx, &name)| (name, idx))
            .collect();

        let mut scaled_values = vec![vec![0i64; num_students]; names.len()];
        let mut global_means = vec![0f64; names.len()];
        for (c, &name) in names.iter().enumerate() {
            let mut sum = 0.0;
            for (s, student) in input.students.iter().enumerate() {
                let value = student.values.get(name).copied().unwrap_or(0.0);
                scaled_values[c][s] = (value * SCALING_FACTOR as f64) as i64;
                sum += value;
            }
            if num_students > 0 {
                global_means[c] = sum / num_students as f64;
            }
        }

        let mut slots = Vec::new();
        let mut slots_by_group = vec![Vec::new(); input.groups.len()];
        for (gi, group) in input.groups.iter().enumerate() {
            for (name, configs) in &group.criteria {
                let criterion = criterion_index[name];
                let mut slot = CriterionSlot {
                    group: gi,
                    criterion,
                    minimize_targets: Vec::new(),
                    pull_configs: 0,
                    prerequisite_thresholds: Vec::new(),
                };
                for config in configs {
                    match config.kind {
                        CriterionType::Minimize => {
                            let target = (global_means[criterion]
                                * group.size as f64
                                * SCALING_FACTOR as f64)
                                as i64;
                            slot.minimize_targets.push(target);
                        }
                        CriterionType::Pull => slot.pull_configs += 1,
                        CriterionType::Prerequisite => {
                            if let Some(min_ratio) = config.min_ratio {
                                slot.prerequisite_thresholds
                                    .push((min_ratio * SCALING_FACTOR as f64) as i64);
                            }
                        }
                    }
                }
                slots_by_group[gi].push(slots.len());
                slots.push(slot);
            }
        }

        let ranking = Self::build_ranking(input, &slots);

        Self {
            num_students,
            group_sizes,
            group_index,
            exclusions,
            scaled_values,
            slots,
            slots_by_group,
            ranking,
        }
    }

    /// The rankings objective is active only when at least one student
    /// actually ranked groups. Its weight is chosen so that, at
    /// equilibrium, rankings contribute `ranking_percentage` percent of the
    /// soft penalty mass relative to the K MINIMIZE/PULL objectives.
    fn build_ranking(input: &ProblemInput, slots: &[CriterionSlot]) -> Option<RankingObjective> {
        let any_rankings = input
            .students
            .iter()
            .any(|student| student.rankings.as_ref().is_some_and(|r| !r.is_empty()));
        if !any_rankings {
            return None;
        }

        let soft_configs: i64 = slots
            .iter()
            .map(|slot| slot.minimize_targets.len() as i64 + slot.pull_configs)
            .sum();

        let percentage = input.ranking_percentage.min(99.99);
        let weight_factor = if soft_configs == 0 {
            1.0
        } else {
            (percentage * soft_configs as f64) / (100.0 - percentage)
        };
        let weight = (SCALING_FACTOR as f64 * weight_factor) as i64;

        let scaled = input
            .students
            .iter()
            .map(|student| {
                student
                    .rankings
                    .iter()
                    .flatten()
                    .map(|(&group, &value)| (group, (value * weight as f64) as i64))
                    .collect()
            })
            .collect();

        Some(RankingObjective { weight, scaled })
    }

    /// Total penalty for one chromosome; non-negative, lower is better.
    ///
    /// `genes[s]` is the group id assigned to the student at position `s`
    /// in the input's student list.
    pub fn penalty(&self, genes: &[i64]) -> i64 {
        debug_assert_eq!(genes.len(), self.num_students);

        let mut total = 0i64;

        // Group sizes.
        let mut counts = vec![0i64; self.group_sizes.len()];
        for gene in genes {
            if let Some(&gi) = self.group_index.get(gene) {
                counts[gi] += 1;
            }
        }
        for (gi, &size) in self.group_sizes.iter().enumerate() {
            total += (counts[gi] - size).abs() * HARD_CONSTRAINT_PENALTY;
        }

        // Exclusion pairs.
        for &(a, b) in &self.exclusions {
            if genes[a] == genes[b] {
                total += HARD_CONSTRAINT_PENALTY;
            }
        }

        // Per-group criterion sums, maxima and minima in one pass.
        let mut sums = vec![0i64; self.slots.len()];
        let mut maxes = vec![0i64; self.slots.len()];
        let mut mins = vec![i64::MAX; self.slots.len()];
        for (s, gene) in genes.iter().enumerate() {
            if let Some(&gi) = self.group_index.get(gene) {
                for &si in &self.slots_by_group[gi] {
                    let value = self.scaled_values[self.slots[si].criterion][s];
                    sums[si] += value;
                    if value > maxes[si] {
                        maxes[si] = value;
                    }
                    if value < mins[si] {
                        mins[si] = value;
                    }
                }
            }
        }

        for (si, slot) in self.slots.iter().enumerate() {
            // Empty groups carry only their size penalty.
            if counts[slot.group] == 0 {
                continue;
            }
            let group_sum = sums[si];
            for &target in &slot.minimize_targets {
                total += (group_sum - target).abs();
            }
            if slot.pull_configs > 0 {
                total += slot.pull_configs
                    * (maxes[si] * self.group_sizes[slot.group] - group_sum);
            }
            // One hard penalty per config as soon as any member is below
            // the threshold, regardless of how many are.
            for &threshold in &slot.prerequisite_thresholds {
                if mins[si] < threshold {
                    total += HARD_CONSTRAINT_PENALTY;
                }
            }
        }

        // Rankings: reward is converted into a shortfall from the best
        // possible total, keeping the scalar a penalty.
        if let Some(ranking) = &self.ranking {
            let mut ranking_sum = 0i64;
            for (s, gene) in genes.iter().enumerate() {
                ranking_sum += ranking.scaled[s].get(gene).copied().unwrap_or(0);
            }
            total += ranking.weight * self.num_students as i64 - ranking_sum;
        }

        total
    }
}
