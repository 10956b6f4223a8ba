//! Post-solution statistics.
//!
//! Derives the human-facing report from the winning assignment: how well
//! rankings were honored, how balanced each minimized criterion ended up,
//! and whether every prerequisite held. All figures here work on the raw
//! `[0, 1]` values, not the scaled integers the fitness function uses.

use std::collections::HashMap;

use crate::models::{
    Assignment, CriterionType, MinimizeCriterionStats, ProblemInput, ProblemStats, RankingsStats,
    Student,
};

/// Builds the optional stats block; `None` when the problem has no
/// rankings, no MINIMIZE criterion, and no prerequisite to report on.
pub fn compute_stats(input: &ProblemInput, assignments: &[Assignment]) -> Option<ProblemStats> {
    let student_map: HashMap<i64, &Student> =
        input.students.iter().map(|s| (s.id, s)).collect();

    let mut group_students: HashMap<i64, Vec<i64>> =
        input.groups.iter().map(|g| (g.id, Vec::new())).collect();
    for assignment in assignments {
        group_students
            .entry(assignment.group_id)
            .or_default()
            .push(assignment.student_id);
    }

    let rankings = rankings_stats(input, assignments, &student_map);
    let minimize = minimize_stats(input, &group_students, &student_map);
    let prerequisites_met = prerequisites_met(input, &group_students, &student_map);

    if rankings.is_none() && minimize.is_none() && prerequisites_met.is_none() {
        return None;
    }

    Some(ProblemStats {
        rankings,
        minimize,
        prerequisites_met,
    })
}

/// Average and worst achieved ranking over the students that ranked groups
/// at all; an assigned group missing from a student's map counts as 0.
fn rankings_stats(
    input: &ProblemInput,
    assignments: &[Assignment],
    student_map: &HashMap<i64, &Student>,
) -> Option<RankingsStats> {
    let any_rankings = input
        .students
        .iter()
        .any(|s| s.rankings.as_ref().is_some_and(|r| !r.is_empty()));
    if !any_rankings {
        return None;
    }

    let mut values = Vec::new();
    for assignment in assignments {
        let Some(student) = student_map.get(&assignment.student_id) else {
            continue;
        };
        let Some(rankings) = &student.rankings else {
            continue;
        };
        if rankings.is_empty() {
            continue;
        }
        values.push(rankings.get(&assignment.group_id).copied().unwrap_or(0.0));
    }

    if values.is_empty() {
        return None;
    }
    Some(RankingsStats {
        avg_rank: values.iter().sum::<f64>() / values.len() as f64,
        min_rank: values.iter().copied().fold(f64::INFINITY, f64::min),
    })
}

/// Per minimized criterion: the spread between group means, and the worst
/// distance of any group mean from the global mean.
fn minimize_stats(
    input: &ProblemInput,
    group_students: &HashMap<i64, Vec<i64>>,
    student_map: &HashMap<i64, &Student>,
) -> Option<HashMap<String, MinimizeCriterionStats>> {
    let mut minimize_groups: HashMap<&String, Vec<i64>> = HashMap::new();
    for group in &input.groups {
        for (name, configs) in &group.criteria {
            if configs.iter().any(|c| c.kind == CriterionType::Minimize) {
                minimize_groups.entry(name).or_default().push(group.id);
            }
        }
    }
    if minimize_groups.is_empty() {
        return None;
    }

    let stats = minimize_groups
        .into_iter()
        .map(|(name, group_ids)| {
            let global_mean = if input.students.is_empty() {
                0.0
            } else {
                input
                    .students
                    .iter()
                    .map(|s| s.values.get(name).copied().unwrap_or(0.0))
                    .sum::<f64>()
                    / input.students.len() as f64
            };

            let mut group_avgs = Vec::new();
            for group_id in &group_ids {
                let Some(members) = group_students.get(group_id) else {
                    continue;
                };
                if members.is_empty() {
                    continue;
                }
                let total: f64 = members
                    .iter()
                    .filter_map(|id| student_map.get(id))
                    .map(|s| s.values.get(name).copied().unwrap_or(0.0))
                    .sum();
                group_avgs.push(total / members.len() as f64);
            }

            let max_group_avg_diff = if group_avgs.len() >= 2 {
                let max = group_avgs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let min = group_avgs.iter().copied().fold(f64::INFINITY, f64::min);
                max - min
            } else {
                0.0
            };
            let max_group_global_diff = group_avgs
                .iter()
                .map(|avg| (avg - global_mean).abs())
                .fold(0.0, f64::max);

            (
                name.clone(),
                MinimizeCriterionStats {
                    max_group_avg_diff,
                    max_group_global_diff,
                },
            )
        })
        .collect();

    Some(stats)
}

/// `Some(true/false)` when any prerequisite exists, `None` otherwise.
fn prerequisites_met(
    input: &ProblemInput,
    group_students: &HashMap<i64, Vec<i64>>,
    student_map: &HashMap<i64, &Student>,
) -> Option<bool> {
    let mut has_prerequisite = false;
    let mut met = true;

    for group in &input.groups {
        for (name, configs) in &group.criteria {
            for config in configs {
                let Some(min_ratio) = config.min_ratio else {
                    continue;
                };
                if config.kind != CriterionType::Prerequisite {
                    continue;
                }
                has_prerequisite = true;
                let members = group_students.get(&group.id);
                for member in members.into_iter().flatten() {
                    let value = student_map
                        .get(member)
                        .and_then(|s| s.values.get(name))
                        .copied()
                        .unwrap_or(0.0);
                    if value < min_ratio {
                        met = false;
                    }
                }
            }
        }
    }

    has_prerequisite.then_some(met)
}
