//! Problem and result entities.
//!
//! The JSON data model for an assignment problem: groups with target sizes
//! and balancing criteria, students with eligibility lists, per-criterion
//! values and optional group rankings, plus the solved output with its
//! derived statistics.
//!
//! Deserialization normalizes the input (a criterion given as a single
//! config becomes a one-element list); [`ProblemInput::validate`] covers the
//! semantic constraints serde cannot express.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// Objective kind attached to a group criterion.
///
/// - `Minimize`: keep the group's sum of the criterion close to the
///   population mean scaled by the group size.
/// - `Prerequisite`: every member must reach `min_ratio`, enforced as a
///   hard constraint.
/// - `Pull`: concentrate high values by penalizing the spread between the
///   group's best member and the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriterionType {
    Minimize,
    Prerequisite,
    Pull,
}

/// One configuration entry for a named criterion on a group.
///
/// `min_ratio` is meaningful for `Prerequisite` only. `target` is accepted
/// for forward compatibility but not used by the fitness function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionConfig {
    #[serde(rename = "type")]
    pub kind: CriterionType,
    #[serde(default)]
    pub min_ratio: Option<f64>,
    #[serde(default)]
    pub target: Option<f64>,
}

/// A group with a target size and its balancing criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub size: i64,
    #[serde(deserialize_with = "deserialize_criteria")]
    pub criteria: HashMap<String, Vec<CriterionConfig>>,
}

/// A student with group eligibility, criterion values in `[0, 1]`, and an
/// optional ranking of groups (higher is better).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub possible_groups: Vec<i64>,
    pub values: HashMap<String, f64>,
    #[serde(default)]
    pub rankings: Option<HashMap<i64, f64>>,
}

/// A complete assignment problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemInput {
    pub num_students: usize,
    pub num_groups: usize,
    pub groups: Vec<Group>,
    pub students: Vec<Student>,
    #[serde(default)]
    pub exclude: Vec<Vec<i64>>,
    #[serde(default = "default_ranking_percentage")]
    pub ranking_percentage: f64,
}

fn default_ranking_percentage() -> f64 {
    50.0
}

/// Accept either a single config or a list of configs per criterion name,
/// normalized to a list.
fn deserialize_criteria<'de, D>(
    deserializer: D,
) -> Result<HashMap<String, Vec<CriterionConfig>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(CriterionConfig),
        Many(Vec<CriterionConfig>),
    }

    let raw = HashMap::<String, OneOrMany>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(name, configs)| {
            let configs = match configs {
                OneOrMany::One(config) => vec![config],
                OneOrMany::Many(configs) => configs,
            };
            (name, configs)
        })
        .collect())
}

impl ProblemInput {
    /// Checks the semantic constraints of the input.
    ///
    /// An empty `possible_groups` list is allowed: seeding places such a
    /// student into the fallback group and the size penalty sorts it out.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.num_students != self.students.len() {
            return Err(ValidationError::StudentCountMismatch {
                declared: self.num_students,
                found: self.students.len(),
            });
        }
        if self.num_groups != self.groups.len() {
            return Err(ValidationError::GroupCountMismatch {
                declared: self.num_groups,
                found: self.groups.len(),
            });
        }

        let mut group_ids = HashSet::new();
        for group in &self.groups {
            if !group_ids.insert(group.id) {
                return Err(ValidationError::DuplicateGroupId(group.id));
            }
            if group.size < 0 {
                return Err(ValidationError::NegativeGroupSize(group.id));
            }
            for (name, configs) in &group.criteria {
                for config in configs {
                    match (config.kind, config.min_ratio) {
                        (CriterionType::Prerequisite, None) => {
                            return Err(ValidationError::MissingMinRatio {
                                group: group.id,
                                criterion: name.clone(),
                            });
                        }
                        (CriterionType::Prerequisite, Some(ratio))
                            if !(0.0..=1.0).contains(&ratio) =>
                        {
                            return Err(ValidationError::MinRatioOutOfRange {
                                group: group.id,
                                criterion: name.clone(),
                                value: ratio,
                            });
                        }
                        _ => {}
                    }
                }
            }
        }

        let mut student_ids = HashSet::new();
        for student in &self.students {
            if !student_ids.insert(student.id) {
                return Err(ValidationError::DuplicateStudentId(student.id));
            }
            for (name, &value) in &student.values {
                if !(0.0..=1.0).contains(&value) {
                    return Err(ValidationError::ValueOutOfRange {
                        student: student.id,
                        criterion: name.clone(),
                        value,
                    });
                }
            }
            if let Some(rankings) = &student.rankings {
                for (&group, &value) in rankings {
                    if !(0.0..=1.0).contains(&value) {
                        return Err(ValidationError::RankingOutOfRange {
                            student: student.id,
                            group,
                            value,
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

/// One placed student in the solved output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub student_id: i64,
    pub group_id: i64,
}

/// Summary of how well the rankings objective was honored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingsStats {
    pub avg_rank: f64,
    pub min_rank: f64,
}

/// Spread of a minimized criterion across groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimizeCriterionStats {
    pub max_group_avg_diff: f64,
    pub max_group_global_diff: f64,
}

/// Post-solution report derived from the winning assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemStats {
    pub rankings: Option<RankingsStats>,
    pub minimize: Option<HashMap<String, MinimizeCriterionStats>>,
    pub prerequisites_met: Option<bool>,
}

/// The solved assignment, its status line, and optional statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemOutput {
    pub assignments: Vec<Assignment>,
    pub status: String,
    pub stats: Option<ProblemStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_input_json() -> &'static str {
        r#"{
            "num_students": 2,
            "num_groups": 1,
            "groups": [
                { "id": 10, "size": 2,
                  "criteria": { "skill": { "type": "minimize" } } }
            ],
            "students": [
                { "id": 1, "possible_groups": [10], "values": { "skill": 0.4 } },
                { "id": 2, "possible_groups": [10], "values": { "skill": 0.6 },
                  "rankings": { "10": 0.9 } }
            ]
        }"#
    }

    #[test]
    fn test_parse_minimal_input() {
        let input: ProblemInput = serde_json::from_str(minimal_input_json()).unwrap();
        assert_eq!(input.num_students, 2);
        assert_eq!(input.groups[0].id, 10);
        assert!(input.exclude.is_empty());
        assert!((input.ranking_percentage - 50.0).abs() < 1e-12);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_single_config_normalized_to_list() {
        let input: ProblemInput = serde_json::from_str(minimal_input_json()).unwrap();
        let configs = &input.groups[0].criteria["skill"];
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].kind, CriterionType::Minimize);
        assert_eq!(configs[0].min_ratio, None);
    }

    #[test]
    fn test_config_list_kept_as_is() {
        let json = r#"{
            "num_students": 0,
            "num_groups": 1,
            "groups": [
                { "id": 1, "size": 0,
                  "criteria": { "x": [
                      { "type": "pull" },
                      { "type": "prerequisite", "min_ratio": 0.3 }
                  ] } }
            ],
            "students": []
        }"#;
        let input: ProblemInput = serde_json::from_str(json).unwrap();
        let configs = &input.groups[0].criteria["x"];
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].kind, CriterionType::Pull);
        assert_eq!(configs[1].kind, CriterionType::Prerequisite);
        assert_eq!(configs[1].min_ratio, Some(0.3));
    }

    #[test]
    fn test_rankings_use_integer_keys() {
        let input: ProblemInput = serde_json::from_str(minimal_input_json()).unwrap();
        let rankings = input.students[1].rankings.as_ref().unwrap();
        assert_eq!(rankings.get(&10), Some(&0.9));
    }

    #[test]
    fn test_target_field_is_parsed() {
        let json = r#"{ "type": "minimize", "target": 0.5 }"#;
        let config: CriterionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.target, Some(0.5));
    }

    #[test]
    fn test_legacy_tags_rejected() {
        let json = r#"{ "type": "best_min" }"#;
        assert!(serde_json::from_str::<CriterionConfig>(json).is_err());
    }

    #[test]
    fn test_validate_student_count_mismatch() {
        let mut input: ProblemInput = serde_json::from_str(minimal_input_json()).unwrap();
        input.num_students = 3;
        assert_eq!(
            input.validate(),
            Err(ValidationError::StudentCountMismatch {
                declared: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_validate_duplicate_student_id() {
        let mut input: ProblemInput = serde_json::from_str(minimal_input_json()).unwrap();
        input.students[1].id = 1;
        assert_eq!(input.validate(), Err(ValidationError::DuplicateStudentId(1)));
    }

    #[test]
    fn test_validate_value_out_of_range() {
        let mut input: ProblemInput = serde_json::from_str(minimal_input_json()).unwrap();
        input
            .students[0]
            .values
            .insert("skill".to_string(), 1.5);
        assert!(matches!(
            input.validate(),
            Err(ValidationError::ValueOutOfRange { student: 1, .. })
        ));
    }

    #[test]
    fn test_validate_prerequisite_needs_min_ratio() {
        let mut input: ProblemInput = serde_json::from_str(minimal_input_json()).unwrap();
        input.groups[0].criteria.insert(
            "gate".to_string(),
            vec![CriterionConfig {
                kind: CriterionType::Prerequisite,
                min_ratio: None,
                target: None,
            }],
        );
        assert!(matches!(
            input.validate(),
            Err(ValidationError::MissingMinRatio { group: 10, .. })
        ));
    }

    #[test]
    fn test_validate_allows_empty_possible_groups() {
        let mut input: ProblemInput = serde_json::from_str(minimal_input_json()).unwrap();
        input.students[0].possible_groups.clear();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_output_serializes_null_stats() {
        let output = ProblemOutput {
            assignments: vec![Assignment {
                student_id: 1,
                group_id: 10,
            }],
            status: "FITNESS: 0; INITIAL FITNESS: 0; ".to_string(),
            stats: None,
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["stats"], serde_json::Value::Null);
        assert_eq!(json["assignments"][0]["student_id"], 1);
    }
}
