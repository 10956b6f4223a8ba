//! Error types for input validation and the HTTP shell.

use thiserror::Error;

/// Semantic validation failure in a [`ProblemInput`](crate::models::ProblemInput).
///
/// Structural problems (missing fields, wrong JSON types) are caught earlier
/// by serde; this enum covers the constraints serde cannot express.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("num_students is {declared} but {found} students were given")]
    StudentCountMismatch { declared: usize, found: usize },

    #[error("num_groups is {declared} but {found} groups were given")]
    GroupCountMismatch { declared: usize, found: usize },

    #[error("duplicate student id {0}")]
    DuplicateStudentId(i64),

    #[error("duplicate group id {0}")]
    DuplicateGroupId(i64),

    #[error("group {0} has negative size")]
    NegativeGroupSize(i64),

    #[error("student {student}: value {value} for criterion {criterion:?} is outside [0, 1]")]
    ValueOutOfRange {
        student: i64,
        criterion: String,
        value: f64,
    },

    #[error("student {student}: ranking {value} for group {group} is outside [0, 1]")]
    RankingOutOfRange { student: i64, group: i64, value: f64 },

    #[error("group {group}: prerequisite config for criterion {criterion:?} has no min_ratio")]
    MissingMinRatio { group: i64, criterion: String },

    #[error("group {group}: min_ratio {value} for criterion {criterion:?} is outside [0, 1]")]
    MinRatioOutOfRange {
        group: i64,
        criterion: String,
        value: f64,
    },
}

/// Failure to bring up the REST server or its callback client.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to build the callback HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
