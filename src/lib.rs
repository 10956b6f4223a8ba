//! Genetic-algorithm solver for assigning students to groups.
//!
//! A fixed population of students is distributed over a fixed collection of
//! groups so that hard constraints hold (group capacities, exclusion pairs,
//! per-student eligibility, prerequisite thresholds) while soft objectives
//! are optimized (criterion balancing, per-group pull objectives, student
//! preference rankings). The search is a penalty-method GA executed across
//! several independent runs, keeping the best result.
//!
//! # Architecture
//!
//! - [`ga`]: a small generic engine: population, tournament selection,
//!   elitism, the generational loop.
//! - [`assignment`]: the domain: chromosome seeding, the fitness function,
//!   the multi-run driver, and the statistics report.
//! - [`models`]: the JSON data model with validation.
//! - [`server`]: a thin REST shell that acknowledges a solve request and
//!   posts the result to a callback URL from a background worker.
//!
//! # Usage
//!
//! ```no_run
//! use cohort_ga::assignment::{SolveOptions, solve};
//! use cohort_ga::models::ProblemInput;
//!
//! let input: ProblemInput = serde_json::from_str("...")?;
//! input.validate()?;
//! let output = solve(&input, &SolveOptions::default());
//! println!("{}", output.status);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assignment;
pub mod error;
pub mod ga;
pub mod models;
pub mod server;
