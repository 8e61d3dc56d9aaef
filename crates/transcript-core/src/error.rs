//! Error types for `transcript-core`.
//!
//! Expected eligibility outcomes (already passed, premature enrollment,
//! missing prerequisites, duplicate enrollment) are not errors; see
//! [`crate::eligibility`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("student not found: {0}")]
  StudentNotFound(String),

  #[error("curriculum not found: {0}")]
  CurriculumNotFound(i64),

  #[error("invalid semester identifier: {0:?} (expected e.g. \"2024-Fall\")")]
  InvalidSemester(String),

  #[error("unknown grade symbol: {0:?}")]
  UnknownGrade(String),

  #[error("course {0} lists itself as a prerequisite")]
  SelfPrerequisite(String),

  #[error("prerequisite cycle: {}", .0.join(" -> "))]
  PrerequisiteCycle(Vec<String>),

  #[error("course {0} appears more than once in the curriculum")]
  DuplicateCourse(String),

  #[error("course {course} has suggested semester {value}; must be at least 1")]
  InvalidSuggestedSemester { course: String, value: u32 },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Box a backend error into [`Error::Store`].
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
