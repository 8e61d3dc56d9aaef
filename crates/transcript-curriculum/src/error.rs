//! Error types for the curriculum file codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("line {line}: expected at least 3 `;`-separated fields")]
  MissingFields { line: usize },

  #[error("line {line}: empty course code")]
  EmptyCourseCode { line: usize },

  #[error("line {line}: invalid credit specification {value:?}")]
  InvalidCreditSpec { line: usize, value: String },

  #[error("line {line}: invalid ECTS credits {value:?}")]
  InvalidEcts { line: usize, value: String },

  #[error("line {line}: invalid suggested semester {value:?}")]
  InvalidSuggestedSemester { line: usize, value: String },

  #[error("line {line}: invalid required flag {value:?}")]
  InvalidRequiredFlag { line: usize, value: String },

  #[error("line {line}: course {code} lists itself as a prerequisite")]
  SelfPrerequisite { line: usize, code: String },

  #[error("line {line}: course {code} already defined on line {first}")]
  DuplicateCourse { line: usize, code: String, first: usize },

  /// The file as a whole does not form a valid curriculum.
  #[error("invalid curriculum: {0}")]
  Curriculum(#[from] transcript_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
