//! Enrollment records: one row per (student, course, semester) attempt.

use serde::{Deserialize, Serialize};

/// A stored enrollment joined with its course's curriculum data.
///
/// `credit_spec` and `ects_credits` come from the student's curriculum and
/// are absent for courses outside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
  pub student_id:     String,
  pub course_code:    String,
  pub course_name:    Option<String>,
  pub semester:       String,
  pub grade:          String,
  /// 1 for the first attempt, incremented for every repeat.
  pub attempt_number: u32,
  pub credit_spec:    Option<String>,
  pub ects_credits:   Option<f64>,
}

/// Input to [`crate::store::RecordStore::insert_enrollment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEnrollment {
  pub student_id:     String,
  pub course_code:    String,
  pub semester:       String,
  pub grade:          String,
  pub attempt_number: u32,
}

/// Result of inserting an enrollment against the
/// (student, course, semester) uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
  Inserted,
  /// A row for the same (student, course, semester) already exists.
  Duplicate,
}
