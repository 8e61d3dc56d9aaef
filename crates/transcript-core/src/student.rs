//! Departments and students.

use serde::{Deserialize, Serialize};

use crate::{
  enrollment::EnrollmentRecord,
  gpa::{self, GradedCourse},
  semester::Semester,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
  pub dept_id: String,
  pub name:    String,
}

/// Lifecycle status of a student record.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StudentStatus {
  #[default]
  Active,
  Graduated,
  Withdrawn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
  pub student_id:      String,
  pub first_name:      String,
  pub last_name:       String,
  pub dept_id:         String,
  /// The curriculum version the student is assigned to.
  pub curriculum_id:   i64,
  /// Academic year in which the student's semester #1 began. Legacy records
  /// may lack it, in which case sequencing rules cannot be applied.
  pub enrollment_year: Option<i32>,
  pub status:          StudentStatus,
}

impl Student {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

/// A student joined with the display names of their department and
/// curriculum version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
  pub student:            Student,
  pub department_name:    String,
  pub curriculum_version: i64,
  pub curriculum_name:    Option<String>,
}

/// A student's enrollment year together with their graded enrollment
/// history, in storage order.
///
/// Derived on read; never persisted.
#[derive(Debug, Clone, Default)]
pub struct StudentTimeline {
  pub enrollment_year: Option<i32>,
  pub history:         Vec<GradedCourse>,
}

impl StudentTimeline {
  pub fn new(enrollment_year: Option<i32>, records: Vec<EnrollmentRecord>) -> Self {
    Self {
      enrollment_year,
      history: gpa::grade_records(records),
    }
  }

  /// Position of `semester` on this student's personal timeline, or `None`
  /// when the enrollment year is unknown.
  pub fn semester_number(&self, semester: Semester) -> Option<i32> {
    self.enrollment_year.map(|year| semester.personal_number(year))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timeline_numbers_semesters_from_enrollment_year() {
    let record = EnrollmentRecord {
      student_id:     "S1".into(),
      course_code:    "MAT101".into(),
      course_name:    None,
      semester:       "2021-Fall".into(),
      grade:          "BB".into(),
      attempt_number: 1,
      credit_spec:    Some("4(3-2)".into()),
      ects_credits:   None,
    };
    let timeline = StudentTimeline::new(Some(2021), vec![record]);
    assert_eq!(timeline.history.len(), 1);
    assert_eq!(timeline.history[0].credit_hours, 4.0);

    let fall = Semester::parse("2022-Fall").unwrap();
    assert_eq!(timeline.semester_number(fall), Some(3));
    assert_eq!(StudentTimeline::default().semester_number(fall), None);
  }
}
