//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings. Student status is its snake_case name.
//! Booleans are 0/1 integers.

use chrono::{DateTime, Utc};
use transcript_core::{
  curriculum::CurriculumCourse,
  enrollment::EnrollmentRecord,
  student::{Student, StudentProfile, StudentStatus},
};

use crate::{Error, Result};

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn encode_status(status: StudentStatus) -> String { status.to_string() }

fn decode_status(s: &str) -> Result<StudentStatus> {
  s.parse().map_err(|_| Error::Decode {
    column: "students.status",
    value:  s.to_owned(),
  })
}

fn decode_u32(column: &'static str, v: i64) -> Result<u32> {
  u32::try_from(v).map_err(|_| Error::Decode { column, value: v.to_string() })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// A `students` row joined with department and curriculum version names.
pub struct RawStudent {
  pub student_id:         String,
  pub first_name:         String,
  pub last_name:          String,
  pub dept_id:            String,
  pub curriculum_id:      i64,
  pub enrollment_year:    Option<i32>,
  pub status:             String,
  pub department_name:    Option<String>,
  pub curriculum_version: Option<i64>,
  pub curriculum_name:    Option<String>,
}

impl RawStudent {
  /// Column list matching [`RawStudent::from_row`].
  pub const SELECT: &'static str = "
    SELECT s.student_id, s.first_name, s.last_name, s.dept_id, s.curriculum_id,
           s.enrollment_year, s.status,
           d.name, v.version_number, v.version_name
    FROM students s
    LEFT JOIN departments         d ON d.dept_id       = s.dept_id
    LEFT JOIN curriculum_versions v ON v.curriculum_id = s.curriculum_id";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      student_id:         row.get(0)?,
      first_name:         row.get(1)?,
      last_name:          row.get(2)?,
      dept_id:            row.get(3)?,
      curriculum_id:      row.get(4)?,
      enrollment_year:    row.get(5)?,
      status:             row.get(6)?,
      department_name:    row.get(7)?,
      curriculum_version: row.get(8)?,
      curriculum_name:    row.get(9)?,
    })
  }

  pub fn into_student(self) -> Result<Student> {
    Ok(Student {
      status:          decode_status(&self.status)?,
      student_id:      self.student_id,
      first_name:      self.first_name,
      last_name:       self.last_name,
      dept_id:         self.dept_id,
      curriculum_id:   self.curriculum_id,
      enrollment_year: self.enrollment_year,
    })
  }

  pub fn into_profile(mut self) -> Result<StudentProfile> {
    let department_name = self
      .department_name
      .take()
      .unwrap_or_else(|| self.dept_id.clone());
    let curriculum_version = self.curriculum_version.take().unwrap_or_default();
    let curriculum_name = self.curriculum_name.take();

    Ok(StudentProfile {
      student: self.into_student()?,
      department_name,
      curriculum_version,
      curriculum_name,
    })
  }
}

/// An `enrollments` row joined with the student's curriculum and the course
/// catalogue.
pub struct RawEnrollment {
  pub student_id:     String,
  pub course_code:    String,
  pub course_name:    Option<String>,
  pub semester:       String,
  pub grade:          String,
  pub attempt_number: i64,
  pub credit_spec:    Option<String>,
  pub ects_credits:   Option<f64>,
}

impl RawEnrollment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      student_id:     row.get(0)?,
      course_code:    row.get(1)?,
      course_name:    row.get(2)?,
      semester:       row.get(3)?,
      grade:          row.get(4)?,
      attempt_number: row.get(5)?,
      credit_spec:    row.get(6)?,
      ects_credits:   row.get(7)?,
    })
  }

  pub fn into_record(self) -> Result<EnrollmentRecord> {
    Ok(EnrollmentRecord {
      attempt_number: decode_u32("enrollments.attempt_number", self.attempt_number)?,
      student_id:     self.student_id,
      course_code:    self.course_code,
      course_name:    self.course_name,
      semester:       self.semester,
      grade:          self.grade,
      credit_spec:    self.credit_spec,
      ects_credits:   self.ects_credits,
    })
  }
}

/// A `curriculum_courses` row joined with the course catalogue.
pub struct RawCurriculumCourse {
  pub course_code:        String,
  pub course_name:        Option<String>,
  pub credit_spec:        String,
  pub ects_credits:       f64,
  pub suggested_semester: i64,
  pub is_required:        bool,
}

impl RawCurriculumCourse {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      course_code:        row.get(0)?,
      course_name:        row.get(1)?,
      credit_spec:        row.get(2)?,
      ects_credits:       row.get(3)?,
      suggested_semester: row.get(4)?,
      is_required:        row.get(5)?,
    })
  }

  pub fn into_course(self) -> Result<CurriculumCourse> {
    Ok(CurriculumCourse {
      suggested_semester: decode_u32(
        "curriculum_courses.suggested_semester",
        self.suggested_semester,
      )?,
      course_code:        self.course_code,
      course_name:        self.course_name,
      credit_spec:        self.credit_spec,
      ects_credits:       self.ects_credits,
      is_required:        self.is_required,
    })
  }
}
