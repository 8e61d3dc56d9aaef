//! The `RecordStore` trait: the storage collaborator of the progression
//! engine.
//!
//! The trait is implemented by storage backends (e.g.
//! `transcript-store-sqlite`). The [`Registrar`](crate::Registrar) and the
//! CLI depend on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  curriculum::{CurriculumDefinition, CurriculumGraph, CurriculumInfo},
  enrollment::{EnrollmentRecord, InsertOutcome, NewEnrollment},
  student::{Department, Student, StudentProfile},
};

/// Abstraction over an academic records backend.
///
/// Curricula are write-once. Enrollments are append-only apart from
/// [`RecordStore::update_grade`], which overwrites the grade of one
/// (student, course, semester) row.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Departments and catalogue ─────────────────────────────────────────

  /// Persist a department. Returns [`InsertOutcome::Duplicate`] if the id is
  /// already taken.
  fn add_department(
    &self,
    department: Department,
  ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send + '_;

  fn list_departments(
    &self,
  ) -> impl Future<Output = Result<Vec<Department>, Self::Error>> + Send + '_;

  /// Add a course to the catalogue of names. Existing codes are left as is.
  fn add_course(
    &self,
    course_code: String,
    course_name: String,
    dept_id: Option<String>,
  ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send + '_;

  // ── Curricula ─────────────────────────────────────────────────────────

  /// Validate and persist a curriculum version with its courses and
  /// prerequisite edges.
  ///
  /// If the (department, version number) pair already exists, its metadata
  /// is returned and nothing is written.
  fn add_curriculum(
    &self,
    definition: CurriculumDefinition,
  ) -> impl Future<Output = Result<CurriculumInfo, Self::Error>> + Send + '_;

  /// Load the validated graph of a curriculum version. Returns `None` if it
  /// does not exist.
  fn get_curriculum(
    &self,
    curriculum_id: i64,
  ) -> impl Future<Output = Result<Option<CurriculumGraph>, Self::Error>> + Send + '_;

  // ── Students ──────────────────────────────────────────────────────────

  fn add_student(
    &self,
    student: Student,
  ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send + '_;

  /// Retrieve a student with department and curriculum names. Returns
  /// `None` if not found.
  fn get_student<'a>(
    &'a self,
    student_id: &'a str,
  ) -> impl Future<Output = Result<Option<StudentProfile>, Self::Error>> + Send + 'a;

  /// List students, optionally restricted to one department.
  fn list_students(
    &self,
    dept_id: Option<String>,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + '_;

  // ── Enrollments ───────────────────────────────────────────────────────

  /// A student's full enrollment history, joined with the credit data of
  /// their curriculum.
  fn get_enrollments<'a>(
    &'a self,
    student_id: &'a str,
  ) -> impl Future<Output = Result<Vec<EnrollmentRecord>, Self::Error>> + Send + 'a;

  /// Insert an enrollment. A row with the same (student, course, semester)
  /// yields [`InsertOutcome::Duplicate`] rather than an error.
  fn insert_enrollment(
    &self,
    enrollment: NewEnrollment,
  ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send + '_;

  /// Overwrite the grade of an existing enrollment. Returns `false` if no
  /// such enrollment exists.
  fn update_grade(
    &self,
    student_id: String,
    course_code: String,
    semester: String,
    grade: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
