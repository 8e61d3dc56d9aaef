//! [`SqliteStore`], the SQLite implementation of [`RecordStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use transcript_core::{
  curriculum::{CurriculumDefinition, CurriculumGraph, CurriculumInfo, PrerequisiteEdge},
  enrollment::{EnrollmentRecord, InsertOutcome, NewEnrollment},
  store::RecordStore,
  student::{Department, Student, StudentProfile},
};

use crate::{
  Error, Result,
  encode::{RawCurriculumCourse, RawEnrollment, RawStudent, encode_dt, encode_status},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An academic record store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Map a uniqueness violation to [`InsertOutcome::Duplicate`].
fn insert_outcome(result: rusqlite::Result<usize>) -> rusqlite::Result<InsertOutcome> {
  match result {
    Ok(_) => Ok(InsertOutcome::Inserted),
    Err(rusqlite::Error::SqliteFailure(e, _))
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
    {
      Ok(InsertOutcome::Duplicate)
    }
    Err(e) => Err(e),
  }
}

fn curriculum_info(
  conn: &rusqlite::Connection,
  dept_id: &str,
  version_number: i64,
) -> rusqlite::Result<Option<CurriculumInfo>> {
  conn
    .query_row(
      "SELECT curriculum_id, dept_id, version_number, version_name
       FROM curriculum_versions WHERE dept_id = ?1 AND version_number = ?2",
      rusqlite::params![dept_id, version_number],
      |row| {
        Ok(CurriculumInfo {
          curriculum_id:  row.get(0)?,
          dept_id:        row.get(1)?,
          version_number: row.get(2)?,
          version_name:   row.get(3)?,
        })
      },
    )
    .optional()
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  // ── Departments and catalogue ─────────────────────────────────────────────

  async fn add_department(&self, department: Department) -> Result<InsertOutcome> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(insert_outcome(conn.execute(
            "INSERT INTO departments (dept_id, name) VALUES (?1, ?2)",
            rusqlite::params![department.dept_id, department.name],
          ))?)
        })
        .await?,
    )
  }

  async fn list_departments(&self) -> Result<Vec<Department>> {
    Ok(
      self
        .conn
        .call(|conn| {
          let mut stmt =
            conn.prepare("SELECT dept_id, name FROM departments ORDER BY dept_id")?;
          let rows = stmt
            .query_map([], |row| {
              Ok(Department {
                dept_id: row.get(0)?,
                name:    row.get(1)?,
              })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn add_course(
    &self,
    course_code: String,
    course_name: String,
    dept_id: Option<String>,
  ) -> Result<InsertOutcome> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(insert_outcome(conn.execute(
            "INSERT INTO courses (course_code, course_name, dept_id) VALUES (?1, ?2, ?3)",
            rusqlite::params![course_code, course_name, dept_id],
          ))?)
        })
        .await?,
    )
  }

  // ── Curricula ─────────────────────────────────────────────────────────────

  async fn add_curriculum(&self, definition: CurriculumDefinition) -> Result<CurriculumInfo> {
    definition.validate()?;
    let created_at = encode_dt(Utc::now());

    let (info, created) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if let Some(existing) =
          curriculum_info(&tx, &definition.dept_id, definition.version_number)?
        {
          return Ok((existing, false));
        }

        tx.execute(
          "INSERT INTO curriculum_versions (dept_id, version_number, version_name, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![
            definition.dept_id,
            definition.version_number,
            definition.version_name,
            created_at,
          ],
        )?;
        let curriculum_id = tx.last_insert_rowid();

        for course in &definition.courses {
          tx.execute(
            "INSERT INTO curriculum_courses (
               curriculum_id, course_code, credit_spec, ects_credits,
               suggested_semester, is_required
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
              curriculum_id,
              course.course_code,
              course.credit_spec,
              course.ects_credits,
              course.suggested_semester,
              course.is_required,
            ],
          )?;
          if let Some(name) = &course.course_name {
            tx.execute(
              "INSERT OR IGNORE INTO courses (course_code, course_name, dept_id)
               VALUES (?1, ?2, ?3)",
              rusqlite::params![course.course_code, name, definition.dept_id],
            )?;
          }
        }

        for edge in &definition.prerequisites {
          tx.execute(
            "INSERT OR IGNORE INTO prerequisites (curriculum_id, course_code, prerequisite_code)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![curriculum_id, edge.course_code, edge.prerequisite_code],
          )?;
        }

        tx.commit()?;
        Ok((
          CurriculumInfo {
            curriculum_id,
            dept_id: definition.dept_id,
            version_number: definition.version_number,
            version_name: definition.version_name,
          },
          true,
        ))
      })
      .await?;

    if created {
      tracing::debug!(
        curriculum_id = info.curriculum_id,
        dept = %info.dept_id,
        version = info.version_number,
        "curriculum stored"
      );
    } else {
      tracing::debug!(
        curriculum_id = info.curriculum_id,
        "curriculum version already exists; left unchanged"
      );
    }
    Ok(info)
  }

  async fn get_curriculum(&self, curriculum_id: i64) -> Result<Option<CurriculumGraph>> {
    let loaded: Option<(Vec<RawCurriculumCourse>, Vec<PrerequisiteEdge>)> = self
      .conn
      .call(move |conn| {
        let exists = conn
          .query_row(
            "SELECT 1 FROM curriculum_versions WHERE curriculum_id = ?1",
            rusqlite::params![curriculum_id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !exists {
          return Ok(None);
        }

        let mut stmt = conn.prepare(
          "SELECT cc.course_code, c.course_name, cc.credit_spec, cc.ects_credits,
                  cc.suggested_semester, cc.is_required
           FROM curriculum_courses cc
           LEFT JOIN courses c ON c.course_code = cc.course_code
           WHERE cc.curriculum_id = ?1",
        )?;
        let courses = stmt
          .query_map(rusqlite::params![curriculum_id], RawCurriculumCourse::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT course_code, prerequisite_code FROM prerequisites WHERE curriculum_id = ?1",
        )?;
        let edges = stmt
          .query_map(rusqlite::params![curriculum_id], |row| {
            Ok(PrerequisiteEdge {
              course_code:       row.get(0)?,
              prerequisite_code: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some((courses, edges)))
      })
      .await?;

    let Some((raw_courses, edges)) = loaded else {
      return Ok(None);
    };
    let courses = raw_courses
      .into_iter()
      .map(RawCurriculumCourse::into_course)
      .collect::<Result<Vec<_>>>()?;

    Ok(Some(CurriculumGraph::new(curriculum_id, courses, edges)?))
  }

  // ── Students ──────────────────────────────────────────────────────────────

  async fn add_student(&self, student: Student) -> Result<InsertOutcome> {
    let status = encode_status(student.status);

    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(insert_outcome(conn.execute(
            "INSERT INTO students (
               student_id, first_name, last_name, dept_id, curriculum_id,
               enrollment_year, status
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
              student.student_id,
              student.first_name,
              student.last_name,
              student.dept_id,
              student.curriculum_id,
              student.enrollment_year,
              status,
            ],
          ))?)
        })
        .await?,
    )
  }

  async fn get_student<'a>(&'a self, student_id: &'a str) -> Result<Option<StudentProfile>> {
    let id = student_id.to_owned();

    let raw: Option<RawStudent> = self
      .conn
      .call(move |conn| {
        let sql = format!("{} WHERE s.student_id = ?1", RawStudent::SELECT);
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id], RawStudent::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStudent::into_profile).transpose()
  }

  async fn list_students(&self, dept_id: Option<String>) -> Result<Vec<Student>> {
    let raws: Vec<RawStudent> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(dept) = dept_id {
          let sql = format!(
            "{} WHERE s.dept_id = ?1 ORDER BY s.student_id",
            RawStudent::SELECT
          );
          let mut stmt = conn.prepare(&sql)?;
          stmt
            .query_map(rusqlite::params![dept], RawStudent::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let sql = format!("{} ORDER BY s.student_id", RawStudent::SELECT);
          let mut stmt = conn.prepare(&sql)?;
          stmt
            .query_map([], RawStudent::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStudent::into_student).collect()
  }

  // ── Enrollments ───────────────────────────────────────────────────────────

  async fn get_enrollments<'a>(&'a self, student_id: &'a str) -> Result<Vec<EnrollmentRecord>> {
    let id = student_id.to_owned();

    let raws: Vec<RawEnrollment> = self
      .conn
      .call(move |conn| {
        // Credit data comes from the student's own curriculum; courses it
        // does not place get NULL credit columns.
        let mut stmt = conn.prepare(
          "SELECT e.student_id, e.course_code, c.course_name, e.semester, e.grade,
                  e.attempt_number, cc.credit_spec, cc.ects_credits
           FROM enrollments e
           JOIN students s ON s.student_id = e.student_id
           LEFT JOIN curriculum_courses cc
                  ON cc.curriculum_id = s.curriculum_id AND cc.course_code = e.course_code
           LEFT JOIN courses c ON c.course_code = e.course_code
           WHERE e.student_id = ?1
           ORDER BY e.enrollment_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id], RawEnrollment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEnrollment::into_record).collect()
  }

  async fn insert_enrollment(&self, enrollment: NewEnrollment) -> Result<InsertOutcome> {
    let enrolled_at = encode_dt(Utc::now());

    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(insert_outcome(conn.execute(
            "INSERT INTO enrollments (
               student_id, course_code, semester, grade, attempt_number, enrolled_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
              enrollment.student_id,
              enrollment.course_code,
              enrollment.semester,
              enrollment.grade,
              enrollment.attempt_number,
              enrolled_at,
            ],
          ))?)
        })
        .await?,
    )
  }

  async fn update_grade(
    &self,
    student_id: String,
    course_code: String,
    semester: String,
    grade: String,
  ) -> Result<bool> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE enrollments SET grade = ?4
           WHERE student_id = ?1 AND course_code = ?2 AND semester = ?3",
          rusqlite::params![student_id, course_code, semester, grade],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }
}
