//! The `Registrar`: registration, retakes and grade entry over a
//! [`RecordStore`].
//!
//! Every operation reads the student's profile, curriculum and history once
//! and decides against that snapshot. Callers registering the same student
//! concurrently must serialize those calls themselves.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  curriculum::CurriculumGraph,
  eligibility::{Progression, Rejection},
  enrollment::{InsertOutcome, NewEnrollment},
  gpa,
  grade,
  semester::Semester,
  stats::Statistics,
  store::RecordStore,
  student::{StudentProfile, StudentTimeline},
  transcript::Transcript,
};

// ─── Outcomes ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RegistrationOutcome {
  /// A new enrollment row was written with the pending grade.
  Enrolled { attempt_number: u32 },
  /// The student already holds an enrollment for this course and semester.
  AlreadyEnrolled,
  Rejected(Rejection),
  /// The store failed while recording this course. Other courses in the
  /// same batch are unaffected.
  Failed { error: String },
}

impl RegistrationOutcome {
  pub fn is_success(&self) -> bool {
    matches!(self, Self::Enrolled { .. } | Self::AlreadyEnrolled)
  }
}

/// The outcome of one course within a registration request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseResult {
  pub course_code: String,
  pub outcome:     RegistrationOutcome,
}

impl CourseResult {
  pub fn success(&self) -> bool { self.outcome.is_success() }

  /// Human-readable reason for the outcome.
  pub fn reason(&self) -> String {
    match &self.outcome {
      RegistrationOutcome::Enrolled { attempt_number: 1 } => "enrolled".to_owned(),
      RegistrationOutcome::Enrolled { attempt_number } => {
        format!("enrolled (attempt {attempt_number})")
      }
      RegistrationOutcome::AlreadyEnrolled => "already enrolled this semester".to_owned(),
      RegistrationOutcome::Rejected(rejection) => rejection.to_string(),
      RegistrationOutcome::Failed { error } => format!("failed: {error}"),
    }
  }
}

/// Result of [`Registrar::register_semester`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemesterRegistration {
  /// Retakes that were enrolled automatically. Only new enrollments are
  /// listed; an existing row for the target semester is not a retake.
  pub retakes:  Vec<CourseResult>,
  /// One entry per explicitly requested course, in request order.
  pub requests: Vec<CourseResult>,
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

struct Snapshot {
  profile:    StudentProfile,
  curriculum: CurriculumGraph,
  timeline:   StudentTimeline,
}

impl Snapshot {
  fn progression(&self) -> Progression<'_> {
    Progression::new(&self.timeline, &self.curriculum)
  }

  fn student_id(&self) -> &str { &self.profile.student.student_id }
}

// ─── Registrar ───────────────────────────────────────────────────────────────

pub struct Registrar<S> {
  store:            S,
  required_credits: f64,
}

impl<S: RecordStore> Registrar<S> {
  pub fn new(store: S) -> Self {
    Self {
      store,
      required_credits: gpa::DEFAULT_REQUIRED_CREDITS,
    }
  }

  /// Credit-hours used as the denominator of completion percentages.
  pub fn with_required_credits(mut self, required_credits: f64) -> Self {
    self.required_credits = required_credits;
    self
  }

  pub fn store(&self) -> &S { &self.store }

  async fn snapshot(&self, student_id: &str) -> Result<Snapshot> {
    let profile = self
      .store
      .get_student(student_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::StudentNotFound(student_id.to_owned()))?;

    let curriculum_id = profile.student.curriculum_id;
    let curriculum = self
      .store
      .get_curriculum(curriculum_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::CurriculumNotFound(curriculum_id))?;

    let records = self
      .store
      .get_enrollments(student_id)
      .await
      .map_err(Error::store)?;

    let timeline = StudentTimeline::new(profile.student.enrollment_year, records);
    Ok(Snapshot { profile, curriculum, timeline })
  }

  /// Check and record one enrollment against `snap`.
  ///
  /// Store failures are folded into [`RegistrationOutcome::Failed`].
  async fn enroll(
    &self,
    snap: &Snapshot,
    course_code: &str,
    semester: Semester,
  ) -> RegistrationOutcome {
    let admission = match snap.progression().check(course_code, semester) {
      Ok(admission) => admission,
      Err(rejection) => {
        debug!(
          student = snap.student_id(),
          course = course_code,
          %semester,
          %rejection,
          "enrollment rejected"
        );
        return RegistrationOutcome::Rejected(rejection);
      }
    };

    let enrollment = NewEnrollment {
      student_id:     snap.student_id().to_owned(),
      course_code:    course_code.to_owned(),
      semester:       semester.to_string(),
      grade:          grade::PENDING_GRADE.to_owned(),
      attempt_number: admission.attempt_number,
    };

    match self.store.insert_enrollment(enrollment).await {
      Ok(InsertOutcome::Inserted) => {
        info!(
          student = snap.student_id(),
          course = course_code,
          %semester,
          attempt = admission.attempt_number,
          "enrolled"
        );
        RegistrationOutcome::Enrolled { attempt_number: admission.attempt_number }
      }
      Ok(InsertOutcome::Duplicate) => {
        debug!(
          student = snap.student_id(),
          course = course_code,
          %semester,
          "already enrolled"
        );
        RegistrationOutcome::AlreadyEnrolled
      }
      Err(err) => {
        warn!(
          student = snap.student_id(),
          course = course_code,
          %semester,
          error = %err,
          "failed to record enrollment"
        );
        RegistrationOutcome::Failed { error: err.to_string() }
      }
    }
  }

  async fn retake_into(&self, snap: &Snapshot, semester: Semester) -> Vec<CourseResult> {
    let mut results = Vec::new();
    for course_code in snap.progression().retake_candidates() {
      let outcome = self.enroll(snap, course_code, semester).await;
      if matches!(outcome, RegistrationOutcome::Enrolled { .. }) {
        results.push(CourseResult { course_code: course_code.to_owned(), outcome });
      } else {
        debug!(
          student = snap.student_id(),
          course = course_code,
          "skipping automatic retake"
        );
      }
    }
    results
  }

  // ── Operations ────────────────────────────────────────────────────────

  /// Register `student_id` for `course_code` in `semester`.
  ///
  /// Rejections and store failures on the insert are returned as outcomes;
  /// `Err` is reserved for an unknown student, a missing curriculum, a
  /// malformed semester, or a failure loading the snapshot.
  pub async fn register(
    &self,
    student_id: &str,
    course_code: &str,
    semester: &str,
  ) -> Result<RegistrationOutcome> {
    let semester = Semester::parse(semester)?;
    let snap = self.snapshot(student_id).await?;
    Ok(self.enroll(&snap, course_code, semester).await)
  }

  /// Enroll the student in every previously failed course that is admissible
  /// in `semester`. Inadmissible retakes are skipped; only enrolled courses
  /// are reported.
  pub async fn auto_retake(&self, student_id: &str, semester: &str) -> Result<Vec<CourseResult>> {
    let semester = Semester::parse(semester)?;
    let snap = self.snapshot(student_id).await?;
    Ok(self.retake_into(&snap, semester).await)
  }

  /// Automatic retakes first, then each requested course independently.
  pub async fn register_semester<I, C>(
    &self,
    student_id: &str,
    semester: &str,
    courses: I,
  ) -> Result<SemesterRegistration>
  where
    I: IntoIterator<Item = C>,
    C: AsRef<str>,
  {
    let semester = Semester::parse(semester)?;
    let snap = self.snapshot(student_id).await?;

    let retakes = self.retake_into(&snap, semester).await;

    let mut requests = Vec::new();
    for course in courses {
      let course_code = course.as_ref();
      let outcome = self.enroll(&snap, course_code, semester).await;
      requests.push(CourseResult { course_code: course_code.to_owned(), outcome });
    }

    info!(
      student = student_id,
      %semester,
      retakes = retakes.len(),
      enrolled = requests.iter().filter(|r| r.success()).count(),
      requested = requests.len(),
      "semester registration complete"
    );
    Ok(SemesterRegistration { retakes, requests })
  }

  /// Record a final grade. Returns `false` if the student holds no
  /// enrollment for that course and semester.
  pub async fn record_grade(
    &self,
    student_id: &str,
    course_code: &str,
    semester: &str,
    grade: &str,
  ) -> Result<bool> {
    let symbol =
      grade::canonical(grade).ok_or_else(|| Error::UnknownGrade(grade.to_owned()))?;
    let semester = Semester::parse(semester)?;

    let updated = self
      .store
      .update_grade(
        student_id.to_owned(),
        course_code.to_owned(),
        semester.to_string(),
        symbol.to_owned(),
      )
      .await
      .map_err(Error::store)?;

    if updated {
      info!(student = student_id, course = course_code, %semester, grade = symbol, "grade recorded");
    } else {
      warn!(student = student_id, course = course_code, %semester, "no enrollment to grade");
    }
    Ok(updated)
  }

  pub async fn transcript(&self, student_id: &str) -> Result<Transcript> {
    let profile = self
      .store
      .get_student(student_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::StudentNotFound(student_id.to_owned()))?;
    let records = self
      .store
      .get_enrollments(student_id)
      .await
      .map_err(Error::store)?;

    Ok(Transcript::assemble(
      profile,
      gpa::grade_records(records),
      self.required_credits,
    ))
  }

  /// Transcripts of every student, optionally restricted to one department.
  ///
  /// A student whose transcript cannot be built is logged and left out.
  pub async fn transcripts(&self, dept_id: Option<String>) -> Result<Vec<Transcript>> {
    let students = self.store.list_students(dept_id).await.map_err(Error::store)?;

    let mut transcripts = Vec::with_capacity(students.len());
    for student in students {
      match self.transcript(&student.student_id).await {
        Ok(t) => transcripts.push(t),
        Err(err) => {
          warn!(student = %student.student_id, error = %err, "skipping transcript");
        }
      }
    }
    Ok(transcripts)
  }

  pub async fn statistics(&self) -> Result<Statistics> {
    let transcripts = self.transcripts(None).await?;
    Ok(Statistics::from_transcripts(&transcripts))
  }
}
