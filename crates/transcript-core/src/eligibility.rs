//! Enrollment eligibility: the four-step admission check and automatic
//! retake selection.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. the course is not already passed (latest attempt),
//! 2. the target semester is not earlier on the student's personal timeline
//!    than the curriculum suggests,
//! 3. every direct prerequisite is passed,
//! 4. accept with the next attempt number.
//!
//! Everything here is a pure function of one snapshot of the student's
//! history; persisting the result is the [`Registrar`](crate::Registrar)'s
//! job.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
  curriculum::CurriculumGraph,
  gpa,
  grade,
  semester::Semester,
  student::StudentTimeline,
};

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Why an enrollment request was refused. These are expected outcomes that
/// callers branch on, not failures.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
  /// The latest attempt already carries a passing grade. Do not retry.
  #[error("course already passed")]
  AlreadyPassed,

  /// Too early on the student's timeline; retry in a later semester.
  #[error(
    "premature enrollment: suggested for semester {required}, requested in semester {attempted}"
  )]
  PrematureEnrollment { required: u32, attempted: i32 },

  /// These direct prerequisites must be passed first.
  #[error("missing prerequisites: {}", .missing.join(", "))]
  MissingPrerequisites { missing: Vec<String> },
}

/// A request that passed checks 1–3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
  pub attempt_number: u32,
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// One student's history and curriculum, frozen for the duration of a
/// single registration decision.
pub struct Progression<'a> {
  timeline:   &'a StudentTimeline,
  passed:     BTreeSet<&'a str>,
  curriculum: &'a CurriculumGraph,
}

impl<'a> Progression<'a> {
  pub fn new(timeline: &'a StudentTimeline, curriculum: &'a CurriculumGraph) -> Self {
    Self {
      timeline,
      passed: gpa::passed_courses(&timeline.history),
      curriculum,
    }
  }

  pub fn has_passed(&self, course_code: &str) -> bool {
    self.passed.contains(course_code)
  }

  /// Evaluate a request to enroll in `course_code` during `semester`.
  pub fn check(&self, course_code: &str, semester: Semester) -> Result<Admission, Rejection> {
    if self.has_passed(course_code) {
      return Err(Rejection::AlreadyPassed);
    }

    let suggested = self.curriculum.suggested_semester(course_code);
    match (suggested, self.timeline.semester_number(semester)) {
      (Some(required), Some(attempted)) => {
        if i64::from(attempted) < i64::from(required) {
          return Err(Rejection::PrematureEnrollment { required, attempted });
        }
      }
      (Some(_), None) => {
        tracing::debug!(
          course = course_code,
          "no enrollment year on record; skipping sequencing check"
        );
      }
      (None, _) => {}
    }

    let missing: Vec<String> = self
      .curriculum
      .prerequisites(course_code)
      .filter(|req| !self.has_passed(req))
      .map(str::to_owned)
      .collect();
    if !missing.is_empty() {
      return Err(Rejection::MissingPrerequisites { missing });
    }

    Ok(Admission { attempt_number: self.next_attempt_number(course_code) })
  }

  /// One more than the highest recorded attempt, or 1 for a first attempt.
  pub fn next_attempt_number(&self, course_code: &str) -> u32 {
    self
      .timeline
      .history
      .iter()
      .filter(|c| c.course_code() == course_code)
      .map(|c| c.record.attempt_number)
      .max()
      .map_or(1, |n| n + 1)
  }

  /// Courses attempted but never passed, in course-code order.
  ///
  /// Courses whose latest attempt still carries the pending placeholder are
  /// left out; they have not been failed yet.
  pub fn retake_candidates(&self) -> Vec<&'a str> {
    gpa::resolve_latest_attempt(&self.timeline.history)
      .into_iter()
      .filter(|(code, latest)| {
        !self.passed.contains(code) && !grade::is_pending(&latest.record.grade)
      })
      .map(|(code, _)| code)
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    curriculum::tests::{course, edge},
    gpa::{GradedCourse, tests::rec},
  };

  fn sem(s: &str) -> Semester { Semester::parse(s).unwrap() }

  fn timeline(enrollment_year: Option<i32>, history: Vec<GradedCourse>) -> StudentTimeline {
    StudentTimeline { enrollment_year, history }
  }

  fn curriculum() -> CurriculumGraph {
    CurriculumGraph::new(
      1,
      vec![course("A", 3), course("B", 1), course("C", 1), course("D", 5)],
      [edge("A", "B"), edge("D", "A"), edge("D", "C")],
    )
    .unwrap()
  }

  #[test]
  fn missing_prerequisite_rejected_then_admitted_once_passed() {
    let cur = curriculum();
    let t = timeline(Some(2021), vec![]);
    let p = Progression::new(&t, &cur);
    assert_eq!(
      p.check("A", sem("2024-Fall")),
      Err(Rejection::MissingPrerequisites { missing: vec!["B".into()] })
    );

    let t = timeline(Some(2021), vec![rec("B", "2023-Spring", "CC", 1, "3")]);
    let p = Progression::new(&t, &cur);
    assert_eq!(p.check("A", sem("2024-Fall")), Ok(Admission { attempt_number: 1 }));
  }

  #[test]
  fn premature_enrollment_reports_both_numbers() {
    let cur = curriculum();
    let t = timeline(Some(2021), vec![rec("B", "2021-Fall", "AA", 1, "3")]);
    let p = Progression::new(&t, &cur);
    assert_eq!(
      p.check("A", sem("2021-Fall")),
      Err(Rejection::PrematureEnrollment { required: 3, attempted: 1 })
    );
    assert!(p.check("A", sem("2022-Fall")).is_ok());
  }

  #[test]
  fn huge_suggested_semester_is_still_premature() {
    let cur = CurriculumGraph::new(1, vec![course("THESIS", u32::MAX)], []).unwrap();
    let t = timeline(Some(2021), vec![]);
    let p = Progression::new(&t, &cur);
    assert_eq!(
      p.check("THESIS", sem("2030-Fall")),
      Err(Rejection::PrematureEnrollment { required: u32::MAX, attempted: 19 })
    );
  }

  #[test]
  fn already_passed_wins_over_everything() {
    let cur = curriculum();
    let t = timeline(Some(2021), vec![rec("D", "2019-Fall", "BB", 1, "3")]);
    let p = Progression::new(&t, &cur);
    assert_eq!(p.check("D", sem("2021-Fall")), Err(Rejection::AlreadyPassed));
  }

  #[test]
  fn sequencing_is_checked_before_prerequisites() {
    let cur = curriculum();
    let t = timeline(Some(2021), vec![]);
    let p = Progression::new(&t, &cur);
    assert!(matches!(
      p.check("D", sem("2021-Fall")),
      Err(Rejection::PrematureEnrollment { required: 5, .. })
    ));
    let Err(Rejection::MissingPrerequisites { missing }) = p.check("D", sem("2023-Fall")) else {
      panic!("expected missing prerequisites")
    };
    assert_eq!(missing, ["A", "C"]);
  }

  #[test]
  fn courses_outside_curriculum_are_unconstrained() {
    let cur = curriculum();
    let t = timeline(Some(2021), vec![]);
    let p = Progression::new(&t, &cur);
    assert_eq!(p.check("ADMIN-1", sem("2021-Fall")), Ok(Admission { attempt_number: 1 }));
  }

  #[test]
  fn unknown_enrollment_year_skips_sequencing() {
    let cur = curriculum();
    let t = timeline(None, vec![rec("B", "2021-Fall", "AA", 1, "3")]);
    let p = Progression::new(&t, &cur);
    assert!(p.check("A", sem("2021-Fall")).is_ok());
  }

  #[test]
  fn attempt_numbers_increment() {
    let cur = curriculum();
    let t = timeline(Some(2021), vec![
      rec("C", "2021-Fall", "FF", 1, "3"),
      rec("C", "2022-Spring", "FD", 2, "3"),
    ]);
    let p = Progression::new(&t, &cur);
    assert_eq!(p.check("C", sem("2022-Fall")), Ok(Admission { attempt_number: 3 }));
    assert_eq!(p.next_attempt_number("B"), 1);
  }

  #[test]
  fn retake_candidates_are_never_passed_courses() {
    let cur = curriculum();
    let t = timeline(Some(2021), vec![
      rec("B", "2021-Fall", "FF", 1, "3"),
      rec("C", "2021-Fall", "FF", 1, "3"),
      rec("C", "2022-Spring", "CC", 2, "3"),
      rec("X", "2022-Spring", "NA", 1, "3"),
      rec("Y", "2022-Fall", grade::PENDING_GRADE, 1, "3"),
      rec("Z", "2022-Spring", "BB", 1, "3"),
    ]);
    let p = Progression::new(&t, &cur);
    assert_eq!(p.retake_candidates(), ["B", "X"]);
  }

  #[test]
  fn rejection_messages() {
    let r = Rejection::MissingPrerequisites { missing: vec!["B".into(), "C".into()] };
    assert_eq!(r.to_string(), "missing prerequisites: B, C");
    assert_eq!(Rejection::AlreadyPassed.to_string(), "course already passed");
  }
}
