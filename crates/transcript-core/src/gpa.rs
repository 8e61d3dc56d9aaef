//! Grade computation: classified, credit-weighted course entries, latest
//! attempt resolution, semester and cumulative GPA, standing and completion.
//!
//! Every function here is pure. Sums are kept unrounded; only the reported
//! GPA figures are rounded to two decimals.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
  credit::extract_credit_hours,
  enrollment::EnrollmentRecord,
  grade::{self, GradeClass},
  semester::{self, compare_semesters},
};

/// Credit-hours required for graduation unless configured otherwise.
pub const DEFAULT_REQUIRED_CREDITS: f64 = 120.0;

// ─── Graded course ───────────────────────────────────────────────────────────

/// An enrollment record with its grade classified and credit-hours parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedCourse {
  #[serde(flatten)]
  pub record:       EnrollmentRecord,
  pub credit_hours: f64,
  pub class:        GradeClass,
}

impl GradedCourse {
  pub fn from_record(record: EnrollmentRecord) -> Self {
    let credit_hours = extract_credit_hours(record.credit_spec.as_deref().unwrap_or(""));
    let class = grade::classify(&record.grade);
    Self { record, credit_hours, class }
  }

  pub fn course_code(&self) -> &str { &self.record.course_code }

  pub fn semester(&self) -> &str { &self.record.semester }

  /// Grade points times credit-hours; zero for grades outside the GPA.
  pub fn quality_points(&self) -> f64 {
    match (self.class.counts_for_gpa, self.class.points) {
      (true, Some(points)) => points * self.credit_hours,
      _ => 0.0,
    }
  }

  fn counts_for_gpa(&self) -> bool {
    self.class.counts_for_gpa && self.class.points.is_some()
  }
}

/// Classify a student's raw enrollment records.
pub fn grade_records<I>(records: I) -> Vec<GradedCourse>
where
  I: IntoIterator<Item = EnrollmentRecord>,
{
  records.into_iter().map(GradedCourse::from_record).collect()
}

// ─── Latest attempt ──────────────────────────────────────────────────────────

/// Keep one entry per course: the attempt with the greatest
/// (semester, attempt number).
///
/// Ties in both fields go to the entry seen later in `courses`.
pub fn resolve_latest_attempt<'a, I>(courses: I) -> BTreeMap<&'a str, &'a GradedCourse>
where
  I: IntoIterator<Item = &'a GradedCourse>,
{
  let mut latest: BTreeMap<&'a str, &'a GradedCourse> = BTreeMap::new();

  for course in courses {
    latest
      .entry(course.course_code())
      .and_modify(|current| {
        let ord = compare_semesters(course.semester(), current.semester()).then(
          course
            .record
            .attempt_number
            .cmp(&current.record.attempt_number),
        );
        if ord.is_ge() {
          *current = course;
        }
      })
      .or_insert(course);
  }

  latest
}

// ─── GPA ─────────────────────────────────────────────────────────────────────

/// A GPA with the unrounded sums it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GpaFigures {
  /// `quality_points / credit_hours`, rounded to two decimals; 0 when no
  /// GPA-counting credit-hours exist.
  pub gpa:            f64,
  pub quality_points: f64,
  pub credit_hours:   f64,
}

impl GpaFigures {
  fn from_sums(quality_points: f64, credit_hours: f64) -> Self {
    let gpa = if credit_hours > 0.0 {
      round2(quality_points / credit_hours)
    } else {
      0.0
    };
    Self { gpa, quality_points, credit_hours }
  }
}

pub(crate) fn round2(v: f64) -> f64 { (v * 100.0).round() / 100.0 }

/// GPA over the given entries, every attempt counted as-is.
pub fn semester_gpa<'a, I>(courses: I) -> GpaFigures
where
  I: IntoIterator<Item = &'a GradedCourse>,
{
  let (points, hours) = courses
    .into_iter()
    .filter(|c| c.counts_for_gpa())
    .fold((0.0, 0.0), |(p, h), c| (p + c.quality_points(), h + c.credit_hours));
  GpaFigures::from_sums(points, hours)
}

/// GPA over the latest attempt of every distinct course.
pub fn cumulative_gpa<'a, I>(courses: I) -> GpaFigures
where
  I: IntoIterator<Item = &'a GradedCourse>,
{
  semester_gpa(resolve_latest_attempt(courses).into_values())
}

// ─── Semester summaries ──────────────────────────────────────────────────────

/// One row of a transcript: a semester's own GPA and the cumulative GPA as
/// it stood at the end of that semester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterSummary {
  pub semester:   String,
  pub term:       GpaFigures,
  pub cumulative: GpaFigures,
  pub courses:    Vec<GradedCourse>,
}

/// Summarise every semester in chronological order.
///
/// Cumulative figures for a semester cover that semester and all earlier
/// ones, with repeated courses resolved to their latest attempt so far.
pub fn semester_summaries(courses: &[GradedCourse]) -> Vec<SemesterSummary> {
  let order = semester::chronological(courses.iter().map(GradedCourse::semester));

  let mut seen_so_far: Vec<&GradedCourse> = Vec::with_capacity(courses.len());
  let mut summaries = Vec::with_capacity(order.len());

  for sem in order {
    let this_term: Vec<&GradedCourse> =
      courses.iter().filter(|c| c.semester() == sem).collect();

    let term = semester_gpa(this_term.iter().copied());
    seen_so_far.extend(this_term.iter().copied());
    let cumulative = cumulative_gpa(seen_so_far.iter().copied());

    summaries.push(SemesterSummary {
      semester: sem.to_owned(),
      term,
      cumulative,
      courses: this_term.into_iter().cloned().collect(),
    });
  }

  summaries
}

// ─── Standing ────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum AcademicStanding {
  #[strum(serialize = "High Honor")]
  HighHonor,
  Honor,
  Satisfactory,
  Probation,
  Unsatisfactory,
}

pub fn academic_standing(cgpa: f64) -> AcademicStanding {
  match cgpa {
    c if c >= 3.5 => AcademicStanding::HighHonor,
    c if c >= 3.0 => AcademicStanding::Honor,
    c if c >= 2.0 => AcademicStanding::Satisfactory,
    c if c >= 1.8 => AcademicStanding::Probation,
    _ => AcademicStanding::Unsatisfactory,
  }
}

// ─── Completion ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionStatus {
  /// Credit-hours of GPA-counting latest attempts.
  pub completed_credit_hours: f64,
  /// The subset of `completed_credit_hours` with a passing grade.
  pub passed_credit_hours:    f64,
  pub required_credit_hours:  f64,
  /// `passed / required` as a percentage, capped at 100.
  pub completion_percentage:  f64,
}

pub fn completion_status<'a, I>(courses: I, required_credit_hours: f64) -> CompletionStatus
where
  I: IntoIterator<Item = &'a GradedCourse>,
{
  let mut completed = 0.0;
  let mut passed = 0.0;
  for course in resolve_latest_attempt(courses).into_values() {
    if course.class.counts_for_gpa {
      completed += course.credit_hours;
      if course.class.counts_as_passing {
        passed += course.credit_hours;
      }
    }
  }

  let completion_percentage = if required_credit_hours > 0.0 {
    (passed / required_credit_hours * 100.0).min(100.0)
  } else {
    100.0
  };

  CompletionStatus {
    completed_credit_hours: completed,
    passed_credit_hours: passed,
    required_credit_hours,
    completion_percentage,
  }
}

// ─── Course sets ─────────────────────────────────────────────────────────────

/// Courses whose latest attempt carries a passing grade.
pub fn passed_courses<'a, I>(courses: I) -> BTreeSet<&'a str>
where
  I: IntoIterator<Item = &'a GradedCourse>,
{
  resolve_latest_attempt(courses)
    .into_iter()
    .filter(|(_, c)| c.class.counts_as_passing)
    .map(|(code, _)| code)
    .collect()
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;

  pub(crate) fn rec(code: &str, semester: &str, grade: &str, attempt: u32, credits: &str) -> GradedCourse {
    GradedCourse::from_record(EnrollmentRecord {
      student_id:     "S1".into(),
      course_code:    code.into(),
      course_name:    None,
      semester:       semester.into(),
      grade:          grade.into(),
      attempt_number: attempt,
      credit_spec:    Some(credits.into()),
      ects_credits:   None,
    })
  }

  fn approx(a: f64, b: f64) -> bool { (a - b).abs() < 1e-9 }

  // ── Latest attempt ────────────────────────────────────────────────────────

  #[test]
  fn later_semester_wins() {
    let courses = vec![
      rec("X", "2023-Fall", "FF", 1, "4(3-2)"),
      rec("X", "2024-Spring", "AA", 2, "4(3-2)"),
    ];
    let latest = resolve_latest_attempt(&courses);
    assert_eq!(latest.len(), 1);
    assert_eq!(latest["X"].record.grade, "AA");
  }

  #[test]
  fn input_order_does_not_matter_for_well_formed_semesters() {
    let courses = vec![
      rec("X", "2024-Spring", "AA", 2, "4"),
      rec("X", "2023-Fall", "FF", 1, "4"),
    ];
    assert_eq!(resolve_latest_attempt(&courses)["X"].record.grade, "AA");
  }

  #[test]
  fn attempt_number_breaks_semester_ties() {
    let courses = vec![
      rec("X", "2024-Fall", "BB", 2, "3"),
      rec("X", "2024-Fall", "CC", 1, "3"),
    ];
    assert_eq!(resolve_latest_attempt(&courses)["X"].record.grade, "BB");
  }

  #[test]
  fn full_tie_prefers_later_input() {
    let courses = vec![
      rec("X", "2024-Fall", "BB", 1, "3"),
      rec("X", "2024-Fall", "CC", 1, "3"),
    ];
    assert_eq!(resolve_latest_attempt(&courses)["X"].record.grade, "CC");
  }

  #[test]
  fn resolving_is_idempotent() {
    let courses = vec![
      rec("X", "2023-Fall", "FF", 1, "4"),
      rec("Y", "2023-Fall", "BB", 1, "3"),
      rec("X", "2024-Spring", "CC", 2, "4"),
    ];
    let once = resolve_latest_attempt(&courses);
    let twice = resolve_latest_attempt(once.values().copied());
    assert_eq!(once, twice);
  }

  // ── GPA ───────────────────────────────────────────────────────────────────

  #[test]
  fn semester_gpa_weights_by_credit_hours() {
    let courses = vec![
      rec("A", "2023-Fall", "AA", 1, "4(3-2)"),
      rec("B", "2023-Fall", "BB", 1, "5(4-2)"),
    ];
    let g = semester_gpa(&courses);
    assert!(approx(g.quality_points, 16.0 + 15.0));
    assert!(approx(g.credit_hours, 9.0));
    assert_eq!(g.gpa, 3.44);
  }

  #[test]
  fn non_gpa_grades_are_excluded() {
    let courses = vec![
      rec("A", "2023-Fall", "AA", 1, "4"),
      rec("B", "2023-Fall", "EX", 1, "3"),
      rec("C", "2023-Fall", "W", 1, "3"),
      rec("D", "2023-Fall", "??", 1, "3"),
    ];
    let g = semester_gpa(&courses);
    assert!(approx(g.credit_hours, 4.0));
    assert_eq!(g.gpa, 4.0);
  }

  #[test]
  fn zero_credit_hours_yield_zero_gpa() {
    let courses = vec![rec("ORI", "2023-Fall", "AA", 1, "0(2-0)")];
    let g = semester_gpa(&courses);
    assert_eq!(g.gpa, 0.0);
    assert_eq!(semester_gpa(std::iter::empty()), GpaFigures::default());
  }

  #[test]
  fn cumulative_matches_manual_weighted_average() {
    let courses = vec![
      rec("A", "2023-Fall", "AA", 1, "4"),
      rec("B", "2023-Fall", "CB", 1, "3"),
      rec("C", "2024-Spring", "DD", 1, "2"),
    ];
    let expected = (4.0 * 4.0 + 2.5 * 3.0 + 1.0 * 2.0) / 9.0;
    let g = cumulative_gpa(&courses);
    assert_eq!(g.gpa, round2(expected));
    assert!(approx(g.quality_points, 25.5));
  }

  #[test]
  fn repeated_course_counts_once_with_latest_grade() {
    let courses = vec![
      rec("X", "2023-Fall", "FF", 1, "4"),
      rec("Y", "2023-Fall", "BB", 1, "3"),
      rec("X", "2024-Spring", "AA", 2, "4"),
    ];
    let g = cumulative_gpa(&courses);
    assert!(approx(g.credit_hours, 7.0));
    assert!(approx(g.quality_points, 16.0 + 9.0));
  }

  // ── Summaries ─────────────────────────────────────────────────────────────

  #[test]
  fn running_cumulative_reflects_only_semesters_so_far() {
    let courses = vec![
      rec("C", "2024-Fall", "DD", 1, "3"),
      rec("A", "2023-Fall", "AA", 1, "4"),
      rec("B", "2024-Spring", "CC", 1, "3"),
    ];
    let summaries = semester_summaries(&courses);
    let order: Vec<_> = summaries.iter().map(|s| s.semester.as_str()).collect();
    assert_eq!(order, ["2023-Fall", "2024-Spring", "2024-Fall"]);

    let first_two = cumulative_gpa(&courses[1..]);
    assert_eq!(summaries[1].cumulative, first_two);
    assert_eq!(summaries[1].cumulative.gpa, round2((16.0 + 6.0) / 7.0));

    assert_ne!(summaries[1].cumulative, cumulative_gpa(&courses));
    assert_eq!(summaries[2].cumulative, cumulative_gpa(&courses));
    assert_eq!(summaries[0].cumulative.gpa, 4.0);
  }

  #[test]
  fn running_cumulative_replaces_failed_attempt_when_retaken() {
    let courses = vec![
      rec("X", "2023-Fall", "FF", 1, "4"),
      rec("X", "2024-Spring", "BB", 2, "4"),
    ];
    let summaries = semester_summaries(&courses);
    assert_eq!(summaries[0].cumulative.gpa, 0.0);
    assert_eq!(summaries[0].term.gpa, 0.0);
    assert_eq!(summaries[1].cumulative.gpa, 3.0);
    assert!(approx(summaries[1].cumulative.credit_hours, 4.0));
  }

  #[test]
  fn summaries_of_nothing_are_empty() {
    assert!(semester_summaries(&[]).is_empty());
  }

  // ── Standing and completion ───────────────────────────────────────────────

  #[test]
  fn standing_thresholds() {
    assert_eq!(academic_standing(4.0), AcademicStanding::HighHonor);
    assert_eq!(academic_standing(3.5), AcademicStanding::HighHonor);
    assert_eq!(academic_standing(3.49), AcademicStanding::Honor);
    assert_eq!(academic_standing(3.0), AcademicStanding::Honor);
    assert_eq!(academic_standing(2.0), AcademicStanding::Satisfactory);
    assert_eq!(academic_standing(1.8), AcademicStanding::Probation);
    assert_eq!(academic_standing(1.79), AcademicStanding::Unsatisfactory);
    assert_eq!(AcademicStanding::HighHonor.to_string(), "High Honor");
  }

  #[test]
  fn completion_counts_latest_attempts() {
    let courses = vec![
      rec("X", "2023-Fall", "FF", 1, "4"),
      rec("Y", "2023-Fall", "FF", 1, "3"),
      rec("X", "2024-Spring", "CC", 2, "4"),
      rec("Z", "2024-Spring", "P", 1, "2"),
    ];
    let c = completion_status(&courses, 120.0);
    assert!(approx(c.completed_credit_hours, 7.0));
    assert!(approx(c.passed_credit_hours, 4.0));
    assert!(approx(c.completion_percentage, 4.0 / 120.0 * 100.0));
  }

  #[test]
  fn completion_percentage_is_capped() {
    let courses = vec![rec("A", "2023-Fall", "AA", 1, "10")];
    assert_eq!(completion_status(&courses, 5.0).completion_percentage, 100.0);
  }

  #[test]
  fn passed_set_uses_latest_attempt() {
    let courses = vec![
      rec("X", "2023-Fall", "FF", 1, "4"),
      rec("X", "2024-Spring", "DD", 2, "4"),
      rec("Y", "2023-Fall", "AA", 1, "3"),
      rec("Y", "2024-Spring", "FF", 2, "3"),
      rec("Z", "2023-Fall", "EX", 1, "0"),
    ];
    let passed = passed_courses(&courses);
    assert!(passed.contains("X"));
    assert!(!passed.contains("Y"));
    assert!(passed.contains("Z"));
  }
}
