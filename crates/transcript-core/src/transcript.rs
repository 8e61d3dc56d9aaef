//! The transcript read model: everything a document renderer needs about one
//! student, computed from a single snapshot of their history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  gpa::{self, AcademicStanding, CompletionStatus, GpaFigures, GradedCourse, SemesterSummary},
  student::StudentProfile,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
  pub profile:         StudentProfile,
  pub cumulative:      GpaFigures,
  pub completion:      CompletionStatus,
  pub standing:        AcademicStanding,
  /// Chronological, with running cumulative figures.
  pub semesters:       Vec<SemesterSummary>,
  /// One entry per distinct course, ordered by course code.
  pub latest_attempts: Vec<GradedCourse>,
  pub attempts:        Vec<GradedCourse>,
  pub generated_at:    DateTime<Utc>,
}

impl Transcript {
  /// Compute a transcript from a profile and graded history.
  pub fn assemble(
    profile: StudentProfile,
    attempts: Vec<GradedCourse>,
    required_credit_hours: f64,
  ) -> Self {
    let cumulative = gpa::cumulative_gpa(&attempts);
    let completion = gpa::completion_status(&attempts, required_credit_hours);
    let semesters = gpa::semester_summaries(&attempts);
    let latest_attempts = gpa::resolve_latest_attempt(&attempts)
      .into_values()
      .cloned()
      .collect();

    Self {
      profile,
      cumulative,
      completion,
      standing: gpa::academic_standing(cumulative.gpa),
      semesters,
      latest_attempts,
      attempts,
      generated_at: Utc::now(),
    }
  }

  pub fn cgpa(&self) -> f64 { self.cumulative.gpa }

  pub fn to_json_pretty(&self) -> crate::Result<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }
}
