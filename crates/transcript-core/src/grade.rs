//! The grade semantics table: letter grade to grade points and the two
//! classifications the engine branches on.
//!
//! The table is fixed process-wide configuration. Lookups are
//! case-insensitive; unknown symbols classify as neither GPA-counting nor
//! passing so that a typo can never silently pass a student.

use serde::{Deserialize, Serialize};

/// Placeholder written on acceptance until the term's final grade is known.
pub const PENDING_GRADE: &str = "IP";

// ─── Classification ──────────────────────────────────────────────────────────

/// What a grade symbol means for GPA arithmetic and progression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeClass {
  /// Grade-point value; `None` for grades outside the GPA.
  pub points:            Option<f64>,
  pub counts_for_gpa:    bool,
  pub counts_as_passing: bool,
}

impl GradeClass {
  const fn gpa(points: f64, passing: bool) -> Self {
    Self {
      points:            Some(points),
      counts_for_gpa:    true,
      counts_as_passing: passing,
    }
  }

  const fn non_gpa(passing: bool) -> Self {
    Self {
      points:            None,
      counts_for_gpa:    false,
      counts_as_passing: passing,
    }
  }

  /// Classification used for symbols absent from the table.
  pub const UNKNOWN: Self = Self::non_gpa(false);
}

// ─── Table ───────────────────────────────────────────────────────────────────

/// One row of the grade scale.
#[derive(Debug, Clone, Copy)]
pub struct GradeScaleEntry {
  pub symbol: &'static str,
  pub class:  GradeClass,
}

const fn entry(symbol: &'static str, class: GradeClass) -> GradeScaleEntry {
  GradeScaleEntry { symbol, class }
}

/// The full grade scale, letter grades first.
pub const GRADE_SCALE: &[GradeScaleEntry] = &[
  entry("AA", GradeClass::gpa(4.0, true)),
  entry("BA", GradeClass::gpa(3.5, true)),
  entry("BB", GradeClass::gpa(3.0, true)),
  entry("CB", GradeClass::gpa(2.5, true)),
  entry("CC", GradeClass::gpa(2.0, true)),
  entry("DC", GradeClass::gpa(1.5, true)),
  entry("DD", GradeClass::gpa(1.0, true)),
  entry("FF", GradeClass::gpa(0.0, false)),
  // Failed due to attendance.
  entry("FD", GradeClass::gpa(0.0, false)),
  // Not attended.
  entry("NA", GradeClass::gpa(0.0, false)),
  // Exempt.
  entry("EX", GradeClass::non_gpa(true)),
  entry("P", GradeClass::non_gpa(true)),
  entry("S", GradeClass::non_gpa(true)),
  entry("NP", GradeClass::non_gpa(false)),
  entry("U", GradeClass::non_gpa(false)),
  entry("W", GradeClass::non_gpa(false)),
  entry("I", GradeClass::non_gpa(false)),
  entry(PENDING_GRADE, GradeClass::non_gpa(false)),
];

fn lookup(grade: &str) -> Option<&'static GradeScaleEntry> {
  let grade = grade.trim();
  GRADE_SCALE
    .iter()
    .find(|e| e.symbol.eq_ignore_ascii_case(grade))
}

/// Classify a grade symbol. Unknown symbols fail safe to
/// [`GradeClass::UNKNOWN`].
pub fn classify(grade: &str) -> GradeClass {
  lookup(grade).map_or(GradeClass::UNKNOWN, |e| e.class)
}

/// Whether `grade` is a symbol of the scale.
pub fn is_known(grade: &str) -> bool { lookup(grade).is_some() }

/// Whether `grade` is the not-yet-graded placeholder.
pub fn is_pending(grade: &str) -> bool {
  grade.trim().eq_ignore_ascii_case(PENDING_GRADE)
}

/// The canonical (upper-case) spelling of a known symbol.
pub fn canonical(grade: &str) -> Option<&'static str> {
  lookup(grade).map(|e| e.symbol)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn letter_grades_have_points() {
    assert_eq!(classify("AA").points, Some(4.0));
    assert_eq!(classify("CB").points, Some(2.5));
    assert_eq!(classify("DD").points, Some(1.0));
    assert!(classify("DD").counts_as_passing);
    assert!(!classify("FF").counts_as_passing);
    assert!(classify("FF").counts_for_gpa);
  }

  #[test]
  fn lookup_is_case_insensitive() {
    assert_eq!(classify("bb"), classify("BB"));
    assert_eq!(classify(" ex "), classify("EX"));
    assert_eq!(canonical("aa"), Some("AA"));
  }

  #[test]
  fn non_gpa_grades_have_no_points() {
    for e in GRADE_SCALE {
      if e.class.points.is_none() {
        assert!(!e.class.counts_for_gpa, "{} counts without points", e.symbol);
      }
    }
  }

  #[test]
  fn exempt_and_pass_are_passing_outside_gpa() {
    for g in ["EX", "P", "S"] {
      let c = classify(g);
      assert!(c.counts_as_passing);
      assert!(!c.counts_for_gpa);
    }
  }

  #[test]
  fn unknown_symbol_fails_safe() {
    let c = classify("A+");
    assert_eq!(c.points, None);
    assert!(!c.counts_for_gpa);
    assert!(!c.counts_as_passing);
    assert!(!is_known("A+"));
    assert_eq!(classify(""), GradeClass::UNKNOWN);
  }

  #[test]
  fn pending_placeholder_neither_counts_nor_passes() {
    let c = classify(PENDING_GRADE);
    assert!(!c.counts_for_gpa);
    assert!(!c.counts_as_passing);
    assert!(is_pending("ip"));
    assert!(!is_pending("NA"));
  }
}
