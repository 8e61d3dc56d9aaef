//! Compact credit specifications of the form `T(L-P)`.
//!
//! `T` is the total credit-hours used in GPA arithmetic; `L` and `P` are the
//! lecture and practice contact hours, kept for display only.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CourseCredit {
  pub total:    f64,
  pub lecture:  Option<f64>,
  pub practice: Option<f64>,
}

impl CourseCredit {
  /// Parse `T(L-P)` or a bare `T`. Returns `None` on any malformed input.
  pub fn parse(spec: &str) -> Option<Self> {
    let spec = spec.trim();
    let (total, hours) = match spec.split_once('(') {
      Some((total, rest)) => (total, Some(rest)),
      None => (spec, None),
    };
    let total = parse_hours(total)?;

    let (lecture, practice) = match hours {
      Some(rest) => {
        let inner = rest.trim_end().strip_suffix(')')?;
        let (l, p) = inner.split_once('-')?;
        (Some(parse_hours(l)?), Some(parse_hours(p)?))
      }
      None => (None, None),
    };

    Some(Self { total, lecture, practice })
  }
}

impl fmt::Display for CourseCredit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match (self.lecture, self.practice) {
      (Some(l), Some(p)) => write!(f, "{}({}-{})", self.total, l, p),
      _ => write!(f, "{}", self.total),
    }
  }
}

fn parse_hours(s: &str) -> Option<f64> {
  let v = s.trim().parse::<f64>().ok()?;
  (v.is_finite() && v >= 0.0).then_some(v)
}

/// Total credit-hours of `spec`, or `0.0` if it is empty or the total is
/// malformed.
///
/// Only the text before `(` is read; a damaged contact-hour part does not
/// cost the course its credit. Zero-credit courses are common (orientation,
/// pass/fail seminars), so a zero never signals an error to the caller.
pub fn extract_credit_hours(spec: &str) -> f64 {
  if spec.trim().is_empty() {
    return 0.0;
  }
  let total = spec.split_once('(').map_or(spec, |(total, _)| total);
  match parse_hours(total) {
    Some(hours) => hours,
    None => {
      tracing::warn!(credit_spec = spec, "unparseable credit specification; using 0 credit-hours");
      0.0
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn full_form() {
    assert_eq!(extract_credit_hours("4(3-2)"), 4.0);
    let c = CourseCredit::parse("5(4-2)").unwrap();
    assert_eq!(c.lecture, Some(4.0));
    assert_eq!(c.practice, Some(2.0));
    assert_eq!(c.to_string(), "5(4-2)");
  }

  #[test]
  fn zero_credit_course() {
    assert_eq!(extract_credit_hours("0(2-0)"), 0.0);
  }

  #[test]
  fn bare_and_fractional_totals() {
    assert_eq!(extract_credit_hours("3"), 3.0);
    assert_eq!(extract_credit_hours(" 2.5 "), 2.5);
    assert_eq!(extract_credit_hours("1.5(1-1)"), 1.5);
  }

  #[test]
  fn damaged_contact_hours_keep_the_total() {
    assert_eq!(extract_credit_hours("4(3-2"), 4.0);
    assert_eq!(extract_credit_hours("3(3-0-1)"), 3.0);
    assert_eq!(extract_credit_hours("4(3)"), 4.0);
    assert_eq!(extract_credit_hours("3(TBA)"), 3.0);
    assert_eq!(CourseCredit::parse("3(TBA)"), None);
  }

  #[test]
  fn malformed_degrades_to_zero() {
    assert_eq!(extract_credit_hours(""), 0.0);
    assert_eq!(extract_credit_hours("garbage"), 0.0);
    assert_eq!(extract_credit_hours("(3-2)"), 0.0);
    assert_eq!(extract_credit_hours("-3"), 0.0);
    assert_eq!(extract_credit_hours("NaN"), 0.0);
  }
}
