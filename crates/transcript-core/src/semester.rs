//! Semester identifiers (`<year>-<season>`) and their chronological order.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{Error, Result};

/// The term within a calendar year. Declaration order is chronological.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Display,
  EnumString,
  Serialize,
  Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Season {
  Spring,
  Summer,
  Fall,
}

/// A parsed semester identifier such as `2024-Fall`.
///
/// The derived ordering compares the year first, then the season.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Semester {
  pub year:   i32,
  pub season: Season,
}

impl Semester {
  pub fn new(year: i32, season: Season) -> Self { Self { year, season } }

  /// Strict parse, for validating identifiers at data entry.
  pub fn parse(raw: &str) -> Result<Self> {
    let invalid = || Error::InvalidSemester(raw.to_owned());
    let (year, season) = raw.trim().split_once('-').ok_or_else(invalid)?;
    let year = year.trim().parse::<i32>().map_err(|_| invalid())?;
    let season = season.trim().parse::<Season>().map_err(|_| invalid())?;
    Ok(Self { year, season })
  }

  /// Position of this semester on a student's personal timeline, given the
  /// academic year in which their semester #1 began.
  ///
  /// Two terms per academic year: a Fall term adds 1, any other term adds 2.
  /// Summer terms therefore share the number of the Spring term of the same
  /// year. Semesters before enrollment yield values below 1.
  pub fn personal_number(&self, enrollment_year: i32) -> i32 {
    let offset = match self.season {
      Season::Fall => 1,
      Season::Spring | Season::Summer => 2,
    };
    (self.year - enrollment_year) * 2 + offset
  }
}

impl fmt::Display for Semester {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}", self.year, self.season)
  }
}

impl FromStr for Semester {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

/// Compare two raw semester identifiers chronologically.
///
/// If either side does not parse, the two compare as equal. This is not a
/// total order and must not be handed to a sort; it is only used for the
/// pairwise latest-attempt fold, where a tie falls through to the attempt
/// number.
pub fn compare_semesters(a: &str, b: &str) -> Ordering {
  match (Semester::parse(a), Semester::parse(b)) {
    (Ok(a), Ok(b)) => a.cmp(&b),
    _ => Ordering::Equal,
  }
}

/// Order distinct semester identifiers chronologically.
///
/// Well-formed identifiers come first in calendar order; malformed ones
/// follow in the order they were first seen.
pub fn chronological<'a, I>(ids: I) -> Vec<&'a str>
where
  I: IntoIterator<Item = &'a str>,
{
  let mut parsed: Vec<(Semester, &'a str)> = Vec::new();
  let mut malformed: Vec<&'a str> = Vec::new();

  for id in ids {
    if parsed.iter().any(|(_, s)| *s == id) || malformed.contains(&id) {
      continue;
    }
    match Semester::parse(id) {
      Ok(sem) => parsed.push((sem, id)),
      Err(_) => {
        tracing::warn!(semester = id, "malformed semester identifier; ordering it last");
        malformed.push(id);
      }
    }
  }

  parsed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
  parsed.into_iter().map(|(_, id)| id).chain(malformed).collect()
}
