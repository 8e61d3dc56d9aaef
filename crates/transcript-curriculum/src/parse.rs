//! Curriculum line parser.
//!
//! Pipeline:
//!   raw &str
//!     └─ split_comment()   → (data, comment)
//!          └─ parse_line()    → CourseLine
//!               └─ accumulate → CurriculumDefinition → validate()

use std::collections::HashMap;

use transcript_core::{
  credit::CourseCredit,
  curriculum::{CurriculumCourse, CurriculumDefinition, PrerequisiteEdge},
};

use crate::{
  CurriculumHeader, ParsedCurriculum,
  error::{Error, Result},
};

struct CourseLine {
  course:        CurriculumCourse,
  prerequisites: Vec<String>,
}

// ─── Low-level helpers
// ────────────────────────────────────────────────────────

/// Split `line` at the first `#` into its data and trimmed comment.
fn split_comment(line: &str) -> (&str, Option<&str>) {
  match line.split_once('#') {
    Some((data, comment)) => (data.trim(), Some(comment.trim())),
    None => (line.trim(), None),
  }
}

/// Course name from a `CODE Name` comment. A comment that is only a code
/// carries no name.
fn name_from_comment(comment: &str) -> Option<String> {
  let (_, name) = comment.split_once(char::is_whitespace)?;
  let name = name.trim();
  (!name.is_empty()).then(|| name.to_owned())
}

fn parse_required(line: usize, raw: &str) -> Result<bool> {
  match raw.to_ascii_lowercase().as_str() {
    "" | "1" | "true" | "yes" | "y" | "required" => Ok(true),
    "0" | "false" | "no" | "n" | "elective" => Ok(false),
    _ => Err(Error::InvalidRequiredFlag { line, value: raw.to_owned() }),
  }
}

fn parse_line(line: usize, data: &str, comment: Option<&str>) -> Result<CourseLine> {
  let fields: Vec<&str> = data.split(';').map(str::trim).collect();
  if fields.len() < 3 {
    return Err(Error::MissingFields { line });
  }

  let course_code = fields[0];
  if course_code.is_empty() {
    return Err(Error::EmptyCourseCode { line });
  }

  let credit_spec = fields[1];
  if CourseCredit::parse(credit_spec).is_none() {
    return Err(Error::InvalidCreditSpec { line, value: credit_spec.to_owned() });
  }

  let ects_credits = fields[2]
    .parse::<f64>()
    .ok()
    .filter(|v| v.is_finite() && *v >= 0.0)
    .ok_or_else(|| Error::InvalidEcts { line, value: fields[2].to_owned() })?;

  let prerequisites: Vec<String> = fields
    .get(3)
    .map(|list| {
      list
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .collect()
    })
    .unwrap_or_default();
  if prerequisites.iter().any(|p| p == course_code) {
    return Err(Error::SelfPrerequisite { line, code: course_code.to_owned() });
  }

  let suggested_semester = match fields.get(4).copied().filter(|s| !s.is_empty()) {
    None => 1,
    Some(raw) => raw
      .parse::<u32>()
      .ok()
      .filter(|n| *n >= 1)
      .ok_or_else(|| Error::InvalidSuggestedSemester { line, value: raw.to_owned() })?,
  };

  let is_required = parse_required(line, fields.get(5).copied().unwrap_or(""))?;

  Ok(CourseLine {
    course: CurriculumCourse {
      course_code: course_code.to_owned(),
      course_name: comment.and_then(name_from_comment),
      credit_spec: credit_spec.to_owned(),
      ects_credits,
      suggested_semester,
      is_required,
    },
    prerequisites,
  })
}

// ─── Entry point
// ──────────────────────────────────────────────────────────────

pub(crate) fn parse(input: &str, header: CurriculumHeader) -> Result<ParsedCurriculum> {
  let mut courses = Vec::new();
  let mut edges = Vec::new();
  let mut warnings = Vec::new();
  let mut first_seen: HashMap<String, usize> = HashMap::new();

  for (idx, raw) in input.lines().enumerate() {
    let line = idx + 1;
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
      continue;
    }

    let (data, comment) = split_comment(trimmed);
    if data.is_empty() {
      continue;
    }

    let parsed = match parse_line(line, data, comment) {
      Ok(parsed) => parsed,
      Err(err) => {
        warnings.push(err);
        continue;
      }
    };

    let code = parsed.course.course_code.clone();
    if let Some(&first) = first_seen.get(&code) {
      warnings.push(Error::DuplicateCourse { line, code, first });
      continue;
    }
    first_seen.insert(code.clone(), line);

    edges.extend(parsed.prerequisites.into_iter().map(|prerequisite_code| {
      PrerequisiteEdge { course_code: code.clone(), prerequisite_code }
    }));
    courses.push(parsed.course);
  }

  let definition = CurriculumDefinition {
    dept_id: header.dept_id,
    version_number: header.version_number,
    version_name: header.version_name,
    courses,
    prerequisites: edges,
  };
  definition.validate()?;

  tracing::debug!(
    courses = definition.courses.len(),
    prerequisites = definition.prerequisites.len(),
    skipped = warnings.len(),
    "parsed curriculum file"
  );

  Ok(ParsedCurriculum { definition, warnings })
}

// ─── Tests
// ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn header() -> CurriculumHeader {
    CurriculumHeader {
      dept_id:        "SNG".into(),
      version_number: 2023,
      version_name:   Some("2023 Curriculum".into()),
    }
  }

  #[test]
  fn full_line_with_comment_name() {
    let input = "5710102;4(3-2);6.5;5710101;2;1  # 5710102 Calculus II\n";
    let parsed = parse(input, header()).unwrap();
    assert!(parsed.warnings.is_empty());

    let c = &parsed.definition.courses[0];
    assert_eq!(c.course_code, "5710102");
    assert_eq!(c.course_name.as_deref(), Some("Calculus II"));
    assert_eq!(c.credit_spec, "4(3-2)");
    assert_eq!(c.ects_credits, 6.5);
    assert_eq!(c.suggested_semester, 2);
    assert!(c.is_required);

    let e = &parsed.definition.prerequisites[0];
    assert_eq!(e.course_code, "5710102");
    assert_eq!(e.prerequisite_code, "5710101");
  }

  #[test]
  fn optional_fields_default() {
    let parsed = parse("ORI100;0(2-0);1\n", header()).unwrap();
    let c = &parsed.definition.courses[0];
    assert_eq!(c.suggested_semester, 1);
    assert!(c.is_required);
    assert_eq!(c.course_name, None);
    assert!(parsed.definition.prerequisites.is_empty());
  }

  #[test]
  fn skips_comments_and_blank_lines() {
    let input = "\
# Semester 1

ENG101;3(3-0);4   # ENG101 Academic English
# ENG102;3(3-0);4
;
";
    let parsed = parse(input, header()).unwrap();
    assert_eq!(parsed.definition.courses.len(), 1);
    assert_eq!(parsed.warnings.len(), 1);
    assert!(matches!(parsed.warnings[0], Error::MissingFields { line: 5 }));
  }

  #[test]
  fn multiple_prerequisites() {
    let parsed = parse("PHY201;4(3-2);6;PHY101, MAT101 ,;3;elective\n", header()).unwrap();
    let prereqs: Vec<_> = parsed
      .definition
      .prerequisites
      .iter()
      .map(|e| e.prerequisite_code.as_str())
      .collect();
    assert_eq!(prereqs, ["PHY101", "MAT101"]);
    assert!(!parsed.definition.courses[0].is_required);
  }

  #[test]
  fn malformed_lines_become_warnings() {
    let input = "\
A;3;5
B;3(3-0;5
C;3;many
D;3;5;;0
E;3;5;;2;maybe
F;3;5;F
A;3;5
G;3;5
";
    let parsed = parse(input, header()).unwrap();
    let codes: Vec<_> = parsed
      .definition
      .courses
      .iter()
      .map(|c| c.course_code.as_str())
      .collect();
    assert_eq!(codes, ["A", "G"]);

    let lines: Vec<String> = parsed.warnings.iter().map(ToString::to_string).collect();
    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with("line 2:"));
    assert!(matches!(parsed.warnings[1], Error::InvalidEcts { line: 3, .. }));
    assert!(matches!(parsed.warnings[2], Error::InvalidSuggestedSemester { line: 4, .. }));
    assert!(matches!(parsed.warnings[3], Error::InvalidRequiredFlag { line: 5, .. }));
    assert!(matches!(parsed.warnings[4], Error::SelfPrerequisite { line: 6, .. }));
    assert!(matches!(
      parsed.warnings[5],
      Error::DuplicateCourse { line: 7, first: 1, .. }
    ));
  }

  #[test]
  fn cycle_across_lines_is_fatal() {
    let input = "A;3;5;B\nB;3;5;A\n";
    let err = parse(input, header()).err().unwrap();
    assert!(matches!(
      err,
      Error::Curriculum(transcript_core::Error::PrerequisiteCycle(_))
    ));
  }

  #[test]
  fn header_is_carried_over() {
    let parsed = parse("", header()).unwrap();
    assert_eq!(parsed.definition.dept_id, "SNG");
    assert_eq!(parsed.definition.version_number, 2023);
    assert!(parsed.definition.courses.is_empty());
  }
}
