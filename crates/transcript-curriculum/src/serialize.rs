//! Curriculum file writer.

use std::fmt::Write as _;

use transcript_core::curriculum::{CurriculumCourse, CurriculumGraph};

fn course_line(course: &CurriculumCourse, prerequisites: &[&str]) -> String {
  let mut line = format!(
    "{};{};{};{};{};{}",
    course.course_code,
    course.credit_spec,
    course.ects_credits,
    prerequisites.join(","),
    course.suggested_semester,
    if course.is_required { 1 } else { 0 },
  );
  if let Some(name) = &course.course_name {
    let _ = write!(line, "  # {} {}", course.course_code, name);
  }
  line
}

pub(crate) fn serialize(graph: &CurriculumGraph) -> String {
  let mut courses: Vec<&CurriculumCourse> = graph.courses().collect();
  courses.sort_by(|a, b| {
    a.suggested_semester
      .cmp(&b.suggested_semester)
      .then_with(|| a.course_code.cmp(&b.course_code))
  });

  let mut out = String::new();
  let mut current = None;
  for course in courses {
    if current != Some(course.suggested_semester) {
      if current.is_some() {
        out.push('\n');
      }
      let _ = writeln!(out, "# Semester {}", course.suggested_semester);
      current = Some(course.suggested_semester);
    }
    let prerequisites: Vec<&str> = graph.prerequisites(&course.course_code).collect();
    out.push_str(&course_line(course, &prerequisites));
    out.push('\n');
  }
  out
}

#[cfg(test)]
mod tests {
  use transcript_core::curriculum::{CurriculumGraph, PrerequisiteEdge};

  use super::*;
  use crate::{CurriculumHeader, parse::parse};

  fn course(code: &str, name: Option<&str>, semester: u32, required: bool) -> CurriculumCourse {
    CurriculumCourse {
      course_code:        code.into(),
      course_name:        name.map(str::to_owned),
      credit_spec:        "3(2-2)".into(),
      ects_credits:       4.5,
      suggested_semester: semester,
      is_required:        required,
    }
  }

  #[test]
  fn groups_by_semester() {
    let graph = CurriculumGraph::new(
      1,
      vec![
        course("B", Some("Data Structures"), 3, true),
        course("A", Some("Programming"), 1, true),
        course("X", None, 3, false),
      ],
      [PrerequisiteEdge { course_code: "B".into(), prerequisite_code: "A".into() }],
    )
    .unwrap();

    assert_eq!(
      serialize(&graph),
      "\
# Semester 1
A;3(2-2);4.5;;1;1  # A Programming

# Semester 3
B;3(2-2);4.5;A;3;1  # B Data Structures
X;3(2-2);4.5;;3;0
"
    );
  }

  #[test]
  fn written_file_parses_back_to_the_same_graph() {
    let graph = CurriculumGraph::new(
      7,
      vec![
        course("A", Some("Programming"), 1, true),
        course("B", None, 2, false),
        course("C", Some("Systems"), 4, true),
      ],
      [
        PrerequisiteEdge { course_code: "C".into(), prerequisite_code: "A".into() },
        PrerequisiteEdge { course_code: "C".into(), prerequisite_code: "B".into() },
      ],
    )
    .unwrap();

    let header = CurriculumHeader {
      dept_id:        "CS".into(),
      version_number: 1,
      version_name:   None,
    };
    let parsed = parse(&serialize(&graph), header).unwrap();
    assert!(parsed.warnings.is_empty());

    let def = parsed.definition;
    let reparsed = CurriculumGraph::new(7, def.courses, def.prerequisites).unwrap();
    assert_eq!(reparsed, graph);
  }
}
