//! Plain-text output for the terminal.

use std::fmt::Write as _;

use transcript_core::{
  registrar::{CourseResult, SemesterRegistration},
  stats::Statistics,
  transcript::Transcript,
};

const RULE: &str = "============================================================";

/// Truncate `s` to `width` characters, marking the cut with `...`.
fn clip(s: &str, width: usize) -> String {
  if s.chars().count() <= width {
    return s.to_owned();
  }
  let kept: String = s.chars().take(width.saturating_sub(3)).collect();
  format!("{kept}...")
}

pub fn transcript(t: &Transcript) -> String {
  let mut out = String::new();
  let student = &t.profile.student;

  let _ = writeln!(out, "{RULE}");
  let _ = writeln!(out, "ACADEMIC TRANSCRIPT");
  let _ = writeln!(out, "{RULE}");
  let _ = writeln!(out, "Student ID: {}", student.student_id);
  let _ = writeln!(out, "Name:       {}", student.full_name());
  let _ = writeln!(out, "Department: {}", t.profile.department_name);
  let _ = writeln!(
    out,
    "Curriculum: {} ({})",
    t.profile.curriculum_version,
    t.profile.curriculum_name.as_deref().unwrap_or("unnamed")
  );
  let _ = writeln!(out, "Generated:  {}", t.generated_at.format("%Y-%m-%d %H:%M UTC"));

  let _ = writeln!(out, "\nAcademic Summary:");
  let _ = writeln!(out, "  Cumulative GPA:    {:.2}", t.cgpa());
  let _ = writeln!(out, "  Credits Completed: {:.1}", t.completion.completed_credit_hours);
  let _ = writeln!(
    out,
    "  Credits Passed:    {:.1} / {:.1} ({:.1}%)",
    t.completion.passed_credit_hours,
    t.completion.required_credit_hours,
    t.completion.completion_percentage
  );
  let _ = writeln!(out, "  Academic Standing: {}", t.standing);

  let _ = writeln!(out, "\nSemester-by-Semester Record:");
  if t.semesters.is_empty() {
    let _ = writeln!(out, "  No semester data available.");
  } else {
    let _ = writeln!(out, "{:<15} {:<8} {:<6} {:<6} {:<8}", "Semester", "Courses", "GPA", "CGPA", "Credits");
    let _ = writeln!(out, "{}", "-".repeat(50));
    for s in &t.semesters {
      let credits: f64 = s.courses.iter().map(|c| c.credit_hours).sum();
      let _ = writeln!(
        out,
        "{:<15} {:<8} {:<6.2} {:<6.2} {:<8.1}",
        s.semester,
        s.courses.len(),
        s.term.gpa,
        s.cumulative.gpa,
        credits
      );
    }
  }

  let _ = writeln!(out, "\nCourse Record (latest attempts):");
  if t.latest_attempts.is_empty() {
    let _ = writeln!(out, "  No course records available.");
  } else {
    let _ = writeln!(out, "{:<12} {:<30} {:<12} {:<6} {:<8}", "Course", "Title", "Semester", "Grade", "Credits");
    let _ = writeln!(out, "{}", "-".repeat(72));
    for c in &t.latest_attempts {
      let _ = writeln!(
        out,
        "{:<12} {:<30} {:<12} {:<6} {:<8.1}",
        c.record.course_code,
        clip(c.record.course_name.as_deref().unwrap_or(""), 30),
        c.record.semester,
        c.record.grade,
        c.credit_hours
      );
    }
  }
  out
}

fn course_results(out: &mut String, results: &[CourseResult]) {
  for r in results {
    let mark = if r.success() { "ok" } else { "--" };
    let _ = writeln!(out, "  [{mark}] {:<12} {}", r.course_code, r.reason());
  }
}

pub fn registration(reg: &SemesterRegistration) -> String {
  let mut out = String::new();
  if !reg.retakes.is_empty() {
    let _ = writeln!(out, "Automatic retakes:");
    course_results(&mut out, &reg.retakes);
  }
  if !reg.requests.is_empty() {
    let _ = writeln!(out, "Requested courses:");
    course_results(&mut out, &reg.requests);
  }
  if out.is_empty() {
    let _ = writeln!(out, "Nothing to register.");
  }
  out
}

pub fn statistics(stats: &Statistics) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{RULE}");
  let _ = writeln!(out, "SYSTEM STATISTICS");
  let _ = writeln!(out, "{RULE}");
  let _ = writeln!(out, "Total students: {}", stats.total_students);
  let _ = writeln!(out, "Average CGPA:   {:.2}", stats.average_cgpa);

  let _ = writeln!(out, "\nDepartments:");
  if stats.departments.is_empty() {
    let _ = writeln!(out, "  No department statistics available.");
  }
  for (dept_id, dept) in &stats.departments {
    let _ = writeln!(
      out,
      "  {dept_id} ({}): {} students, average CGPA {:.2}",
      dept.name, dept.students, dept.average_cgpa
    );
  }

  let _ = writeln!(out, "\nGrade distribution (latest attempts):");
  if stats.grade_distribution.is_empty() {
    let _ = writeln!(out, "  No grade distribution data available.");
  }
  for (grade, count) in &stats.grade_distribution {
    let _ = writeln!(out, "  {grade:<3} {count}");
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use transcript_core::{eligibility::Rejection, registrar::RegistrationOutcome};

  #[test]
  fn clip_marks_truncation() {
    assert_eq!(clip("short", 30), "short");
    assert_eq!(clip("Introduction to Differential Equations", 20), "Introduction to D...");
  }

  #[test]
  fn registration_lists_each_course() {
    let reg = SemesterRegistration {
      retakes:  vec![CourseResult {
        course_code: "MAT101".into(),
        outcome:     RegistrationOutcome::Enrolled { attempt_number: 2 },
      }],
      requests: vec![CourseResult {
        course_code: "MAT201".into(),
        outcome:     RegistrationOutcome::Rejected(Rejection::MissingPrerequisites {
          missing: vec!["MAT102".into()],
        }),
      }],
    };
    let text = registration(&reg);
    assert!(text.contains("[ok] MAT101       enrolled (attempt 2)"));
    assert!(text.contains("[--] MAT201       missing prerequisites: MAT102"));
  }

  #[test]
  fn empty_statistics() {
    let text = statistics(&Statistics::default());
    assert!(text.contains("Total students: 0"));
    assert!(text.contains("No grade distribution data available."));
  }
}
