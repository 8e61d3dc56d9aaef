//! Cohort statistics over a set of transcripts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{gpa::round2, grade, transcript::Transcript};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DepartmentStats {
  pub name:         String,
  pub students:     usize,
  pub average_cgpa: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Statistics {
  pub total_students:     usize,
  pub average_cgpa:       f64,
  /// Keyed by department id.
  pub departments:        BTreeMap<String, DepartmentStats>,
  /// Count of each GPA-counting grade over every student's latest attempts.
  pub grade_distribution: BTreeMap<String, usize>,
}

impl Statistics {
  pub fn from_transcripts<'a, I>(transcripts: I) -> Self
  where
    I: IntoIterator<Item = &'a Transcript>,
  {
    let mut stats = Self::default();
    let mut cgpa_sum = 0.0;
    let mut dept_sums: BTreeMap<String, f64> = BTreeMap::new();

    for t in transcripts {
      stats.total_students += 1;
      cgpa_sum += t.cgpa();

      let dept_id = &t.profile.student.dept_id;
      let dept = stats.departments.entry(dept_id.clone()).or_insert_with(|| {
        DepartmentStats {
          name: t.profile.department_name.clone(),
          ..Default::default()
        }
      });
      dept.students += 1;
      *dept_sums.entry(dept_id.clone()).or_default() += t.cgpa();

      for course in t.latest_attempts.iter().filter(|c| c.class.counts_for_gpa) {
        let symbol = grade::canonical(&course.record.grade)
          .map(str::to_owned)
          .unwrap_or_else(|| course.record.grade.clone());
        *stats.grade_distribution.entry(symbol).or_default() += 1;
      }
    }

    if stats.total_students > 0 {
      stats.average_cgpa = round2(cgpa_sum / stats.total_students as f64);
    }
    for (dept_id, dept) in &mut stats.departments {
      let sum = dept_sums.get(dept_id).copied().unwrap_or_default();
      dept.average_cgpa = round2(sum / dept.students as f64);
    }

    stats
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    gpa::tests::rec,
    student::{Student, StudentProfile, StudentStatus},
  };

  fn transcript(id: &str, dept: &str, grades: &[(&str, &str)]) -> Transcript {
    let profile = StudentProfile {
      student:            Student {
        student_id:      id.into(),
        first_name:      "First".into(),
        last_name:       "Last".into(),
        dept_id:         dept.into(),
        curriculum_id:   1,
        enrollment_year: Some(2023),
        status:          StudentStatus::Active,
      },
      department_name:    format!("Dept {dept}"),
      curriculum_version: 1,
      curriculum_name:    None,
    };
    let attempts = grades
      .iter()
      .map(|(code, g)| rec(code, "2023-Fall", g, 1, "3"))
      .collect();
    Transcript::assemble(profile, attempts, 120.0)
  }

  #[test]
  fn aggregates_per_department() {
    let ts = vec![
      transcript("S1", "CS", &[("A", "AA"), ("B", "BB")]),
      transcript("S2", "CS", &[("A", "CC")]),
      transcript("S3", "EE", &[("A", "aa"), ("B", "EX"), ("C", "W")]),
    ];
    let stats = Statistics::from_transcripts(&ts);

    assert_eq!(stats.total_students, 3);
    assert_eq!(stats.average_cgpa, round2((3.5 + 2.0 + 4.0) / 3.0));
    assert_eq!(stats.departments["CS"].students, 2);
    assert_eq!(stats.departments["CS"].average_cgpa, 2.75);
    assert_eq!(stats.departments["EE"].name, "Dept EE");
    assert_eq!(stats.grade_distribution["AA"], 2);
    assert_eq!(stats.grade_distribution.get("EX"), None);
    assert_eq!(stats.grade_distribution.values().sum::<usize>(), 4);
  }

  #[test]
  fn empty_cohort() {
    let stats = Statistics::from_transcripts(std::iter::empty());
    assert_eq!(stats, Statistics::default());
  }
}
