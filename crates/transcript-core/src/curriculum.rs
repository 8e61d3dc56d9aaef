//! Curriculum versions: suggested-semester placement and prerequisite graph.
//!
//! A [`CurriculumDefinition`] is what an author writes; a [`CurriculumGraph`]
//! is the validated, read-only form the eligibility engine consults.
//! Prerequisites are direct only and never followed transitively, but cycles
//! and self-references are still rejected at authoring time.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::{algo, graphmap::DiGraphMap};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Authoring types ─────────────────────────────────────────────────────────

/// A course as placed in one curriculum version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumCourse {
  pub course_code:        String,
  /// Catalogue name, when the source provides one.
  pub course_name:        Option<String>,
  /// Compact credit specification, e.g. `4(3-2)`.
  pub credit_spec:        String,
  pub ects_credits:       f64,
  /// 1-based position on the student's personal timeline.
  pub suggested_semester: u32,
  pub is_required:        bool,
}

/// `course_code` requires `prerequisite_code` to have been passed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrerequisiteEdge {
  pub course_code:       String,
  pub prerequisite_code: String,
}

/// Input to [`crate::store::RecordStore::add_curriculum`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurriculumDefinition {
  pub dept_id:        String,
  pub version_number: i64,
  pub version_name:   Option<String>,
  pub courses:        Vec<CurriculumCourse>,
  pub prerequisites:  Vec<PrerequisiteEdge>,
}

impl CurriculumDefinition {
  /// Check the definition the same way [`CurriculumGraph::new`] does.
  pub fn validate(&self) -> Result<()> {
    CurriculumGraph::new(0, self.courses.clone(), self.prerequisites.iter().cloned())
      .map(|_| ())
  }
}

/// Identity metadata of a stored curriculum version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumInfo {
  pub curriculum_id:  i64,
  pub dept_id:        String,
  pub version_number: i64,
  pub version_name:   Option<String>,
}

// ─── Graph ───────────────────────────────────────────────────────────────────

/// The validated course placement and prerequisite mapping of one
/// curriculum version. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumGraph {
  pub curriculum_id: i64,
  courses:           BTreeMap<String, CurriculumCourse>,
  prerequisites:     BTreeMap<String, BTreeSet<String>>,
}

impl CurriculumGraph {
  /// Build and validate a graph.
  ///
  /// Rejects duplicate course entries, suggested semesters below 1,
  /// self-prerequisites and prerequisite cycles. Prerequisite codes need not
  /// appear in `courses`.
  pub fn new<I>(
    curriculum_id: i64,
    courses: Vec<CurriculumCourse>,
    edges: I,
  ) -> Result<Self>
  where
    I: IntoIterator<Item = PrerequisiteEdge>,
  {
    let mut by_code = BTreeMap::new();
    for course in courses {
      if course.suggested_semester < 1 {
        return Err(Error::InvalidSuggestedSemester {
          course: course.course_code,
          value:  course.suggested_semester,
        });
      }
      if by_code.contains_key(&course.course_code) {
        return Err(Error::DuplicateCourse(course.course_code));
      }
      by_code.insert(course.course_code.clone(), course);
    }

    let mut prerequisites: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for edge in edges {
      if edge.course_code == edge.prerequisite_code {
        return Err(Error::SelfPrerequisite(edge.course_code));
      }
      prerequisites
        .entry(edge.course_code)
        .or_default()
        .insert(edge.prerequisite_code);
    }

    if let Some(cycle) = find_cycle(&prerequisites) {
      return Err(Error::PrerequisiteCycle(cycle));
    }

    Ok(Self { curriculum_id, courses: by_code, prerequisites })
  }

  pub fn course(&self, code: &str) -> Option<&CurriculumCourse> {
    self.courses.get(code)
  }

  pub fn courses(&self) -> impl Iterator<Item = &CurriculumCourse> {
    self.courses.values()
  }

  /// Suggested semester of `code`, or `None` if the curriculum does not
  /// place it.
  pub fn suggested_semester(&self, code: &str) -> Option<u32> {
    self.courses.get(code).map(|c| c.suggested_semester)
  }

  /// Direct prerequisites of `code`.
  pub fn prerequisites(&self, code: &str) -> impl Iterator<Item = &str> {
    self
      .prerequisites
      .get(code)
      .into_iter()
      .flatten()
      .map(String::as_str)
  }

  /// Every edge of the graph, ordered by course then prerequisite.
  pub fn edges(&self) -> impl Iterator<Item = PrerequisiteEdge> + '_ {
    self.prerequisites.iter().flat_map(|(course, reqs)| {
      reqs.iter().map(move |req| PrerequisiteEdge {
        course_code:       course.clone(),
        prerequisite_code: req.clone(),
      })
    })
  }
}

// ─── Cycle detection ─────────────────────────────────────────────────────────

/// A prerequisite cycle as `a -> b -> … -> a`, if the graph has one.
///
/// Any strongly connected component with more than one course contains a
/// cycle; the reported one is the shortest way back to the component's
/// smallest course code.
fn find_cycle(prerequisites: &BTreeMap<String, BTreeSet<String>>) -> Option<Vec<String>> {
  let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
  for (course, reqs) in prerequisites {
    for req in reqs {
      graph.add_edge(course.as_str(), req.as_str(), ());
    }
  }
  if !algo::is_cyclic_directed(&graph) {
    return None;
  }

  let component = algo::kosaraju_scc(&graph)
    .into_iter()
    .find(|scc| scc.len() > 1)?;
  let start = component.into_iter().min()?;
  let path = graph.neighbors(start).find_map(|next| {
    algo::astar(&graph, next, |n| n == start, |_| 1, |_| 0).map(|(_, path)| path)
  })?;

  Some(std::iter::once(start).chain(path).map(str::to_owned).collect())
}
