//! Curriculum file codec.
//!
//! Reads and writes the line-oriented curriculum format, one course per line:
//!
//! ```text
//! code;credit_spec;ects[;prereq1,prereq2[;suggested_semester[;required]]]  # CODE Course Name
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. A trailing comment of
//! the form `CODE Name` supplies the course name. The suggested semester
//! defaults to 1 and the required flag to true.
//!
//! # Quick start
//!
//! ```no_run
//! use transcript_curriculum::{CurriculumHeader, parse};
//!
//! let text = "5710101;4(3-2);6.5  # 5710101 Calculus I\n";
//! let header = CurriculumHeader { dept_id: "MATH".into(), version_number: 1, version_name: None };
//! let parsed = parse(text, header).unwrap();
//! println!("{} courses, {} warnings", parsed.definition.courses.len(), parsed.warnings.len());
//! ```

pub mod error;
mod parse;
mod serialize;

pub use error::{Error, Result};
use transcript_core::curriculum::{CurriculumDefinition, CurriculumGraph};

// ─── Public types
// ─────────────────────────────────────────────────────────────

/// Curriculum identity; the file itself carries only course lines.
#[derive(Debug, Clone)]
pub struct CurriculumHeader {
  pub dept_id:        String,
  pub version_number: i64,
  pub version_name:   Option<String>,
}

/// The result of parsing a curriculum file.
pub struct ParsedCurriculum {
  /// Validated definition built from every well-formed line.
  pub definition: CurriculumDefinition,
  /// Malformed lines, each skipped without aborting the rest.
  pub warnings:   Vec<Error>,
}

// ─── Public API
// ───────────────────────────────────────────────────────────────

/// Parse a curriculum file.
///
/// Line-level problems become [`ParsedCurriculum::warnings`]. Returns `Err`
/// only if the surviving lines do not form a valid curriculum, e.g. their
/// prerequisites contain a cycle.
pub fn parse(input: &str, header: CurriculumHeader) -> Result<ParsedCurriculum> {
  parse::parse(input, header)
}

/// Write `graph` in the curriculum file format, ordered by suggested
/// semester then course code.
pub fn serialize(graph: &CurriculumGraph) -> String { serialize::serialize(graph) }
