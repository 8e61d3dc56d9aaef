//! Academic progression engine: grade semantics, semester ordering, GPA
//! computation, curriculum graphs and enrollment eligibility.
//!
//! Everything except [`Registrar`] is synchronous and pure. The registrar
//! loads a student snapshot from a [`store::RecordStore`], runs the engine
//! against it and writes accepted enrollments back.

pub mod credit;
pub mod curriculum;
pub mod eligibility;
pub mod enrollment;
pub mod error;
pub mod gpa;
pub mod grade;
pub mod registrar;
pub mod semester;
pub mod stats;
pub mod store;
pub mod student;
pub mod transcript;

pub use error::{Error, Result};
pub use registrar::Registrar;
