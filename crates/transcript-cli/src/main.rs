//! `transcript`: command-line front end for the academic records store.
//!
//! # Usage
//!
//! ```text
//! transcript init
//! transcript add-department CS "Computer Science"
//! transcript add-course ORI100 "University Orientation"
//! transcript import-curriculum cs-2021.txt --dept CS --version 1 --name "2021 Regulations"
//! transcript add-student 2021001 Grace Hopper --dept CS --curriculum 1 --enrollment-year 2021
//! transcript register 2021001 2022-Spring CS102 MAT102
//! transcript grade 2021001 CS102 2022-Spring BA
//! transcript transcript 2021001
//! transcript stats --json
//! ```
//!
//! Settings come from `transcript.toml` (or `--config`) and `TRANSCRIPT_*`
//! environment variables.

mod render;
mod settings;

use std::path::PathBuf;

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use transcript_core::{
  Registrar,
  enrollment::InsertOutcome,
  registrar::{CourseResult, SemesterRegistration},
  store::RecordStore,
  student::{Department, Student, StudentStatus},
};
use transcript_curriculum::CurriculumHeader;
use transcript_store_sqlite::SqliteStore;

use crate::settings::Settings;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "transcript", version, about = "Academic records and progression")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "transcript.toml")]
  config: PathBuf,

  /// SQLite database file; overrides the configured `store_path`.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Create the database schema.
  Init,

  /// Add a department.
  AddDepartment { dept_id: String, name: String },

  /// List departments.
  Departments,

  /// Add a course name to the catalogue, e.g. for courses outside any
  /// curriculum.
  AddCourse {
    course_code: String,
    name:        String,
    #[arg(long)]
    dept:        Option<String>,
  },

  /// Import a curriculum file as a new curriculum version.
  ImportCurriculum {
    file:    PathBuf,
    #[arg(long)]
    dept:    String,
    #[arg(long)]
    version: i64,
    #[arg(long)]
    name:    Option<String>,
  },

  /// Print a stored curriculum version in the curriculum file format.
  ExportCurriculum { curriculum_id: i64 },

  /// Add a student assigned to a curriculum version.
  AddStudent {
    student_id:      String,
    first_name:      String,
    last_name:       String,
    #[arg(long)]
    dept:            String,
    #[arg(long)]
    curriculum:      i64,
    #[arg(long)]
    enrollment_year: Option<i32>,
    #[arg(long, default_value_t = StudentStatus::Active)]
    status:          StudentStatus,
  },

  /// Register a student for a semester: automatic retakes, then the listed
  /// courses.
  Register {
    student_id: String,
    semester:   String,
    courses:    Vec<String>,
    /// Register only the listed courses.
    #[arg(long)]
    no_retake:  bool,
    #[arg(long)]
    json:       bool,
  },

  /// Record a final grade.
  Grade {
    student_id:  String,
    course_code: String,
    semester:    String,
    grade:       String,
  },

  /// Show transcripts.
  Transcript {
    /// A single student.
    #[arg(required_unless_present_any = ["dept", "all"])]
    student_id: Option<String>,
    /// Every student of a department.
    #[arg(long, conflicts_with = "student_id")]
    dept:       Option<String>,
    /// Every student.
    #[arg(long, conflicts_with_all = ["student_id", "dept"])]
    all:        bool,
    #[arg(long)]
    json:       bool,
  },

  /// Cohort statistics over every student.
  Stats {
    #[arg(long)]
    json: bool,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut settings = Settings::load(&cli.config)?;
  if let Some(path) = cli.store {
    settings.store_path = path;
  }

  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;
  let registrar = Registrar::new(store).with_required_credits(settings.required_credits);

  run(cli.command, &registrar, &settings).await
}

async fn run(
  command: Command,
  registrar: &Registrar<SqliteStore>,
  settings: &Settings,
) -> anyhow::Result<()> {
  let store = registrar.store();

  match command {
    Command::Init => {
      println!("store ready at {}", settings.store_path.display());
    }

    Command::AddDepartment { dept_id, name } => {
      let outcome = store
        .add_department(Department { dept_id: dept_id.clone(), name })
        .await?;
      report_insert("department", &dept_id, outcome);
    }

    Command::Departments => {
      for d in store.list_departments().await? {
        println!("{:<8} {}", d.dept_id, d.name);
      }
    }

    Command::AddCourse { course_code, name, dept } => {
      let outcome = store.add_course(course_code.clone(), name, dept).await?;
      report_insert("course", &course_code, outcome);
    }

    Command::ImportCurriculum { file, dept, version, name } => {
      let text = std::fs::read_to_string(&file)
        .with_context(|| format!("reading curriculum file {}", file.display()))?;
      let header = CurriculumHeader {
        dept_id:        dept,
        version_number: version,
        version_name:   name,
      };
      let parsed = transcript_curriculum::parse(&text, header)
        .with_context(|| format!("parsing {}", file.display()))?;
      for warning in &parsed.warnings {
        tracing::warn!(file = %file.display(), "{warning}; line skipped");
      }

      let courses = parsed.definition.courses.len();
      let info = store.add_curriculum(parsed.definition).await?;
      println!(
        "curriculum {} ({} v{}): {courses} courses, {} lines skipped",
        info.curriculum_id,
        info.dept_id,
        info.version_number,
        parsed.warnings.len()
      );
    }

    Command::ExportCurriculum { curriculum_id } => {
      let Some(graph) = store.get_curriculum(curriculum_id).await? else {
        bail!("curriculum {curriculum_id} not found");
      };
      print!("{}", transcript_curriculum::serialize(&graph));
    }

    Command::AddStudent {
      student_id,
      first_name,
      last_name,
      dept,
      curriculum,
      enrollment_year,
      status,
    } => {
      if store.get_curriculum(curriculum).await?.is_none() {
        bail!("curriculum {curriculum} not found");
      }
      let student = Student {
        student_id: student_id.clone(),
        first_name,
        last_name,
        dept_id: dept,
        curriculum_id: curriculum,
        enrollment_year,
        status,
      };
      report_insert("student", &student_id, store.add_student(student).await?);
    }

    Command::Register { student_id, semester, courses, no_retake, json } => {
      let result = if no_retake {
        let mut requests = Vec::with_capacity(courses.len());
        for course_code in courses {
          let outcome = registrar.register(&student_id, &course_code, &semester).await?;
          requests.push(CourseResult { course_code, outcome });
        }
        SemesterRegistration { retakes: Vec::new(), requests }
      } else {
        registrar
          .register_semester(&student_id, &semester, &courses)
          .await?
      };

      if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
      } else {
        print!("{}", render::registration(&result));
      }
    }

    Command::Grade { student_id, course_code, semester, grade } => {
      if !registrar
        .record_grade(&student_id, &course_code, &semester, &grade)
        .await?
      {
        bail!("{student_id} has no enrollment in {course_code} for {semester}");
      }
      println!("{student_id} {course_code} {semester}: {grade}");
    }

    Command::Transcript { student_id, dept, all, json } => {
      let transcripts = match student_id {
        Some(id) if !all => vec![registrar.transcript(&id).await?],
        _ => registrar.transcripts(dept).await?,
      };

      if json {
        println!("{}", serde_json::to_string_pretty(&transcripts)?);
      } else {
        for t in &transcripts {
          print!("{}", render::transcript(t));
        }
        tracing::info!(count = transcripts.len(), "transcripts generated");
      }
    }

    Command::Stats { json } => {
      let stats = registrar.statistics().await?;
      if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
      } else {
        print!("{}", render::statistics(&stats));
      }
    }
  }

  Ok(())
}

fn report_insert(kind: &str, id: &str, outcome: InsertOutcome) {
  match outcome {
    InsertOutcome::Inserted => println!("added {kind} {id}"),
    InsertOutcome::Duplicate => println!("{kind} {id} already exists"),
  }
}
