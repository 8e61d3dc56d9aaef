//! SQL schema for the transcript SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS departments (
    dept_id TEXT PRIMARY KEY,
    name    TEXT NOT NULL
);

-- Catalogue of course names, shared by every curriculum version.
CREATE TABLE IF NOT EXISTS courses (
    course_code TEXT PRIMARY KEY,
    course_name TEXT NOT NULL,
    dept_id     TEXT REFERENCES departments(dept_id)
);

-- Curriculum versions are write-once.
CREATE TABLE IF NOT EXISTS curriculum_versions (
    curriculum_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    dept_id        TEXT    NOT NULL REFERENCES departments(dept_id),
    version_number INTEGER NOT NULL,
    version_name   TEXT,
    created_at     TEXT    NOT NULL,   -- RFC 3339 UTC
    UNIQUE (dept_id, version_number)
);

CREATE TABLE IF NOT EXISTS curriculum_courses (
    curriculum_id      INTEGER NOT NULL REFERENCES curriculum_versions(curriculum_id),
    course_code        TEXT    NOT NULL,
    credit_spec        TEXT    NOT NULL,   -- e.g. '4(3-2)'
    ects_credits       REAL    NOT NULL,
    suggested_semester INTEGER NOT NULL CHECK (suggested_semester >= 1),
    is_required        INTEGER NOT NULL DEFAULT 1,
    PRIMARY KEY (curriculum_id, course_code)
);

-- Direct prerequisites only. The prerequisite need not be placed in the
-- same curriculum.
CREATE TABLE IF NOT EXISTS prerequisites (
    curriculum_id     INTEGER NOT NULL REFERENCES curriculum_versions(curriculum_id),
    course_code       TEXT    NOT NULL,
    prerequisite_code TEXT    NOT NULL,
    PRIMARY KEY (curriculum_id, course_code, prerequisite_code),
    CHECK (course_code != prerequisite_code)
);

CREATE TABLE IF NOT EXISTS students (
    student_id      TEXT    PRIMARY KEY,
    first_name      TEXT    NOT NULL,
    last_name       TEXT    NOT NULL,
    dept_id         TEXT    NOT NULL REFERENCES departments(dept_id),
    curriculum_id   INTEGER NOT NULL REFERENCES curriculum_versions(curriculum_id),
    enrollment_year INTEGER,
    status          TEXT    NOT NULL DEFAULT 'active'   -- 'active' | 'graduated' | 'withdrawn'
);

-- Append-only apart from the grade column.
CREATE TABLE IF NOT EXISTS enrollments (
    enrollment_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id     TEXT    NOT NULL REFERENCES students(student_id),
    course_code    TEXT    NOT NULL,
    semester       TEXT    NOT NULL,   -- e.g. '2024-Fall'
    grade          TEXT    NOT NULL,
    attempt_number INTEGER NOT NULL CHECK (attempt_number >= 1),
    enrolled_at    TEXT    NOT NULL,   -- RFC 3339 UTC
    UNIQUE (student_id, course_code, semester)
);

CREATE INDEX IF NOT EXISTS enrollments_student_idx ON enrollments(student_id);
CREATE INDEX IF NOT EXISTS students_dept_idx       ON students(dept_id);

PRAGMA user_version = 1;
";
