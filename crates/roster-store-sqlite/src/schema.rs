//! SQL schema for the Roster SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- AUTOINCREMENT keeps ids of deleted rows from being handed out again.
CREATE TABLE IF NOT EXISTS persons (
    person_id        INTEGER PRIMARY KEY AUTOINCREMENT,
    person_type      TEXT NOT NULL,   -- 'PERSON' | 'TEACHER' | 'STUDENT'
    first_name       TEXT NOT NULL,
    last_name        TEXT NOT NULL,
    last_name_folded TEXT NOT NULL,   -- lower-cased last_name for search
    email            TEXT NOT NULL
);

-- Deleting a teacher leaves the course without one.
CREATE TABLE IF NOT EXISTS courses (
    course_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    teacher_id INTEGER REFERENCES persons(person_id) ON DELETE SET NULL
);

-- Ordered student membership; rewritten in full on every course save.
CREATE TABLE IF NOT EXISTS course_students (
    course_id  INTEGER NOT NULL REFERENCES courses(course_id)  ON DELETE CASCADE,
    student_id INTEGER NOT NULL REFERENCES persons(person_id) ON DELETE CASCADE,
    position   INTEGER NOT NULL,
    PRIMARY KEY (course_id, student_id)
);

CREATE INDEX IF NOT EXISTS persons_last_name_idx   ON persons(last_name_folded);
CREATE INDEX IF NOT EXISTS courses_teacher_idx     ON courses(teacher_id);
CREATE INDEX IF NOT EXISTS course_students_pos_idx ON course_students(course_id, position);
CREATE INDEX IF NOT EXISTS course_students_stu_idx ON course_students(student_id);

PRAGMA user_version = 1;
";
