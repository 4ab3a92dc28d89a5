//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Person kinds are stored as their upper-case tag strings. Last names are
//! stored twice: as given, and case-folded for lookups.

use std::{collections::HashSet, str::FromStr};

use roster_core::{
  course::{Course, CourseId},
  person::{Person, PersonId, PersonKind},
};

use crate::{Error, Result};

// ─── PersonKind ──────────────────────────────────────────────────────────────

pub fn encode_person_kind(k: PersonKind) -> String { k.as_ref().to_owned() }

pub fn decode_person_kind(s: &str) -> Result<PersonKind> {
  PersonKind::from_str(s)
    .map_err(|_| Error::Decode(format!("unknown person type: {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `persons` row.
pub struct RawPerson {
  pub person_id:   PersonId,
  pub person_type: String,
  pub first_name:  String,
  pub last_name:   String,
  pub email:       String,
}

impl RawPerson {
  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:         Some(self.person_id),
      kind:       decode_person_kind(&self.person_type)?,
      first_name: self.first_name,
      last_name:  self.last_name,
      email:      self.email,
    })
  }
}

/// A `courses` row with its teacher and ordered student rows.
pub struct RawCourse {
  pub course_id: CourseId,
  pub name:      String,
  pub teacher:   Option<RawPerson>,
  pub students:  Vec<RawPerson>,
}

impl RawCourse {
  pub fn into_course(self) -> Result<Course> {
    Ok(Course {
      id:       Some(self.course_id),
      name:     self.name,
      teacher:  self.teacher.map(RawPerson::into_person).transpose()?,
      students: self
        .students
        .into_iter()
        .map(RawPerson::into_person)
        .collect::<Result<_>>()?,
    })
  }
}

/// The columns written for a course save. Only ids of the associated persons
/// are kept.
pub struct CourseRow {
  pub course_id:   Option<CourseId>,
  pub name:        String,
  pub teacher_id:  Option<PersonId>,
  /// Assignment order, duplicates removed.
  pub student_ids: Vec<PersonId>,
}

impl From<&Course> for CourseRow {
  fn from(course: &Course) -> Self {
    let mut seen = HashSet::new();
    let student_ids = course
      .student_ids()
      .into_iter()
      .filter(|id| seen.insert(*id))
      .collect();

    Self {
      course_id: course.id,
      name: course.name.clone(),
      teacher_id: course.teacher_id(),
      student_ids,
    }
  }
}
