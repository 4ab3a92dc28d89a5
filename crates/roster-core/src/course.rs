//! Courses and the id-only input used to create or replace them.

use crate::person::{Person, PersonId};

/// Store-assigned course identifier.
pub type CourseId = i64;

/// A course with its associations resolved to person values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
  /// `None` until the course has been saved for the first time.
  pub id:       Option<CourseId>,
  pub name:     String,
  pub teacher:  Option<Person>,
  /// Students in the order they were assigned.
  pub students: Vec<Person>,
}

impl Course {
  pub fn teacher_id(&self) -> Option<PersonId> {
    self.teacher.as_ref().and_then(|t| t.id)
  }

  pub fn student_ids(&self) -> Vec<PersonId> {
    self.students.iter().filter_map(|s| s.id).collect()
  }
}

/// Input to [`crate::service::CourseService::create`] and
/// [`crate::service::CourseService::update`].
///
/// Associations are always supplied in full; an update replaces the previous
/// teacher and student set wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseInput {
  pub name:        String,
  pub teacher_id:  Option<PersonId>,
  pub student_ids: Vec<PersonId>,
}
