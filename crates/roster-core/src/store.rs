//! The `PersonStore` and `CourseStore` traits.
//!
//! The traits are implemented by storage backends (e.g.
//! `roster-store-sqlite`). The services depend on these abstractions, not on
//! any concrete backend, and receive them at construction.

use std::future::Future;

use crate::{
  course::{Course, CourseId},
  person::{Person, PersonId},
};

// ─── Persons ─────────────────────────────────────────────────────────────────

/// Persistence for persons of every kind.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PersonStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// List all persons in id order.
  fn list_persons(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Persons whose last name equals `last_name` ignoring case. Exact match,
  /// not a substring search.
  fn find_persons_by_last_name<'a>(
    &'a self,
    last_name: &'a str,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  /// Insert `person` when its id is `None`, otherwise overwrite the stored
  /// row with that id. Returns the stored person with its id set.
  fn save_person(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Delete a person by id. Returns `false` if nothing was deleted.
  ///
  /// Courses referencing the person are detached: a teacher slot holding the
  /// person becomes empty and the person is removed from student lists.
  fn delete_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn count_persons(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}

// ─── Courses ─────────────────────────────────────────────────────────────────

/// Persistence for courses and their teacher/student associations.
///
/// Only the ids of the associated persons are stored; reads return the
/// persons as they currently are.
pub trait CourseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// List all courses in id order, with associations loaded.
  fn list_courses(
    &self,
  ) -> impl Future<Output = Result<Vec<Course>, Self::Error>> + Send + '_;

  /// Retrieve a course by id. Returns `None` if not found.
  fn get_course(
    &self,
    id: CourseId,
  ) -> impl Future<Output = Result<Option<Course>, Self::Error>> + Send + '_;

  /// Insert or overwrite a course together with its full student list.
  /// The course row and its student links are written atomically.
  fn save_course(
    &self,
    course: Course,
  ) -> impl Future<Output = Result<Course, Self::Error>> + Send + '_;

  /// Save several courses in a single transaction.
  fn save_courses(
    &self,
    courses: Vec<Course>,
  ) -> impl Future<Output = Result<Vec<Course>, Self::Error>> + Send + '_;

  /// Delete a course by id. Returns `false` if nothing was deleted.
  fn delete_course(
    &self,
    id: CourseId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
