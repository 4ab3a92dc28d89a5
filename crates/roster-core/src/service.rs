//! Person and course services.
//!
//! The services own the create/read/update/delete rules: validation before
//! any store access, store-assigned ids, immutable person kinds, and full
//! replacement of course associations on update.

use std::sync::Arc;

use crate::{
  Error, Result,
  course::{Course, CourseId, CourseInput},
  error::store_err,
  person::{Person, PersonId},
  resolve::{Associations, RolePolicy, resolve},
  store::{CourseStore, PersonStore},
  validate::{validate_course, validate_person},
};

// ─── Persons ─────────────────────────────────────────────────────────────────

pub struct PersonService<P> {
  store: Arc<P>,
}

impl<P> PersonService<P>
where
  P: PersonStore,
{
  pub fn new(store: Arc<P>) -> Self { Self { store } }

  pub async fn list(&self) -> Result<Vec<Person>> {
    self.store.list_persons().await.map_err(store_err)
  }

  /// Persons whose last name equals `last_name`, ignoring case.
  pub async fn search(&self, last_name: &str) -> Result<Vec<Person>> {
    self
      .store
      .find_persons_by_last_name(last_name)
      .await
      .map_err(store_err)
  }

  pub async fn get(&self, id: PersonId) -> Result<Person> {
    self
      .store
      .get_person(id)
      .await
      .map_err(store_err)?
      .ok_or(Error::PersonNotFound(id))
  }

  /// Validate and insert `person`. Any id it carries is discarded.
  pub async fn create(&self, mut person: Person) -> Result<Person> {
    validate_person(&person)?;
    person.id = None;

    let stored = self.store.save_person(person).await.map_err(store_err)?;
    tracing::info!(person_id = ?stored.id, kind = %stored.kind, "created person");
    Ok(stored)
  }

  /// Overwrite the name and email of person `id`. The stored kind is kept
  /// even if `person` carries a different one.
  pub async fn update(&self, id: PersonId, person: Person) -> Result<Person> {
    validate_person(&person)?;

    let mut existing = self.get(id).await?;
    existing.overwrite_details(person);

    let stored = self.store.save_person(existing).await.map_err(store_err)?;
    tracing::info!(person_id = id, "updated person");
    Ok(stored)
  }

  /// Delete person `id`. Deleting an absent person is not an error.
  pub async fn delete(&self, id: PersonId) -> Result<()> {
    let deleted = self.store.delete_person(id).await.map_err(store_err)?;
    tracing::info!(person_id = id, deleted, "delete person");
    Ok(())
  }
}

// ─── Courses ─────────────────────────────────────────────────────────────────

pub struct CourseService<C, P> {
  courses: Arc<C>,
  persons: Arc<P>,
  policy:  RolePolicy,
}

impl<C, P> CourseService<C, P>
where
  C: CourseStore,
  P: PersonStore,
{
  pub fn new(courses: Arc<C>, persons: Arc<P>, policy: RolePolicy) -> Self {
    Self { courses, persons, policy }
  }

  pub fn policy(&self) -> RolePolicy { self.policy }

  pub async fn list(&self) -> Result<Vec<Course>> {
    self.courses.list_courses().await.map_err(store_err)
  }

  pub async fn get(&self, id: CourseId) -> Result<Course> {
    self
      .courses
      .get_course(id)
      .await
      .map_err(store_err)?
      .ok_or(Error::CourseNotFound(id))
  }

  /// Validate `input`, resolve its associations and insert a new course.
  pub async fn create(&self, input: CourseInput) -> Result<Course> {
    validate_course(&input)?;

    let Associations { teacher, students } = self.associations(&input).await?;
    let course = Course { id: None, name: input.name, teacher, students };

    let stored = self.courses.save_course(course).await.map_err(store_err)?;
    tracing::info!(
      course_id = ?stored.id,
      students = stored.students.len(),
      "created course"
    );
    Ok(stored)
  }

  /// Replace the name, teacher and student set of course `id`.
  pub async fn update(&self, id: CourseId, input: CourseInput) -> Result<Course> {
    validate_course(&input)?;

    let mut existing = self.get(id).await?;
    let Associations { teacher, students } = self.associations(&input).await?;
    existing.name = input.name;
    existing.teacher = teacher;
    existing.students = students;

    let stored = self.courses.save_course(existing).await.map_err(store_err)?;
    tracing::info!(
      course_id = id,
      students = stored.students.len(),
      "updated course"
    );
    Ok(stored)
  }

  /// Delete course `id`. Deleting an absent course is not an error.
  pub async fn delete(&self, id: CourseId) -> Result<()> {
    let deleted = self.courses.delete_course(id).await.map_err(store_err)?;
    tracing::info!(course_id = id, deleted, "delete course");
    Ok(())
  }

  async fn associations(&self, input: &CourseInput) -> Result<Associations> {
    let resolved = resolve(
      self.persons.as_ref(),
      self.policy,
      input.teacher_id,
      &input.student_ids,
    )
    .await?;

    let dropped = input.student_ids.len() - resolved.students.len();
    if dropped > 0 || (input.teacher_id.is_some() && resolved.teacher.is_none()) {
      tracing::debug!(
        teacher_id = ?input.teacher_id,
        dropped_students = dropped,
        "course input contained unresolved references"
      );
    }
    Ok(resolved)
  }
}
