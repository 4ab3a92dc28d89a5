//! Resolution of teacher and student ids into person values.
//!
//! Ids that do not resolve are dropped rather than reported: a course is
//! saved with whatever part of its associations could be found.

use std::collections::HashSet;

use serde::Deserialize;

use crate::{
  Result,
  error::store_err,
  person::{Person, PersonId, PersonKind},
  store::PersonStore,
};

/// Whether a person's kind must match the slot it is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RolePolicy {
  /// Only a `TEACHER` may fill the teacher slot and only `STUDENT`s the
  /// student list. Anything else counts as unresolved.
  #[default]
  Strict,
  /// Any existing person is accepted in either slot.
  Permissive,
}

impl RolePolicy {
  pub fn accepts(self, person: &Person, slot: PersonKind) -> bool {
    match self {
      Self::Strict => person.kind == slot,
      Self::Permissive => true,
    }
  }
}

/// The resolved associations of a course.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Associations {
  pub teacher:  Option<Person>,
  /// In input order, without duplicates.
  pub students: Vec<Person>,
}

/// Resolve `teacher_id` and `student_ids` against `store`.
///
/// Missing ids and ids rejected by `policy` are skipped. Store failures are
/// propagated.
pub async fn resolve<P>(
  store: &P,
  policy: RolePolicy,
  teacher_id: Option<PersonId>,
  student_ids: &[PersonId],
) -> Result<Associations>
where
  P: PersonStore,
{
  let teacher = match teacher_id {
    Some(id) => lookup(store, policy, id, PersonKind::Teacher).await?,
    None => None,
  };

  let mut seen = HashSet::with_capacity(student_ids.len());
  let mut students = Vec::with_capacity(student_ids.len());
  for &id in student_ids {
    if !seen.insert(id) {
      continue;
    }
    if let Some(student) = lookup(store, policy, id, PersonKind::Student).await?
    {
      students.push(student);
    }
  }

  Ok(Associations { teacher, students })
}

async fn lookup<P>(
  store: &P,
  policy: RolePolicy,
  id: PersonId,
  slot: PersonKind,
) -> Result<Option<Person>>
where
  P: PersonStore,
{
  let Some(person) = store.get_person(id).await.map_err(store_err)? else {
    tracing::debug!(person_id = id, %slot, "dropping unknown person reference");
    return Ok(None);
  };

  if !policy.accepts(&person, slot) {
    tracing::debug!(
      person_id = id,
      %slot,
      kind = %person.kind,
      "dropping person reference with mismatched role"
    );
    return Ok(None);
  }

  Ok(Some(person))
}
