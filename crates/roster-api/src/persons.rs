//! Handlers for `/persons` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/persons` | All persons |
//! | `GET`    | `/persons/search` | `?lastName=` required; case-insensitive exact match |
//! | `GET`    | `/persons/:id` | 404 if not found |
//! | `POST`   | `/persons` | Body: [`PersonRecord`]; returns 201 + stored record |
//! | `PUT`    | `/persons/:id` | Updates names and email only |
//! | `DELETE` | `/persons/:id` | Always 204 |

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  person::{Person, PersonId, PersonKind},
  store::{CourseStore, PersonStore},
};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

// ─── Wire record ─────────────────────────────────────────────────────────────

/// The JSON shape of a person. Missing string fields deserialise as empty
/// strings so they surface as validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonRecord {
  pub id:          Option<PersonId>,
  pub first_name:  String,
  pub last_name:   String,
  pub email:       String,
  /// `PERSON`, `TEACHER` or `STUDENT`. Anything else is read as `PERSON`.
  pub person_type: Option<String>,
}

impl From<PersonRecord> for Person {
  fn from(r: PersonRecord) -> Self {
    Person {
      id:         r.id,
      kind:       PersonKind::from_tag(r.person_type.as_deref()),
      first_name: r.first_name,
      last_name:  r.last_name,
      email:      r.email,
    }
  }
}

impl From<Person> for PersonRecord {
  fn from(p: Person) -> Self {
    PersonRecord {
      id:          p.id,
      first_name:  p.first_name,
      last_name:   p.last_name,
      email:       p.email,
      person_type: Some(p.kind.to_string()),
    }
  }
}

fn records(persons: Vec<Person>) -> Vec<PersonRecord> {
  persons.into_iter().map(PersonRecord::from).collect()
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /persons`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<PersonRecord>>, ApiError>
where
  S: PersonStore + CourseStore + 'static,
{
  Ok(Json(records(state.persons.list().await?)))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
  pub last_name: String,
}

/// `GET /persons/search?lastName=<name>`
pub async fn search<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PersonRecord>>, ApiError>
where
  S: PersonStore + CourseStore + 'static,
{
  Ok(Json(records(state.persons.search(&params.last_name).await?)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /persons/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<PersonId>,
) -> Result<Json<PersonRecord>, ApiError>
where
  S: PersonStore + CourseStore + 'static,
{
  Ok(Json(state.persons.get(id).await?.into()))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /persons`: returns 201 + the stored record. Any `id` in the body
/// is ignored.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  body: Result<Json<PersonRecord>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PersonStore + CourseStore + 'static,
{
  let Json(body) = body?;
  let person = state.persons.create(body.into()).await?;
  Ok((StatusCode::CREATED, Json(PersonRecord::from(person))))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /persons/:id`: overwrites first name, last name and email. The
/// stored `personType` never changes.
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<PersonId>,
  body: Result<Json<PersonRecord>, JsonRejection>,
) -> Result<Json<PersonRecord>, ApiError>
where
  S: PersonStore + CourseStore + 'static,
{
  let Json(body) = body?;
  Ok(Json(state.persons.update(id, body.into()).await?.into()))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /persons/:id`: 204 whether or not the person existed.
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<PersonId>,
) -> Result<StatusCode, ApiError>
where
  S: PersonStore + CourseStore + 'static,
{
  state.persons.delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
