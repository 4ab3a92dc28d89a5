//! Handlers for `/courses` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/courses` | All courses |
//! | `GET`    | `/courses/:id` | 404 if not found |
//! | `POST`   | `/courses` | Body: [`CourseRecord`]; returns 201 + stored record |
//! | `PUT`    | `/courses/:id` | Replaces name, teacher and the full student set |
//! | `DELETE` | `/courses/:id` | Always 204 |
//!
//! Teacher and student ids that do not resolve are dropped from the stored
//! course instead of failing the request.

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  course::{Course, CourseId, CourseInput},
  person::PersonId,
  store::{CourseStore, PersonStore},
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{ApiState, error::ApiError};

// ─── Wire record ─────────────────────────────────────────────────────────────

/// The JSON shape of a course: associations by id only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseRecord {
  pub id:          Option<CourseId>,
  pub name:        String,
  pub teacher_id:  Option<PersonId>,
  #[serde(deserialize_with = "null_as_empty")]
  pub student_ids: Vec<PersonId>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<PersonId>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<Vec<PersonId>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The record's `id` is dropped; the path or the store decides identity.
impl From<CourseRecord> for CourseInput {
  fn from(r: CourseRecord) -> Self {
    CourseInput {
      name:        r.name,
      teacher_id:  r.teacher_id,
      student_ids: r.student_ids,
    }
  }
}

impl From<Course> for CourseRecord {
  fn from(c: Course) -> Self {
    CourseRecord {
      id:          c.id,
      teacher_id:  c.teacher_id(),
      student_ids: c.student_ids(),
      name:        c.name,
    }
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /courses`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<CourseRecord>>, ApiError>
where
  S: PersonStore + CourseStore + 'static,
{
  let courses = state.courses.list().await?;
  Ok(Json(courses.into_iter().map(CourseRecord::from).collect()))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /courses/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<CourseId>,
) -> Result<Json<CourseRecord>, ApiError>
where
  S: PersonStore + CourseStore + 'static,
{
  Ok(Json(state.courses.get(id).await?.into()))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /courses`: returns 201 + the stored record.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  body: Result<Json<CourseRecord>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PersonStore + CourseStore + 'static,
{
  let Json(body) = body?;
  let course = state.courses.create(body.into()).await?;
  Ok((StatusCode::CREATED, Json(CourseRecord::from(course))))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /courses/:id`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<CourseId>,
  body: Result<Json<CourseRecord>, JsonRejection>,
) -> Result<Json<CourseRecord>, ApiError>
where
  S: PersonStore + CourseStore + 'static,
{
  let Json(body) = body?;
  Ok(Json(state.courses.update(id, body.into()).await?.into()))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /courses/:id`: 204 whether or not the course existed.
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<CourseId>,
) -> Result<StatusCode, ApiError>
where
  S: PersonStore + CourseStore + 'static,
{
  state.courses.delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
