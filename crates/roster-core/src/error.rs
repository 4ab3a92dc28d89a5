//! Error types for `roster-core`.

use thiserror::Error;

use crate::{course::CourseId, person::PersonId, validate::ValidationErrors};

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  #[error("person not found: {0}")]
  PersonNotFound(PersonId),

  #[error("course not found: {0}")]
  CourseNotFound(CourseId),

  /// Any failure reported by the underlying store. Never retried.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::PersonNotFound(_) | Self::CourseNotFound(_))
  }
}

impl From<ValidationErrors> for Error {
  fn from(errors: ValidationErrors) -> Self { Self::Validation(errors) }
}

/// Box a backend error into [`Error::Store`]; usable directly with
/// `map_err`.
pub(crate) fn store_err<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Store(Box::new(e))
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
