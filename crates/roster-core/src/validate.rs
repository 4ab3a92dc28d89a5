//! Field validation for persons and course input.
//!
//! Validation runs before any store interaction. All failing fields are
//! reported together; lengths are counted in characters.

use std::fmt;

use serde::Serialize;

use crate::{course::CourseInput, person::Person};

pub const MAX_NAME_PART_LEN: usize = 50;
pub const MAX_EMAIL_LEN: usize = 100;
pub const MAX_COURSE_NAME_LEN: usize = 100;

/// One failing field, named as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field:   &'static str,
  pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn fields(&self) -> &[FieldError] { &self.0 }

  pub fn has_field(&self, field: &str) -> bool {
    self.0.iter().any(|e| e.field == field)
  }

  fn push(&mut self, field: &'static str, message: impl Into<String>) {
    self.0.push(FieldError { field, message: message.into() });
  }

  fn into_result(self) -> Result<(), Self> {
    if self.is_empty() { Ok(()) } else { Err(self) }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, e) in self.0.iter().enumerate() {
      if i > 0 {
        f.write_str("; ")?;
      }
      write!(f, "{}: {}", e.field, e.message)?;
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}

fn check_required(
  errors: &mut ValidationErrors,
  field: &'static str,
  label: &str,
  value: &str,
  max: usize,
) -> bool {
  if value.trim().is_empty() {
    errors.push(field, format!("{label} is required"));
    return false;
  }
  if value.chars().count() > max {
    errors.push(field, format!("{label} must be at most {max} characters"));
    return false;
  }
  true
}

/// Loose structural email check: one `@`, a non-empty local part, a domain
/// without empty labels, and no whitespace.
pub fn is_email_shaped(value: &str) -> bool {
  if value.chars().any(char::is_whitespace) {
    return false;
  }
  let Some((local, domain)) = value.split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !domain.is_empty()
    && !domain.contains('@')
    && domain.split('.').all(|label| !label.is_empty())
}

pub fn validate_person(person: &Person) -> Result<(), ValidationErrors> {
  let mut errors = ValidationErrors::default();
  check_required(
    &mut errors,
    "firstName",
    "First name",
    &person.first_name,
    MAX_NAME_PART_LEN,
  );
  check_required(
    &mut errors,
    "lastName",
    "Last name",
    &person.last_name,
    MAX_NAME_PART_LEN,
  );
  if check_required(&mut errors, "email", "Email", &person.email, MAX_EMAIL_LEN)
    && !is_email_shaped(&person.email)
  {
    errors.push("email", "Email should be valid");
  }
  errors.into_result()
}

pub fn validate_course(input: &CourseInput) -> Result<(), ValidationErrors> {
  let mut errors = ValidationErrors::default();
  check_required(&mut errors, "name", "Name", &input.name, MAX_COURSE_NAME_LEN);
  errors.into_result()
}
