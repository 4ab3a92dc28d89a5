//! Person: the shared shape of teachers, students and untyped persons.
//!
//! The role of a person is carried by a [`PersonKind`] tag rather than by
//! separate types. The tag is fixed at creation; updates only ever touch the
//! name and email fields.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Store-assigned person identifier.
pub type PersonId = i64;

/// The role a person plays. Stored and transmitted as `PERSON`, `TEACHER` or
/// `STUDENT`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonKind {
  #[default]
  Person,
  Teacher,
  Student,
}

impl PersonKind {
  /// Interpret an optional incoming tag. Absent or unrecognised tags fall
  /// back to [`PersonKind::Person`].
  pub fn from_tag(tag: Option<&str>) -> Self {
    tag.and_then(|t| Self::from_str(t).ok()).unwrap_or_default()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
  /// `None` until the person has been saved for the first time.
  pub id:         Option<PersonId>,
  pub kind:       PersonKind,
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
}

impl Person {
  pub fn new(
    kind: PersonKind,
    first_name: impl Into<String>,
    last_name: impl Into<String>,
    email: impl Into<String>,
  ) -> Self {
    Self {
      id: None,
      kind,
      first_name: first_name.into(),
      last_name: last_name.into(),
      email: email.into(),
    }
  }

  pub fn teacher(
    first_name: impl Into<String>,
    last_name: impl Into<String>,
    email: impl Into<String>,
  ) -> Self {
    Self::new(PersonKind::Teacher, first_name, last_name, email)
  }

  pub fn student(
    first_name: impl Into<String>,
    last_name: impl Into<String>,
    email: impl Into<String>,
  ) -> Self {
    Self::new(PersonKind::Student, first_name, last_name, email)
  }

  /// Copy the mutable fields of `other` onto `self`. Id and kind are left
  /// untouched.
  pub fn overwrite_details(&mut self, other: Person) {
    self.first_name = other.first_name;
    self.last_name = other.last_name;
    self.email = other.email;
  }
}

/// Case-fold a last name for comparison. Lookups by last name match on the
/// folded form only.
pub fn fold_last_name(last_name: &str) -> String { last_name.to_lowercase() }
