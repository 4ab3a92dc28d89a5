//! JSON REST API for Roster.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`PersonStore`] and [`CourseStore`]. CORS, tracing layers and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", roster_api::api_router(store.clone(), RolePolicy::Strict))
//! ```

pub mod courses;
pub mod error;
pub mod persons;

use std::sync::Arc;

use axum::{Router, routing::get};
use roster_core::{
  resolve::RolePolicy,
  service::{CourseService, PersonService},
  store::{CourseStore, PersonStore},
};

pub use courses::CourseRecord;
pub use error::ApiError;
pub use persons::PersonRecord;

/// Shared state threaded through all handlers. Both services share the same
/// store.
pub struct ApiState<S> {
  pub persons: Arc<PersonService<S>>,
  pub courses: Arc<CourseService<S, S>>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      persons: self.persons.clone(),
      courses: self.courses.clone(),
    }
  }
}

impl<S> ApiState<S>
where
  S: PersonStore + CourseStore,
{
  pub fn new(store: Arc<S>, policy: RolePolicy) -> Self {
    Self {
      persons: Arc::new(PersonService::new(store.clone())),
      courses: Arc::new(CourseService::new(store.clone(), store, policy)),
    }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, policy: RolePolicy) -> Router<()>
where
  S: PersonStore + CourseStore + 'static,
{
  Router::new()
    // Persons
    .route("/persons", get(persons::list::<S>).post(persons::create::<S>))
    .route("/persons/search", get(persons::search::<S>))
    .route(
      "/persons/{id}",
      get(persons::get_one::<S>)
        .put(persons::update::<S>)
        .delete(persons::delete_one::<S>),
    )
    // Courses
    .route("/courses", get(courses::list::<S>).post(courses::create::<S>))
    .route(
      "/courses/{id}",
      get(courses::get_one::<S>)
        .put(courses::update::<S>)
        .delete(courses::delete_one::<S>),
    )
    .with_state(ApiState::new(store, policy))
}

// ─── Integration tests ────────────────────────────────────────────────────────
