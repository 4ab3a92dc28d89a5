//! Core types and trait definitions for the Roster course registry.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::PersonStore`] and
//! [`store::CourseStore`]; the API layer drives the services in
//! [`service`].

pub mod course;
pub mod error;
pub mod person;
pub mod resolve;
pub mod service;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
