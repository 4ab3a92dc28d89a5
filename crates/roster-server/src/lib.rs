//! HTTP server assembly for Roster: configuration, CORS, request tracing and
//! startup seeding around the [`roster_api`] router.

pub mod config;
pub mod seed;

pub use config::ServerConfig;

use std::sync::Arc;

use axum::{
  Router,
  http::{HeaderValue, Method, header::InvalidHeaderValue},
};
use roster_core::store::{CourseStore, PersonStore};
use tower_http::{
  cors::{AllowHeaders, AllowOrigin, CorsLayer},
  trace::TraceLayer,
};

/// Credentialed CORS for the configured origins. Request headers are
/// mirrored because a wildcard is not allowed together with credentials.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, InvalidHeaderValue> {
  let origins = origins
    .iter()
    .map(|o| HeaderValue::from_str(o))
    .collect::<Result<Vec<_>, _>>()?;

  Ok(
    CorsLayer::new()
      .allow_origin(AllowOrigin::list(origins))
      .allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
      ])
      .allow_headers(AllowHeaders::mirror_request())
      .allow_credentials(true),
  )
}

/// Build the full application router: the API under `/api`, wrapped in CORS
/// and request tracing.
pub fn app<S>(
  store: Arc<S>,
  config: &ServerConfig,
) -> Result<Router, InvalidHeaderValue>
where
  S: PersonStore + CourseStore + 'static,
{
  Ok(
    Router::new()
      .nest("/api", roster_api::api_router(store, config.role_policy()))
      .layer(cors_layer(&config.allowed_origins)?)
      .layer(TraceLayer::new_for_http()),
  )
}

// ─── Integration tests ────────────────────────────────────────────────────────
