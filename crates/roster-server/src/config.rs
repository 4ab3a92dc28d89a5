//! Runtime server configuration.
//!
//! Layered from an optional TOML file and `ROSTER_*` environment variables.
//! Every field has a default, so the server starts with no configuration at
//! all.

use std::path::{Path, PathBuf};

use roster_core::resolve::RolePolicy;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  pub store_path:      PathBuf,
  /// Insert sample teachers, students and courses into an empty store.
  pub seed:            bool,
  /// Reject teachers in student slots and vice versa.
  pub enforce_roles:   bool,
  /// Origins allowed to make credentialed cross-origin requests.
  pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:            "127.0.0.1".to_string(),
      port:            8080,
      store_path:      PathBuf::from("roster.db"),
      seed:            true,
      enforce_roles:   true,
      allowed_origins: vec![
        "http://localhost:3000".to_string(),
        "http://frontend".to_string(),
        "http://frontend:80".to_string(),
      ],
    }
  }
}

impl ServerConfig {
  /// Read `path` (if it exists), then apply `ROSTER_*` environment overrides.
  /// `ROSTER_ALLOWED_ORIGINS` is a comma-separated list.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("ROSTER")
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("allowed_origins"),
      )
      .build()?
      .try_deserialize()
  }

  pub fn role_policy(&self) -> RolePolicy {
    if self.enforce_roles {
      RolePolicy::Strict
    } else {
      RolePolicy::Permissive
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}
