//! Loading service configuration (request defaults + limits) from TOML.
//!
//! See `AppConfig` for the expected schema. Every table is optional.

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::domain::Mode;
use crate::engine::MAX_SUPPORTED_BOUND;

#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
pub struct AppConfig {
  #[serde(default)]
  pub defaults: Defaults,
  #[serde(default)]
  pub limits: Limits,
}

/// Applied when a request omits `mode` / `max`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Defaults {
  #[serde(default)]
  pub mode: Mode,
  #[serde(default = "default_max")]
  pub max: u32,
}

impl Default for Defaults {
  fn default() -> Self {
    Self { mode: Mode::Mix, max: default_max() }
  }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Limits {
  /// Largest `max` a client may ask for.
  #[serde(default = "default_max_bound")]
  pub max_bound: u32,
}

impl Default for Limits {
  fn default() -> Self {
    Self { max_bound: default_max_bound() }
  }
}

fn default_max() -> u32 { 20 }
fn default_max_bound() -> u32 { 1000 }

impl AppConfig {
  /// Clamp values the engine would refuse anyway.
  pub fn sanitized(mut self) -> Self {
    if self.limits.max_bound > MAX_SUPPORTED_BOUND {
      warn!(target: "mathquest_backend", requested = self.limits.max_bound, limit = MAX_SUPPORTED_BOUND, "max_bound clamped");
      self.limits.max_bound = MAX_SUPPORTED_BOUND;
    }
    if self.defaults.max == 0 || self.defaults.max > self.limits.max_bound {
      warn!(target: "mathquest_backend", max = self.defaults.max, "default max out of range; using 20");
      self.defaults.max = default_max().min(self.limits.max_bound.max(1));
    }
    self
  }
}

pub fn parse_config(s: &str) -> Result<AppConfig, toml::de::Error> {
  toml::from_str::<AppConfig>(s).map(AppConfig::sanitized)
}

/// Attempt to load `AppConfig` from MATHQUEST_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("MATHQUEST_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "mathquest_backend", %path, mode = %cfg.defaults.mode, max = cfg.defaults.max, "Loaded config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "mathquest_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "mathquest_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
