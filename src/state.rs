//! Application state shared by HTTP and WebSocket handlers.
//!
//! The engine itself is stateless; the only shared data is the resolved config.

use tracing::{info, instrument};

use crate::config::{load_config_from_env, AppConfig};

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub config: AppConfig,
}

impl AppState {
    /// Build state from env: load TOML config if provided, otherwise defaults.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let config = load_config_from_env().unwrap_or_default();
        info!(
            target: "mathquest_backend",
            default_mode = %config.defaults.mode,
            default_max = config.defaults.max,
            max_bound = config.limits.max_bound,
            "Question engine configured"
        );
        Self::with_config(config)
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self { config }
    }
}
