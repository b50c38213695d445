//! Server configuration, loaded from `damas.toml` plus env overrides.

use std::path::Path;

use damas_room::{MatchmakingConfig, MatchmakingMode};
use serde::Deserialize;

/// File read by [`ServerConfig::load`], relative to the working directory.
pub const CONFIG_FILE: &str = "damas.toml";

/// Top-level server configuration.
///
/// ```toml
/// listen_addr = "0.0.0.0:8080"
///
/// [matchmaking]
/// mode = "room_code"
/// close_room_on_game_over = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub matchmaking: MatchmakingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            matchmaking: MatchmakingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load config from `damas.toml` if it exists, then apply env var
    /// overrides (`DAMAS_LISTEN_ADDR`, `DAMAS_MODE`).
    pub fn load() -> Self {
        let mut config = Self::from_file(Path::new(CONFIG_FILE));
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Reads a config file, falling back to defaults if it is missing or
    /// does not parse.
    pub fn from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<ServerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!(path = %path.display(), "loaded configuration");
                    cfg
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to parse config, using defaults");
                    ServerConfig::default()
                }
            },
            Err(_) => {
                tracing::info!(path = %path.display(), "no config file found, using defaults");
                ServerConfig::default()
            }
        }
    }

    /// Applies overrides from `lookup`, which maps a variable name to its
    /// value. Empty values are ignored, as is an unknown mode.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("DAMAS_LISTEN_ADDR").filter(|v| !v.is_empty()) {
            self.listen_addr = addr;
        }
        if let Some(mode) = lookup("DAMAS_MODE").filter(|v| !v.is_empty()) {
            match mode.parse::<MatchmakingMode>() {
                Ok(mode) => self.matchmaking.mode = mode,
                Err(e) => tracing::warn!(error = %e, "ignoring DAMAS_MODE"),
            }
        }
    }
}
