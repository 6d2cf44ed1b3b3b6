// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Scheduler configuration
//!
//! Settings are fixed for the lifetime of a level. They can be built in code,
//! parsed from JSON, or loaded from the file named by `PLAYSIM_CONFIG`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming a JSON configuration file
pub const CONFIG_ENV_VAR: &str = "PLAYSIM_CONFIG";

/// Errors raised while loading a [`SchedulerConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Configuration for a [`ThinkerList`](crate::thinker::ThinkerList)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Arena slots reserved at level load
    pub initial_capacity: usize,
    /// Report zero-duration state cycles at warn level instead of debug
    pub log_state_cycles: bool,
    /// Emit a trace event for every registration and reclamation
    pub log_reclamation: bool,
}

/// Upper bound on `initial_capacity`
///
/// Only the up-front reservation is capped; the arena still grows on demand.
pub const MAX_CAPACITY: usize = 1 << 20;

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            initial_capacity: 1024,
            log_state_cycles: true,
            log_reclamation: false,
        }
    }
}

impl SchedulerConfig {
    /// Create a configuration with a custom arena reservation
    pub fn new(initial_capacity: usize) -> Self {
        SchedulerConfig {
            initial_capacity,
            ..SchedulerConfig::default()
        }
    }

    /// Enable per-thinker trace events
    pub fn with_reclamation_logging(mut self) -> Self {
        self.log_reclamation = true;
        self
    }

    /// Demote state cycle diagnostics to debug level
    pub fn with_quiet_state_cycles(mut self) -> Self {
        self.log_state_cycles = false;
        self
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SchedulerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the file named by `PLAYSIM_CONFIG`, or use the defaults
    /// when the variable is unset
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                let path = PathBuf::from(path);
                let text = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Io { path, source })?;
                Self::from_json_str(&text)
            }
            None => Ok(SchedulerConfig::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity > MAX_CAPACITY {
            return Err(ConfigError::Invalid {
                field: "initial_capacity",
                reason: format!("{} exceeds {}", self.initial_capacity, MAX_CAPACITY),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.initial_capacity, 1024);
        assert!(config.log_state_cycles);
        assert!(!config.log_reclamation);
    }

    #[test]
    fn test_config_builder() {
        let config = SchedulerConfig::new(64)
            .with_reclamation_logging()
            .with_quiet_state_cycles();
        assert_eq!(config.initial_capacity, 64);
        assert!(config.log_reclamation);
        assert!(!config.log_state_cycles);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config = SchedulerConfig::from_json_str(r#"{ "initial_capacity": 256 }"#).unwrap();
        assert_eq!(config.initial_capacity, 256);
        assert!(config.log_state_cycles);
    }

    #[test]
    fn test_config_rejects_malformed_json() {
        let err = SchedulerConfig::from_json_str("{ initial_capacity: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_config_rejects_oversized_capacity() {
        let config = SchedulerConfig::new(usize::MAX);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("initial_capacity"));
    }

    #[test]
    fn test_config_capacity_bound() {
        assert!(SchedulerConfig::new(MAX_CAPACITY).validate().is_ok());
        assert!(SchedulerConfig::new(MAX_CAPACITY + 1).validate().is_err());

        let err = SchedulerConfig::from_json_str(r#"{ "initial_capacity": 4294967294 }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "initial_capacity", .. }));
    }
}
