//! Session configuration
//!
//! JSON or YAML, every field optional:
//!
//! ```yaml
//! formation: 4-3-3
//! bench_size: 2
//! bench_roles: [goalkeeper, defender, forward]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::models::{Formation, Role};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

fn default_bench_size() -> usize {
    3
}

fn default_bench_roles() -> Vec<Role> {
    Role::ALL.to_vec()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub formation: Formation,
    /// Substitute slots per bench role.
    #[serde(default = "default_bench_size")]
    pub bench_size: usize,
    /// One fill sequence per role, in this order.
    #[serde(default = "default_bench_roles")]
    pub bench_roles: Vec<Role>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            formation: Formation::default(),
            bench_size: default_bench_size(),
            bench_roles: default_bench_roles(),
        }
    }
}

impl SessionConfig {
    /// Load and validate; the format follows the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let extension =
            path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
        match extension.as_str() {
            "json" => Self::from_json_str(&content),
            "yaml" | "yml" => Self::from_yaml_str(&content),
            other => Err(ConfigError::UnsupportedFormat(format!("{} ({})", path.display(), other))),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bench_size == 0 {
            return Err(ConfigError::Invalid("bench_size must be at least 1".to_string()));
        }
        for (i, role) in self.bench_roles.iter().enumerate() {
            if self.bench_roles[..i].contains(role) {
                return Err(ConfigError::Invalid(format!("bench role {} listed twice", role)));
            }
        }
        Ok(())
    }

    /// Dealers a session built from this config needs.
    pub fn slot_count(&self) -> usize {
        self.formation.role_counts().total() + self.bench_size * self.bench_roles.len()
    }
}
