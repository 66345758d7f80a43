//! Application configuration.
//!
//! Defaults mirror a standard two-instance HORCM deployment: the left side
//! of every pair is addressed through `-IH10`, the right side through
//! `-IH20`, and the generated HORCM files listen on services 5010/5020.
//! A YAML file can override any field.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name probed in the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "gadmanager.yaml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Instance handle attached to the first line of each record.
    pub left_instance: String,
    /// Instance handle attached to the second line of each record.
    pub right_instance: String,
    pub horcm: HorcmSettings,
    /// Capacity of the in-memory log ring buffer.
    pub max_log_lines: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HorcmSettings {
    /// Service port of the primary (horcm10) instance.
    pub primary_service: u16,
    /// Service port of the secondary (horcm20) instance.
    pub secondary_service: u16,
    pub poll_ms: u32,
    pub timeout_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            left_instance: "-IH10".to_string(),
            right_instance: "-IH20".to_string(),
            horcm: HorcmSettings::default(),
            max_log_lines: crate::logging::DEFAULT_MAX_LOG_LINES,
        }
    }
}

impl Default for HorcmSettings {
    fn default() -> Self {
        Self {
            primary_service: 5010,
            secondary_service: 5020,
            poll_ms: 1000,
            timeout_ms: 3000,
        }
    }
}

impl AppConfig {
    /// Load a configuration file, failing on unreadable or malformed YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Load from an explicit path, or fall back to `gadmanager.yaml` in the
    /// working directory if present, or the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let probe = Path::new(DEFAULT_CONFIG_FILE);
                if probe.is_file() {
                    Self::load(probe)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
