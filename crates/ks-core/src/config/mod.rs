//! # Pure Data Module - Data Transfer Objects Only
//!
//! ## Responsibilities
//!
//! - Define configuration data structures
//! - Provide TOML → DTO mapping
//!
//! ## Prohibited
//!
//! - No business logic or policies
//! - No validation logic
//! - No default value calculation
//!
//! Default resolution (data directory, retention cap) happens in the
//! bootstrap wiring, not here.

use std::path::PathBuf;

/// Application configuration DTO (pure data, no logic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the key-value store (may be empty - this is a fact, not an error)
    pub data_dir: PathBuf,

    /// Maximum number of session records kept in the analytics log, if configured
    pub max_sessions: Option<usize>,

    /// Whether to also write logs to a rolling file
    pub file_logging: bool,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    ///
    /// **Prohibited**: This method must NOT contain any validation
    /// or default value logic. Missing values are valid "facts".
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        Ok(Self {
            data_dir: PathBuf::from(
                toml_value
                    .get("storage")
                    .and_then(|s| s.get("data_dir"))
                    .and_then(|v| v.as_str())
                    .unwrap_or(""),
            ),
            max_sessions: toml_value
                .get("analytics")
                .and_then(|a| a.get("max_sessions"))
                .and_then(|v| v.as_integer())
                .map(|v| v.max(0) as usize),
            file_logging: toml_value
                .get("logging")
                .and_then(|l| l.get("file_logging"))
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        })
    }
}
