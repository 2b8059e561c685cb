//! # Configuration Loader
//!
//! ## Responsibilities
//!
//! - Read the TOML configuration file
//! - Parse TOML into the AppConfig DTO
//! - Report I/O and parsing errors with context
//!
//! ## Prohibited
//!
//! - No validation logic
//! - No default value logic (see `wiring`)
//!
//! > **Pure data loading only. Accept whatever is in the file.**

use std::path::PathBuf;

use anyhow::Context;
use ks_core::AppConfig;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Load configuration from a TOML file.
///
/// **NO validation is performed**: missing sections and empty strings are
/// accepted as facts.
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Loads the explicitly requested file, else the per-user config file when it
/// exists, else an empty configuration.
pub fn resolve_config(explicit_path: Option<PathBuf>) -> anyhow::Result<AppConfig> {
    if let Some(path) = explicit_path {
        return load_config(path);
    }

    match dirs::config_dir().map(|dir| dir.join("keepsake").join(CONFIG_FILE_NAME)) {
        Some(path) if path.is_file() => load_config(path),
        _ => Ok(AppConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_reads_valid_toml() {
        let toml_content = r#"
            [storage]
            data_dir = "/tmp/keepsake-data"

            [analytics]
            max_sessions = 25

            [logging]
            file_logging = true
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = load_config(temp_file.path().to_path_buf()).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/keepsake-data"));
        assert_eq!(config.max_sessions, Some(25));
        assert!(config.file_logging);
    }

    #[test]
    fn test_load_config_returns_empty_values_when_missing() {
        let toml_content = r#"
            [storage]
            # data_dir is missing

            [analytics]
            # max_sessions is missing
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = load_config(temp_file.path().to_path_buf()).unwrap();

        // Empty values are valid "facts"
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_config_rejects_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[storage\ndata_dir = ").unwrap();

        let err = load_config(temp_file.path().to_path_buf()).unwrap_err();

        assert!(err.to_string().contains("Failed to parse config as TOML"));
    }

    #[test]
    fn test_load_config_returns_io_error_on_file_not_found() {
        let result = load_config(PathBuf::from("/this/path/does/not/exist/config.toml"));

        let err = result.unwrap_err();
        assert!(
            err.to_string().contains("Failed to read config file"),
            "Expected IO error message, got: {}",
            err
        );
    }

    #[test]
    fn test_resolve_config_prefers_explicit_path() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[logging]\nfile_logging = true\n")
            .unwrap();

        let config = resolve_config(Some(temp_file.path().to_path_buf())).unwrap();

        assert!(config.file_logging);
    }
}
