//! Loading the code window configuration.
//!
//! The config file is optional. Values are layered as: defaults, then the TOML file, then
//! command-line overrides. The merged result is validated once at the end, so an override
//! can repair an out-of-range value from the file.

use std::{path::Path, time::Duration};

use pickup_types::config::CodeConfig;
use snafu::ResultExt;

use crate::error::{
    CliError, ExampleSnafu, InvalidConfigSnafu, ParseConfigSnafu, ReadConfigSnafu, SchemaSnafu,
};

/// Builds the effective [`CodeConfig`].
pub fn load_code_config(
    path: Option<&Path>,
    bucket: Option<Duration>,
    window_offsets: Option<Vec<i64>>,
) -> Result<CodeConfig, CliError> {
    let mut config = match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path).context(ReadConfigSnafu { path })?;
            toml::from_str::<CodeConfig>(&contents).context(ParseConfigSnafu { path })?
        },
        None => CodeConfig::default(),
    };

    if let Some(bucket) = bucket {
        config.bucket = bucket;
    }
    if let Some(window_offsets) = window_offsets {
        config.window_offsets = window_offsets;
    }

    config.validate().context(InvalidConfigSnafu)?;
    Ok(config)
}

/// Renders the JSON schema of the config file.
pub fn code_config_schema() -> Result<String, CliError> {
    let schema = schemars::schema_for!(CodeConfig);
    let mut json = serde_json::to_string_pretty(&schema).context(SchemaSnafu)?;
    json.push('\n');
    Ok(json)
}

/// Renders a config file containing every default.
pub fn code_config_example() -> Result<String, CliError> {
    let body = toml::to_string_pretty(&CodeConfig::default()).context(ExampleSnafu)?;
    Ok(format!(
        "# Pickup code window configuration.\n\
         # The secret key is read from the environment, never from this file.\n\n{body}"
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_defaults_without_file() {
        let config = load_code_config(None, None, None).unwrap();
        assert_eq!(config, CodeConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let file = config_file("bucket = \"1h\"\nwindow_offsets = [0, -1, -2]\n");
        let config = load_code_config(Some(file.path()), None, None).unwrap();
        assert_eq!(config.bucket_seconds(), 3600);
        assert_eq!(config.window_offsets, vec![0, -1, -2]);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = config_file("bucket = \"5m\"\n");
        let config = load_code_config(Some(file.path()), None, None).unwrap();
        assert_eq!(config.bucket_seconds(), 300);
        assert_eq!(config.window_offsets, vec![0, -1]);
    }

    #[test]
    fn test_overrides_beat_file() {
        let file = config_file("bucket = \"1h\"\nwindow_offsets = [0, -1, -2]\n");
        let config = load_code_config(
            Some(file.path()),
            Some(Duration::from_secs(120)),
            Some(vec![0]),
        )
        .unwrap();
        assert_eq!(config.bucket_seconds(), 120);
        assert_eq!(config.window_offsets, vec![0]);
    }

    #[test]
    fn test_override_repairs_invalid_file_value() {
        let file = config_file("window_offsets = [1]\n");
        let config = load_code_config(Some(file.path()), None, Some(vec![0, -1])).unwrap();
        assert_eq!(config.window_offsets, vec![0, -1]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = load_code_config(Some(&path), None, None).unwrap_err();
        assert!(matches!(err, CliError::ReadConfig { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn test_malformed_file() {
        let file = config_file("bucket = \n");
        let err = load_code_config(Some(file.path()), None, None).unwrap_err();
        assert!(matches!(err, CliError::ParseConfig { .. }));
    }

    #[test]
    fn test_bad_duration_in_file() {
        let file = config_file("bucket = \"soon\"\n");
        let err = load_code_config(Some(file.path()), None, None).unwrap_err();
        assert!(matches!(err, CliError::ParseConfig { .. }));
    }

    #[test]
    fn test_invalid_window_rejected() {
        let file = config_file("window_offsets = [0, 1]\n");
        let err = load_code_config(Some(file.path()), None, None).unwrap_err();
        assert!(matches!(err, CliError::InvalidConfig { .. }));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let err = load_code_config(None, Some(Duration::ZERO), None).unwrap_err();
        assert!(matches!(err, CliError::InvalidConfig { .. }));
    }

    #[test]
    fn test_schema_describes_config() {
        let schema = code_config_schema().unwrap();
        let value: serde_json::Value = serde_json::from_str(&schema).unwrap();
        assert_eq!(value["title"], "CodeConfig");
        assert!(value["properties"]["bucket"].is_object());
        assert!(value["properties"]["window_offsets"].is_object());
    }

    #[test]
    fn test_example_loads_back_to_defaults() {
        let example = code_config_example().unwrap();
        assert!(example.contains("bucket = \"10m\""));
        let file = config_file(&example);
        let config = load_code_config(Some(file.path()), None, None).unwrap();
        assert_eq!(config, CodeConfig::default());
    }
}
