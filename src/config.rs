//! Configuration for the schema exporter
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schemas.toml)
//! - Environment variables (SCHEMAS__*)
//!
//! ## Example config file (schemas.toml):
//! ```toml
//! [input]
//! paths = ["./messages"]
//!
//! [output]
//! path = "./generated/schemas.json"
//! format = "pretty"
//!
//! [logging]
//! filter = "message_schemas=debug"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the exporter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Where message definitions come from
    #[serde(default)]
    pub input: InputConfig,

    /// Where and how schemas are written
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Definition files or directories
    #[serde(default = "default_input_paths")]
    pub paths: Vec<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output file; stdout when unset
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Output format (pretty or compact)
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_input_paths() -> Vec<PathBuf> {
    vec![PathBuf::from("messages")]
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            paths: default_input_paths(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl SchemaConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, layering an explicit file over the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "schemas.toml",
            ".schemas.toml",
            "config/schemas.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "message-schemas") {
            let xdg_config = config_dir.config_dir().join("schemas.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // SCHEMAS__OUTPUT__FORMAT=compact etc.
        builder = builder.add_source(
            Environment::with_prefix("SCHEMAS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = SchemaConfig::default();
        assert_eq!(config.input.paths, vec![PathBuf::from("messages")]);
        assert_eq!(config.output.format, OutputFormat::Pretty);
        assert!(config.output.path.is_none());
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_serialize_config() {
        let config = SchemaConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[input]"));
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("format = \"pretty\""));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
[input]
paths = ["defs/a.toml", "defs/b.json"]

[output]
format = "compact"
"#,
        )
        .unwrap();

        let config = SchemaConfig::load_from(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.input.paths.len(), 2);
        assert_eq!(config.output.format, OutputFormat::Compact);
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let mut config = SchemaConfig::default();
        config.output.path = Some(PathBuf::from("out/schemas.json"));
        config.save(path.to_str().unwrap()).unwrap();

        let loaded = SchemaConfig::load_from(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(loaded.output.path, Some(PathBuf::from("out/schemas.json")));
    }
}
