//! Configuration for the food status model service.

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Environment variable that overrides the configured model path.
pub const MODEL_PATH_ENV: &str = "MODEL_LOCAL_PATH";

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

/// Model artifact configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the serialized ONNX model
    #[serde(default = "default_model_path")]
    pub path: String,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
    /// Class labels in the order the model indexes them
    #[serde(default = "default_labels")]
    pub labels: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

fn default_model_path() -> String {
    "models/food_status_model.onnx".to_string()
}

fn default_onnx_threads() -> usize {
    1
}

fn default_labels() -> Vec<String> {
    vec!["Safe".to_string(), "Unsafe".to_string()]
}

impl AppConfig {
    /// Load configuration from `config/config.toml`, falling back to
    /// defaults when the file is absent, then apply the
    /// [`MODEL_PATH_ENV`] override.
    pub fn load() -> Result<Self> {
        let mut config = if Path::new("config/config.toml").exists() {
            Self::load_from_path("config/config.toml")?
        } else {
            Self::default()
        };
        config.apply_model_path_override(std::env::var(MODEL_PATH_ENV).ok());
        Ok(config)
    }

    /// Replace the model path when the [`MODEL_PATH_ENV`] override is set.
    pub fn apply_model_path_override(&mut self, path: Option<String>) {
        if let Some(path) = path {
            self.model.path = path;
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            onnx_threads: default_onnx_threads(),
            labels: default_labels(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.model.path, "models/food_status_model.onnx");
        assert_eq!(config.model.onnx_threads, 1);
        assert_eq!(config.model.labels, vec!["Safe", "Unsafe"]);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_model_path_override() {
        let mut config = AppConfig::default();
        config.apply_model_path_override(Some("/data/override.onnx".to_string()));
        assert_eq!(config.model.path, "/data/override.onnx");

        let mut config = AppConfig::default();
        config.apply_model_path_override(None);
        assert_eq!(config.model.path, "models/food_status_model.onnx");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[server]
host = "127.0.0.1"
port = 9000

[model]
path = "artifacts/model.onnx"
labels = ["Fresh", "Spoiled"]

[logging]
level = "debug"
format = "pretty"
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.model.path, "artifacts/model.onnx");
        assert_eq!(config.model.onnx_threads, 1);
        assert_eq!(config.model.labels, vec!["Fresh", "Spoiled"]);
        assert_eq!(config.logging.level, "debug");
    }
}
