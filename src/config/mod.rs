//! Reporter configuration
//!
//! Layers, lowest precedence first:
//! 1. Built-in defaults
//! 2. Config file (`.test-report.toml`, `[reporter]` table)
//! 3. CLI flags
//!
//! A value set in a higher layer replaces the lower one; unset values fall
//! through.

mod defaults;

pub use defaults::{builtin_layer, DEFAULT_CONFIG_FILE};

use report_model::DEFAULT_SLOW_MS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::normalize::{Normalizer, SeenScope};

/// Origin of a configuration layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    File,
    Cli,
}

/// One partial layer of settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    /// Report destination; absent means stdout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Slow threshold in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slow_ms: Option<f64>,

    /// Repeated-reference handling when serializing errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seen_scope: Option<SeenScope>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    reporter: ConfigLayer,
}

/// Effective reporter configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ReporterConfig {
    pub output: Option<PathBuf>,
    pub slow_ms: f64,
    pub seen_scope: SeenScope,
    /// Layers that contributed, in precedence order
    pub sources: Vec<ConfigOrigin>,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            output: None,
            slow_ms: DEFAULT_SLOW_MS,
            seen_scope: SeenScope::Global,
            sources: vec![ConfigOrigin::Builtin],
        }
    }
}

impl ReporterConfig {
    /// Resolve the effective config.
    ///
    /// An explicit `config_path` must exist; otherwise the default file is
    /// used only when present in the working directory.
    pub fn load(config_path: Option<&Path>, cli: ConfigLayer) -> Result<Self, ConfigError> {
        let mut layers = vec![(ConfigOrigin::Builtin, builtin_layer())];

        match config_path {
            Some(path) => layers.push((ConfigOrigin::File, Self::load_file(path)?)),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    layers.push((ConfigOrigin::File, Self::load_file(path)?));
                }
            }
        }

        layers.push((ConfigOrigin::Cli, cli));
        Self::from_layers(layers)
    }

    /// Fold layers in order and validate the result.
    pub fn from_layers<I>(layers: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (ConfigOrigin, ConfigLayer)>,
    {
        let mut config = Self {
            sources: Vec::new(),
            ..Self::default()
        };
        for (origin, layer) in layers {
            if let Some(output) = layer.output {
                config.output = Some(output);
            }
            if let Some(slow_ms) = layer.slow_ms {
                config.slow_ms = slow_ms;
            }
            if let Some(scope) = layer.seen_scope {
                config.seen_scope = scope;
            }
            config.sources.push(origin);
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse the `[reporter]` table of a TOML file
    pub fn load_file(path: &Path) -> Result<ConfigLayer, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;
        let file: ConfigFile = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
        Ok(file.reporter)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.slow_ms.is_finite() || self.slow_ms <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "slow_ms must be a positive number, got {}",
                self.slow_ms
            )));
        }
        if let Some(output) = &self.output {
            if output.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "output must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.seen_scope)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ReporterConfig::from_layers([(ConfigOrigin::Builtin, builtin_layer())]).unwrap();
        assert_eq!(config.output, None);
        assert_eq!(config.slow_ms, 75.0);
        assert_eq!(config.seen_scope, SeenScope::Global);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = ConfigLayer {
            output: Some(PathBuf::from("from-file.json")),
            slow_ms: Some(100.0),
            seen_scope: None,
        };
        let cli = ConfigLayer {
            output: Some(PathBuf::from("from-cli.json")),
            ..ConfigLayer::default()
        };

        let config = ReporterConfig::from_layers([
            (ConfigOrigin::Builtin, builtin_layer()),
            (ConfigOrigin::File, file),
            (ConfigOrigin::Cli, cli),
        ])
        .unwrap();

        assert_eq!(config.output, Some(PathBuf::from("from-cli.json")));
        assert_eq!(config.slow_ms, 100.0);
        assert_eq!(config.sources, vec![ConfigOrigin::Builtin, ConfigOrigin::File, ConfigOrigin::Cli]);
    }

    #[test]
    fn test_load_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reporter.toml");
        fs::write(
            &path,
            "[reporter]\noutput = \"reports/merged.json\"\nslow_ms = 150\nseen_scope = \"ancestors\"\n",
        )
        .unwrap();

        let config = ReporterConfig::load(Some(&path), ConfigLayer::default()).unwrap();
        assert_eq!(config.output, Some(PathBuf::from("reports/merged.json")));
        assert_eq!(config.slow_ms, 150.0);
        assert_eq!(config.seen_scope, SeenScope::Ancestors);
        assert_eq!(config.normalizer().scope(), SeenScope::Ancestors);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = ReporterConfig::load(Some(&dir.path().join("absent.toml")), ConfigLayer::default());
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reporter.toml");
        fs::write(&path, "[reporter]\nouptut = \"typo.json\"\n").unwrap();

        let result = ReporterConfig::load_file(&path);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_invalid_slow_threshold() {
        let cli = ConfigLayer {
            slow_ms: Some(0.0),
            ..ConfigLayer::default()
        };
        let result = ReporterConfig::from_layers([(ConfigOrigin::Cli, cli)]);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
