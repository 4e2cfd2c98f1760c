//! Error types for configuration operations.

use std::path::PathBuf;

use glint_cost::CostError;
use thiserror::Error;

/// Errors that can occur while loading, validating or applying a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A budget value is zero, negative or not finite.
    #[error("budget.{name} must be positive and finite, got {value}")]
    InvalidBudget {
        /// Key under `[budget]`.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// A target symbol is not a C identifier.
    #[error("target.{field} = '{value}' is not a valid C identifier")]
    InvalidSymbol {
        /// Key under `[target]`.
        field: &'static str,
        /// Rejected symbol.
        value: String,
    },

    /// Loading the configured cost model failed.
    #[error(transparent)]
    Cost(#[from] CostError),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn read_file_display() {
        let err = ConfigError::read_file("/a/glint.toml", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to read file"), "got: {msg}");
        assert!(msg.contains("/a/glint.toml"), "got: {msg}");
        assert!(err.source().is_some());
    }

    #[test]
    fn create_dir_factory_produces_correct_variant() {
        let err = ConfigError::create_dir("/dir/path", mock_io_err());
        assert!(
            matches!(err, ConfigError::CreateDir { ref path, .. } if path == std::path::Path::new("/dir/path"))
        );
    }

    #[test]
    fn invalid_budget_display() {
        let err = ConfigError::InvalidBudget {
            name: "ops_per_ms",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "budget.ops_per_ms must be positive and finite, got -1");
        assert!(err.source().is_none());
    }

    #[test]
    fn invalid_symbol_display() {
        let err = ConfigError::InvalidSymbol {
            field: "leds",
            value: "my leds".to_string(),
        };
        assert_eq!(err.to_string(), "target.leds = 'my leds' is not a valid C identifier");
    }
}
