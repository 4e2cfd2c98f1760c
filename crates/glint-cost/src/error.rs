//! Error types for cost estimation and calibration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while estimating or calibrating.
#[derive(Debug, Error)]
pub enum CostError {
    /// The node-kind array does not line up with the graph's nodes.
    #[error("node kinds do not match graph shape: expected {expected} kinds, got {actual}")]
    ShapeMismatch {
        /// Number of nodes in the graph.
        expected: usize,
        /// Number of node kinds supplied.
        actual: usize,
    },

    /// A calibration sample carries an unusable timing.
    #[error("calibration sample {index} for '{kind}' has invalid timing {us} us")]
    InvalidSample {
        /// Position of the sample in the input.
        index: usize,
        /// Node kind of the sample.
        kind: String,
        /// The offending timing.
        us: f64,
    },

    /// Estimator constants must be positive and finite.
    #[error("invalid estimator setting '{name}': {value} (must be positive and finite)")]
    InvalidSetting {
        /// Name of the setting.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

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

    /// Failed to parse or serialize JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CostError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CostError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CostError::WriteFile {
            path: path.into(),
            source,
        }
    }
}
