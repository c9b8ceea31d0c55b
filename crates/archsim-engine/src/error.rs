//! Error types for the engine
//!
//! The analysis passes themselves are total; errors here only surface from
//! configuration loading, graph documents and graph edits made through a
//! [`Simulation`](crate::simulation::Simulation).

use archsim_model::ModelError;
use std::path::PathBuf;

/// Main engine error type
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Graph edit rejected by the model
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Configuration value out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration document could not be parsed
    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Graph or scenario document could not be parsed
    #[error("document parse error: {0}")]
    Document(#[from] serde_json::Error),

    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
}

impl EngineError {
    /// Wrap an I/O error with the path it concerns
    #[inline]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if the error came from user supplied input
    #[inline]
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig(_) | Self::ConfigParse(_) | Self::Document(_)
        )
    }
}

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
