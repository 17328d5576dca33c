use std::path::PathBuf;
use thiserror::Error;

use super::config::ConfigError;
use super::energy::ExtractionError;
use crate::core::io::TrajectoryError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Frame {frame}: a problem occurred obtaining the energies: {source}")]
    Extraction {
        frame: usize,
        #[source]
        source: ExtractionError,
    },

    #[error("Frame {frame}: element '{element}' has no type code in the cell type mapping")]
    Lookup { frame: usize, element: String },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Trajectory error in '{path}': {source}")]
    Trajectory {
        path: PathBuf,
        #[source]
        source: TrajectoryError,
    },

    #[error("Failed to start minimizer '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Run cancelled after {processed} frame(s)")]
    Cancelled { processed: usize },

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl EngineError {
    pub(crate) fn trajectory(path: impl Into<PathBuf>, source: TrajectoryError) -> Self {
        EngineError::Trajectory {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }
}
