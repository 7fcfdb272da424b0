// ABOUTME: Error types for applying templates across every environment
// ABOUTME: Covers output naming, template discovery and file system failures

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Invalid output transform '{transform}': {reason}")]
    InvalidOutputTransform { transform: String, reason: String },

    #[error("Invalid output transform pattern: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Base directory not found: {}", path.display())]
    BaseDirectoryNotFound { path: PathBuf },

    #[error("Path has no usable file name: {}", path.display())]
    InvalidPath { path: PathBuf },

    #[error("Output transform '{transform}' does not rename {}, refusing to overwrite the template", path.display())]
    OutputOverwritesTemplate { transform: String, path: PathBuf },

    #[error("Failed to {action} {}: {source}", path.display())]
    FileError {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory walk failed: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("Registry error: {0}")]
    RegistryError(#[from] crate::registry::RegistryError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ExecutionError {
    pub fn file(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileError {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExecutionError>;
