// ABOUTME: Finds template files below a base directory by file name mask
// ABOUTME: Walks the tree recursively and returns matches in a stable order

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::error::{ExecutionError, Result};

pub const DEFAULT_FILE_MASK: &str = "*.template.*";

#[derive(Debug, Clone)]
pub struct TemplateDiscovery {
    base_directory: PathBuf,
    file_mask: String,
}

impl TemplateDiscovery {
    pub fn new(base_directory: impl Into<PathBuf>) -> Self {
        Self {
            base_directory: base_directory.into(),
            file_mask: DEFAULT_FILE_MASK.to_string(),
        }
    }

    pub fn with_file_mask(mut self, mask: impl Into<String>) -> Self {
        self.file_mask = mask.into();
        self
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn file_mask(&self) -> &str {
        &self.file_mask
    }

    /// Whether a file name (not a path) is selected by the mask
    pub fn matches(&self, file_name: &str) -> bool {
        glob_match::glob_match(&self.file_mask, file_name)
    }

    /// Every matching file under the base directory, sorted by path.
    ///
    /// The full list is collected before anything is written, so outputs
    /// created later in the same run are never picked up as inputs.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        if !self.base_directory.is_dir() {
            return Err(ExecutionError::BaseDirectoryNotFound {
                path: self.base_directory.clone(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.base_directory).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if self.matches(&name) {
                debug!("Discovered template: {}", entry.path().display());
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }
}
