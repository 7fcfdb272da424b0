// ABOUTME: Derives per-environment output paths and the default-environment copy-back path
// ABOUTME: Output names come from a `pattern=>replacement` transform containing an <env> token

use std::path::{Path, PathBuf};

use regex::Regex;

use super::error::{ExecutionError, Result};

pub const ENV_TOKEN: &str = "<env>";
pub const TRANSFORM_SEPARATOR: &str = "=>";
pub const DEFAULT_OUTPUT_TRANSFORM: &str = r"\.template\.=>.<env>.";

/// How output files are named and where they are placed.
///
/// For `web.template.config` and the default transform, environment `uat`
/// writes `web.uat.config` into the output directory (relative to the
/// input's own directory) and the copy-back target is `web.config` next to
/// the input.
#[derive(Debug, Clone)]
pub struct OutputNaming {
    transform: String,
    pattern: Regex,
    replacement: String,
    output_directory: PathBuf,
}

impl OutputNaming {
    pub fn new(transform: &str, output_directory: impl Into<PathBuf>) -> Result<Self> {
        let (pattern, replacement) = transform.split_once(TRANSFORM_SEPARATOR).ok_or_else(|| {
            ExecutionError::InvalidOutputTransform {
                transform: transform.to_string(),
                reason: format!("expected 'pattern{}replacement'", TRANSFORM_SEPARATOR),
            }
        })?;

        Ok(Self {
            transform: transform.to_string(),
            pattern: Regex::new(pattern)?,
            replacement: replacement.to_string(),
            output_directory: output_directory.into(),
        })
    }

    pub fn transform(&self) -> &str {
        &self.transform
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// Apply the transform to a bare file name for `environment`
    pub fn output_file_name(&self, file_name: &str, environment: &str) -> String {
        let replacement = self
            .replacement
            .replace(ENV_TOKEN, &environment.replace('$', "$$"));
        self.pattern
            .replace_all(file_name, replacement.as_str())
            .into_owned()
    }

    /// File name used for the default-environment copy, with the environment
    /// removed and doubled dots collapsed
    pub fn copyback_file_name(&self, file_name: &str) -> String {
        let mut name = self.output_file_name(file_name, "");
        while name.contains("..") {
            name = name.replace("..", ".");
        }
        name
    }

    pub fn output_directory_for(&self, input: &Path) -> PathBuf {
        parent_of(input).join(&self.output_directory)
    }

    pub fn output_path(&self, input: &Path, environment: &str) -> Result<PathBuf> {
        let name = file_name_of(input)?;
        Ok(self
            .output_directory_for(input)
            .join(self.output_file_name(name, environment)))
    }

    pub fn copyback_path(&self, input: &Path) -> Result<PathBuf> {
        let name = file_name_of(input)?;
        Ok(parent_of(input).join(self.copyback_file_name(name)))
    }
}

impl Default for OutputNaming {
    fn default() -> Self {
        Self {
            transform: DEFAULT_OUTPUT_TRANSFORM.to_string(),
            pattern: Regex::new(r"\.template\.").expect("default transform pattern is valid"),
            replacement: ".<env>.".to_string(),
            output_directory: PathBuf::from("."),
        }
    }
}

fn parent_of(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new(""))
}

fn file_name_of(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ExecutionError::InvalidPath {
            path: path.to_path_buf(),
        })
}
