// ABOUTME: Error types for building an environment registry from a value grid
// ABOUTME: Each integrity violation is its own variant carrying the offending names

use thiserror::Error;

use crate::csv::CsvError;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to read value grid: {0}")]
    Csv(#[from] CsvError),

    #[error("Failed to open value grid: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Line {line} has {actual} fields, expected {expected}")]
    FieldCountMismatch {
        line: usize,
        actual: usize,
        expected: usize,
    },

    #[error("Value grid contains a blank key")]
    BlankKey,

    #[error("Duplicate keys: {keys:?}")]
    DuplicateKey { keys: Vec<String> },

    #[error("Keys contain invalid characters: {keys:?}")]
    InvalidCharKey { keys: Vec<String> },

    #[error("Value grid contains a blank environment name")]
    BlankEnvironment,

    #[error("Duplicate environments: {environments:?}")]
    DuplicateEnvironment { environments: Vec<String> },

    #[error("Environment names contain characters not allowed in file names: {environments:?}")]
    InvalidCharEnvironment { environments: Vec<String> },
}

pub type Result<T> = std::result::Result<T, RegistryError>;
