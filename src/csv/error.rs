// ABOUTME: Error types for delimited grid reading
// ABOUTME: Covers option validation, strict quoting failures, decoding and IO errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("Invalid reader options: {reason}")]
    InvalidOptions { reason: String },

    #[error("Invalid quoted string on line {line}: content follows the closing quote")]
    InvalidQuotedField { line: usize },

    #[error("Unmatched opening quote: field starting before line {line} is never closed")]
    UnmatchedOpeningQuote { line: usize },

    #[error("Invalid UTF-8 sequence at byte offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CsvError>;
