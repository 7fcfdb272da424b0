// ABOUTME: Reader configuration for the delimited grid format
// ABOUTME: Validates delimiter/quote choices once so the reader can trust them

use super::error::{CsvError, Result};

/// U+FFFF is reserved as the end-of-stream marker and can never be a delimiter or quote.
pub const END_OF_STREAM: char = '\u{FFFF}';

/// Immutable settings for [`CsvReader`](super::CsvReader).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    delimiter: char,
    quote: char,
    strict_quotes: bool,
    owns_source: bool,
    unix_line_endings: bool,
    windows_line_endings: bool,
}

impl ReaderOptions {
    /// Create options for the given delimiter and quote character.
    ///
    /// Fails when the two characters are equal, or when either one is a
    /// line terminator or the end-of-stream marker.
    pub fn new(delimiter: char, quote: char) -> Result<Self> {
        if delimiter == quote {
            return Err(CsvError::InvalidOptions {
                reason: format!("delimiter and quote must differ (both are {:?})", delimiter),
            });
        }
        check_reserved("delimiter", delimiter)?;
        check_reserved("quote", quote)?;

        Ok(Self {
            delimiter,
            quote,
            strict_quotes: false,
            owns_source: false,
            unix_line_endings: true,
            windows_line_endings: true,
        })
    }

    /// Reject malformed quoting instead of reading it leniently
    pub fn with_strict_quotes(mut self, strict: bool) -> Self {
        self.strict_quotes = strict;
        self
    }

    /// Whether the reader releases its source when it is finished with it.
    ///
    /// A reader that does not own its source hands it back from
    /// [`CsvReader::into_inner`](super::CsvReader::into_inner).
    pub fn with_owns_source(mut self, owns: bool) -> Self {
        self.owns_source = owns;
        self
    }

    pub fn with_unix_line_endings(mut self, enabled: bool) -> Self {
        self.unix_line_endings = enabled;
        self
    }

    pub fn with_windows_line_endings(mut self, enabled: bool) -> Self {
        self.windows_line_endings = enabled;
        self
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn quote(&self) -> char {
        self.quote
    }

    pub fn strict_quotes(&self) -> bool {
        self.strict_quotes
    }

    pub fn owns_source(&self) -> bool {
        self.owns_source
    }

    pub fn unix_line_endings(&self) -> bool {
        self.unix_line_endings
    }

    pub fn windows_line_endings(&self) -> bool {
        self.windows_line_endings
    }
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            strict_quotes: false,
            owns_source: false,
            unix_line_endings: true,
            windows_line_endings: true,
        }
    }
}

fn check_reserved(role: &str, ch: char) -> Result<()> {
    let reserved = match ch {
        '\r' => Some("'\\r'"),
        '\n' => Some("'\\n'"),
        END_OF_STREAM => Some("the end-of-stream marker"),
        _ => None,
    };

    match reserved {
        Some(name) => Err(CsvError::InvalidOptions {
            reason: format!("{} must not be {}", role, name),
        }),
        None => Ok(()),
    }
}
