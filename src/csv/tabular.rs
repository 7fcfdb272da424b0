// ABOUTME: Header-aware wrapper over the row reader with ragged-row policies
// ABOUTME: Normalises short and long rows against the column count of the first line

use std::io::Read;

use super::error::Result;
use super::reader::CsvReader;

/// What to do with rows that have more fields than there are columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LongLineOption {
    DoNothing,
    #[default]
    Truncate,
}

/// What to do with rows that have fewer fields than there are columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortLineOption {
    DoNothing,
    #[default]
    ExtendWithNulls,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TabularOptions {
    pub has_headers: bool,
    pub long_lines: LongLineOption,
    pub short_lines: ShortLineOption,
}

impl TabularOptions {
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn with_long_lines(mut self, option: LongLineOption) -> Self {
        self.long_lines = option;
        self
    }

    pub fn with_short_lines(mut self, option: ShortLineOption) -> Self {
        self.short_lines = option;
        self
    }
}

/// Reads a grid whose column count is fixed by its first line.
///
/// The first line (or the header line, when `has_headers` is set) is read
/// eagerly on construction; [`read_line`](Self::read_line) then walks the
/// data rows starting with that first one.
pub struct TabularReader<R: Read> {
    reader: CsvReader<R>,
    options: TabularOptions,
    headers: Vec<Option<String>>,
    current: Vec<String>,
    started: bool,
}

impl<R: Read> TabularReader<R> {
    pub fn new(mut reader: CsvReader<R>, options: TabularOptions) -> Result<Self> {
        let headers = if options.has_headers {
            reader.read_line()?;
            let headers = reader.values().iter().cloned().map(Some).collect();
            reader.read_line()?;
            headers
        } else {
            reader.read_line()?;
            vec![None; reader.field_count()]
        };
        let current = reader.values().to_vec();

        Ok(Self {
            reader,
            options,
            headers,
            current,
            started: false,
        })
    }

    pub fn read_line(&mut self) -> Result<bool> {
        if !self.started {
            self.started = true;
            return Ok(!self.current.is_empty());
        }

        let more = self.reader.read_line()?;
        self.current = self.reader.values().to_vec();
        Ok(more)
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Field count of the current row after the long/short line policies apply
    pub fn field_count(&self) -> usize {
        let actual = self.current.len();
        let columns = self.column_count();

        if actual < columns {
            match self.options.short_lines {
                ShortLineOption::DoNothing => actual,
                ShortLineOption::ExtendWithNulls => columns,
            }
        } else if actual > columns {
            match self.options.long_lines {
                LongLineOption::DoNothing => actual,
                LongLineOption::Truncate => columns,
            }
        } else {
            columns
        }
    }

    /// Value at `index` in the current row.
    ///
    /// `None` covers cells past the end of a short row and cells beyond the
    /// column count when long rows are truncated.
    pub fn field_value(&self, index: usize) -> Option<&str> {
        if index >= self.column_count() && self.options.long_lines == LongLineOption::Truncate {
            return None;
        }
        self.current.get(index).map(String::as_str)
    }

    pub fn column_name(&self, index: usize) -> Option<&str> {
        self.headers.get(index).and_then(|name| name.as_deref())
    }

    pub fn column_ordinal(&self, name: &str) -> Option<usize> {
        if !self.options.has_headers {
            return None;
        }
        self.headers
            .iter()
            .position(|header| header.as_deref() == Some(name))
    }

    pub fn into_inner(self) -> CsvReader<R> {
        self.reader
    }
}
