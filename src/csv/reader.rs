// ABOUTME: Character-level state machine that reads delimited rows with quoting
// ABOUTME: Handles doubled-quote escapes, embedded newlines, CRLF and lenient recovery

use std::io::{BufRead, BufReader, ErrorKind, Read};

use tracing::trace;

use super::error::{CsvError, Result};
use super::options::ReaderOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    FileStart,
    LineStart,
    ValueStart,
    ReadingUnquoted,
    ReadingQuoted,
    FinishedQuoted,
    Done,
}

/// What terminated a field while scanning.
enum Boundary {
    Delimiter,
    LineEnd,
}

/// UTF-8 decoder over a byte source with one character of lookahead.
struct CharStream<R: Read> {
    inner: BufReader<R>,
    peeked: Option<char>,
    offset: usize,
    line: usize,
}

impl<R: Read> CharStream<R> {
    fn new(source: R) -> Self {
        Self {
            inner: BufReader::new(source),
            peeked: None,
            offset: 0,
            line: 1,
        }
    }

    fn next(&mut self) -> Result<Option<char>> {
        let ch = match self.peeked.take() {
            Some(ch) => Some(ch),
            None => self.decode()?,
        };
        if ch == Some('\n') {
            self.line += 1;
        }
        Ok(ch)
    }

    fn peek(&mut self) -> Result<Option<char>> {
        if self.peeked.is_none() {
            self.peeked = self.decode()?;
        }
        Ok(self.peeked)
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        loop {
            let buf = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(CsvError::IoError(e)),
            };
            if buf.is_empty() {
                return Ok(None);
            }
            let byte = buf[0];
            self.inner.consume(1);
            self.offset += 1;
            return Ok(Some(byte));
        }
    }

    fn decode(&mut self) -> Result<Option<char>> {
        let start = self.offset;
        let first = match self.read_byte()? {
            Some(byte) => byte,
            None => return Ok(None),
        };

        let width = match first {
            0x00..=0x7F => return Ok(Some(first as char)),
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return Err(CsvError::InvalidUtf8 { offset: start }),
        };

        let mut bytes = [first, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            *slot = self
                .read_byte()?
                .ok_or(CsvError::InvalidUtf8 { offset: start })?;
        }

        std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or(CsvError::InvalidUtf8 { offset: start })
    }
}

/// Pull-based reader producing one logical row per [`read_line`](Self::read_line) call.
///
/// The most recently read row stays available through [`values`](Self::values)
/// and [`field_value`](Self::field_value) until the next call overwrites it.
pub struct CsvReader<R: Read> {
    chars: CharStream<R>,
    options: ReaderOptions,
    state: ReadState,
    buffer: String,
    row: Vec<String>,
}

impl<'a> CsvReader<&'a [u8]> {
    /// Read rows out of an in-memory string
    pub fn from_text(text: &'a str, options: ReaderOptions) -> Self {
        Self::new(text.as_bytes(), options)
    }
}

impl<R: Read> CsvReader<R> {
    pub fn new(source: R, options: ReaderOptions) -> Self {
        Self {
            chars: CharStream::new(source),
            options,
            state: ReadState::FileStart,
            buffer: String::new(),
            row: Vec::new(),
        }
    }

    /// Advance to the next logical row.
    ///
    /// Returns `false`, leaving an empty row, once the input is exhausted.
    pub fn read_line(&mut self) -> Result<bool> {
        self.row.clear();

        let first = match self.next_field()? {
            Some(field) => field,
            None => return Ok(false),
        };
        self.row.push(first);

        while self.state != ReadState::LineStart {
            match self.next_field()? {
                Some(field) => self.row.push(field),
                None => break,
            }
        }

        trace!(fields = self.row.len(), "read row");
        Ok(true)
    }

    pub fn field_count(&self) -> usize {
        self.row.len()
    }

    pub fn field_value(&self, index: usize) -> Option<&str> {
        self.row.get(index).map(String::as_str)
    }

    pub fn values(&self) -> &[String] {
        &self.row
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Finish reading.
    ///
    /// A reader that owns its source releases it here and returns `None`;
    /// otherwise the source is handed back to the caller.
    pub fn into_inner(self) -> Option<R> {
        let source = self.chars.inner.into_inner();
        if self.options.owns_source() {
            drop(source);
            None
        } else {
            Some(source)
        }
    }

    /// Classify `ch` as a field boundary, consuming the `\n` of a CRLF pair.
    fn boundary(&mut self, ch: char) -> Result<Option<Boundary>> {
        if ch == self.options.delimiter() {
            return Ok(Some(Boundary::Delimiter));
        }
        if ch == '\n' && self.options.unix_line_endings() {
            return Ok(Some(Boundary::LineEnd));
        }
        if ch == '\r' && self.options.windows_line_endings() && self.chars.peek()? == Some('\n') {
            self.chars.next()?;
            return Ok(Some(Boundary::LineEnd));
        }
        Ok(None)
    }

    fn finish_field(&mut self, boundary: Boundary) -> String {
        self.state = match boundary {
            Boundary::Delimiter => ReadState::ValueStart,
            Boundary::LineEnd => ReadState::LineStart,
        };
        std::mem::take(&mut self.buffer)
    }

    fn next_field(&mut self) -> Result<Option<String>> {
        self.buffer.clear();

        if self.state == ReadState::Done {
            return Ok(None);
        }

        let mut current = self.chars.next()?;
        if current.is_none() {
            // A trailing delimiter still owes one empty field; a finished line owes nothing.
            let owes_field = self.state == ReadState::ValueStart;
            self.state = ReadState::Done;
            return Ok(owes_field.then(String::new));
        }

        while let Some(ch) = current {
            match self.state {
                ReadState::FileStart | ReadState::LineStart | ReadState::ValueStart => {
                    if ch == self.options.quote() {
                        self.state = ReadState::ReadingQuoted;
                    } else if let Some(boundary) = self.boundary(ch)? {
                        return Ok(Some(self.finish_field(boundary)));
                    } else {
                        self.state = ReadState::ReadingUnquoted;
                        self.buffer.push(ch);
                    }
                }
                ReadState::ReadingUnquoted => {
                    if let Some(boundary) = self.boundary(ch)? {
                        return Ok(Some(self.finish_field(boundary)));
                    }
                    self.buffer.push(ch);
                }
                ReadState::ReadingQuoted => {
                    if ch == self.options.quote() {
                        if self.chars.peek()? == Some(self.options.quote()) {
                            self.chars.next()?;
                            self.buffer.push(ch);
                        } else {
                            self.state = ReadState::FinishedQuoted;
                        }
                    } else {
                        self.buffer.push(ch);
                    }
                }
                ReadState::FinishedQuoted => {
                    if let Some(boundary) = self.boundary(ch)? {
                        return Ok(Some(self.finish_field(boundary)));
                    }
                    if self.options.strict_quotes() {
                        return Err(CsvError::InvalidQuotedField {
                            line: self.chars.line,
                        });
                    }
                    // Lenient: text after a closing quote continues the field unquoted.
                    self.state = ReadState::ReadingUnquoted;
                    self.buffer.push(ch);
                }
                ReadState::Done => unreachable!("finished reader returns before scanning"),
            }

            current = self.chars.next()?;
        }

        if self.options.strict_quotes() && self.state == ReadState::ReadingQuoted {
            return Err(CsvError::UnmatchedOpeningQuote {
                line: self.chars.line,
            });
        }

        Ok(Some(std::mem::take(&mut self.buffer)))
    }
}
