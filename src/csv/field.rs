// ABOUTME: Field quoting model describing when a raw value needs quotes
// ABOUTME: Provides quoting, normalisation and row writing that the reader can read back

use super::options::ReaderOptions;

/// A single cell as it would appear in a grid file.
///
/// `raw` is the text exactly as written; [`normalised`](Self::normalised) is the
/// value a reader produces from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    raw: String,
    quote: char,
    delimiter: char,
}

impl Field {
    pub fn new(raw: impl Into<String>, quote: char, delimiter: char) -> Self {
        Self {
            raw: raw.into(),
            quote,
            delimiter,
        }
    }

    pub fn with_options(raw: impl Into<String>, options: &ReaderOptions) -> Self {
        Self::new(raw, options.quote(), options.delimiter())
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn quote_char(&self) -> char {
        self.quote
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Wrapped in quotes, longer than one character, and with every interior
    /// quote doubled.
    pub fn is_properly_quoted(&self) -> bool {
        let inner = match self
            .raw
            .strip_prefix(self.quote)
            .and_then(|rest| rest.strip_suffix(self.quote))
        {
            Some(inner) => inner,
            None => return false,
        };

        let mut chars = inner.chars();
        while let Some(ch) = chars.next() {
            if ch == self.quote && chars.next() != Some(self.quote) {
                return false;
            }
        }
        true
    }

    pub fn needs_quote(&self) -> bool {
        if self.is_properly_quoted() {
            return false;
        }
        self.raw.contains(self.delimiter) || self.raw.contains('\n') || self.raw.starts_with(self.quote)
    }

    /// The logical value: one layer of quoting removed from a properly quoted
    /// field, the raw text otherwise.
    pub fn normalised(&self) -> String {
        if !self.is_properly_quoted() {
            return self.raw.clone();
        }

        let q = self.quote.len_utf8();
        let inner = &self.raw[q..self.raw.len() - q];
        let doubled: String = [self.quote, self.quote].iter().collect();
        inner.replace(&doubled, &self.quote.to_string())
    }

    /// Always wrap in quotes, doubling embedded quote characters
    pub fn quote(&self) -> Field {
        let doubled: String = [self.quote, self.quote].iter().collect();
        let escaped = self.raw.replace(self.quote, &doubled);
        Field::new(
            format!("{}{}{}", self.quote, escaped, self.quote),
            self.quote,
            self.delimiter,
        )
    }

    pub fn quote_if_necessary(&self) -> Field {
        if self.needs_quote() {
            self.quote()
        } else {
            self.clone()
        }
    }
}

/// Join logical values into one grid line that reads back to the same values.
///
/// Stricter than [`Field::needs_quote`]: text that already looks quoted, or
/// that contains a carriage return, is quoted again so the reader does not
/// strip it.
pub fn write_row<I, S>(values: I, options: &ReaderOptions) -> String
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut line = String::new();
    for (index, value) in values.into_iter().enumerate() {
        if index > 0 {
            line.push(options.delimiter());
        }
        let field = Field::with_options(value, options);
        if must_quote_on_write(&field) {
            line.push_str(field.quote().raw());
        } else {
            line.push_str(field.raw());
        }
    }
    line
}

fn must_quote_on_write(field: &Field) -> bool {
    field.is_properly_quoted()
        || field.raw.contains(field.delimiter)
        || field.raw.contains(['\n', '\r'])
        || field.raw.starts_with(field.quote)
}
