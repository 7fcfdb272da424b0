// ABOUTME: Lazy tokenizer splitting template text into literals and ${key} markers
// ABOUTME: A marker preceded by an extra '$' is escaped and left inside the literal text

use once_cell::sync::Lazy;
use regex::Regex;

use super::token::Token;

/// `${`, at least one character other than `}`, then the first `}`.
static MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{[^}]+\}").expect("marker pattern is valid"));

/// Single forward pass over a template; not restartable.
///
/// Yields non-empty literal spans and placeholder markers in source order.
pub struct Tokenizer<'a> {
    source: &'a str,
    cursor: usize,
    pending: Option<(usize, usize)>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            cursor: 0,
            pending: None,
        }
    }

    /// Earliest unescaped marker starting at or after `from`.
    fn find_marker(&self, from: usize) -> Option<(usize, usize)> {
        let bytes = self.source.as_bytes();
        let mut at = from;
        while at <= self.source.len() {
            let found = MARKER.find_at(self.source, at)?;
            if found.start() > 0 && bytes[found.start() - 1] == b'$' {
                at = found.start() + 1;
                continue;
            }
            return Some((found.start(), found.end()));
        }
        None
    }

    fn placeholder(&mut self, start: usize, end: usize) -> Token<'a> {
        self.cursor = end;
        let source = &self.source[start..end];
        Token::Placeholder {
            source,
            key: &source[2..source.len() - 1],
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((start, end)) = self.pending.take() {
            return Some(self.placeholder(start, end));
        }

        if self.cursor >= self.source.len() {
            return None;
        }

        match self.find_marker(self.cursor) {
            Some((start, end)) if start == self.cursor => Some(self.placeholder(start, end)),
            Some((start, end)) => {
                let literal = &self.source[self.cursor..start];
                self.pending = Some((start, end));
                self.cursor = start;
                Some(Token::Literal(literal))
            }
            None => {
                let literal = &self.source[self.cursor..];
                self.cursor = self.source.len();
                Some(Token::Literal(literal))
            }
        }
    }
}

/// Convenience wrapper around [`Tokenizer::new`]
pub fn tokenize(source: &str) -> Tokenizer<'_> {
    Tokenizer::new(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token<'_>> {
        tokenize(source).collect()
    }

    fn placeholder<'a>(source: &'a str) -> Token<'a> {
        Token::Placeholder {
            source,
            key: &source[2..source.len() - 1],
        }
    }

    #[test]
    fn test_empty_source_has_no_tokens() {
        assert!(tokens("").is_empty());
    }

    #[test]
    fn test_plain_text_is_one_literal() {
        assert_eq!(tokens("hello world"), vec![Token::Literal("hello world")]);
    }

    #[test]
    fn test_markers_and_literals_alternate() {
        assert_eq!(
            tokens("a ${x} b ${y}"),
            vec![
                Token::Literal("a "),
                placeholder("${x}"),
                Token::Literal(" b "),
                placeholder("${y}"),
            ]
        );
    }

    #[test]
    fn test_adjacent_markers_emit_no_empty_literals() {
        assert_eq!(
            tokens("${a}${b}"),
            vec![placeholder("${a}"), placeholder("${b}")]
        );
    }

    #[test]
    fn test_key_keeps_whitespace() {
        let all = tokens("${ key1 }");
        assert_eq!(
            all,
            vec![Token::Placeholder {
                source: "${ key1 }",
                key: " key1 "
            }]
        );
    }

    #[test]
    fn test_escaped_marker_stays_literal() {
        assert_eq!(tokens("$${x}"), vec![Token::Literal("$${x}")]);
        assert_eq!(
            tokens("$${x} ${y}"),
            vec![Token::Literal("$${x} "), placeholder("${y}")]
        );
    }

    #[test]
    fn test_empty_and_unterminated_markers_are_literal() {
        assert_eq!(tokens("${}"), vec![Token::Literal("${}")]);
        assert_eq!(tokens("${x"), vec![Token::Literal("${x")]);
        assert_eq!(tokens("${x{"), vec![Token::Literal("${x{")]);
    }

    #[test]
    fn test_marker_ends_at_first_closing_brace() {
        assert_eq!(
            tokens("${x}}"),
            vec![placeholder("${x}"), Token::Literal("}")]
        );
        assert_eq!(tokens("${x{}"), vec![placeholder("${x{}")]);
        assert_eq!(
            tokens("${a${b}"),
            vec![Token::Placeholder {
                source: "${a${b}",
                key: "a${b"
            }]
        );
    }

    #[test]
    fn test_partial_consumption() {
        let mut tokenizer = tokenize("one ${two} three");
        assert_eq!(tokenizer.next(), Some(Token::Literal("one ")));
        drop(tokenizer);
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(
            tokens("é${ü}日"),
            vec![Token::Literal("é"), placeholder("${ü}"), Token::Literal("日")]
        );
    }
}
