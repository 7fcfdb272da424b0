// ABOUTME: Token types produced by splitting template text around placeholder markers
// ABOUTME: Literal spans are emitted verbatim, placeholders carry their lookup key

use std::borrow::Cow;

/// Escaped marker opening: `$${` stands for a literal `${`.
const ESCAPED_OPEN: &str = "$${";
const OPEN: &str = "${";

/// One piece of template text, borrowed from the source it was cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Text outside any marker, still carrying its `$${` escapes
    Literal(&'a str),
    /// A `${key}` marker
    Placeholder {
        /// The full marker text, emitted unchanged when the key has no value
        source: &'a str,
        /// Everything between `${` and `}`, untrimmed
        key: &'a str,
    },
}

impl<'a> Token<'a> {
    /// The token exactly as it appeared in the template
    pub fn source(&self) -> &'a str {
        match self {
            Token::Literal(text) => text,
            Token::Placeholder { source, .. } => source,
        }
    }

    /// Literal text with each `$${` collapsed to `${`; placeholders are returned as written.
    pub fn unescaped(&self) -> Cow<'a, str> {
        match self {
            Token::Literal(text) if text.contains(ESCAPED_OPEN) => {
                Cow::Owned(text.replace(ESCAPED_OPEN, OPEN))
            }
            other => Cow::Borrowed(other.source()),
        }
    }
}
