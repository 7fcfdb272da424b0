// ABOUTME: Resolves template tokens against a key lookup and concatenates the results
// ABOUTME: Unresolved placeholders fall back to their original marker text

use std::borrow::Cow;

use tracing::trace;

use super::token::Token;
use super::tokenizer::Tokenizer;

/// Key lookup used while evaluating placeholders.
///
/// A miss is `None`, never an error: templates may reference keys that a
/// given environment does not define.
pub trait ValueMapper {
    fn value_for(&self, key: &str) -> Option<Cow<'_, str>>;
}

impl<F> ValueMapper for F
where
    F: Fn(&str) -> Option<String>,
{
    fn value_for(&self, key: &str) -> Option<Cow<'_, str>> {
        self(key).map(Cow::Owned)
    }
}

/// Stateless evaluator bound to one mapper for the length of a transform.
pub struct Evaluator<'m, M: ValueMapper + ?Sized> {
    mapper: &'m M,
}

impl<'m, M: ValueMapper + ?Sized> Evaluator<'m, M> {
    pub fn new(mapper: &'m M) -> Self {
        Self { mapper }
    }

    /// Append the text a single token stands for to `out`
    pub fn evaluate_token(&self, token: &Token<'_>, out: &mut String) {
        match token {
            Token::Literal(_) => out.push_str(&token.unescaped()),
            Token::Placeholder { source, key } => match self.mapper.value_for(key) {
                Some(value) => out.push_str(&value),
                None => {
                    trace!("No value for key '{}', keeping marker", key);
                    out.push_str(source);
                }
            },
        }
    }

    pub fn evaluate<'a, I>(&self, tokens: I) -> String
    where
        I: IntoIterator<Item = Token<'a>>,
    {
        let mut out = String::new();
        for token in tokens {
            self.evaluate_token(&token, &mut out);
        }
        out
    }
}

/// Tokenize `text` and evaluate it against `mapper` in one pass
pub fn transform_with<M: ValueMapper + ?Sized>(text: &str, mapper: &M) -> String {
    let mut out = String::with_capacity(text.len());
    let evaluator = Evaluator::new(mapper);
    for token in Tokenizer::new(text) {
        evaluator.evaluate_token(&token, &mut out);
    }
    out
}
