// ABOUTME: Placeholder templating for per-environment configuration files
// ABOUTME: Splits text into literal and ${key} tokens and substitutes looked-up values

pub mod evaluator;
pub mod token;
pub mod tokenizer;

pub use evaluator::{transform_with, Evaluator, ValueMapper};
pub use token::Token;
pub use tokenizer::{tokenize, Tokenizer};
