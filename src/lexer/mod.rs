//! Lexer for Paren source text.

mod tokenizer;

pub use tokenizer::{tokenize, Tokenizer};
