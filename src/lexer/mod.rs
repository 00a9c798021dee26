//! Lexical analysis for Sprig
//!
//! Converts source text into a stream of tokens, one token per request.

mod scanner;
mod token;

pub use scanner::Lexer;
pub use token::{Token, TokenKind};
