//! coltc-lex - Lexical Analyzer for the Colt language.
//!
//! Transforms source text into a stream of [`Token`]s. The token alphabet
//! is closed and laid out in contiguous groups so the parser can classify
//! tokens with integer range checks; the lexer itself is a hand-written
//! maximal-munch scanner with precise source-location tracking.
//!
//! # Example
//!
//! ```
//! use coltc_lex::{Lexer, Token};
//! use coltc_util::Handler;
//!
//! let handler = Handler::new();
//! let mut lexer = Lexer::new("fn main() -> i64;", &handler);
//!
//! assert_eq!(lexer.next_token(), Token::KeywordFn);
//! assert_eq!(lexer.next_token(), Token::Identifier);
//! assert_eq!(lexer.parsed_identifier().as_str(), "main");
//! ```

pub mod cursor;
pub mod lexer;
pub mod token;

pub use lexer::{Lexer, LineInfo};
pub use token::{keyword_from_ident, Token, PRECEDENCE_NONE};
