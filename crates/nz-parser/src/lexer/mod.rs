//! Lexical analysis for nz source.
//!
//! Indentation is significant: the lexer turns leading tabs into
//! [`TokenKind::Indent`] and [`TokenKind::Dedent`] tokens so the parser
//! never looks at whitespace.

mod cursor;
#[allow(clippy::module_inception)]
mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind, lookup_keyword};
