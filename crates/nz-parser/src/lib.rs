//! nz parser crate.
//!
//! This crate provides the lexer and parser for nz source code:
//! - Lexical analysis with tab-based block structure
//! - Arena-allocated abstract syntax tree definitions
//! - A recursive-descent parser that stops at the first error
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use nz_parser::Parser;
//!
//! let arena = Bump::new();
//! let source = "struct Point\n\tNat x\n\tNat y\n";
//! let file = Parser::parse_file(source, &arena).unwrap();
//! assert_eq!(file.items.len(), 1);
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
mod parser;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
