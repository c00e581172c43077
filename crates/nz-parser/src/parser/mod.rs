//! Parser infrastructure for nz.
//!
//! Provides the main [`Parser`] struct with token navigation. The grammar
//! itself lives in the `decl_parser`, `expr_parser` and `type_parser`
//! submodules, each adding an `impl` block.

mod decl_parser;
mod expr_parser;
mod type_parser;

use bumpalo::Bump;

use crate::ast::File;
use crate::error::{ParseError, ParseErrorKind, ParseResult};
use crate::lexer::{Lexer, Token, TokenKind};

/// Recursive-descent parser over an eagerly lexed token buffer.
///
/// The `'ast` lifetime refers to the arena where AST nodes and token
/// lexemes are allocated. The source string only needs to live for the
/// call to [`Parser::new`].
pub struct Parser<'ast> {
    buffer: Vec<Token<'ast>>,
    position: usize,
    arena: &'ast Bump,
}

impl<'ast> Parser<'ast> {
    /// Lex `source` and create a parser positioned at the first token.
    pub fn new(source: &str, arena: &'ast Bump) -> ParseResult<Self> {
        let buffer = Lexer::tokenize(source, arena)?;
        Ok(Self {
            buffer,
            position: 0,
            arena,
        })
    }

    /// Parse a whole document.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_file(source: &str, arena: &'ast Bump) -> ParseResult<File<'ast>> {
        let mut parser = Parser::new(source, arena)?;
        let file = parser.parse_items()?;
        log::trace!(
            "parsed {} import(s) and {} item(s)",
            file.imports.len(),
            file.items.len()
        );
        Ok(file)
    }

    // =========================================
    // Token navigation
    // =========================================

    /// The current token. The buffer always ends with `Eof`, which is
    /// returned again once reached.
    pub fn peek(&self) -> Token<'ast> {
        self.peek_nth(0)
    }

    pub fn peek_nth(&self, n: usize) -> Token<'ast> {
        let last = self.buffer.len() - 1;
        self.buffer[(self.position + n).min(last)]
    }

    pub fn advance(&mut self) -> Token<'ast> {
        let token = self.peek();
        if self.position < self.buffer.len() - 1 {
            self.position += 1;
        }
        token
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub fn eat(&mut self, kind: TokenKind) -> Option<Token<'ast>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    pub fn expect(&mut self, kind: TokenKind) -> ParseResult<Token<'ast>> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        let found = self.peek();
        Err(ParseError::new(
            ParseErrorKind::ExpectedToken,
            found.span,
            format!("expected {}, found {}", kind, found.kind),
        ))
    }

    // =========================================
    // Arena helpers
    // =========================================

    fn alloc<T>(&self, value: T) -> &'ast T {
        self.arena.alloc(value)
    }

    fn alloc_slice<T>(&self, items: Vec<T>) -> &'ast [T] {
        self.arena.alloc_slice_fill_iter(items)
    }

    fn error(&self, kind: ParseErrorKind, message: impl Into<String>) -> ParseError {
        ParseError::new(kind, self.peek().span, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_stops_at_eof() {
        let arena = Bump::new();
        let mut parser = Parser::new("a b\n", &arena).unwrap();
        assert_eq!(parser.advance().lexeme, "a");
        assert_eq!(parser.peek_nth(1).kind, TokenKind::Newline);
        assert!(parser.eat(TokenKind::Ident).is_some());
        assert!(parser.expect(TokenKind::Comma).is_err());
        parser.advance();
        assert_eq!(parser.advance().kind, TokenKind::Eof);
        assert_eq!(parser.advance().kind, TokenKind::Eof);
    }
}
