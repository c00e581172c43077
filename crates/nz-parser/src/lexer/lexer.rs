//! Main lexer implementation.
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s. All
//! lexemes are copied into the arena, allowing the source string to be freed
//! after lexing completes.

use std::collections::VecDeque;

use bumpalo::Bump;
use nz_core::Span;

use super::cursor::{Cursor, is_ident_continue, is_ident_start};
use super::token::{Token, TokenKind, lookup_keyword};
use crate::error::{ParseError, ParseErrorKind, ParseResult};

/// Lexer for nz source code.
///
/// The `'src` lifetime is the source string being lexed (temporary).
/// The `'ast` lifetime is the arena where token lexemes are allocated.
pub struct Lexer<'src, 'ast> {
    cursor: Cursor<'src>,
    arena: &'ast Bump,
    /// Layout tokens queued at the start of a line.
    pending: VecDeque<Token<'ast>>,
    /// Current indentation depth in tabs.
    depth: u32,
    at_line_start: bool,
    finished: bool,
}

impl<'src, 'ast> Lexer<'src, 'ast> {
    pub fn new(source: &'src str, arena: &'ast Bump) -> Self {
        Self {
            cursor: Cursor::new(source),
            arena,
            pending: VecDeque::new(),
            depth: 0,
            at_line_start: true,
            finished: false,
        }
    }

    /// Lex the whole source into a vector ending with [`TokenKind::Eof`].
    pub fn tokenize(source: &'src str, arena: &'ast Bump) -> ParseResult<Vec<Token<'ast>>> {
        let mut lexer = Lexer::new(source, arena);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            tokens.push(token);
            if token.kind == TokenKind::Eof {
                return Ok(tokens);
            }
        }
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> ParseResult<Token<'ast>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }
            if self.at_line_start {
                self.start_line()?;
                continue;
            }
            return self.scan_token();
        }
    }

    // =========================================
    // Layout
    // =========================================

    /// Measure indentation at the start of a line, skipping blank and
    /// comment-only lines, and queue any Indent/Dedent tokens.
    fn start_line(&mut self) -> ParseResult<()> {
        loop {
            let line = self.cursor.line();
            let depth = self.cursor.eat_tabs();
            match self.cursor.peek() {
                Some(' ') => {
                    return Err(self.error_here(
                        ParseErrorKind::InvalidIndentation,
                        "indentation must use tabs",
                    ));
                }
                Some('\n') | None if depth > 0 => {
                    return Err(self.error_here(ParseErrorKind::TrailingWhitespace, ""));
                }
                Some('\n') => {
                    self.cursor.advance();
                    continue;
                }
                Some('#') => {
                    self.skip_comment();
                    self.cursor.eat('\n');
                    continue;
                }
                None => {
                    self.at_line_start = false;
                    return Ok(());
                }
                Some(_) => {}
            }

            let span = Span::new(line, 1, depth);
            if depth > self.depth + 1 {
                return Err(ParseError::new(
                    ParseErrorKind::InvalidIndentation,
                    span,
                    "indented more than one level",
                ));
            }
            if depth == self.depth + 1 {
                self.pending.push_back(Token::new(TokenKind::Indent, "", span));
            }
            for _ in depth..self.depth {
                self.pending.push_back(Token::new(TokenKind::Dedent, "", span));
            }
            self.depth = depth;
            self.at_line_start = false;
            return Ok(());
        }
    }

    fn skip_comment(&mut self) {
        self.cursor.eat_while(|c| c != '\n');
    }

    // =========================================
    // Token scanning
    // =========================================

    fn scan_token(&mut self) -> ParseResult<Token<'ast>> {
        let spaces = self.cursor.eat_while(|c| c == ' ');
        if !spaces.is_empty() && matches!(self.cursor.peek(), Some('\n') | None) {
            return Err(self.error_here(ParseErrorKind::TrailingWhitespace, ""));
        }

        let line = self.cursor.line();
        let col = self.cursor.column();
        let start = self.cursor.offset();

        let Some(ch) = self.cursor.peek() else {
            return self.finish(line, col);
        };

        match ch {
            '\n' => {
                self.cursor.advance();
                self.at_line_start = true;
                Ok(Token::new(TokenKind::Newline, "", Span::new(line, col, 1)))
            }
            '#' => {
                self.skip_comment();
                self.scan_token()
            }
            '"' => self.scan_string(line, col),
            c if c.is_ascii_digit() => {
                self.cursor.eat_while(|c| c.is_ascii_digit());
                if self.cursor.peek() == Some('.')
                    && self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
                {
                    self.cursor.advance();
                    self.cursor.eat_while(|c| c.is_ascii_digit());
                }
                Ok(self.make(TokenKind::Number, start, line, col))
            }
            c if is_ident_start(c) => {
                let text = self.cursor.eat_while(is_ident_continue);
                let kind = lookup_keyword(text).unwrap_or(if c.is_ascii_uppercase() {
                    TokenKind::TypeName
                } else {
                    TokenKind::Ident
                });
                Ok(self.make(kind, start, line, col))
            }
            _ => {
                let kind = match ch {
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '<' => TokenKind::Less,
                    '>' => TokenKind::Greater,
                    ',' => TokenKind::Comma,
                    '.' => TokenKind::Dot,
                    '=' => TokenKind::Equals,
                    _ => {
                        return Err(ParseError::new(
                            ParseErrorKind::UnexpectedCharacter,
                            Span::new(line, col, ch.len_utf8() as u32),
                            format!("'{}'", ch.escape_default()),
                        ));
                    }
                };
                self.cursor.advance();
                Ok(self.make(kind, start, line, col))
            }
        }
    }

    fn scan_string(&mut self, line: u32, col: u32) -> ParseResult<Token<'ast>> {
        let start = self.cursor.offset();
        self.cursor.advance();
        let mut contents = String::new();
        loop {
            match self.cursor.advance() {
                Some('"') => break,
                Some('\\') => match self.cursor.advance() {
                    Some('n') => contents.push('\n'),
                    Some('t') => contents.push('\t'),
                    Some('"') => contents.push('"'),
                    Some('\\') => contents.push('\\'),
                    _ => {
                        return Err(ParseError::new(
                            ParseErrorKind::UnexpectedCharacter,
                            Span::new(line, col, self.cursor.offset() - start),
                            "invalid escape",
                        ));
                    }
                },
                Some('\n') | None => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnterminatedString,
                        Span::new(line, col, self.cursor.offset() - start),
                        "",
                    ));
                }
                Some(c) => contents.push(c),
            }
        }
        let lexeme = self.arena.alloc_str(&contents);
        let len = self.cursor.offset() - start;
        Ok(Token::new(TokenKind::String, lexeme, Span::new(line, col, len)))
    }

    /// End of input: close every open block, then produce `Eof` forever.
    fn finish(&mut self, line: u32, col: u32) -> ParseResult<Token<'ast>> {
        let span = Span::point(line, col);
        if !self.finished {
            let source = self.cursor.source();
            if !source.is_empty() && !source.ends_with('\n') {
                return Err(ParseError::new(ParseErrorKind::MissingFinalNewline, span, ""));
            }
            self.finished = true;
            for _ in 0..self.depth {
                self.pending.push_back(Token::new(TokenKind::Dedent, "", span));
            }
            self.depth = 0;
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }
        }
        Ok(Token::new(TokenKind::Eof, "", span))
    }

    fn make(&self, kind: TokenKind, start: u32, line: u32, col: u32) -> Token<'ast> {
        let text = self.cursor.slice_from(start);
        let lexeme = self.arena.alloc_str(text);
        Token::new(kind, lexeme, Span::new(line, col, text.len() as u32))
    }

    fn error_here(&self, kind: ParseErrorKind, message: &str) -> ParseError {
        ParseError::new(
            kind,
            Span::point(self.cursor.line(), self.cursor.column()),
            message,
        )
    }
}
