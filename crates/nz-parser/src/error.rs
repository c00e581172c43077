//! Parse error types.
//!
//! A module's first lexing or parsing error aborts that module, so the
//! parser returns a single [`ParseError`] rather than accumulating them.

use nz_core::Span;
use thiserror::Error;

/// A parse error with location and diagnostic information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {span}{}", if message.is_empty() { String::new() } else { format!(": {message}") })]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    /// Additional context, may be empty.
    pub message: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Format the error with the offending source line and a caret.
    pub fn display_with_source(&self, source: &str) -> String {
        let mut output = format!("error at {}: {}\n", self.span, self);
        if let Some(line_text) = source.lines().nth((self.span.line as usize).saturating_sub(1)) {
            output.push_str(&format!("{:>4} | {}\n", self.span.line, line_text));
            let indent = " ".repeat((self.span.col as usize).saturating_sub(1));
            let pointer = "^".repeat(self.span.len.max(1) as usize);
            output.push_str(&format!("     | {}{}\n", indent, pointer));
        }
        output
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ParseErrorKind {
    // Lexing
    #[error("unexpected character")]
    UnexpectedCharacter,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("invalid indentation")]
    InvalidIndentation,
    #[error("trailing whitespace")]
    TrailingWhitespace,
    #[error("missing final newline")]
    MissingFinalNewline,

    // Parsing
    #[error("expected token")]
    ExpectedToken,
    #[error("expected a declaration")]
    ExpectedDeclaration,
    #[error("expected an expression")]
    ExpectedExpression,
    #[error("expected a type")]
    ExpectedType,
    #[error("let without continuation")]
    LetWithoutContinuation,
}

pub type ParseResult<T> = Result<T, ParseError>;
