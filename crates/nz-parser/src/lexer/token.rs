//! Token types for the nz lexer.

use nz_core::Span;
use std::fmt;

/// A token from the source code.
///
/// The lexeme is allocated in the `'ast` arena so the source string may be
/// freed once lexing completes.
#[derive(Clone, Copy, PartialEq)]
pub struct Token<'ast> {
    pub kind: TokenKind,
    /// Source text of the token. For string literals, the unescaped contents.
    pub lexeme: &'ast str,
    pub span: Span,
}

impl<'ast> Token<'ast> {
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'ast str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.span)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Literals and names
    // =========================================
    /// `42`, `3.5`
    Number,
    /// `"text"`
    String,
    /// A name starting with a lowercase letter or underscore: `add`, `x`
    Ident,
    /// A name starting with an uppercase letter: `Nat`, `T`
    TypeName,

    // =========================================
    // Layout
    // =========================================
    Newline,
    Indent,
    Dedent,

    // =========================================
    // Keywords
    // =========================================
    Import,
    Private,
    Struct,
    Spec,
    Fun,
    Extern,
    With,
    When,
    Else,
    Assert,
    Pass,
    As,

    // =========================================
    // Punctuation
    // =========================================
    LParen,
    RParen,
    Less,
    Greater,
    Comma,
    Dot,
    Equals,

    Eof,
}

impl TokenKind {
    /// A short human-readable description used in error messages.
    pub fn description(self) -> &'static str {
        match self {
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Ident => "identifier",
            TokenKind::TypeName => "type name",
            TokenKind::Newline => "end of line",
            TokenKind::Indent => "indented block",
            TokenKind::Dedent => "end of block",
            TokenKind::Import => "'import'",
            TokenKind::Private => "'private'",
            TokenKind::Struct => "'struct'",
            TokenKind::Spec => "'spec'",
            TokenKind::Fun => "'fun'",
            TokenKind::Extern => "'extern'",
            TokenKind::With => "'with'",
            TokenKind::When => "'when'",
            TokenKind::Else => "'else'",
            TokenKind::Assert => "'assert'",
            TokenKind::Pass => "'pass'",
            TokenKind::As => "'as'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Less => "'<'",
            TokenKind::Greater => "'>'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Equals => "'='",
            TokenKind::Eof => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Look up a keyword. Returns `None` for ordinary names.
pub fn lookup_keyword(word: &str) -> Option<TokenKind> {
    Some(match word {
        "import" => TokenKind::Import,
        "private" => TokenKind::Private,
        "struct" => TokenKind::Struct,
        "spec" => TokenKind::Spec,
        "fun" => TokenKind::Fun,
        "extern" => TokenKind::Extern,
        "with" => TokenKind::With,
        "when" => TokenKind::When,
        "else" => TokenKind::Else,
        "assert" => TokenKind::Assert,
        "pass" => TokenKind::Pass,
        "as" => TokenKind::As,
        _ => return None,
    })
}
