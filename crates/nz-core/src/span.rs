//! Positions in an nz document.

use std::fmt;

/// Where a token, declaration or expression begins, plus how many bytes of
/// its first line it covers. Shown as `line:col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// 1-based.
    pub line: u32,
    /// 1-based byte column. A tab is one column.
    pub col: u32,
    pub len: u32,
}

impl Span {
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// Zero-length span, used for end of input and dedents.
    #[inline]
    pub fn point(line: u32, col: u32) -> Self {
        Self::new(line, col, 0)
    }

    /// First column past the span.
    #[inline]
    pub fn end_col(self) -> u32 {
        self.col + self.len
    }

    /// From the start of `self` to the end of `last`.
    ///
    /// A line break cannot occur inside a type or a call, so a `last` that
    /// is not later on the same line leaves `self` unchanged.
    pub fn through(self, last: Span) -> Span {
        if last.line != self.line || last.end_col() <= self.end_col() {
            return self;
        }
        Span::new(self.line, self.col, last.end_col() - self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn through_covers_effect_keyword_and_type_name() {
        // `own Nat` at column 5
        let keyword = Span::new(2, 5, 3);
        let name = Span::new(2, 9, 3);
        assert_eq!(keyword.through(name), Span::new(2, 5, 7));
        assert_eq!(name.end_col(), 12);
    }

    #[test]
    fn through_ignores_earlier_or_other_lines() {
        let span = Span::new(4, 10, 2);
        assert_eq!(span.through(Span::new(4, 1, 3)), span);
        assert_eq!(span.through(Span::new(5, 20, 3)), span);
    }

    #[test]
    fn displays_line_and_column() {
        assert_eq!(Span::new(7, 2, 4).to_string(), "7:2");
        assert_eq!(Span::point(7, 2).len, 0);
    }
}
