//! Position tracking over source text.

/// Walks source text one character at a time, remembering the line and
/// column of the next character. Columns count bytes, so a tab is one.
pub struct Cursor<'src> {
    text: &'src str,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'src> Cursor<'src> {
    pub fn new(text: &'src str) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// The whole text, independent of position.
    pub fn source(&self) -> &'src str {
        self.text
    }

    pub fn offset(&self) -> u32 {
        self.pos as u32
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    fn remaining(&self) -> &'src str {
        &self.text[self.pos..]
    }

    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// The character `n` places ahead; `peek_nth(0)` is `peek()`.
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        match ch {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            _ => self.column += ch.len_utf8() as u32,
        }
        Some(ch)
    }

    pub fn eat(&mut self, expected: char) -> bool {
        let hit = self.peek() == Some(expected);
        if hit {
            self.advance();
        }
        hit
    }

    /// Consume the longest run accepted by `keep` and return it.
    pub fn eat_while(&mut self, mut keep: impl FnMut(char) -> bool) -> &'src str {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if !keep(ch) {
                break;
            }
            self.advance();
        }
        &self.text[start..self.pos]
    }

    /// Consume leading tabs, returning how many there were.
    pub fn eat_tabs(&mut self) -> u32 {
        self.eat_while(|c| c == '\t').len() as u32
    }

    pub fn slice_from(&self, start: u32) -> &'src str {
        &self.text[start as usize..self.pos]
    }
}

pub fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

pub fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}
