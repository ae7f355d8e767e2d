//! Character source abstraction and the default text-backed implementation.

use crate::location::{CharLocation, Interval};

/// A character stream with lookahead and position tracking.
///
/// The parser consumes a source exactly once, front to back; [`reset`]
/// rewinds it for tooling that wants to reuse the buffer.
///
/// [`reset`]: CharSource::reset
pub trait CharSource {
    /// The next character, without consuming it. `None` at end of input.
    fn next_char(&self) -> Option<char>;

    /// Look `n` characters ahead; `la(1)` is the same as [`next_char`].
    ///
    /// [`next_char`]: CharSource::next_char
    fn la(&self, n: usize) -> Option<char>;

    /// Consume one character and return it.
    fn consume(&mut self) -> Option<char>;

    /// The position of the next character to be consumed.
    fn location(&self) -> CharLocation;

    /// The source text covered by `interval` (empty for the sentinel).
    fn slice(&self, interval: &Interval) -> &str;

    /// Rewind to the beginning of the input.
    fn reset(&mut self);

    /// 1-based line of the next character.
    fn line(&self) -> u32 {
        self.location().line
    }

    /// 1-based column of the next character.
    fn column(&self) -> u32 {
        self.location().column
    }

    /// Absolute byte offset of the next character.
    fn index(&self) -> usize {
        self.location().index
    }

    /// True once all input is consumed.
    fn at_end(&self) -> bool {
        self.next_char().is_none()
    }

    /// Consume a run of spaces and tabs; returns how many were consumed.
    fn consume_spaces(&mut self) -> usize {
        let mut count = 0;
        while matches!(self.next_char(), Some(' ' | '\t')) {
            self.consume();
            count += 1;
        }
        count
    }

    /// Consume one line break (`\n`, `\r\n` or a lone `\r`), if present.
    fn consume_newline(&mut self) -> bool {
        match self.next_char() {
            Some('\n') => {
                self.consume();
                true
            }
            Some('\r') => {
                self.consume();
                if self.next_char() == Some('\n') {
                    self.consume();
                }
                true
            }
            _ => false,
        }
    }
}

/// A [`CharSource`] over an in-memory text buffer.
pub struct TextSource<'src> {
    text: &'src str,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'src> TextSource<'src> {
    /// Create a source over `text`.
    pub fn new(text: &'src str) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// The full underlying text.
    pub fn text(&self) -> &'src str {
        self.text
    }

    #[inline]
    fn remaining(&self) -> &'src str {
        &self.text[self.pos..]
    }
}

impl CharSource for TextSource<'_> {
    #[inline]
    fn next_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    #[inline]
    fn la(&self, n: usize) -> Option<char> {
        debug_assert!(n >= 1);
        self.remaining().chars().nth(n - 1)
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.next_char()?;
        self.pos += c.len_utf8();
        match c {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            // A `\r` directly before `\n` is half of one line break; the
            // `\n` does the line accounting.
            '\r' if self.next_char() != Some('\n') => {
                self.line += 1;
                self.column = 1;
            }
            _ => self.column += 1,
        }
        Some(c)
    }

    #[inline]
    fn location(&self) -> CharLocation {
        CharLocation::new(self.line, self.column, self.pos)
    }

    fn slice(&self, interval: &Interval) -> &str {
        if interval.is_empty() {
            return "";
        }
        &self.text[interval.begin.index..interval.end.index]
    }

    fn reset(&mut self) {
        self.pos = 0;
        self.line = 1;
        self.column = 1;
    }
}
