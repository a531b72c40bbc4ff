//! Source coordinates.
//!
//! A [`Position`] is an immutable `(line, column, index)` triple. Lines and
//! columns are 1-based, the index is the 0-based count of characters consumed
//! so far. Advancing never mutates: every step yields a new value.

use std::fmt;

/// A point in the character stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    line: u32,
    column: u32,
    index: usize,
}

impl Position {
    /// Beginning of input: line 1, column 1, index 0.
    pub const BOF: Self = Position {
        line: 1,
        column: 1,
        index: 0,
    };

    /// Create a position from raw coordinates.
    #[inline]
    pub const fn new(line: u32, column: u32, index: usize) -> Self {
        Position {
            line,
            column,
            index,
        }
    }

    #[inline]
    pub const fn line(self) -> u32 {
        self.line
    }

    #[inline]
    pub const fn column(self) -> u32 {
        self.column
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.index
    }

    /// Position after consuming an ordinary character.
    #[inline]
    #[must_use]
    pub const fn advance_column(self) -> Self {
        Position {
            line: self.line,
            column: self.column + 1,
            index: self.index + 1,
        }
    }

    /// Position after consuming a line break.
    #[inline]
    #[must_use]
    pub const fn advance_line(self) -> Self {
        Position {
            line: self.line + 1,
            column: 1,
            index: self.index + 1,
        }
    }

    /// True at the very start of input.
    #[inline]
    pub const fn is_bof(self) -> bool {
        self.index == 0
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::BOF
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(ln: {}, col: {}, idx: {})",
            self.line, self.column, self.index
        )
    }
}

/// A half-open range `[start, end)` of positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// Zero-width span at `at`.
    #[inline]
    pub const fn point(at: Position) -> Self {
        Span { start: at, end: at }
    }

    /// Number of characters covered.
    #[inline]
    pub const fn len(self) -> usize {
        self.end.index.saturating_sub(self.start.index)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
