//! Backtracking cursor.
//!
//! The cursor presents a single forward-reading interface over a
//! [`CharSource`] while supporting nested save-points ("marks").
//!
//! # Marks and the backup buffer
//!
//! While at least one mark is open, every character read is appended to a
//! backup buffer. The buffer starts at the *oldest* open mark, so an inner
//! mark only owns a tail of it:
//!
//! ```text
//! backup:  a b c d e
//!          ^outer   ^current
//!              ^inner
//! ```
//!
//! Resetting to the inner mark re-attaches `c d e` (delta 3) in front of the
//! pending input and leaves `a b` behind for the outer mark. Resetting to a
//! mark whose delta equals the whole buffer hands the buffer over as-is.
//! Either way the buffer only ever grows by one character per read.
//!
//! Releasing the last open mark discards the buffer.

use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::mem;

use smallvec::SmallVec;

use crate::{CharSource, Position, StrSource};

/// A position-tracking reader with mark/reset/capture.
pub struct Cursor<'src> {
    source: Box<dyn CharSource + 'src>,
    /// Characters handed back by `reset`, read before `source`.
    pending: VecDeque<char>,
    position: Position,
    marks: SmallVec<[Position; 8]>,
    backup: Vec<char>,
    closed: bool,
}

impl<'src> Cursor<'src> {
    pub fn new(source: impl CharSource + 'src) -> Self {
        Cursor {
            source: Box::new(source),
            pending: VecDeque::new(),
            position: Position::BOF,
            marks: SmallVec::new(),
            backup: Vec::new(),
            closed: false,
        }
    }

    /// Cursor over in-memory text.
    pub fn from_text(text: &'src str) -> Self {
        Self::new(StrSource::new(text))
    }

    /// Position of the next character to be read.
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Number of currently open marks.
    #[inline]
    pub fn mark_depth(&self) -> usize {
        self.marks.len()
    }

    // === Reading ===

    /// Next character without consuming it. `None` at end of input.
    #[inline]
    pub fn peek(&mut self) -> io::Result<Option<char>> {
        match self.pending.front() {
            Some(&ch) => Ok(Some(ch)),
            None => self.source.peek(),
        }
    }

    /// The character after the next one. Moves the next character into
    /// `pending` if it still sits in the source.
    fn peek_second(&mut self) -> io::Result<Option<char>> {
        match self.pending.len() {
            0 => {
                if let Some(ch) = self.source.read()? {
                    self.pending.push_back(ch);
                }
                self.source.peek()
            }
            1 => self.source.peek(),
            _ => Ok(self.pending.get(1).copied()),
        }
    }

    pub fn is_eof(&mut self) -> io::Result<bool> {
        Ok(self.peek()?.is_none())
    }

    /// Consume one character and advance the position.
    ///
    /// `\n`, `\r` and `\r\n` each count as one line break: a `\r` followed by
    /// `\n` advances the column, the `\n` then breaks the line.
    pub fn read(&mut self) -> io::Result<Option<char>> {
        let Some(ch) = self.peek()? else {
            return Ok(None);
        };
        // classify before consuming so a failed lookahead loses nothing
        let breaks_line = ch == '\n' || (ch == '\r' && self.peek_second()? != Some('\n'));
        if self.pending.pop_front().is_none() {
            self.source.read()?;
        }

        self.position = if breaks_line {
            self.position.advance_line()
        } else {
            self.position.advance_column()
        };
        if !self.marks.is_empty() {
            self.backup.push(ch);
        }
        Ok(Some(ch))
    }

    /// Read up to (not including) the next line terminator, then consume the
    /// terminator. `None` when already at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        if self.is_eof()? {
            return Ok(None);
        }
        let mut line = String::new();
        while let Some(ch) = self.read()? {
            match ch {
                '\n' => break,
                '\r' => {
                    if self.peek()? == Some('\n') {
                        self.read()?;
                    }
                    break;
                }
                _ => line.push(ch),
            }
        }
        Ok(Some(line))
    }

    /// Read everything that is left. `None` when already at end of input.
    pub fn read_to_end(&mut self) -> io::Result<Option<String>> {
        if self.is_eof()? {
            return Ok(None);
        }
        let mut rest = String::new();
        while let Some(ch) = self.read()? {
            rest.push(ch);
        }
        Ok(Some(rest))
    }

    // === Marks ===

    /// Save the current position. Marks nest.
    #[inline]
    pub fn mark(&mut self) {
        self.marks.push(self.position);
    }

    /// Drop the innermost mark. Dropping the last one discards the backup.
    pub fn unmark(&mut self) {
        if self.marks.pop().is_some() && self.marks.is_empty() {
            self.backup.clear();
        }
    }

    /// Roll back to the innermost mark, optionally dropping it as well.
    ///
    /// No-op without an open mark.
    ///
    /// # Panics
    ///
    /// If more characters were consumed since the mark than the backup
    /// holds. That cannot happen through this API.
    pub fn reset(&mut self, also_unmark: bool) {
        let Some(&mark) = self.marks.last() else {
            return;
        };
        let delta = self.position.index() - mark.index();
        if delta > 0 {
            let backed_up = self.backup.len();
            assert!(
                delta <= backed_up,
                "cursor backup holds {backed_up} chars but {delta} were read since the mark"
            );
            let tail = if delta == backed_up {
                mem::take(&mut self.backup)
            } else {
                self.backup.split_off(backed_up - delta)
            };
            self.reattach(mark, tail);
        }
        if also_unmark {
            self.unmark();
        }
    }

    /// Text read since the innermost mark, optionally dropping the mark.
    ///
    /// `None` without an open mark.
    ///
    /// # Panics
    ///
    /// Under the same broken invariant as [`reset`](Self::reset).
    pub fn capture(&mut self, also_unmark: bool) -> Option<String> {
        let mark = *self.marks.last()?;
        let delta = self.position.index() - mark.index();
        let backed_up = self.backup.len();
        assert!(
            delta <= backed_up,
            "cursor backup holds {backed_up} chars but {delta} were read since the mark"
        );
        let text = self.backup[backed_up - delta..].iter().collect();
        if also_unmark {
            self.unmark();
        }
        Some(text)
    }

    fn reattach(&mut self, position: Position, chars: Vec<char>) {
        self.position = position;
        for ch in chars.into_iter().rev() {
            self.pending.push_front(ch);
        }
    }

    // === Lifetime ===

    /// Close the underlying source. Idempotent; also run on drop.
    pub fn close(&mut self) -> io::Result<()> {
        if mem::replace(&mut self.closed, true) {
            return Ok(());
        }
        self.source.close()
    }
}

impl Drop for Cursor<'_> {
    fn drop(&mut self) {
        // Errors cannot be reported from drop; call `close` explicitly to see them.
        let _ = self.close();
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position)
            .field("marks", &self.marks)
            .field("backup", &self.backup.len())
            .field("pending", &self.pending.len())
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}
