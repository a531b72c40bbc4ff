//! Character sources.
//!
//! A [`CharSource`] is the only thing the [`Cursor`](crate::Cursor) needs from
//! the outside world: one character of lookahead plus forward reads. Opening
//! files and decoding bytes happens before a source is constructed.

use std::io;
use std::iter::Fuse;

/// A forward-only supplier of characters.
///
/// `Ok(None)` means end of input. Once a source has returned `Ok(None)` it
/// must keep doing so.
pub trait CharSource {
    /// Look at the next character without consuming it.
    fn peek(&mut self) -> io::Result<Option<char>>;

    /// Consume and return the next character.
    fn read(&mut self) -> io::Result<Option<char>>;

    /// Release any underlying resource. Must tolerate repeated calls.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn peek(&mut self) -> io::Result<Option<char>> {
        (**self).peek()
    }

    fn read(&mut self) -> io::Result<Option<char>> {
        (**self).read()
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

impl<S: CharSource + ?Sized> CharSource for Box<S> {
    fn peek(&mut self) -> io::Result<Option<char>> {
        (**self).peek()
    }

    fn read(&mut self) -> io::Result<Option<char>> {
        (**self).read()
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

// === In-memory text ===

/// Source over a borrowed string slice. Never fails.
#[derive(Clone, Debug)]
pub struct StrSource<'a> {
    text: &'a str,
    offset: usize,
}

impl<'a> StrSource<'a> {
    pub const fn new(text: &'a str) -> Self {
        StrSource { text, offset: 0 }
    }

    /// Text not yet consumed.
    pub fn remaining(&self) -> &'a str {
        &self.text[self.offset..]
    }
}

impl CharSource for StrSource<'_> {
    #[inline]
    fn peek(&mut self) -> io::Result<Option<char>> {
        Ok(self.remaining().chars().next())
    }

    #[inline]
    fn read(&mut self) -> io::Result<Option<char>> {
        let ch = self.remaining().chars().next();
        if let Some(c) = ch {
            self.offset += c.len_utf8();
        }
        Ok(ch)
    }
}

// === Fallible iterators ===

/// Source over any iterator of fallible characters, e.g. a decoder sitting
/// on top of a reader.
///
/// Errors are not cached: a failed `peek` is retried by the next call.
#[derive(Debug)]
pub struct IterSource<I: Iterator> {
    iter: Fuse<I>,
    lookahead: Option<Option<char>>,
}

impl<I> IterSource<I>
where
    I: Iterator<Item = io::Result<char>>,
{
    pub fn new(iter: I) -> Self {
        IterSource {
            iter: iter.fuse(),
            lookahead: None,
        }
    }

    fn fill(&mut self) -> io::Result<Option<char>> {
        if let Some(ch) = self.lookahead {
            return Ok(ch);
        }
        let ch = self.iter.next().transpose()?;
        self.lookahead = Some(ch);
        Ok(ch)
    }
}

impl<I> CharSource for IterSource<I>
where
    I: Iterator<Item = io::Result<char>>,
{
    fn peek(&mut self) -> io::Result<Option<char>> {
        self.fill()
    }

    fn read(&mut self) -> io::Result<Option<char>> {
        let ch = self.fill()?;
        if ch.is_some() {
            self.lookahead = None;
        }
        Ok(ch)
    }
}
