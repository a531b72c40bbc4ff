//! Per-parse state.
//!
//! A [`Context`] owns the [`Cursor`] for one parse run together with the
//! run's configuration:
//!
//! - **skip class**: characters silently consumed before every parser
//!   invocation (typically whitespace)
//! - **trace sink**: an optional `FnMut(&str)` receiving one line per parser
//!   entry and exit
//!
//! Entry and exit are also reported as `tracing` events under the
//! `pcomb::parse` target, independently of the sink.
//!
//! ## Trace layout
//!
//! ```text
//! + Then (ln: 1, col: 1, idx: 0)
//!   + Exact (ln: 1, col: 1, idx: 0)
//!   - Exact (ln: 1, col: 2, idx: 1) Success()
//!   + Exact (ln: 1, col: 2, idx: 1)
//!   - Exact (ln: 1, col: 2, idx: 1) Failure('1'(49) expected but '2'(50) found.)
//! - Then (ln: 1, col: 2, idx: 1) Failure('1'(49) expected but '2'(50) found.)
//! ```
//!
//! `, cut` (or `cut` for a success) is appended inside the parentheses when
//! the outcome disables backtracking. Nothing is formatted without a sink.

use std::fmt;
use std::fmt::Write as _;

use pcomb_core::{CharClass, CharSource, Cursor, Position};
use tracing::trace;

use crate::ParseResult;

type Sink<'src> = Box<dyn FnMut(&str) + 'src>;

/// State shared by every parser of one parse run.
pub struct Context<'src> {
    cursor: Cursor<'src>,
    skip: Option<CharClass>,
    sink: Option<Sink<'src>>,
    depth: usize,
}

impl<'src> Context<'src> {
    /// Context with no skip class and no sink.
    pub fn new(source: impl CharSource + 'src) -> Self {
        Self::builder(source).build()
    }

    /// Context over in-memory text.
    pub fn from_text(text: &'src str) -> Self {
        ContextBuilder::from_cursor(Cursor::from_text(text)).build()
    }

    pub fn builder(source: impl CharSource + 'src) -> ContextBuilder<'src> {
        ContextBuilder::from_cursor(Cursor::new(source))
    }

    /// The cursor, for parser bodies.
    #[inline]
    pub fn cursor(&mut self) -> &mut Cursor<'src> {
        &mut self.cursor
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.cursor.position()
    }

    /// Release the cursor so the caller can keep reading after a parse.
    pub fn into_cursor(self) -> Cursor<'src> {
        self.cursor
    }

    /// Write a free-form line to the trace sink at the current depth.
    pub fn log(&mut self, message: &str) {
        trace!(target: "pcomb::parse", depth = self.depth, "{message}");
        if self.sink.is_some() {
            let line = format!("{}{message}", indent(self.depth));
            self.emit(&line);
        }
    }

    // === Parser entry / exit ===

    /// Called by `parse` before the parser body runs: auto-skip, then trace.
    ///
    /// Returns the position the body starts at.
    pub(crate) fn enter(&mut self, name: &str) -> ParseResult<Position> {
        if let Some(skip) = &self.skip {
            while let Some(ch) = self.cursor.peek()? {
                if !skip.contains(ch) {
                    break;
                }
                self.cursor.read()?;
            }
        }

        let position = self.cursor.position();
        trace!(target: "pcomb::parse", parser = name, %position, "enter");
        if self.sink.is_some() {
            let line = format!("{}+ {name} {position}", indent(self.depth));
            self.emit(&line);
        }
        self.depth += 1;
        Ok(position)
    }

    /// Called by `parse` after the parser body returned an outcome.
    pub(crate) fn leave(&mut self, name: &str, message: Option<&str>, backtrack: bool) {
        self.depth = self.depth.saturating_sub(1);
        let position = self.cursor.position();
        trace!(
            target: "pcomb::parse",
            parser = name,
            %position,
            success = message.is_none(),
            cut = !backtrack,
            message,
            "leave"
        );
        if self.sink.is_none() {
            return;
        }

        let mut line = format!("{}- {name} {position} ", indent(self.depth));
        match (message, backtrack) {
            (None, true) => line.push_str("Success()"),
            (None, false) => line.push_str("Success(cut)"),
            (Some(msg), true) => {
                let _ = write!(line, "Failure({msg})");
            }
            (Some(msg), false) => {
                let _ = write!(line, "Failure({msg}, cut)");
            }
        }
        self.emit(&line);
    }

    /// Called by `parse` when the parser body aborted with an error.
    pub(crate) fn abort(&mut self, name: &str, error: &crate::ParseError) {
        self.depth = self.depth.saturating_sub(1);
        trace!(target: "pcomb::parse", parser = name, %error, "abort");
        if self.sink.is_some() {
            let line = format!(
                "{}- {name} {} Error({error})",
                indent(self.depth),
                self.cursor.position()
            );
            self.emit(&line);
        }
    }

    fn emit(&mut self, line: &str) {
        if let Some(sink) = self.sink.as_mut() {
            sink(line);
        }
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("cursor", &self.cursor)
            .field("skip", &self.skip)
            .field("sink", &self.sink.is_some())
            .field("depth", &self.depth)
            .finish()
    }
}

// === Builder ===

/// Configures a [`Context`].
///
/// ```
/// use pcomb::{CharClass, Context};
/// use pcomb_core::StrSource;
///
/// let mut lines = Vec::new();
/// let ctx = Context::builder(StrSource::new("a b"))
///     .skip(CharClass::any_of([' ', '\t']))
///     .trace_sink(|line: &str| lines.push(line.to_owned()))
///     .build();
/// drop(ctx);
/// ```
#[must_use]
pub struct ContextBuilder<'src> {
    cursor: Cursor<'src>,
    skip: Option<CharClass>,
    sink: Option<Sink<'src>>,
}

impl<'src> ContextBuilder<'src> {
    fn from_cursor(cursor: Cursor<'src>) -> Self {
        ContextBuilder {
            cursor,
            skip: None,
            sink: None,
        }
    }

    /// Skip characters of `class` before every parser invocation.
    pub fn skip(mut self, class: CharClass) -> Self {
        self.skip = Some(class);
        self
    }

    /// Receive one formatted line per parser entry and exit.
    pub fn trace_sink(mut self, sink: impl FnMut(&str) + 'src) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn build(self) -> Context<'src> {
        Context {
            cursor: self.cursor,
            skip: self.skip,
            sink: self.sink,
            depth: 0,
        }
    }
}
