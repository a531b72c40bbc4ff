//! Parse outcomes with cut-aware backtracking.
//!
//! Every parser returns one of two outcome types:
//!
//! | Type | Success carries | Failure carries |
//! |------|-----------------|-----------------|
//! | [`ParseOutcome`] | nothing | message |
//! | [`ValueOutcome<T>`] | `T` | message |
//!
//! Both carry a `backtrack` flag and an optional span.
//!
//! ## The backtrack flag
//!
//! A failure with `backtrack == true` is a soft mismatch: an enclosing `or`
//! may rewind and try its next alternative. A failure with
//! `backtrack == false` is a *cut* failure: the grammar already committed to
//! this path, so the nearest `or` reports it without trying its alternative
//! and its message is the most precise one available. Leaving that `or`
//! makes the failure soft again. Outcomes start out backtrackable;
//! [`allow_backtrack`](ParseOutcome::allow_backtrack) is the only way to
//! change that.
//!
//! ## Spans
//!
//! Parser bodies never compute their own span. The driving `parse` call
//! attaches `[start, end)` after the body returns.
//!
//! Mismatch is never an `Err`. `Err` is reserved for
//! [`ParseError`](crate::ParseError).

use pcomb_core::{Position, Span};

/// Result of an effect-only parser.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct ParseOutcome {
    status: Result<(), String>,
    backtrack: bool,
    span: Option<Span>,
}

impl ParseOutcome {
    // === Constructors ===

    #[inline]
    pub fn success() -> Self {
        ParseOutcome {
            status: Ok(()),
            backtrack: true,
            span: None,
        }
    }

    #[cold]
    pub fn failure(message: impl Into<String>) -> Self {
        ParseOutcome {
            status: Err(message.into()),
            backtrack: true,
            span: None,
        }
    }

    // === Queries ===

    #[inline]
    pub fn is_successful(&self) -> bool {
        self.status.is_ok()
    }

    #[inline]
    pub fn is_failure(&self) -> bool {
        self.status.is_err()
    }

    /// The failure message; `None` on success.
    pub fn message(&self) -> Option<&str> {
        self.status.as_ref().err().map(String::as_str)
    }

    /// False once a cut has committed the enclosing choice.
    #[inline]
    pub fn can_backtrack(&self) -> bool {
        self.backtrack
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    pub fn start(&self) -> Option<Position> {
        self.span.map(|s| s.start)
    }

    pub fn end(&self) -> Option<Position> {
        self.span.map(|s| s.end)
    }

    // === Transformations ===

    #[inline]
    pub fn allow_backtrack(mut self, allow: bool) -> Self {
        self.backtrack = allow;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach a value. On failure the value is dropped.
    pub fn attach_value<T>(self, value: T) -> ValueOutcome<T> {
        self.attach_with(|| value)
    }

    /// Attach a lazily computed value. `make` only runs on success.
    pub fn attach_with<T>(self, make: impl FnOnce() -> T) -> ValueOutcome<T> {
        ValueOutcome {
            status: self.status.map(|()| make()),
            backtrack: self.backtrack,
            span: self.span,
        }
    }

    pub fn if_successful(&self, f: impl FnOnce()) {
        if self.is_successful() {
            f();
        }
    }

    pub fn if_failed(&self, f: impl FnOnce(&str)) {
        if let Err(message) = &self.status {
            f(message);
        }
    }

    pub fn into_result(self) -> Result<(), String> {
        self.status
    }
}

/// Result of a value-producing parser.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct ValueOutcome<T> {
    status: Result<T, String>,
    backtrack: bool,
    span: Option<Span>,
}

impl<T> ValueOutcome<T> {
    // === Constructors ===

    #[inline]
    pub fn success(value: T) -> Self {
        ValueOutcome {
            status: Ok(value),
            backtrack: true,
            span: None,
        }
    }

    #[cold]
    pub fn failure(message: impl Into<String>) -> Self {
        ValueOutcome {
            status: Err(message.into()),
            backtrack: true,
            span: None,
        }
    }

    // === Queries ===

    #[inline]
    pub fn is_successful(&self) -> bool {
        self.status.is_ok()
    }

    #[inline]
    pub fn is_failure(&self) -> bool {
        self.status.is_err()
    }

    pub fn message(&self) -> Option<&str> {
        self.status.as_ref().err().map(String::as_str)
    }

    #[inline]
    pub fn can_backtrack(&self) -> bool {
        self.backtrack
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    pub fn start(&self) -> Option<Position> {
        self.span.map(|s| s.start)
    }

    pub fn end(&self) -> Option<Position> {
        self.span.map(|s| s.end)
    }

    pub fn value(&self) -> Option<&T> {
        self.status.as_ref().ok()
    }

    pub fn into_value(self) -> Option<T> {
        self.status.ok()
    }

    // === Transformations ===

    #[inline]
    pub fn allow_backtrack(mut self, allow: bool) -> Self {
        self.backtrack = allow;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Apply `f` to the value. Failures pass through with flag and span intact.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ValueOutcome<U> {
        ValueOutcome {
            status: self.status.map(f),
            backtrack: self.backtrack,
            span: self.span,
        }
    }

    /// The value, or `alternative` on failure.
    pub fn or_else(self, alternative: T) -> T {
        self.status.unwrap_or(alternative)
    }

    /// Drop the value, keeping success, message, flag and span.
    pub fn detach_value(self) -> ParseOutcome {
        ParseOutcome {
            status: self.status.map(|_| ()),
            backtrack: self.backtrack,
            span: self.span,
        }
    }

    pub fn if_successful(&self, f: impl FnOnce(&T)) {
        if let Ok(value) = &self.status {
            f(value);
        }
    }

    pub fn if_failed(&self, f: impl FnOnce(&str)) {
        if let Err(message) = &self.status {
            f(message);
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        self.status
    }
}

#[cfg(test)]
mod tests;
