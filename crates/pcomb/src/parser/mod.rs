//! The parser contracts.
//!
//! - [`Parser`]: effect-only; reports success or failure
//! - [`ValParser`]: value-producing; success carries `Self::Output`
//!
//! Implementors write `do_parse`. Callers use `parse`, which wraps the body
//! with auto-skip, tracing and span attachment. Combinators are provided
//! methods that build new parser values; nothing runs until `parse`.
//!
//! Both traits are object safe. [`boxed`](Parser::boxed) erases the
//! concrete combinator type, which recursive grammars need.

use std::error::Error;
use std::fmt;
use std::rc::Rc;

use pcomb_core::Span;

use crate::combinator::{
    Capture, Cut, FlatMap, IgnoreThen, Map, Means, MeansWith, Opt, Or, OrValue, Pair,
    RepeatParser, RepeatValParser, SkipTo, Then, ThenIgnore, TryMap, TryMapRaising, Unval,
    ValueOr,
};
use crate::{Context, ParseOutcome, ParseResult, Repeat, ValueOutcome};

/// An effect-only parser.
pub trait Parser {
    /// The parser body. Runs at the cursor's current position.
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome>;

    /// Name used in traces.
    fn name(&self) -> &str {
        "Parser"
    }

    /// Run the parser: skip, trace, `do_parse`, attach the span.
    fn parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
        let start = ctx.enter(self.name())?;
        match self.do_parse(ctx) {
            Ok(outcome) => {
                ctx.leave(self.name(), outcome.message(), outcome.can_backtrack());
                Ok(outcome.with_span(Span::new(start, ctx.position())))
            }
            Err(error) => {
                ctx.abort(self.name(), &error);
                Err(error)
            }
        }
    }

    /// Parse in-memory text with a default context.
    fn parse_str(&self, text: &str) -> ParseResult<ParseOutcome> {
        self.parse(&mut Context::from_text(text))
    }

    // === Combinators ===

    /// `self` followed by `next`.
    fn then<P: Parser>(self, next: P) -> Then<Self, P>
    where
        Self: Sized,
    {
        Then::new(self, next)
    }

    /// `self` followed by a value parser; yields the right-hand value.
    fn ignore_then<V: ValParser>(self, next: V) -> IgnoreThen<Self, V>
    where
        Self: Sized,
    {
        IgnoreThen::new(self, next)
    }

    /// `self`, or `alternative` if `self` fails without a cut.
    fn or<P: Parser>(self, alternative: P) -> Or<Self, P>
    where
        Self: Sized,
    {
        Or::new(self, alternative)
    }

    /// `self` (yielding `None`), or the value of `alternative`.
    fn or_value<V: ValParser>(self, alternative: V) -> OrValue<Self, V>
    where
        Self: Sized,
    {
        OrValue::new(self, alternative)
    }

    /// Zero or one `self`. Never fails.
    fn opt(self) -> Opt<Self>
    where
        Self: Sized,
    {
        Opt::new(self)
    }

    /// Commit the nearest enclosing choice once `self` succeeds.
    fn cut(self) -> Cut<Self>
    where
        Self: Sized,
    {
        Cut::new(self)
    }

    /// Repeat `self` within the bounds of `repeat`.
    fn rep(self, repeat: Repeat) -> RepeatParser<Self>
    where
        Self: Sized,
    {
        RepeatParser::new(self, repeat)
    }

    /// Yield the text `self` consumed.
    fn capture(self) -> Capture<Self>
    where
        Self: Sized,
    {
        Capture::new(self)
    }

    /// Yield a clone of `value` when `self` succeeds.
    fn means<T: Clone>(self, value: T) -> Means<Self, T>
    where
        Self: Sized,
    {
        Means::new(self, value)
    }

    /// Yield `make()` when `self` succeeds.
    fn means_with<T, F: Fn() -> T>(self, make: F) -> MeansWith<Self, F>
    where
        Self: Sized,
    {
        MeansWith::new(self, make)
    }

    /// Map the consumed text.
    fn map<U, F: Fn(String) -> U>(self, f: F) -> Map<Capture<Self>, F>
    where
        Self: Sized,
    {
        self.capture().map(f)
    }

    /// Continue with a parser built from the consumed text.
    fn flat_map<Q: ValParser, F: Fn(String) -> Q>(self, f: F) -> FlatMap<Capture<Self>, F>
    where
        Self: Sized,
    {
        self.capture().flat_map(f)
    }

    /// Skip input until `self` matches.
    fn skip_to(self) -> SkipTo<Self>
    where
        Self: Sized,
    {
        SkipTo::new(self)
    }

    fn boxed(self) -> BoxedParser
    where
        Self: Sized + 'static,
    {
        BoxedParser(Rc::new(self))
    }
}

/// A value-producing parser.
pub trait ValParser {
    type Output;

    /// The parser body. Runs at the cursor's current position.
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<Self::Output>>;

    /// Name used in traces.
    fn name(&self) -> &str {
        "ValParser"
    }

    /// Run the parser: skip, trace, `do_parse`, attach the span.
    fn parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<Self::Output>> {
        let start = ctx.enter(self.name())?;
        match self.do_parse(ctx) {
            Ok(outcome) => {
                ctx.leave(self.name(), outcome.message(), outcome.can_backtrack());
                Ok(outcome.with_span(Span::new(start, ctx.position())))
            }
            Err(error) => {
                ctx.abort(self.name(), &error);
                Err(error)
            }
        }
    }

    /// Parse in-memory text with a default context.
    fn parse_str(&self, text: &str) -> ParseResult<ValueOutcome<Self::Output>> {
        self.parse(&mut Context::from_text(text))
    }

    // === Combinators ===

    /// `self` followed by `next`; yields both values.
    fn then<V: ValParser>(self, next: V) -> Pair<Self, V>
    where
        Self: Sized,
    {
        Pair::new(self, next)
    }

    /// `self` followed by an effect parser; yields the left-hand value.
    fn then_ignore<P: Parser>(self, next: P) -> ThenIgnore<Self, P>
    where
        Self: Sized,
    {
        ThenIgnore::new(self, next)
    }

    fn or<V: ValParser<Output = Self::Output>>(self, alternative: V) -> Or<Self, V>
    where
        Self: Sized,
    {
        Or::new(self, alternative)
    }

    /// `Some(value)`, or `None` if the effect parser `alternative` matches.
    fn or_effect<P: Parser>(self, alternative: P) -> ValueOr<Self, P>
    where
        Self: Sized,
    {
        ValueOr::new(self, alternative)
    }

    /// `Some(value)` or `None`. Never fails.
    fn opt(self) -> Opt<Self>
    where
        Self: Sized,
    {
        Opt::new(self)
    }

    fn cut(self) -> Cut<Self>
    where
        Self: Sized,
    {
        Cut::new(self)
    }

    fn map<U, F: Fn(Self::Output) -> U>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
    {
        Map::new(self, f)
    }

    /// Fallible map. An `Err` becomes a parse failure.
    fn try_map<U, E: fmt::Display, F: Fn(Self::Output) -> Result<U, E>>(
        self,
        f: F,
    ) -> TryMap<Self, F>
    where
        Self: Sized,
    {
        TryMap::new(self, f)
    }

    /// Fallible map. An `Err` aborts the parse with
    /// [`ParseError::Mapping`](crate::ParseError::Mapping).
    fn try_map_raising<U, E, F>(self, f: F) -> TryMapRaising<Self, F>
    where
        Self: Sized,
        E: Into<Box<dyn Error + Send + Sync>>,
        F: Fn(Self::Output) -> Result<U, E>,
    {
        TryMapRaising::new(self, f)
    }

    /// Continue with a parser built from the value, at the same position.
    fn flat_map<Q: ValParser, F: Fn(Self::Output) -> Q>(self, f: F) -> FlatMap<Self, F>
    where
        Self: Sized,
    {
        FlatMap::new(self, f)
    }

    /// Drop the value.
    fn unval(self) -> Unval<Self>
    where
        Self: Sized,
    {
        Unval::new(self)
    }

    /// Repeat `self` within the bounds of `repeat`, collecting the values.
    fn rep(self, repeat: Repeat) -> RepeatValParser<Self>
    where
        Self: Sized,
    {
        RepeatValParser::new(self, repeat)
    }

    /// Skip input until `self` matches.
    fn skip_to(self) -> SkipTo<Self>
    where
        Self: Sized,
    {
        SkipTo::new(self)
    }

    fn boxed(self) -> BoxedValParser<Self::Output>
    where
        Self: Sized + 'static,
    {
        BoxedValParser(Rc::new(self))
    }
}

// === Forwarding impls ===

macro_rules! forward_parser {
    ($($ty:ty),*) => {$(
        impl<P: Parser + ?Sized> Parser for $ty {
            #[inline]
            fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
                (**self).do_parse(ctx)
            }

            fn name(&self) -> &str {
                (**self).name()
            }
        }

        impl<P: ValParser + ?Sized> ValParser for $ty {
            type Output = P::Output;

            #[inline]
            fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<P::Output>> {
                (**self).do_parse(ctx)
            }

            fn name(&self) -> &str {
                (**self).name()
            }
        }
    )*};
}

forward_parser!(&P, Box<P>, Rc<P>);

// === Type erasure ===

/// A shared, type-erased [`Parser`].
#[derive(Clone)]
pub struct BoxedParser(Rc<dyn Parser>);

impl Parser for BoxedParser {
    #[inline]
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
        self.0.do_parse(ctx)
    }

    fn name(&self) -> &str {
        self.0.name()
    }

    fn boxed(self) -> BoxedParser {
        self
    }
}

impl fmt::Debug for BoxedParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoxedParser({})", self.0.name())
    }
}

/// A shared, type-erased [`ValParser`].
pub struct BoxedValParser<T>(Rc<dyn ValParser<Output = T>>);

impl<T> Clone for BoxedValParser<T> {
    fn clone(&self) -> Self {
        BoxedValParser(Rc::clone(&self.0))
    }
}

impl<T> ValParser for BoxedValParser<T> {
    type Output = T;

    #[inline]
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<T>> {
        self.0.do_parse(ctx)
    }

    fn name(&self) -> &str {
        self.0.name()
    }

    fn boxed(self) -> BoxedValParser<T> {
        self
    }
}

impl<T> fmt::Debug for BoxedValParser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoxedValParser({})", self.0.name())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests unwrap parse results for brevity")]
mod tests;
