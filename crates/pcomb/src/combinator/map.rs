//! Value production and transformation.

use std::error::Error;
use std::fmt;

use super::failed;
use crate::{Context, ParseError, ParseOutcome, ParseResult, Parser, ValParser, ValueOutcome};

/// Yields the text consumed by an effect parser.
#[derive(Clone, Debug)]
pub struct Capture<P> {
    inner: P,
}

impl<P> Capture<P> {
    pub(crate) fn new(inner: P) -> Self {
        Capture { inner }
    }
}

impl<P: Parser> ValParser for Capture<P> {
    type Output = String;

    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<String>> {
        ctx.cursor().mark();
        let outcome = self.inner.parse(ctx)?;
        if outcome.is_successful() {
            let text = ctx.cursor().capture(true).unwrap_or_default();
            Ok(outcome.attach_value(text))
        } else {
            ctx.cursor().unmark();
            Ok(outcome.attach_with(String::new))
        }
    }

    fn name(&self) -> &str {
        "Capture"
    }
}

/// Yields a fixed value when the inner parser succeeds.
#[derive(Clone, Debug)]
pub struct Means<P, T> {
    inner: P,
    value: T,
}

impl<P, T> Means<P, T> {
    pub(crate) fn new(inner: P, value: T) -> Self {
        Means { inner, value }
    }
}

impl<P: Parser, T: Clone> ValParser for Means<P, T> {
    type Output = T;

    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<T>> {
        Ok(self.inner.parse(ctx)?.attach_with(|| self.value.clone()))
    }

    fn name(&self) -> &str {
        "Means"
    }
}

/// Yields a freshly made value when the inner parser succeeds.
#[derive(Clone)]
pub struct MeansWith<P, F> {
    inner: P,
    make: F,
}

impl<P, F> MeansWith<P, F> {
    pub(crate) fn new(inner: P, make: F) -> Self {
        MeansWith { inner, make }
    }
}

impl<P: Parser, T, F: Fn() -> T> ValParser for MeansWith<P, F> {
    type Output = T;

    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<T>> {
        Ok(self.inner.parse(ctx)?.attach_with(&self.make))
    }

    fn name(&self) -> &str {
        "MeansWith"
    }
}

/// Infallible value mapping.
#[derive(Clone)]
pub struct Map<V, F> {
    inner: V,
    f: F,
}

impl<V, F> Map<V, F> {
    pub(crate) fn new(inner: V, f: F) -> Self {
        Map { inner, f }
    }
}

impl<V: ValParser, U, F: Fn(V::Output) -> U> ValParser for Map<V, F> {
    type Output = U;

    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<U>> {
        Ok(self.inner.parse(ctx)?.map(&self.f))
    }

    fn name(&self) -> &str {
        "Map"
    }
}

/// Fallible mapping; `Err` becomes a parse failure.
#[derive(Clone)]
pub struct TryMap<V, F> {
    inner: V,
    f: F,
}

impl<V, F> TryMap<V, F> {
    pub(crate) fn new(inner: V, f: F) -> Self {
        TryMap { inner, f }
    }
}

impl<V, U, E, F> ValParser for TryMap<V, F>
where
    V: ValParser,
    E: fmt::Display,
    F: Fn(V::Output) -> Result<U, E>,
{
    type Output = U;

    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<U>> {
        let outcome = self.inner.parse(ctx)?;
        let backtrack = outcome.can_backtrack();
        Ok(match outcome.into_result() {
            Ok(value) => match (self.f)(value) {
                Ok(mapped) => ValueOutcome::success(mapped).allow_backtrack(backtrack),
                Err(error) => failed(
                    format!("an error has occurred while mapping: {error} "),
                    backtrack,
                ),
            },
            Err(message) => failed(message, backtrack),
        })
    }

    fn name(&self) -> &str {
        "TryMap"
    }
}

/// Fallible mapping; `Err` aborts the parse.
#[derive(Clone)]
pub struct TryMapRaising<V, F> {
    inner: V,
    f: F,
}

impl<V, F> TryMapRaising<V, F> {
    pub(crate) fn new(inner: V, f: F) -> Self {
        TryMapRaising { inner, f }
    }
}

impl<V, U, E, F> ValParser for TryMapRaising<V, F>
where
    V: ValParser,
    E: Into<Box<dyn Error + Send + Sync>>,
    F: Fn(V::Output) -> Result<U, E>,
{
    type Output = U;

    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<U>> {
        let outcome = self.inner.parse(ctx)?;
        let backtrack = outcome.can_backtrack();
        match outcome.into_result() {
            Ok(value) => match (self.f)(value) {
                Ok(mapped) => Ok(ValueOutcome::success(mapped).allow_backtrack(backtrack)),
                Err(error) => Err(ParseError::Mapping(error.into())),
            },
            Err(message) => Ok(failed(message, backtrack)),
        }
    }

    fn name(&self) -> &str {
        "TryMapRaising"
    }
}

/// Value-dependent continuation from the same cursor position.
#[derive(Clone)]
pub struct FlatMap<V, F> {
    inner: V,
    f: F,
}

impl<V, F> FlatMap<V, F> {
    pub(crate) fn new(inner: V, f: F) -> Self {
        FlatMap { inner, f }
    }
}

impl<V, Q, F> ValParser for FlatMap<V, F>
where
    V: ValParser,
    Q: ValParser,
    F: Fn(V::Output) -> Q,
{
    type Output = Q::Output;

    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<Q::Output>> {
        let outcome = self.inner.parse(ctx)?;
        let backtrack = outcome.can_backtrack();
        match outcome.into_result() {
            Ok(value) => {
                let next = (self.f)(value).parse(ctx)?;
                let next_backtrack = next.can_backtrack();
                Ok(next.allow_backtrack(backtrack && next_backtrack))
            }
            Err(message) => Ok(failed(message, backtrack)),
        }
    }

    fn name(&self) -> &str {
        "FlatMap"
    }
}

/// Drops the value of a value parser.
#[derive(Clone, Debug)]
pub struct Unval<V> {
    inner: V,
}

impl<V> Unval<V> {
    pub(crate) fn new(inner: V) -> Self {
        Unval { inner }
    }
}

impl<V: ValParser> Parser for Unval<V> {
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
        Ok(self.inner.parse(ctx)?.detach_value())
    }

    fn name(&self) -> &str {
        "Unval"
    }
}
