//! Bounded repetition with optional separators and reduction.
//!
//! All forms share one driver, [`Repeat::drive`]. Iteration `i` (1-based)
//! is *optional* when the bounds leave room (`min < i` and `min != max`).
//! An optional iteration runs under a mark: if its separator or item fails,
//! the iteration is rolled back and the loop ends successfully. A failure
//! in a mandatory iteration fails the whole repetition, and stays
//! committed if any earlier item or separator was.

use std::fmt;

use super::{failed, Unval};
use crate::{
    BoxedParser, Context, GrammarError, ParseOutcome, ParseResult, Parser, ValParser,
    ValueOutcome,
};

// === Bounds ===

/// Repetition bounds and separator.
#[derive(Clone)]
pub struct Repeat {
    min: usize,
    /// `usize::MAX` means unbounded.
    max: usize,
    separator: Option<BoxedParser>,
}

impl Repeat {
    /// Zero or more.
    pub fn any() -> Self {
        Self::at_least(0)
    }

    /// `min` or more.
    pub fn at_least(min: usize) -> Self {
        Repeat {
            min,
            max: usize::MAX,
            separator: None,
        }
    }

    /// At most `max` (and at least one allowed).
    pub fn at_most(max: usize) -> Result<Self, GrammarError> {
        Self::range(0, max)
    }

    /// Between `min` and `max` inclusive.
    pub fn range(min: usize, max: usize) -> Result<Self, GrammarError> {
        if max == 0 || max < min {
            return Err(GrammarError::InvalidRepeat { min, max });
        }
        Ok(Repeat {
            min,
            max,
            separator: None,
        })
    }

    /// Exactly `n` times.
    pub fn exactly(n: usize) -> Result<Self, GrammarError> {
        Self::range(n, n)
    }

    /// Require `separator` between items.
    pub fn separated_by(mut self, separator: impl Parser + 'static) -> Self {
        self.separator = Some(separator.boxed());
        self
    }

    pub fn min(&self) -> usize {
        self.min
    }

    /// `None` when unbounded.
    pub fn max(&self) -> Option<usize> {
        (self.max != usize::MAX).then_some(self.max)
    }

    fn is_breakable(&self) -> bool {
        self.min != self.max
    }

    /// Run the loop, threading `state` through `fold` for every item.
    pub(crate) fn drive<T, U>(
        &self,
        ctx: &mut Context<'_>,
        mut state: U,
        mut item: impl FnMut(&mut Context<'_>) -> ParseResult<ValueOutcome<T>>,
        mut fold: impl FnMut(U, T) -> U,
    ) -> ParseResult<ValueOutcome<U>> {
        let mut backtrack = true;

        for i in 1..=self.max {
            let optional = self.is_breakable() && self.min < i;
            if optional {
                ctx.cursor().mark();
            }
            let before = ctx.position();

            if i > 1 {
                if let Some(separator) = &self.separator {
                    let outcome = separator.parse(ctx)?;
                    let separator_backtrack = outcome.can_backtrack();
                    if let Err(message) = outcome.into_result() {
                        if optional {
                            ctx.cursor().reset(true);
                            break;
                        }
                        return Ok(failed(message, backtrack && separator_backtrack));
                    }
                    backtrack &= separator_backtrack;
                }
            }

            let outcome = item(ctx)?;
            let item_backtrack = outcome.can_backtrack();
            match outcome.into_result() {
                Ok(value) => state = fold(state, value),
                Err(message) => {
                    if optional {
                        ctx.cursor().reset(true);
                        break;
                    }
                    return Ok(failed(message, backtrack && item_backtrack));
                }
            }
            backtrack &= item_backtrack;

            if optional {
                ctx.cursor().unmark();
                // an unbounded loop over an empty match would never end
                if self.max == usize::MAX && ctx.position() == before {
                    break;
                }
            }
        }

        Ok(ValueOutcome::success(state).allow_backtrack(backtrack))
    }
}

impl Default for Repeat {
    fn default() -> Self {
        Self::any()
    }
}

impl fmt::Debug for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repeat")
            .field("min", &self.min)
            .field("max", &self.max())
            .field("separator", &self.separator)
            .finish()
    }
}

// === Effect repetition ===

/// Repeats an effect parser.
#[derive(Clone, Debug)]
pub struct RepeatParser<P> {
    inner: P,
    repeat: Repeat,
}

impl<P> RepeatParser<P> {
    pub(crate) fn new(inner: P, repeat: Repeat) -> Self {
        RepeatParser { inner, repeat }
    }

    /// Count the matches instead.
    pub fn count(self) -> RepeatCount<P> {
        RepeatCount {
            inner: self.inner,
            repeat: self.repeat,
        }
    }
}

impl<P: Parser> Parser for RepeatParser<P> {
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
        let outcome = self.repeat.drive(
            ctx,
            (),
            |ctx| Ok(self.inner.parse(ctx)?.attach_value(())),
            |(), ()| (),
        )?;
        Ok(outcome.detach_value())
    }

    fn name(&self) -> &str {
        "Repeat"
    }
}

/// Number of matches of a repeated effect parser.
#[derive(Clone, Debug)]
pub struct RepeatCount<P> {
    inner: P,
    repeat: Repeat,
}

impl<P: Parser> ValParser for RepeatCount<P> {
    type Output = usize;

    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<usize>> {
        self.repeat.drive(
            ctx,
            0,
            |ctx| Ok(self.inner.parse(ctx)?.attach_value(())),
            |n, ()| n + 1,
        )
    }

    fn name(&self) -> &str {
        "RepeatCount"
    }
}

// === Value repetition ===

/// Repeats a value parser, collecting the values.
#[derive(Clone, Debug)]
pub struct RepeatValParser<V> {
    inner: V,
    repeat: Repeat,
}

impl<V> RepeatValParser<V> {
    pub(crate) fn new(inner: V, repeat: Repeat) -> Self {
        RepeatValParser { inner, repeat }
    }
}

impl<V: ValParser> RepeatValParser<V> {
    /// Fold the values into `seed()` instead of collecting them.
    pub fn reduce<U, S, A>(self, seed: S, accumulate: A) -> RepeatReduce<V, S, A, fn(U) -> U>
    where
        S: Fn() -> U,
        A: Fn(U, V::Output) -> U,
    {
        self.reduce_with(seed, accumulate, std::convert::identity as fn(U) -> U)
    }

    /// Fold the values, then transform the result.
    pub fn reduce_with<U, W, S, A, R>(
        self,
        seed: S,
        accumulate: A,
        select: R,
    ) -> RepeatReduce<V, S, A, R>
    where
        S: Fn() -> U,
        A: Fn(U, V::Output) -> U,
        R: Fn(U) -> W,
    {
        RepeatReduce {
            inner: self.inner,
            repeat: self.repeat,
            seed,
            accumulate,
            select,
        }
    }

    /// Fold with the first value as the seed; `None` for zero matches.
    pub fn fold1<A>(self, accumulate: A) -> RepeatFold1<V, A>
    where
        A: Fn(V::Output, V::Output) -> V::Output,
    {
        RepeatFold1 {
            inner: self.inner,
            repeat: self.repeat,
            accumulate,
        }
    }

    /// Count the matches instead.
    pub fn count(self) -> RepeatCount<Unval<V>> {
        RepeatCount {
            inner: Unval::new(self.inner),
            repeat: self.repeat,
        }
    }
}

impl<V: ValParser> ValParser for RepeatValParser<V> {
    type Output = Vec<V::Output>;

    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<Self::Output>> {
        self.repeat.drive(
            ctx,
            Vec::new(),
            |ctx| self.inner.parse(ctx),
            |mut items, item| {
                items.push(item);
                items
            },
        )
    }

    fn name(&self) -> &str {
        "Repeat"
    }
}

/// Seeded reduction over a repeated value parser.
#[derive(Clone)]
pub struct RepeatReduce<V, S, A, R> {
    inner: V,
    repeat: Repeat,
    seed: S,
    accumulate: A,
    select: R,
}

impl<V, S, A, R, U, W> ValParser for RepeatReduce<V, S, A, R>
where
    V: ValParser,
    S: Fn() -> U,
    A: Fn(U, V::Output) -> U,
    R: Fn(U) -> W,
{
    type Output = W;

    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<W>> {
        let outcome = self.repeat.drive(
            ctx,
            (self.seed)(),
            |ctx| self.inner.parse(ctx),
            &self.accumulate,
        )?;
        Ok(outcome.map(&self.select))
    }

    fn name(&self) -> &str {
        "RepeatReduce"
    }
}

/// Unseeded reduction over a repeated value parser.
#[derive(Clone)]
pub struct RepeatFold1<V, A> {
    inner: V,
    repeat: Repeat,
    accumulate: A,
}

impl<V, A> ValParser for RepeatFold1<V, A>
where
    V: ValParser,
    A: Fn(V::Output, V::Output) -> V::Output,
{
    type Output = Option<V::Output>;

    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<Self::Output>> {
        self.repeat.drive(
            ctx,
            None,
            |ctx| self.inner.parse(ctx),
            |acc, item| {
                Some(match acc {
                    Some(acc) => (self.accumulate)(acc, item),
                    None => item,
                })
            },
        )
    }

    fn name(&self) -> &str {
        "RepeatFold1"
    }
}
