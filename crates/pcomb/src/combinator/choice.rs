//! Choice, optionality, cut and skipping.

use super::Outcome;
use crate::{Context, ParseOutcome, ParseResult, Parser, ValParser, ValueOutcome};

// === Drivers shared by the effect and value forms ===

/// Try `left`; rewind and try `right` only if `left` failed softly.
///
/// A cut commits the nearest choice only: whatever leaves here is
/// backtrackable again, so an enclosing choice may still try its own
/// alternative.
fn choose<O: Outcome>(
    ctx: &mut Context<'_>,
    left: impl FnOnce(&mut Context<'_>) -> ParseResult<O>,
    right: impl FnOnce(&mut Context<'_>) -> ParseResult<O>,
) -> ParseResult<O> {
    ctx.cursor().mark();
    let first = left(ctx)?;
    if first.is_successful() || !first.can_backtrack() {
        ctx.cursor().unmark();
        return Ok(first.allow_backtrack(true));
    }
    ctx.cursor().reset(true);
    Ok(right(ctx)?.allow_backtrack(true))
}

/// Run `body`; on failure rewind and report `None`.
fn attempt<O: Outcome>(
    ctx: &mut Context<'_>,
    body: impl FnOnce(&mut Context<'_>) -> ParseResult<O>,
) -> ParseResult<Option<O>> {
    ctx.cursor().mark();
    let outcome = body(ctx)?;
    if outcome.is_successful() {
        ctx.cursor().unmark();
        Ok(Some(outcome))
    } else {
        ctx.cursor().reset(true);
        Ok(None)
    }
}

/// Commit on success, leave failures alone.
fn commit<O: Outcome>(outcome: O) -> O {
    if outcome.is_successful() {
        outcome.allow_backtrack(false)
    } else {
        outcome
    }
}

// === Or ===

/// Ordered choice.
#[derive(Clone, Debug)]
pub struct Or<A, B> {
    left: A,
    right: B,
}

impl<A, B> Or<A, B> {
    pub(crate) fn new(left: A, right: B) -> Self {
        Or { left, right }
    }
}

impl<A: Parser, B: Parser> Parser for Or<A, B> {
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
        choose(ctx, |ctx| self.left.parse(ctx), |ctx| self.right.parse(ctx))
    }

    fn name(&self) -> &str {
        "Or"
    }
}

impl<A, B> ValParser for Or<A, B>
where
    A: ValParser,
    B: ValParser<Output = A::Output>,
{
    type Output = A::Output;

    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<A::Output>> {
        choose(ctx, |ctx| self.left.parse(ctx), |ctx| self.right.parse(ctx))
    }

    fn name(&self) -> &str {
        "Or"
    }
}

// === Mixed choice ===

/// An effect parser or a value parser; the value is `None` when the effect
/// side matched.
#[derive(Clone, Debug)]
pub struct OrValue<P, V> {
    left: P,
    right: V,
}

impl<P, V> OrValue<P, V> {
    pub(crate) fn new(left: P, right: V) -> Self {
        OrValue { left, right }
    }
}

impl<P: Parser, V: ValParser> ValParser for OrValue<P, V> {
    type Output = Option<V::Output>;

    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<Self::Output>> {
        choose(
            ctx,
            |ctx| Ok(self.left.parse(ctx)?.attach_value(None)),
            |ctx| Ok(self.right.parse(ctx)?.map(Some)),
        )
    }

    fn name(&self) -> &str {
        "OrValue"
    }
}

/// A value parser or an effect parser; the value is `None` when the effect
/// side matched.
#[derive(Clone, Debug)]
pub struct ValueOr<V, P> {
    left: V,
    right: P,
}

impl<V, P> ValueOr<V, P> {
    pub(crate) fn new(left: V, right: P) -> Self {
        ValueOr { left, right }
    }
}

impl<V: ValParser, P: Parser> ValParser for ValueOr<V, P> {
    type Output = Option<V::Output>;

    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<Self::Output>> {
        choose(
            ctx,
            |ctx| Ok(self.left.parse(ctx)?.map(Some)),
            |ctx| Ok(self.right.parse(ctx)?.attach_value(None)),
        )
    }

    fn name(&self) -> &str {
        "ValueOr"
    }
}

// === Opt ===

/// Zero or one occurrence.
#[derive(Clone, Debug)]
pub struct Opt<P> {
    inner: P,
}

impl<P> Opt<P> {
    pub(crate) fn new(inner: P) -> Self {
        Opt { inner }
    }
}

impl<P: Parser> Parser for Opt<P> {
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
        let matched = attempt(ctx, |ctx| self.inner.parse(ctx))?;
        Ok(matched.unwrap_or_else(ParseOutcome::success))
    }

    fn name(&self) -> &str {
        "Opt"
    }
}

impl<V: ValParser> ValParser for Opt<V> {
    type Output = Option<V::Output>;

    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<Self::Output>> {
        let matched = attempt(ctx, |ctx| self.inner.parse(ctx))?;
        Ok(match matched {
            Some(outcome) => outcome.map(Some),
            None => ValueOutcome::success(None),
        })
    }

    fn name(&self) -> &str {
        "Opt"
    }
}

// === Cut ===

/// Disables backtracking once the inner parser succeeds.
#[derive(Clone, Debug)]
pub struct Cut<P> {
    inner: P,
}

impl<P> Cut<P> {
    pub(crate) fn new(inner: P) -> Self {
        Cut { inner }
    }
}

impl<P: Parser> Parser for Cut<P> {
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
        Ok(commit(self.inner.parse(ctx)?))
    }

    fn name(&self) -> &str {
        "Cut"
    }
}

impl<V: ValParser> ValParser for Cut<V> {
    type Output = V::Output;

    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<V::Output>> {
        Ok(commit(self.inner.parse(ctx)?))
    }

    fn name(&self) -> &str {
        "Cut"
    }
}

// === SkipTo ===

const TOKEN_NOT_FOUND: &str = "expected token not found.";

/// Discards characters until the inner parser matches, then yields its
/// outcome. Fails at end of input.
#[derive(Clone, Debug)]
pub struct SkipTo<P> {
    target: P,
}

impl<P> SkipTo<P> {
    pub(crate) fn new(target: P) -> Self {
        SkipTo { target }
    }
}

fn skip_until<O: Outcome>(
    ctx: &mut Context<'_>,
    mut target: impl FnMut(&mut Context<'_>) -> ParseResult<O>,
) -> ParseResult<Option<O>> {
    loop {
        if let Some(found) = attempt(ctx, &mut target)? {
            return Ok(Some(found));
        }
        if ctx.cursor().read()?.is_none() {
            return Ok(None);
        }
    }
}

impl<P: Parser> Parser for SkipTo<P> {
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
        let found = skip_until(ctx, |ctx| self.target.parse(ctx))?;
        Ok(found.unwrap_or_else(|| ParseOutcome::failure(TOKEN_NOT_FOUND)))
    }

    fn name(&self) -> &str {
        "SkipTo"
    }
}

impl<V: ValParser> ValParser for SkipTo<V> {
    type Output = V::Output;

    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<V::Output>> {
        let found = skip_until(ctx, |ctx| self.target.parse(ctx))?;
        Ok(found.unwrap_or_else(|| ValueOutcome::failure(TOKEN_NOT_FOUND)))
    }

    fn name(&self) -> &str {
        "SkipTo"
    }
}
