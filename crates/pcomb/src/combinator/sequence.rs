//! Sequencing.
//!
//! Every form short-circuits on the first failure. A successful sequence
//! can backtrack only if both sides can.

use super::failed;
use crate::{Context, ParseOutcome, ParseResult, Parser, ValParser, ValueOutcome};

/// `A` then `B`, both effect-only.
#[derive(Clone, Debug)]
pub struct Then<A, B> {
    left: A,
    right: B,
}

impl<A, B> Then<A, B> {
    pub(crate) fn new(left: A, right: B) -> Self {
        Then { left, right }
    }
}

impl<A: Parser, B: Parser> Parser for Then<A, B> {
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
        let left = self.left.parse(ctx)?;
        if left.is_failure() {
            return Ok(left);
        }
        let right = self.right.parse(ctx)?;
        let backtrack = left.can_backtrack() && right.can_backtrack();
        Ok(right.allow_backtrack(backtrack))
    }

    fn name(&self) -> &str {
        "Then"
    }
}

/// Effect `P` then value `V`; yields `V`'s value.
#[derive(Clone, Debug)]
pub struct IgnoreThen<P, V> {
    left: P,
    right: V,
}

impl<P, V> IgnoreThen<P, V> {
    pub(crate) fn new(left: P, right: V) -> Self {
        IgnoreThen { left, right }
    }
}

impl<P: Parser, V: ValParser> ValParser for IgnoreThen<P, V> {
    type Output = V::Output;

    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<V::Output>> {
        let left = self.left.parse(ctx)?;
        let left_backtrack = left.can_backtrack();
        if let Err(message) = left.into_result() {
            return Ok(failed(message, left_backtrack));
        }
        let right = self.right.parse(ctx)?;
        let backtrack = left_backtrack && right.can_backtrack();
        Ok(right.allow_backtrack(backtrack))
    }

    fn name(&self) -> &str {
        "IgnoreThen"
    }
}

/// Value `V` then effect `P`; yields `V`'s value.
#[derive(Clone, Debug)]
pub struct ThenIgnore<V, P> {
    left: V,
    right: P,
}

impl<V, P> ThenIgnore<V, P> {
    pub(crate) fn new(left: V, right: P) -> Self {
        ThenIgnore { left, right }
    }
}

impl<V: ValParser, P: Parser> ValParser for ThenIgnore<V, P> {
    type Output = V::Output;

    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<V::Output>> {
        let left = self.left.parse(ctx)?;
        if left.is_failure() {
            return Ok(left);
        }
        let right = self.right.parse(ctx)?;
        let backtrack = left.can_backtrack() && right.can_backtrack();
        Ok(match right.into_result() {
            Ok(()) => left.allow_backtrack(backtrack),
            Err(message) => failed(message, backtrack),
        })
    }

    fn name(&self) -> &str {
        "ThenIgnore"
    }
}

/// Value `A` then value `B`; yields `(a, b)`.
#[derive(Clone, Debug)]
pub struct Pair<A, B> {
    left: A,
    right: B,
}

impl<A, B> Pair<A, B> {
    pub(crate) fn new(left: A, right: B) -> Self {
        Pair { left, right }
    }
}

impl<A: ValParser, B: ValParser> ValParser for Pair<A, B> {
    type Output = (A::Output, B::Output);

    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<Self::Output>> {
        let left = self.left.parse(ctx)?;
        let left_backtrack = left.can_backtrack();
        let first = match left.into_result() {
            Ok(value) => value,
            Err(message) => return Ok(failed(message, left_backtrack)),
        };
        let right = self.right.parse(ctx)?;
        let backtrack = left_backtrack && right.can_backtrack();
        Ok(right.map(|second| (first, second)).allow_backtrack(backtrack))
    }

    fn name(&self) -> &str {
        "Pair"
    }
}
