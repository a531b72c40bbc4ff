//! Zero-width assertions. Neither form ever consumes input.

use crate::{Context, ParseOutcome, ParseResult, Parser};

/// Succeeds iff `inner` would succeed here.
#[derive(Clone, Debug)]
pub struct Lookahead<P> {
    inner: P,
}

/// Succeeds iff `inner` would succeed here, without consuming anything.
pub fn lookahead<P: Parser>(inner: P) -> Lookahead<P> {
    Lookahead { inner }
}

impl<P: Parser> Parser for Lookahead<P> {
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
        ctx.cursor().mark();
        let outcome = self.inner.parse(ctx)?;
        ctx.cursor().reset(true);
        Ok(match outcome.into_result() {
            Ok(()) => ParseOutcome::success(),
            Err(message) => ParseOutcome::failure(message),
        })
    }

    fn name(&self) -> &str {
        "Lookahead"
    }
}

/// Succeeds iff `inner` fails here.
#[derive(Clone, Debug)]
pub struct Not<P> {
    inner: P,
}

/// Succeeds iff `inner` fails here, without consuming anything.
pub fn not<P: Parser>(inner: P) -> Not<P> {
    Not { inner }
}

impl<P: Parser> Parser for Not<P> {
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
        ctx.cursor().mark();
        let outcome = self.inner.parse(ctx)?;
        ctx.cursor().reset(true);
        if outcome.is_successful() {
            Ok(ParseOutcome::failure("invalid token found."))
        } else {
            Ok(ParseOutcome::success())
        }
    }

    fn name(&self) -> &str {
        "Not"
    }
}
