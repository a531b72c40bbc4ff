//! Combinator types.
//!
//! Each combinator is a plain struct holding its operands; the provided
//! methods on [`Parser`](crate::Parser) and [`ValParser`](crate::ValParser)
//! build them. Structs that make sense for both contracts (`Or`, `Opt`,
//! `Cut`, `SkipTo`) implement both, selected by what their operands are.
//!
//! ## Backtracking rules
//!
//! | Combinator | Success flag | Failure flag |
//! |------------|--------------|--------------|
//! | `then` / pairs | AND of both sides | failing side's flag, ANDed with a committed left side |
//! | `or` / `or_value` / `or_effect` | reset to `true` | reset to `true` (a cut failure skips only this alternative) |
//! | `cut` | `false` | unchanged |
//! | `opt` | inner flag | never fails |
//! | `lookahead` / `not` | `true` | `true` |
//! | `rep` | AND over iterations | AND over iterations up to the failing one below `min` |

mod choice;
mod lazy;
mod look;
mod map;
mod repeat;
mod sequence;

pub use choice::{Cut, Opt, Or, OrValue, SkipTo, ValueOr};
pub use lazy::{lazy, lazy_val, Lazy, LazyVal};
pub use look::{lookahead, not, Lookahead, Not};
pub use map::{Capture, FlatMap, Map, Means, MeansWith, TryMap, TryMapRaising, Unval};
pub use repeat::{Repeat, RepeatCount, RepeatFold1, RepeatParser, RepeatReduce, RepeatValParser};
pub use sequence::{IgnoreThen, Pair, Then, ThenIgnore};

use crate::{ParseOutcome, ValueOutcome};

/// What the generic combinator drivers need from an outcome.
pub(crate) trait Outcome: Sized {
    fn is_successful(&self) -> bool;
    fn can_backtrack(&self) -> bool;
    fn allow_backtrack(self, allow: bool) -> Self;
}

impl Outcome for ParseOutcome {
    #[inline]
    fn is_successful(&self) -> bool {
        ParseOutcome::is_successful(self)
    }

    #[inline]
    fn can_backtrack(&self) -> bool {
        ParseOutcome::can_backtrack(self)
    }

    #[inline]
    fn allow_backtrack(self, allow: bool) -> Self {
        ParseOutcome::allow_backtrack(self, allow)
    }
}

impl<T> Outcome for ValueOutcome<T> {
    #[inline]
    fn is_successful(&self) -> bool {
        ValueOutcome::is_successful(self)
    }

    #[inline]
    fn can_backtrack(&self) -> bool {
        ValueOutcome::can_backtrack(self)
    }

    #[inline]
    fn allow_backtrack(self, allow: bool) -> Self {
        ValueOutcome::allow_backtrack(self, allow)
    }
}

/// A failed value outcome with an explicit flag.
#[cold]
fn failed<T>(message: String, backtrack: bool) -> ValueOutcome<T> {
    ValueOutcome::failure(message).allow_backtrack(backtrack)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests unwrap parse results for brevity")]
mod tests;
