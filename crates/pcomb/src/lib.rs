//! Parser combinators with cut-aware backtracking.
//!
//! Grammars are built by composing small parsers into larger ones and run
//! against a [`Context`], which owns a backtracking [`Cursor`] over the
//! input. Two contracts cover every parser:
//!
//! - [`Parser`]: effect-only (matched / did not match)
//! - [`ValParser`]: produces a value on success
//!
//! # Backtracking and cut
//!
//! `or` rewinds and tries its alternative only when the failed branch
//! allows it. [`cut`](Parser::cut) marks the point after which a branch is
//! committed: a later failure skips the alternative of the nearest `or` and
//! is reported with its local message. Choices further out may still try
//! their own alternatives.
//!
//! ```
//! use pcomb::{exact, Parser};
//!
//! let grammar = exact('0').cut().then(exact('1'))
//!     .or(exact('0').then(exact('2')));
//! let outcome = grammar.parse_str("02").unwrap();
//! assert!(outcome.is_failure());
//! assert_eq!(outcome.message(), Some("'1'(49) expected but '2'(50) found."));
//! ```
//!
//! # Errors
//!
//! Mismatch is a failed outcome, never an `Err`. `Err(ParseError)` means the
//! parse was aborted: unreadable input, or a raising mapping callback.
//! Invalid grammar construction is reported as [`GrammarError`].

mod combinator;
mod context;
mod error;
mod keyword;
mod logging;
pub mod mappers;
mod outcome;
mod parser;
mod primitives;
mod stack;

pub use pcomb_core::{
    CharClass, CharDisplay, CharRange, CharSource, Cursor, IterSource, Position, Span, StrSource,
};

pub use combinator::{
    lazy, lazy_val, lookahead, not, Capture, Cut, FlatMap, IgnoreThen, Lazy, LazyVal, Lookahead,
    Map, Means, MeansWith, Not, Opt, Or, OrValue, Pair, Repeat, RepeatCount, RepeatFold1,
    RepeatParser, RepeatReduce, RepeatValParser, SkipTo, Then, ThenIgnore, TryMap, TryMapRaising,
    Unval, ValueOr,
};
pub use context::{Context, ContextBuilder};
pub use error::{EscapeError, GrammarError, ParseError, ParseResult};
pub use keyword::{
    keyword, keyword_in, keyword_in_composed, keyword_with_cut, Keyword, KeywordChoice, KeywordIn,
};
pub use logging::init_tracing;
pub use outcome::{ParseOutcome, ValueOutcome};
pub use parser::{BoxedParser, BoxedValParser, Parser, ValParser};
pub use primitives::{
    bof, char_between, char_in, char_in_class, char_not_between, char_not_in, char_not_in_class,
    chars_while_in, chars_while_not_in, eof, exact, except, produce, produce_with, space, Bof,
    CharIn, CharsWhileIn, Eof, Exact, Produce, ProduceWith, Space,
};

/// Skip input until `target` matches; yields the target's outcome.
pub fn skip_to<P: Parser>(target: P) -> SkipTo<P> {
    target.skip_to()
}

#[cfg(test)]
mod tests;
