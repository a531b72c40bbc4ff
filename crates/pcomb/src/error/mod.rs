//! Error types.
//!
//! Two channels, kept strictly apart:
//!
//! - [`GrammarError`]: a parser could not be *built* (bad keyword set, bad
//!   repetition bounds). Reported by fallible constructors, never while
//!   parsing.
//! - [`ParseError`]: a parse had to be *aborted* because the input could
//!   not be read or a mapping callback opted into raising.
//!
//! Ordinary mismatches are neither: they are failed
//! [`ParseOutcome`](crate::ParseOutcome)s and travel as return values.
//! [`EscapeError`] belongs to the [`mappers`](crate::mappers) and reaches a
//! parse only through `try_map`, as a failure message.

use std::io;

use pcomb_core::CharDisplay;
use thiserror::Error;

/// Invalid arguments to a parser constructor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("keyword must not be empty")]
    EmptyKeyword,

    #[error("keyword set must not be empty")]
    EmptyKeywordSet,

    #[error("keyword set contains {0:?} more than once")]
    DuplicateKeyword(String),

    #[error("cut index {index} is out of range for keyword {keyword:?}")]
    CutIndexOutOfRange { keyword: String, index: usize },

    #[error("invalid repetition bounds (min={min}, max={max})")]
    InvalidRepeat { min: usize, max: usize },
}

/// A fault that aborts the whole parse.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The character source failed.
    #[error("failed to read input: {0}")]
    Source(#[from] io::Error),

    /// A raising mapping callback returned an error.
    #[error("mapping callback failed: {0}")]
    Mapping(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A malformed escape sequence in a string literal body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EscapeError {
    #[error("unknown escape sequence '\\' + {0} found.")]
    UnknownEscape(CharDisplay),

    #[error("[0-9A-Fa-f] expected but {0} found.")]
    HexDigitExpected(CharDisplay),

    #[error("unpaired surrogate \\u{0:04X} found.")]
    UnpairedSurrogate(u32),
}

/// Return type of every `parse` / `do_parse`.
pub type ParseResult<T> = Result<T, ParseError>;
