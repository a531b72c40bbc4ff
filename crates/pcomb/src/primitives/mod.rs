//! Primitive parsers.
//!
//! Primitives read the cursor directly and report mismatches with fixed
//! message shapes, rendering characters through [`CharDisplay`]:
//!
//! ```text
//! 'a'(97) expected but 'b'(98) found.
//! a member of class ([0-9]) expected but EOF found.
//! ```
//!
//! A primitive never rewinds on its own; enclosing combinators do.

use pcomb_core::{CharClass, CharDisplay};

use crate::{Context, ParseOutcome, ParseResult, Parser, ValParser, ValueOutcome};

#[cold]
fn expected_but_found(expected: impl std::fmt::Display, found: Option<char>) -> String {
    format!("{expected} expected but {} found.", CharDisplay(found))
}

// === Single characters ===

/// Exactly one given character.
#[derive(Clone, Copy, Debug)]
pub struct Exact {
    expected: char,
}

pub fn exact(expected: char) -> Exact {
    Exact { expected }
}

impl Parser for Exact {
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
        let actual = ctx.cursor().peek()?;
        if actual == Some(self.expected) {
            ctx.cursor().read()?;
            return Ok(ParseOutcome::success());
        }
        Ok(ParseOutcome::failure(expected_but_found(
            CharDisplay(Some(self.expected)),
            actual,
        )))
    }

    fn name(&self) -> &str {
        "Exact"
    }
}

/// One character belonging to a class.
#[derive(Clone, Debug)]
pub struct CharIn {
    class: CharClass,
}

impl CharIn {
    pub fn class(&self) -> &CharClass {
        &self.class
    }
}

pub fn char_in_class(class: CharClass) -> CharIn {
    CharIn { class }
}

pub fn char_not_in_class(class: CharClass) -> CharIn {
    char_in_class(class.complement())
}

/// One of the characters of `chars`.
pub fn char_in(chars: &str) -> CharIn {
    char_in_class(CharClass::any_of(chars.chars()))
}

/// Any character not in `chars`. Never matches end of input.
pub fn char_not_in(chars: &str) -> CharIn {
    char_not_in_class(CharClass::any_of(chars.chars()))
}

pub fn char_between(lo: char, hi: char) -> CharIn {
    char_in_class(CharClass::between(lo, hi))
}

pub fn char_not_between(lo: char, hi: char) -> CharIn {
    char_not_in_class(CharClass::between(lo, hi))
}

/// Any character except `ch`.
pub fn except(ch: char) -> CharIn {
    char_not_in_class(CharClass::exact(ch))
}

impl Parser for CharIn {
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
        let actual = ctx.cursor().peek()?;
        match actual {
            Some(ch) if self.class.contains(ch) => {
                ctx.cursor().read()?;
                Ok(ParseOutcome::success())
            }
            _ => Ok(ParseOutcome::failure(format!(
                "a member of class ({}) expected but {} found.",
                self.class,
                CharDisplay(actual)
            ))),
        }
    }

    fn name(&self) -> &str {
        "CharClass"
    }
}

// === Runs ===

/// A run of at least `min` characters from a class.
#[derive(Clone, Debug)]
pub struct CharsWhileIn {
    class: CharClass,
    min: usize,
}

pub fn chars_while_in(class: CharClass, min: usize) -> CharsWhileIn {
    CharsWhileIn { class, min }
}

pub fn chars_while_not_in(class: CharClass, min: usize) -> CharsWhileIn {
    chars_while_in(class.complement(), min)
}

impl Parser for CharsWhileIn {
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
        let count = read_while(ctx, |ch| self.class.contains(ch))?;
        if count < self.min {
            return Ok(ParseOutcome::failure(format!(
                "expected that length of char sequence is greater than or equal {}, \
                 but actualy it is {count}.",
                self.min
            )));
        }
        Ok(ParseOutcome::success())
    }

    fn name(&self) -> &str {
        "CharsWhileIn"
    }
}

/// A run of at least `min` whitespace or control characters (code <= 32).
#[derive(Clone, Copy, Debug)]
pub struct Space {
    min: usize,
}

pub fn space(min: usize) -> Space {
    Space { min }
}

impl Parser for Space {
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
        let count = read_while(ctx, |ch| ch <= ' ')?;
        if count < self.min {
            return Ok(ParseOutcome::failure(format!(
                "{count} space(s) found but more space(s) needed (min={}).",
                self.min
            )));
        }
        Ok(ParseOutcome::success())
    }

    fn name(&self) -> &str {
        "Space"
    }
}

fn read_while(ctx: &mut Context<'_>, accept: impl Fn(char) -> bool) -> ParseResult<usize> {
    let mut count = 0;
    while let Some(ch) = ctx.cursor().peek()? {
        if !accept(ch) {
            break;
        }
        ctx.cursor().read()?;
        count += 1;
    }
    Ok(count)
}

// === Boundaries ===

/// End of input.
#[derive(Clone, Copy, Debug)]
pub struct Eof;

pub fn eof() -> Eof {
    Eof
}

impl Parser for Eof {
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
        match ctx.cursor().peek()? {
            None => Ok(ParseOutcome::success()),
            found => Ok(ParseOutcome::failure(expected_but_found("EOF", found))),
        }
    }

    fn name(&self) -> &str {
        "Eof"
    }
}

/// Beginning of input.
#[derive(Clone, Copy, Debug)]
pub struct Bof;

pub fn bof() -> Bof {
    Bof
}

impl Parser for Bof {
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
        if ctx.position().is_bof() {
            return Ok(ParseOutcome::success());
        }
        let found = ctx.cursor().peek()?;
        Ok(ParseOutcome::failure(expected_but_found("BOF", found)))
    }

    fn name(&self) -> &str {
        "Bof"
    }
}

// === Values from nothing ===

/// Succeeds without consuming, yielding a clone of a value.
#[derive(Clone, Debug)]
pub struct Produce<T> {
    value: T,
}

pub fn produce<T: Clone>(value: T) -> Produce<T> {
    Produce { value }
}

impl<T: Clone> ValParser for Produce<T> {
    type Output = T;

    fn do_parse(&self, _ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<T>> {
        Ok(ValueOutcome::success(self.value.clone()))
    }

    fn name(&self) -> &str {
        "Produce"
    }
}

/// Succeeds without consuming, yielding `make()`.
#[derive(Clone)]
pub struct ProduceWith<F> {
    make: F,
}

pub fn produce_with<T, F: Fn() -> T>(make: F) -> ProduceWith<F> {
    ProduceWith { make }
}

impl<T, F: Fn() -> T> ValParser for ProduceWith<F> {
    type Output = T;

    fn do_parse(&self, _ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<T>> {
        Ok(ValueOutcome::success((self.make)()))
    }

    fn name(&self) -> &str {
        "ProduceWith"
    }
}
