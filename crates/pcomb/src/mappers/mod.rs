//! Ready-made conversions for [`try_map`](crate::ValParser::try_map).
//!
//! Each takes the captured text and returns a `Result`, so it plugs in as is:
//!
//! ```
//! use pcomb::{chars_while_in, mappers, CharClass, Parser, ValParser};
//!
//! let number = chars_while_in(CharClass::between('0', '9'), 1)
//!     .capture()
//!     .try_map(mappers::digits);
//! assert_eq!(number.parse_str("2024").unwrap().into_value(), Some(2024));
//! ```

use std::iter::Peekable;
use std::num::{ParseFloatError, ParseIntError};
use std::str::Chars;

use pcomb_core::CharDisplay;

use crate::EscapeError;

// === Numbers ===

/// Decimal integer, optionally signed.
pub fn digits<S: AsRef<str>>(text: S) -> Result<i32, ParseIntError> {
    text.as_ref().parse()
}

pub fn octal_digits<S: AsRef<str>>(text: S) -> Result<i32, ParseIntError> {
    i32::from_str_radix(text.as_ref(), 8)
}

/// Hexadecimal integer; either letter case.
pub fn hex_digits<S: AsRef<str>>(text: S) -> Result<i32, ParseIntError> {
    i32::from_str_radix(text.as_ref(), 16)
}

pub fn floating_point<S: AsRef<str>>(text: S) -> Result<f64, ParseFloatError> {
    text.as_ref().parse()
}

/// `((a, b), c)` as `(a, b, c)`, the shape left by chaining `then` twice.
pub fn flatten<A, B, C>(((a, b), c): ((A, B), C)) -> (A, B, C) {
    (a, b, c)
}

// === String literals ===

#[derive(Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Java,
    Json,
}

/// Resolve the escape sequences of a Java string literal body: the
/// single-character escapes, `\uXXXX` and octal escapes up to `\377`.
pub fn java_string<S: AsRef<str>>(text: S) -> Result<String, EscapeError> {
    unescape(text.as_ref(), Dialect::Java)
}

/// Resolve the escape sequences of a JSON string body. Surrogate pairs
/// written as two `\u` escapes become one character.
pub fn json_string<S: AsRef<str>>(text: S) -> Result<String, EscapeError> {
    unescape(text.as_ref(), Dialect::Json)
}

fn unescape(text: &str, dialect: Dialect) -> Result<String, EscapeError> {
    let mut chars = text.chars().peekable();
    let mut unescaped = String::with_capacity(text.len());
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            unescaped.push(ch);
            continue;
        }
        let resolved = match chars.next() {
            Some('u') => unicode(&mut chars)?,
            Some('/') if dialect == Dialect::Json => '/',
            Some(first) if dialect == Dialect::Java && octal_digit(first).is_some() => {
                octal(first, &mut chars)
            }
            Some(other) => control(other)?,
            None => return Err(EscapeError::UnknownEscape(CharDisplay(None))),
        };
        unescaped.push(resolved);
    }
    Ok(unescaped)
}

fn control(ch: char) -> Result<char, EscapeError> {
    Ok(match ch {
        'b' => '\u{8}',
        't' => '\t',
        'n' => '\n',
        'f' => '\u{c}',
        'r' => '\r',
        '"' | '\'' | '\\' => ch,
        _ => return Err(EscapeError::UnknownEscape(ch.into())),
    })
}

fn octal_digit(ch: char) -> Option<u8> {
    let byte = u8::try_from(ch).ok()?;
    (b'0'..=b'7').contains(&byte).then(|| byte - b'0')
}

/// Up to three octal digits; a third only after a leading `0`-`3`.
fn octal(first: char, chars: &mut Peekable<Chars<'_>>) -> char {
    let mut value = octal_digit(first).unwrap_or_default();
    let len = if value <= 3 { 3 } else { 2 };
    for _ in 1..len {
        let Some(digit) = chars.peek().copied().and_then(octal_digit) else {
            break;
        };
        chars.next();
        value = value * 8 + digit;
    }
    char::from(value)
}

fn hex4(chars: &mut Peekable<Chars<'_>>) -> Result<u32, EscapeError> {
    let mut value = 0;
    for _ in 0..4 {
        let ch = chars.next();
        let digit = ch
            .and_then(|c| c.to_digit(16))
            .ok_or(EscapeError::HexDigitExpected(CharDisplay(ch)))?;
        value = value * 16 + digit;
    }
    Ok(value)
}

const HIGH_SURROGATES: std::ops::RangeInclusive<u32> = 0xD800..=0xDBFF;
const LOW_SURROGATES: std::ops::RangeInclusive<u32> = 0xDC00..=0xDFFF;

fn unicode(chars: &mut Peekable<Chars<'_>>) -> Result<char, EscapeError> {
    let unit = hex4(chars)?;
    if !HIGH_SURROGATES.contains(&unit) {
        return char::from_u32(unit).ok_or(EscapeError::UnpairedSurrogate(unit));
    }

    // the low half must follow as another \u escape
    let mut ahead = chars.clone();
    if ahead.next() != Some('\\') || ahead.next() != Some('u') {
        return Err(EscapeError::UnpairedSurrogate(unit));
    }
    *chars = ahead;
    let low = hex4(chars)?;
    if !LOW_SURROGATES.contains(&low) {
        return Err(EscapeError::UnpairedSurrogate(unit));
    }
    let code = 0x1_0000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
    char::from_u32(code).ok_or(EscapeError::UnpairedSurrogate(unit))
}
