//! Character classes.
//!
//! A [`CharClass`] is an immutable predicate over code points, composed from
//! exact characters, ranges, unions and complements. Unions of ranges are
//! normalized eagerly: ranges are kept sorted by lower bound and no two of
//! them overlap or touch, so building a class from thousands of `plus` calls
//! still yields the minimal representation and membership is a binary search.
//!
//! End of input is not a code point; parsers decide what EOF means for a
//! class, the class itself never contains it.

use std::fmt;

// === Ranges ===

/// An inclusive range of characters. `start <= end` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CharRange {
    start: char,
    end: char,
}

impl CharRange {
    /// Range between two bounds given in either order.
    #[inline]
    pub fn new(a: char, b: char) -> Self {
        if a <= b {
            CharRange { start: a, end: b }
        } else {
            CharRange { start: b, end: a }
        }
    }

    #[inline]
    pub const fn single(ch: char) -> Self {
        CharRange { start: ch, end: ch }
    }

    #[inline]
    pub const fn start(self) -> char {
        self.start
    }

    #[inline]
    pub const fn end(self) -> char {
        self.end
    }

    #[inline]
    pub fn contains(self, ch: char) -> bool {
        self.start <= ch && ch <= self.end
    }

    /// Merge `next` into `self` if they overlap or are adjacent.
    ///
    /// Callers pass ranges in ascending order of `start`.
    fn merge_with(self, next: CharRange) -> Option<CharRange> {
        if u32::from(next.start) <= u32::from(self.end) + 1 {
            Some(CharRange {
                start: self.start,
                end: self.end.max(next.end),
            })
        } else {
            None
        }
    }
}

impl fmt::Display for CharRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_escaped(f, self.start)?;
        if self.start != self.end {
            f.write_str("-")?;
            write_escaped(f, self.end)?;
        }
        Ok(())
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, ch: char) -> fmt::Result {
    match ch {
        '[' | ']' | '\\' | '^' => write!(f, "\\{ch}"),
        c if c.is_control() => write!(f, "{}", c.escape_default()),
        c => write!(f, "{c}"),
    }
}

/// Sort and coalesce ranges into the minimal disjoint, non-adjacent form.
fn merge(mut ranges: Vec<CharRange>) -> Vec<CharRange> {
    if ranges.len() < 2 {
        return ranges;
    }
    ranges.sort_unstable_by_key(|r| r.start);

    let mut merged: Vec<CharRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(top) => match top.merge_with(range) {
                Some(joined) => *top = joined,
                None => merged.push(range),
            },
            None => merged.push(range),
        }
    }
    merged
}

// === Classes ===

/// A composable set of characters.
#[derive(Clone, Debug)]
pub struct CharClass(Repr);

#[derive(Clone, Debug)]
enum Repr {
    Exact(char),
    /// Sorted, disjoint, non-adjacent. Empty matches nothing.
    Ranges(Vec<CharRange>),
    /// Never nested. At most one `Ranges` member, always first.
    Union(Vec<CharClass>),
    Complement(Box<CharClass>),
}

impl CharClass {
    /// The class of exactly one character.
    #[inline]
    pub const fn exact(ch: char) -> Self {
        CharClass(Repr::Exact(ch))
    }

    /// All characters from `lo` to `hi` inclusive (bounds in either order).
    pub fn between(lo: char, hi: char) -> Self {
        CharClass(Repr::Ranges(vec![CharRange::new(lo, hi)]))
    }

    /// Any of the given characters.
    pub fn any_of(chars: impl IntoIterator<Item = char>) -> Self {
        Self::from_ranges(chars.into_iter().map(CharRange::single))
    }

    /// Union of arbitrary ranges.
    pub fn from_ranges(ranges: impl IntoIterator<Item = CharRange>) -> Self {
        CharClass(Repr::Ranges(merge(ranges.into_iter().collect())))
    }

    /// The class that matches nothing.
    pub const fn empty() -> Self {
        CharClass(Repr::Ranges(Vec::new()))
    }

    /// Membership test.
    #[inline]
    pub fn contains(&self, ch: char) -> bool {
        self.0.contains(ch)
    }

    /// The normalized ranges, when this class is a plain range set.
    pub fn ranges(&self) -> Option<&[CharRange]> {
        match &self.0 {
            Repr::Ranges(ranges) => Some(ranges),
            _ => None,
        }
    }

    /// Characters in either class.
    #[must_use]
    pub fn union(self, other: CharClass) -> CharClass {
        match (self.0, other.0) {
            (Repr::Exact(a), Repr::Exact(b)) if a == b => CharClass::exact(a),
            (Repr::Exact(ch), other) | (other, Repr::Exact(ch))
                if other.contains(ch) =>
            {
                CharClass(other)
            }
            (Repr::Ranges(mut a), Repr::Ranges(b)) => {
                a.extend(b);
                CharClass(Repr::Ranges(merge(a)))
            }
            (a, b) => {
                let mut ranges = Vec::new();
                let mut others = Vec::new();
                CharClass(a).decompose(&mut ranges, &mut others);
                CharClass(b).decompose(&mut ranges, &mut others);
                Self::assemble(merge(ranges), others)
            }
        }
    }

    /// This class plus one character.
    #[must_use]
    pub fn plus(self, ch: char) -> CharClass {
        if self.contains(ch) {
            return self;
        }
        match self.0 {
            Repr::Exact(c) => CharClass::from_ranges([CharRange::single(c), CharRange::single(ch)]),
            Repr::Ranges(mut ranges) => {
                ranges.push(CharRange::single(ch));
                CharClass(Repr::Ranges(merge(ranges)))
            }
            repr => CharClass(repr).union(CharClass::exact(ch)),
        }
    }

    /// Characters not in this class. Double complement cancels out.
    #[must_use]
    pub fn complement(self) -> CharClass {
        match self.0 {
            Repr::Complement(inner) => *inner,
            repr => CharClass(Repr::Complement(Box::new(CharClass(repr)))),
        }
    }

    /// Split into plain ranges and everything that cannot be flattened.
    fn decompose(self, ranges: &mut Vec<CharRange>, others: &mut Vec<CharClass>) {
        match self.0 {
            Repr::Exact(ch) => ranges.push(CharRange::single(ch)),
            Repr::Ranges(rs) => ranges.extend(rs),
            Repr::Union(members) => {
                for member in members {
                    member.decompose(ranges, others);
                }
            }
            Repr::Complement(_) => others.push(self),
        }
    }

    fn assemble(ranges: Vec<CharRange>, mut others: Vec<CharClass>) -> CharClass {
        if others.is_empty() {
            return CharClass(Repr::Ranges(ranges));
        }
        if !ranges.is_empty() {
            others.insert(0, CharClass(Repr::Ranges(ranges)));
        }
        if others.len() == 1 {
            if let Some(only) = others.pop() {
                return only;
            }
        }
        CharClass(Repr::Union(others))
    }
}

impl Repr {
    fn contains(&self, ch: char) -> bool {
        match self {
            Repr::Exact(c) => *c == ch,
            Repr::Ranges(ranges) => ranges_contain(ranges, ch),
            Repr::Union(members) => members.iter().any(|m| m.contains(ch)),
            Repr::Complement(inner) => !inner.contains(ch),
        }
    }
}

#[inline]
fn ranges_contain(ranges: &[CharRange], ch: char) -> bool {
    // first range whose end is >= ch
    let at = ranges.partition_point(|r| r.end < ch);
    ranges.get(at).is_some_and(|r| r.start <= ch)
}

impl From<char> for CharClass {
    fn from(ch: char) -> Self {
        CharClass::exact(ch)
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Exact(ch) => {
                f.write_str("'")?;
                write_escaped(f, *ch)?;
                f.write_str("'")
            }
            Repr::Ranges(ranges) => {
                f.write_str("[")?;
                for range in ranges {
                    write!(f, "{range}")?;
                }
                f.write_str("]")
            }
            Repr::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" or ")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
            Repr::Complement(inner) => write!(f, "not {inner}"),
        }
    }
}
