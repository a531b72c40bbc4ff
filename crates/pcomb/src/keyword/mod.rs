//! Keyword matching.
//!
//! - [`keyword`] / [`keyword_with_cut`]: one literal string
//! - [`keyword_in`]: any of a set, single pass over the input
//! - [`keyword_in_composed`]: any of a set, as a chain of cut keywords
//!
//! # Single-pass matching
//!
//! The set is sorted and each keyword remembers its *fork offset*: the
//! first index where it differs from its lexicographic successor (or the
//! shorter length, when one is a prefix of the other).
//!
//! ```text
//! aaab  fork 2
//! aabb  fork 2
//! aacc  fork 1
//! abbb  fork 0
//! ccbb  (last)
//! ```
//!
//! Matching walks one candidate at a time. On a mismatch at offset `i`, if
//! `i <= fork` the successor shares everything read so far, so the walk
//! moves on to it without re-reading. Otherwise no later keyword can match
//! either, because they all diverged from the current one before `i`.
//! Each input character is read once.

use pcomb_core::CharDisplay;

use crate::combinator::Or;
use crate::{BoxedParser, Context, GrammarError, ParseOutcome, ParseResult, Parser};

#[cold]
fn mismatch(expected: char, found: Option<char>) -> ParseOutcome {
    ParseOutcome::failure(format!(
        "{} expected but {} found.",
        CharDisplay(Some(expected)),
        CharDisplay(found)
    ))
}

// === Single keyword ===

/// A literal string.
#[derive(Clone, Debug)]
pub struct Keyword {
    text: String,
    chars: Vec<char>,
    /// Mismatches at or after this offset are not backtrackable.
    cut_index: Option<usize>,
}

/// Match `text` literally.
pub fn keyword(text: &str) -> Result<Keyword, GrammarError> {
    if text.is_empty() {
        return Err(GrammarError::EmptyKeyword);
    }
    Ok(Keyword {
        text: text.to_owned(),
        chars: text.chars().collect(),
        cut_index: None,
    })
}

/// Match `text` literally, committing once `cut_index` characters matched.
///
/// `cut_index` may equal the keyword length, which never cuts.
pub fn keyword_with_cut(text: &str, cut_index: usize) -> Result<Keyword, GrammarError> {
    let mut parsed = keyword(text)?;
    if cut_index > parsed.chars.len() {
        return Err(GrammarError::CutIndexOutOfRange {
            keyword: parsed.text,
            index: cut_index,
        });
    }
    parsed.cut_index = Some(cut_index);
    Ok(parsed)
}

impl Keyword {
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Parser for Keyword {
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
        for (i, &expected) in self.chars.iter().enumerate() {
            let actual = ctx.cursor().peek()?;
            if actual != Some(expected) {
                let committed = self.cut_index.is_some_and(|cut| i >= cut);
                return Ok(mismatch(expected, actual).allow_backtrack(!committed));
            }
            ctx.cursor().read()?;
        }
        Ok(ParseOutcome::success())
    }

    fn name(&self) -> &str {
        "Keyword"
    }
}

// === Keyword sets ===

/// Validate, sort and check a keyword set for duplicates.
fn sorted_set(keywords: &[&str]) -> Result<Vec<Vec<char>>, GrammarError> {
    if keywords.is_empty() {
        return Err(GrammarError::EmptyKeywordSet);
    }
    if keywords.iter().any(|k| k.is_empty()) {
        return Err(GrammarError::EmptyKeyword);
    }
    let mut sorted: Vec<&str> = keywords.to_vec();
    sorted.sort_unstable();
    if let Some(pair) = sorted.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(GrammarError::DuplicateKeyword(pair[0].to_owned()));
    }
    Ok(sorted.into_iter().map(|k| k.chars().collect()).collect())
}

/// Index of the first differing character, or the shorter length.
fn common_prefix_len(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

#[derive(Clone, Debug)]
struct Entry {
    chars: Vec<char>,
    /// `None` for the last keyword.
    fork: Option<usize>,
}

/// Any keyword of a set, matched in a single pass. Prefers the shortest
/// keyword when one is a prefix of another.
#[derive(Clone, Debug)]
pub struct KeywordIn {
    entries: Vec<Entry>,
}

pub fn keyword_in(keywords: &[&str]) -> Result<KeywordIn, GrammarError> {
    let sorted = sorted_set(keywords)?;
    let forks: Vec<Option<usize>> = sorted
        .windows(2)
        .map(|pair| Some(common_prefix_len(&pair[0], &pair[1])))
        .chain(std::iter::once(None))
        .collect();
    let entries = sorted
        .into_iter()
        .zip(forks)
        .map(|(chars, fork)| Entry { chars, fork })
        .collect();
    Ok(KeywordIn { entries })
}

impl Parser for KeywordIn {
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
        let mut j = 0;
        let mut i = 0;
        while let Some(entry) = self.entries.get(j) {
            let Some(&expected) = entry.chars.get(i) else {
                return Ok(ParseOutcome::success());
            };
            let actual = ctx.cursor().peek()?;
            if actual == Some(expected) {
                ctx.cursor().read()?;
                i += 1;
                continue;
            }
            match entry.fork {
                Some(fork) if i <= fork => j += 1,
                _ => return Ok(mismatch(expected, actual)),
            }
        }
        // unreachable for a validated set: the last entry has no fork
        Ok(ParseOutcome::failure("expected keyword not found."))
    }

    fn name(&self) -> &str {
        "KeywordIn"
    }
}

/// Any keyword of a set, as an `or` chain of keywords cut just past their
/// common prefix with the lexicographic successor.
#[derive(Clone, Debug)]
pub struct KeywordChoice {
    chain: BoxedParser,
}

pub fn keyword_in_composed(keywords: &[&str]) -> Result<KeywordChoice, GrammarError> {
    let sorted = sorted_set(keywords)?;
    let mut alternatives = Vec::with_capacity(sorted.len());
    for (i, chars) in sorted.iter().enumerate() {
        let text: String = chars.iter().collect();
        let parsed = match sorted.get(i + 1) {
            Some(next) => {
                let cut = (common_prefix_len(chars, next) + 1).min(chars.len());
                keyword_with_cut(&text, cut)?
            }
            None => keyword(&text)?,
        };
        alternatives.push(parsed);
    }

    // fold from the right: every cut keyword is the left side of the
    // outermost `or` still holding its successors, so a cut failure skips
    // all of them
    let mut rest = alternatives.into_iter().rev();
    let Some(last) = rest.next() else {
        return Err(GrammarError::EmptyKeywordSet);
    };
    let chain = rest.fold(last.boxed(), |tail, head| Or::new(head, tail).boxed());
    Ok(KeywordChoice { chain })
}

impl Parser for KeywordChoice {
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
        self.chain.parse(ctx)
    }

    fn name(&self) -> &str {
        "KeywordChoice"
    }
}
