use super::*;
use crate::{
    char_between, char_in, eof, exact, keyword, produce, space, Context, GrammarError, ParseError,
    ParseResult, Parser, ValParser,
};
use pretty_assertions::assert_eq;

fn run<P: Parser>(parser: &P, text: &str) -> (ParseOutcome, usize) {
    let mut ctx = Context::from_text(text);
    let outcome = parser.parse(&mut ctx).unwrap();
    assert_eq!(ctx.cursor().mark_depth(), 0, "combinator leaked a mark");
    (outcome, ctx.position().index())
}

fn run_val<V: ValParser>(parser: &V, text: &str) -> (ValueOutcome<V::Output>, usize) {
    let mut ctx = Context::from_text(text);
    let outcome = parser.parse(&mut ctx).unwrap();
    assert_eq!(ctx.cursor().mark_depth(), 0, "combinator leaked a mark");
    (outcome, ctx.position().index())
}

fn digit() -> impl ValParser<Output = u32> + Clone {
    char_between('0', '9')
        .capture()
        .map(|s| s.chars().next().and_then(|c| c.to_digit(10)).unwrap_or(0))
}

// === Sequence ===

#[test]
fn then_consumes_both() {
    let (outcome, end) = run(&exact('a').then(exact('b')), "abc");
    assert!(outcome.is_successful());
    assert!(outcome.can_backtrack());
    assert_eq!(end, 2);
}

#[test]
fn then_short_circuits() {
    let (outcome, end) = run(&exact('x').then(exact('b')), "ab");
    assert_eq!(outcome.message(), Some("'x'(120) expected but 'a'(97) found."));
    assert_eq!(end, 0);
}

#[test]
fn then_ands_backtrack_flags() {
    let (outcome, _) = run(&exact('a').cut().then(exact('b')), "ab");
    assert!(outcome.is_successful());
    assert!(!outcome.can_backtrack());

    let (outcome, _) = run(&exact('a').cut().then(exact('c')), "ab");
    assert!(outcome.is_failure());
    assert!(!outcome.can_backtrack());
}

#[test]
fn pair_yields_both_values() {
    let (outcome, end) = run_val(&digit().then(digit()), "42");
    assert_eq!(outcome.into_value(), Some((4, 2)));
    assert_eq!(end, 2);
}

#[test]
fn ignore_then_and_then_ignore() {
    let bracketed = exact('[').ignore_then(digit()).then_ignore(exact(']'));
    let (outcome, end) = run_val(&bracketed, "[7]");
    assert_eq!(outcome.into_value(), Some(7));
    assert_eq!(end, 3);

    let (outcome, _) = run_val(&bracketed, "[7)");
    assert_eq!(outcome.message(), Some("']'(93) expected but ')'(41) found."));
}

// === Choice ===

#[test]
fn or_tries_alternative_after_soft_failure() {
    let grammar = exact('a').then(exact('b')).or(exact('a').then(exact('c')));
    let (outcome, end) = run(&grammar, "ac");
    assert!(outcome.is_successful());
    assert_eq!(end, 2);
}

#[test]
fn or_reports_right_failure() {
    let (outcome, end) = run(&exact('a').or(exact('b')), "c");
    assert_eq!(outcome.message(), Some("'b'(98) expected but 'c'(99) found."));
    assert_eq!(end, 0);
}

#[test]
fn cut_prevents_fall_through() {
    let grammar = exact('0')
        .cut()
        .then(exact('1'))
        .or(exact('0').then(exact('2')));
    let (outcome, end) = run(&grammar, "02");
    assert!(outcome.is_failure());
    assert_eq!(outcome.message(), Some("'1'(49) expected but '2'(50) found."));
    assert_eq!(end, 1);

    let (outcome, _) = run(&grammar, "01");
    assert!(outcome.is_successful());
}

#[test]
fn cut_failure_leaves_or_backtrackable() {
    let (outcome, _) = run(&exact('0').cut().then(exact('1')).or(exact('x')), "02");
    assert!(outcome.is_failure());
    assert!(outcome.can_backtrack());
}

#[test]
fn cut_commits_only_the_nearest_choice() {
    let committed = exact('0').cut().then(exact('1'));
    let grammar = committed.or(exact('x')).or(exact('0').then(exact('2')));
    let (outcome, end) = run(&grammar, "02");
    assert!(outcome.is_successful());
    assert_eq!(end, 2);

    let grammar = exact('a')
        .cut()
        .then(exact('b'))
        .or(exact('c'))
        .or(exact('a').then(exact('x')));
    let (outcome, end) = run(&grammar, "ax");
    assert!(outcome.is_successful());
    assert_eq!(end, 2);
}

#[test]
fn or_success_restores_backtracking() {
    let grammar = exact('a').cut().or(exact('b'));
    let (outcome, _) = run(&grammar, "a");
    assert!(outcome.is_successful());
    assert!(outcome.can_backtrack());
}

#[test]
fn cut_keeps_failure_flag() {
    let (outcome, _) = run(&exact('a').cut(), "b");
    assert!(outcome.is_failure());
    assert!(outcome.can_backtrack());
}

#[test]
fn or_on_values() {
    let grammar = keyword("yes").unwrap().means(true).or(keyword("no").unwrap().means(false));
    assert_eq!(run_val(&grammar, "no").0.into_value(), Some(false));
    assert_eq!(run_val(&grammar, "yes").0.into_value(), Some(true));
}

#[test]
fn effect_or_value() {
    let sign = exact('+').or_value(digit());
    assert_eq!(run_val(&sign, "+").0.into_value(), Some(None));
    assert_eq!(run_val(&sign, "7").0.into_value(), Some(Some(7)));

    let (outcome, end) = run_val(&sign, "x");
    assert_eq!(outcome.message(), Some("a member of class ([0-9]) expected but 'x'(120) found."));
    assert_eq!(end, 0);
}

#[test]
fn value_or_effect() {
    let cell = digit().or_effect(exact('-'));
    assert_eq!(run_val(&cell, "4").0.into_value(), Some(Some(4)));
    assert_eq!(run_val(&cell, "-").0.into_value(), Some(None));
    assert_eq!(
        run_val(&cell, "x").0.message(),
        Some("'-'(45) expected but 'x'(120) found.")
    );
}

#[test]
fn mixed_or_keeps_cut_failures() {
    let grammar = exact('a').cut().then(exact('b')).or_value(exact('a').means(1));
    let (outcome, end) = run_val(&grammar, "ac");
    assert!(outcome.is_failure());
    assert!(outcome.can_backtrack());
    assert_eq!(outcome.message(), Some("'b'(98) expected but 'c'(99) found."));
    assert_eq!(end, 1);

    let grammar = exact('a').cut().ignore_then(digit()).or_effect(exact('a'));
    let (outcome, _) = run_val(&grammar, "ax");
    assert!(outcome.is_failure());
    assert_eq!(outcome.message(), Some("a member of class ([0-9]) expected but 'x'(120) found."));
}

// === Optional ===

#[test]
fn opt_never_fails_and_rewinds() {
    let (outcome, end) = run(&exact('a').then(exact('b')).opt(), "ac");
    assert!(outcome.is_successful());
    assert_eq!(end, 0);

    let (outcome, end) = run(&exact('a').then(exact('b')).opt(), "ab");
    assert!(outcome.is_successful());
    assert_eq!(end, 2);
}

#[test]
fn opt_on_values() {
    let (outcome, end) = run_val(&digit().opt(), "x");
    assert_eq!(outcome.into_value(), Some(None));
    assert_eq!(end, 0);
    assert_eq!(run_val(&digit().opt(), "5").0.into_value(), Some(Some(5)));
}

// === Lookahead / negation ===

#[test]
fn lookahead_never_consumes() {
    let (outcome, end) = run(&lookahead(exact('a').then(exact('b'))), "ab");
    assert!(outcome.is_successful());
    assert_eq!(end, 0);

    let (outcome, end) = run(&lookahead(exact('a').then(exact('b'))), "ax");
    assert_eq!(outcome.message(), Some("'b'(98) expected but 'x'(120) found."));
    assert_eq!(end, 0);
}

#[test]
fn not_inverts() {
    let (outcome, end) = run(&not(exact('a')), "ab");
    assert_eq!(outcome.message(), Some("invalid token found."));
    assert_eq!(end, 0);

    let (outcome, end) = run(&not(exact('a')).then(exact('b')), "b");
    assert!(outcome.is_successful());
    assert_eq!(end, 1);
}

// === Values ===

#[test]
fn capture_returns_consumed_text() {
    let ident = char_between('a', 'z').rep(Repeat::at_least(1)).capture();
    let (outcome, end) = run_val(&ident, "hello world");
    assert_eq!(outcome.value().map(String::as_str), Some("hello"));
    assert_eq!(end, 5);
}

#[test]
fn capture_inside_outer_mark() {
    let grammar = exact('a')
        .capture()
        .then(exact('b').capture())
        .or(produce(("x".to_owned(), "y".to_owned())));
    let (outcome, _) = run_val(&grammar, "ab");
    assert_eq!(outcome.into_value(), Some(("a".to_owned(), "b".to_owned())));
}

#[test]
fn means_and_means_with() {
    assert_eq!(run_val(&exact('t').means(1u8), "t").0.into_value(), Some(1));
    let (outcome, _) = run_val(&exact('t').means_with(Vec::<u8>::new), "f");
    assert!(outcome.is_failure());
}

#[test]
fn parser_map_maps_text() {
    let number = char_between('0', '9')
        .rep(Repeat::at_least(1))
        .map(|s| s.parse::<u32>().unwrap_or(0));
    assert_eq!(run_val(&number, "1234;").0.into_value(), Some(1234));
}

#[test]
fn try_map_converts_errors() {
    let byte = char_between('0', '9')
        .rep(Repeat::at_least(1))
        .capture()
        .try_map(|s| s.parse::<u8>());
    assert_eq!(run_val(&byte, "200").0.into_value(), Some(200));
    let (outcome, _) = run_val(&byte, "300");
    assert_eq!(
        outcome.message(),
        Some("an error has occurred while mapping: number too large to fit in target type ")
    );
}

#[test]
fn try_map_raising_aborts() {
    let byte = char_between('0', '9')
        .rep(Repeat::at_least(1))
        .capture()
        .try_map_raising(|s| s.parse::<u8>());
    let result = byte.parse(&mut Context::from_text("300"));
    assert!(matches!(result, Err(ParseError::Mapping(_))));
    assert_eq!(byte.parse_str("12").unwrap().into_value(), Some(12));
}

#[test]
fn flat_map_continues_from_same_position() {
    // a digit n followed by exactly n 'x'
    let counted = digit().flat_map(|n| {
        exact('x')
            .rep(Repeat::exactly(n as usize).unwrap_or_else(|_| Repeat::any()))
            .count()
    });
    let (outcome, end) = run_val(&counted, "3xxx");
    assert_eq!(outcome.into_value(), Some(3));
    assert_eq!(end, 4);

    let (outcome, _) = run_val(&counted, "3xx");
    assert!(outcome.is_failure());
}

#[test]
fn unval_drops_value() {
    let (outcome, end) = run(&digit().unval().then(eof()), "8");
    assert!(outcome.is_successful());
    assert_eq!(end, 1);
}

// === Repetition ===

#[test]
fn repeat_bounds_are_validated() {
    assert_eq!(
        Repeat::range(3, 1).err(),
        Some(GrammarError::InvalidRepeat { min: 3, max: 1 })
    );
    assert!(Repeat::exactly(0).is_err());
    assert!(Repeat::at_most(0).is_err());
    assert_eq!(Repeat::at_least(2).max(), None);
    assert_eq!(Repeat::range(1, 4).map(|r| (r.min(), r.max())).ok(), Some((1, Some(4))));
}

#[test]
fn repeat_collects_until_failure() {
    let (outcome, end) = run_val(&digit().rep(Repeat::any()), "123a");
    assert_eq!(outcome.into_value(), Some(vec![1, 2, 3]));
    assert_eq!(end, 3);
}

#[test]
fn repeat_below_min_fails() {
    let (outcome, _) = run_val(&digit().rep(Repeat::at_least(3)), "12a");
    assert_eq!(outcome.message(), Some("a member of class ([0-9]) expected but 'a'(97) found."));
}

#[test]
fn repeat_stops_at_max() {
    let (outcome, end) = run_val(&digit().rep(Repeat::range(1, 2).unwrap()), "12345");
    assert_eq!(outcome.into_value(), Some(vec![1, 2]));
    assert_eq!(end, 2);
}

#[test]
fn repeat_exactly() {
    let three = digit().rep(Repeat::exactly(3).unwrap());
    assert_eq!(run_val(&three, "1234").0.into_value(), Some(vec![1, 2, 3]));
    assert!(run_val(&three, "12").0.is_failure());
}

#[test]
fn repeat_with_separator() {
    let list = digit().rep(Repeat::any().separated_by(exact(',')));
    let (outcome, end) = run_val(&list, "1,2,3");
    assert_eq!(outcome.into_value(), Some(vec![1, 2, 3]));
    assert_eq!(end, 5);

    let (outcome, end) = run_val(&list, "1,2,");
    assert_eq!(outcome.into_value(), Some(vec![1, 2]));
    assert_eq!(end, 3);

    let (outcome, end) = run_val(&list, "");
    assert_eq!(outcome.into_value(), Some(vec![]));
    assert_eq!(end, 0);
}

#[test]
fn separator_failure_below_min_fails() {
    let list = digit().rep(Repeat::at_least(3).separated_by(exact(',')));
    let (outcome, _) = run_val(&list, "1,2;3");
    assert_eq!(outcome.message(), Some("','(44) expected but ';'(59) found."));
}

#[test]
fn repeat_keeps_cut_of_mandatory_failure() {
    let item = exact('a').cut().then(exact('b'));
    let (outcome, _) = run(&item.rep(Repeat::at_least(2)), "abac");
    assert!(outcome.is_failure());
    assert!(!outcome.can_backtrack());
}

#[test]
fn repeat_carries_earlier_cut_into_mandatory_failure() {
    let twice = exact('a').cut().rep(Repeat::exactly(2).unwrap());
    let (outcome, _) = run(&twice, "ab");
    assert!(outcome.is_failure());
    assert!(!outcome.can_backtrack());

    let grammar = twice.or(exact('a').then(exact('b')));
    let (outcome, end) = run(&grammar, "ab");
    assert!(outcome.is_failure());
    assert_eq!(outcome.message(), Some("'a'(97) expected but 'b'(98) found."));
    assert_eq!(end, 1);
}

#[test]
fn repeat_carries_separator_cut_into_mandatory_failure() {
    let pair = exact('a').rep(Repeat::exactly(2).unwrap().separated_by(exact(',').cut()));
    let (outcome, _) = run(&pair, "a,b");
    assert!(outcome.is_failure());
    assert!(!outcome.can_backtrack());

    let grammar = pair.or(exact('a').then(exact(',')).then(exact('b')));
    let (outcome, end) = run(&grammar, "a,b");
    assert!(outcome.is_failure());
    assert_eq!(outcome.message(), Some("'a'(97) expected but 'b'(98) found."));
    assert_eq!(end, 2);
}

#[test]
fn repeat_of_empty_match_terminates() {
    let (outcome, end) = run(&exact('a').opt().rep(Repeat::any()), "aab");
    assert!(outcome.is_successful());
    assert_eq!(end, 2);
}

#[test]
fn effect_repeat_and_count() {
    let (outcome, end) = run(&space(1).rep(Repeat::any()), "   x");
    assert!(outcome.is_successful());
    assert_eq!(end, 3);

    let count = char_in("ab").rep(Repeat::any()).count();
    assert_eq!(run_val(&count, "abbax").0.into_value(), Some(4));
}

#[test]
fn reductions() {
    let sum = digit().rep(Repeat::any()).reduce(|| 0, |acc, d| acc + d);
    assert_eq!(run_val(&sum, "1234").0.into_value(), Some(10));

    let text = digit()
        .rep(Repeat::any())
        .reduce_with(String::new, |mut s, d| {
            s.push_str(&d.to_string());
            s
        }, |s| format!("<{s}>"));
    assert_eq!(run_val(&text, "907").0.into_value(), Some("<907>".to_owned()));

    let max = digit().rep(Repeat::any()).fold1(u32::max);
    assert_eq!(run_val(&max, "3827").0.into_value(), Some(Some(8)));
    assert_eq!(run_val(&max, "").0.into_value(), Some(None));

    let count = digit().rep(Repeat::any().separated_by(exact(','))).count();
    assert_eq!(run_val(&count, "1,2,3,").0.into_value(), Some(3));
}

// === Skipping ===

#[test]
fn skip_to_finds_target() {
    let (outcome, end) = run(&keyword("end").unwrap().skip_to(), "xx en end!");
    assert!(outcome.is_successful());
    assert_eq!(end, 9);

    let (outcome, end) = run(&exact(';').skip_to(), "abc");
    assert_eq!(outcome.message(), Some("expected token not found."));
    assert_eq!(end, 3);

    let (outcome, _) = run_val(&digit().skip_to(), "ab7");
    assert_eq!(outcome.into_value(), Some(7));
}

// === Lazy ===

fn parens() -> crate::BoxedParser {
    exact('(').then(lazy(parens)).then(exact(')')).opt().boxed()
}

#[test]
fn lazy_supports_recursion() {
    let balanced = parens().then(eof());
    assert!(run(&balanced, "((()))").0.is_successful());
    assert!(run(&balanced, "(()").0.is_failure());
}

#[test]
fn lazy_val_builds_once_per_instance() {
    use std::cell::Cell;
    use std::rc::Rc;

    let builds = Rc::new(Cell::new(0));
    let counter = Rc::clone(&builds);
    let parser = lazy_val(move || {
        counter.set(counter.get() + 1);
        digit()
    });
    let copy = parser.clone();
    assert_eq!(run_val(&parser, "1").0.into_value(), Some(1));
    assert_eq!(run_val(&copy, "2").0.into_value(), Some(2));
    assert_eq!(builds.get(), 1);
}

#[test]
fn deep_recursion_does_not_overflow() {
    let depth = 2_000;
    let text = format!("{}{}", "(".repeat(depth), ")".repeat(depth));
    let outcome: ParseResult<ParseOutcome> = parens().then(eof()).parse_str(&text);
    assert!(outcome.unwrap().is_successful());
}
