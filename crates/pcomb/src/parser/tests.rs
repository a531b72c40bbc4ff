use super::*;
use crate::{char_between, exact, Repeat};
use pcomb_core::Position;
use pretty_assertions::assert_eq;

/// A hand-written parser: one ASCII uppercase letter.
struct Upper;

impl Parser for Upper {
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
        match ctx.cursor().peek()? {
            Some(ch) if ch.is_ascii_uppercase() => {
                ctx.cursor().read()?;
                Ok(ParseOutcome::success())
            }
            _ => Ok(ParseOutcome::failure("uppercase letter expected.")),
        }
    }

    fn name(&self) -> &str {
        "Upper"
    }
}

#[test]
fn parse_attaches_span() {
    let outcome = exact('a').then(exact('b')).parse_str("ab").unwrap();
    assert_eq!(outcome.start(), Some(Position::BOF));
    assert_eq!(outcome.end(), Some(Position::new(1, 3, 2)));
}

#[test]
fn failure_span_ends_where_parsing_stopped() {
    let outcome = exact('a').then(exact('b')).parse_str("ax").unwrap();
    assert_eq!(outcome.span().map(Span::len), Some(1));
}

#[test]
fn custom_parsers_compose() {
    let name = Upper.then(char_between('a', 'z').rep(Repeat::any())).capture();
    let outcome = name.parse_str("Hello!").unwrap();
    assert_eq!(outcome.into_value().as_deref(), Some("Hello"));

    let outcome = Upper.parse_str("hello").unwrap();
    assert_eq!(outcome.message(), Some("uppercase letter expected."));
}

fn accepts<P: Parser>(parser: P, text: &str) -> bool {
    parser.parse_str(text).unwrap().is_successful()
}

#[test]
fn references_boxes_and_rcs_are_parsers() {
    let parser = exact('z');
    assert!(accepts(&parser, "z"));
    assert!(accepts(Box::new(exact('z')), "z"));
    assert!(accepts(Rc::new(exact('z')), "z"));
    assert!(!accepts(&parser, "y"));

    let dynamic: Box<dyn Parser> = Box::new(Upper);
    assert_eq!(dynamic.name(), "Upper");
    assert!(dynamic.parse_str("Q").unwrap().is_successful());

    let digit = char_between('0', '9').capture();
    assert_eq!((&digit).parse_str("4").unwrap().into_value().as_deref(), Some("4"));
}

#[test]
fn boxed_parsers_share_and_forward_names() {
    let boxed = Upper.boxed();
    let again = boxed.clone().boxed();
    assert_eq!(again.name(), "Upper");
    assert_eq!(format!("{again:?}"), "BoxedParser(Upper)");

    let value = exact('x').means(1).boxed();
    assert_eq!(format!("{value:?}"), "BoxedValParser(Means)");
    let alternatives: Vec<BoxedValParser<i32>> = vec![value, exact('y').means(2).boxed()];
    let outcomes: Vec<Option<i32>> = alternatives
        .iter()
        .map(|p| p.parse_str("y").unwrap().into_value())
        .collect();
    assert_eq!(outcomes, vec![None, Some(2)]);
}

fn value_of<V: ValParser>(parser: V, text: &str) -> Option<V::Output> {
    parser.parse_str(text).unwrap().into_value()
}

#[test]
fn references_boxes_and_rcs_are_value_parsers() {
    let digit = char_between('0', '9').capture();
    assert_eq!(value_of(&digit, "4").as_deref(), Some("4"));
    assert_eq!(value_of(Box::new(exact('t').means(true)), "t"), Some(true));
    assert_eq!(value_of(Rc::new(exact('t').means(true)), "f"), None);

    let dynamic: Box<dyn ValParser<Output = u8>> = Box::new(exact('1').means(1u8));
    assert_eq!(value_of(dynamic, "1"), Some(1));
}
