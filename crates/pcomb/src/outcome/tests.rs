use super::*;
use pretty_assertions::assert_eq;

fn span() -> Span {
    Span::new(Position::BOF, Position::new(1, 4, 3))
}

// === ParseOutcome ===

#[test]
fn success_defaults() {
    let outcome = ParseOutcome::success();
    assert!(outcome.is_successful());
    assert!(!outcome.is_failure());
    assert!(outcome.can_backtrack());
    assert_eq!(outcome.message(), None);
    assert_eq!(outcome.span(), None);
}

#[test]
fn failure_carries_message() {
    let outcome = ParseOutcome::failure("nope");
    assert!(outcome.is_failure());
    assert!(outcome.can_backtrack());
    assert_eq!(outcome.message(), Some("nope"));
    assert_eq!(outcome.into_result(), Err("nope".to_owned()));
}

#[test]
fn allow_backtrack_overrides_flag() {
    let cut = ParseOutcome::failure("x").allow_backtrack(false);
    assert!(!cut.can_backtrack());
    assert!(cut.allow_backtrack(true).can_backtrack());
}

#[test]
fn span_accessors() {
    let outcome = ParseOutcome::success().with_span(span());
    assert_eq!(outcome.start(), Some(Position::BOF));
    assert_eq!(outcome.end(), Some(Position::new(1, 4, 3)));
}

#[test]
fn attach_value_on_success_and_failure() {
    let ok = ParseOutcome::success().with_span(span()).attach_value(7);
    assert_eq!(ok.value(), Some(&7));
    assert_eq!(ok.span(), Some(span()));

    let mut called = false;
    let failed = ParseOutcome::failure("bad")
        .allow_backtrack(false)
        .attach_with(|| {
            called = true;
            7
        });
    assert!(!called);
    assert_eq!(failed.value(), None);
    assert_eq!(failed.message(), Some("bad"));
    assert!(!failed.can_backtrack());
}

#[test]
fn callbacks_follow_status() {
    let mut seen = Vec::new();
    ParseOutcome::success().if_successful(|| seen.push("ok".to_owned()));
    ParseOutcome::success().if_failed(|m| seen.push(m.to_owned()));
    ParseOutcome::failure("oops").if_failed(|m| seen.push(m.to_owned()));
    ParseOutcome::failure("oops").if_successful(|| seen.push("never".to_owned()));
    assert_eq!(seen, vec!["ok".to_owned(), "oops".to_owned()]);
}

// === ValueOutcome ===

#[test]
fn map_transforms_success() {
    let outcome = ValueOutcome::success(20).with_span(span()).map(|v| v * 2 + 2);
    assert_eq!(outcome.value(), Some(&42));
    assert_eq!(outcome.span(), Some(span()));
}

#[test]
fn map_propagates_failure_untouched() {
    let outcome: ValueOutcome<i32> = ValueOutcome::failure("no digit").allow_backtrack(false);
    let mapped = outcome.map(|v| v.to_string());
    assert_eq!(mapped.message(), Some("no digit"));
    assert!(!mapped.can_backtrack());
    assert_eq!(mapped.into_value(), None);
}

#[test]
fn or_else_and_into_result() {
    assert_eq!(ValueOutcome::success(1).or_else(9), 1);
    assert_eq!(ValueOutcome::<i32>::failure("f").or_else(9), 9);
    assert_eq!(ValueOutcome::success('a').into_result(), Ok('a'));
}

#[test]
fn detach_value_keeps_everything_else() {
    let detached = ValueOutcome::success("v")
        .allow_backtrack(false)
        .with_span(span())
        .detach_value();
    assert_eq!(
        detached,
        ParseOutcome::success()
            .allow_backtrack(false)
            .with_span(span())
    );

    let failed = ValueOutcome::<u8>::failure("gone").detach_value();
    assert_eq!(failed, ParseOutcome::failure("gone"));
}

#[test]
fn value_callbacks() {
    let mut total = 0;
    ValueOutcome::success(5).if_successful(|v| total += v);
    ValueOutcome::<i32>::failure("x").if_successful(|v| total += v);
    let mut message = String::new();
    ValueOutcome::<i32>::failure("x").if_failed(|m| message.push_str(m));
    assert_eq!(total, 5);
    assert_eq!(message, "x");
}
