//! Deferred construction for recursive grammars.
//!
//! A rule that refers to itself cannot be built eagerly. [`lazy`] stores a
//! constructor instead and builds the parser on first use; the result is
//! cached in a cell shared by all clones of the wrapper.
//!
//! ```
//! use pcomb::{exact, lazy, BoxedParser, Parser};
//!
//! // nested := '(' nested ')' | ε
//! fn nested() -> BoxedParser {
//!     exact('(').then(lazy(nested)).then(exact(')')).opt().boxed()
//! }
//!
//! assert!(nested().then(pcomb::eof()).parse_str("((()))").unwrap().is_successful());
//! ```

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use crate::stack::ensure_sufficient_stack;
use crate::{BoxedParser, BoxedValParser, Context, ParseOutcome, ParseResult, Parser, ValParser, ValueOutcome};

/// An effect parser built on first use.
#[derive(Clone)]
pub struct Lazy {
    factory: Rc<dyn Fn() -> BoxedParser>,
    cell: Rc<OnceCell<BoxedParser>>,
}

/// Defer building an effect parser until it first runs.
pub fn lazy<P, F>(factory: F) -> Lazy
where
    P: Parser + 'static,
    F: Fn() -> P + 'static,
{
    Lazy {
        factory: Rc::new(move || factory().boxed()),
        cell: Rc::new(OnceCell::new()),
    }
}

impl Parser for Lazy {
    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ParseOutcome> {
        let parser = self.cell.get_or_init(|| (self.factory)());
        ensure_sufficient_stack(|| parser.parse(ctx))
    }

    fn name(&self) -> &str {
        "Lazy"
    }
}

impl fmt::Debug for Lazy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lazy")
            .field("built", &self.cell.get().is_some())
            .finish_non_exhaustive()
    }
}

/// A value parser built on first use.
pub struct LazyVal<T> {
    factory: Rc<dyn Fn() -> BoxedValParser<T>>,
    cell: Rc<OnceCell<BoxedValParser<T>>>,
}

/// Defer building a value parser until it first runs.
pub fn lazy_val<V, F>(factory: F) -> LazyVal<V::Output>
where
    V: ValParser + 'static,
    F: Fn() -> V + 'static,
{
    LazyVal {
        factory: Rc::new(move || factory().boxed()),
        cell: Rc::new(OnceCell::new()),
    }
}

impl<T> Clone for LazyVal<T> {
    fn clone(&self) -> Self {
        LazyVal {
            factory: Rc::clone(&self.factory),
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T> ValParser for LazyVal<T> {
    type Output = T;

    fn do_parse(&self, ctx: &mut Context<'_>) -> ParseResult<ValueOutcome<T>> {
        let parser = self.cell.get_or_init(|| (self.factory)());
        ensure_sufficient_stack(|| parser.parse(ctx))
    }

    fn name(&self) -> &str {
        "LazyVal"
    }
}

impl<T> fmt::Debug for LazyVal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyVal")
            .field("built", &self.cell.get().is_some())
            .finish_non_exhaustive()
    }
}
