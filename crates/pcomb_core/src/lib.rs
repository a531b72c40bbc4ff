//! Character-level foundations for the `pcomb` parser combinators.
//!
//! This crate is standalone (zero `pcomb_*` dependencies). It provides:
//!
//! - [`Position`] / [`Span`]: immutable line/column/index coordinates
//! - [`CharSource`]: the boundary to whatever supplies characters
//! - [`Cursor`]: a backtracking reader with nested marks and capture
//! - [`CharClass`]: a composable predicate over code points
//! - [`CharDisplay`]: the character rendering used in failure messages
//!
//! # Example
//!
//! ```
//! use pcomb_core::Cursor;
//!
//! let mut cursor = Cursor::from_text("abc");
//! cursor.mark();
//! cursor.read().ok();
//! cursor.read().ok();
//! assert_eq!(cursor.capture(false).as_deref(), Some("ab"));
//! cursor.reset(true);
//! assert_eq!(cursor.position().index(), 0);
//! ```

mod char_class;
mod cursor;
mod display;
mod position;
mod source;

pub use char_class::{CharClass, CharRange};
pub use cursor::Cursor;
pub use display::CharDisplay;
pub use position::{Position, Span};
pub use source::{CharSource, IterSource, StrSource};
