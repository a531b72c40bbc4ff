//! Crate-level parser tests.
//!
//! Tests are organized into modules by category:
//! - `scenarios`: the literal end-to-end behaviors every build must keep
//!   (cut locality, keyword mismatch messages, separated lists)
//! - `grammars`: small complete grammars (arithmetic, CSV, key/value
//!   settings) built from the public combinators
