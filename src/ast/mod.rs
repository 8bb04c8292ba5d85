//! Abstract pattern representation produced by the query parser.

mod pattern;

use std::ops::Range;

/// A byte range in query text.
/// This is the canonical span type used throughout the front end.
pub type Span = Range<usize>;

pub use pattern::{Attr, CmpOp, Pattern, PatternElem, Predicate, TokenTest};
