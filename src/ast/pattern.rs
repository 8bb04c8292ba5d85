//! Pattern AST node types.
//!
//! A parsed query is a [`Pattern`]: a non-empty sequence of
//! [`PatternElem`]s walked left-to-right by the scanner. All variants are
//! closed enums; the scanner dispatches on the variant tag and nothing
//! else.

use crate::ast::Span;
use smol_str::SmolStr;
use std::fmt;

/// An annotation layer addressable from a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attr {
    /// The surface form of the token.
    Word,
    /// The dictionary form.
    Lemma,
    /// Part-of-speech tag.
    Pos,
    /// Morphological features.
    Morph,
}

impl Attr {
    /// All annotation layers, in surface-syntax order.
    pub const ALL: [Attr; 4] = [Attr::Word, Attr::Lemma, Attr::Pos, Attr::Morph];

    /// The surface keyword for this layer.
    pub fn name(self) -> &'static str {
        match self {
            Attr::Word => "word",
            Attr::Lemma => "lemma",
            Attr::Pos => "pos",
            Attr::Morph => "morph",
        }
    }

    /// Resolves a surface keyword to an annotation layer.
    pub fn from_name(name: &str) -> Option<Attr> {
        match name {
            "word" => Some(Attr::Word),
            "lemma" => Some(Attr::Lemma),
            "pos" => Some(Attr::Pos),
            "morph" => Some(Attr::Morph),
            _ => None,
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comparison operator of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// `=`: the anchored regex must match the annotation value.
    Eq,
    /// `!=`: the anchored regex must not match.
    Neq,
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CmpOp::Eq => f.write_str("="),
            CmpOp::Neq => f.write_str("!="),
        }
    }
}

/// A single `attr OP 'value'` test against one corpus token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    /// Annotation layer the test reads.
    pub attr: Attr,
    /// `=` or `!=`.
    pub op: CmpOp,
    /// Regex source; anchored at both ends when compiled.
    pub value: SmolStr,
    /// Location of the predicate in query text.
    pub span: Span,
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}'{}'", self.attr, self.op, self.value)
    }
}

/// The content of one bracketed token pattern: a bare predicate or an
/// intra-token conjunction. Used as OR alternatives and as the body of an
/// optional element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenTest {
    /// `[attr OP 'v']`
    Simple(Predicate),
    /// `[a1 & a2 & …]`, at least two predicates.
    And(Vec<Predicate>),
}

impl TokenTest {
    /// Promotes this test to a standalone pattern element.
    pub fn into_elem(self) -> PatternElem {
        match self {
            TokenTest::Simple(pred) => PatternElem::Simple(pred),
            TokenTest::And(preds) => PatternElem::And(preds),
        }
    }
}

impl fmt::Display for TokenTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenTest::Simple(pred) => write!(f, "[{pred}]"),
            TokenTest::And(preds) => fmt_conjunction(f, preds),
        }
    }
}

/// One element of a pattern sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternElem {
    /// A bare per-token predicate.
    Simple(Predicate),
    /// Conjunction of predicates over the same token.
    And(Vec<Predicate>),
    /// Disjunction of token tests over the same token.
    Or(Vec<TokenTest>),
    /// A gap between two per-token elements: skip `min` tokens, then the
    /// following element may match at any of the next `max - min`
    /// positions (upper bound exclusive).
    Distance { min: usize, max: usize },
    /// The inner test may or may not consume a token.
    Optional(TokenTest),
}

impl fmt::Display for PatternElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternElem::Simple(pred) => write!(f, "[{pred}]"),
            PatternElem::And(preds) => fmt_conjunction(f, preds),
            PatternElem::Or(alts) => {
                f.write_str("(")?;
                for (i, alt) in alts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{alt}")?;
                }
                f.write_str(")")
            }
            PatternElem::Distance { min, max } => write!(f, "[]{{{min},{max}}}"),
            PatternElem::Optional(test) => write!(f, "{test}?"),
        }
    }
}

fn fmt_conjunction(f: &mut fmt::Formatter<'_>, preds: &[Predicate]) -> fmt::Result {
    f.write_str("[")?;
    for (i, pred) in preds.iter().enumerate() {
        if i > 0 {
            f.write_str(" & ")?;
        }
        write!(f, "{pred}")?;
    }
    f.write_str("]")
}

/// A parsed query: a non-empty left-to-right sequence of elements.
///
/// The parser guarantees the structural invariants checked by
/// [`Pattern::check_invariants`]; the scanner relies on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// The element sequence, in query order.
    pub elems: Vec<PatternElem>,
}

impl Pattern {
    /// Wraps an element sequence.
    pub fn new(elems: Vec<PatternElem>) -> Self {
        Self { elems }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elems.len()
    }

    /// True when the sequence holds no elements. The parser never
    /// produces an empty pattern; this exists for invariant checks.
    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// Verifies the structural invariants the parser guarantees:
    /// non-empty sequence, no leading/trailing/adjacent `Distance`, and
    /// `min < max` on every `Distance`.
    pub fn check_invariants(&self) -> Result<(), &'static str> {
        if self.elems.is_empty() {
            return Err("pattern must be non-empty");
        }
        let mut prev_was_distance = false;
        for (i, elem) in self.elems.iter().enumerate() {
            if let PatternElem::Distance { min, max } = elem {
                if i == 0 {
                    return Err("pattern must not start with a distance");
                }
                if i == self.elems.len() - 1 {
                    return Err("pattern must not end with a distance");
                }
                if prev_was_distance {
                    return Err("adjacent distances are not allowed");
                }
                if min >= max {
                    return Err("distance upper bound must exceed lower bound");
                }
                prev_was_distance = true;
            } else {
                prev_was_distance = false;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for elem in &self.elems {
            write!(f, "{elem}")?;
        }
        Ok(())
    }
}
