//! Compilation of a parsed pattern into executable form.
//!
//! Every predicate value is compiled once into an owned [`Regex`],
//! anchored at both ends so `re.*` matches `rey` but never `reyes `.
//! The compiled pattern owns its regexes for the duration of a query;
//! the scanner borrows it read-only.

use crate::ast::{Attr, CmpOp, Pattern, PatternElem, Predicate, TokenTest};
use crate::error::QueryError;
use regex::Regex;

/// A predicate with its compiled, fully anchored regex.
#[derive(Debug)]
pub struct CompiledPredicate {
    /// Annotation layer the test reads.
    pub attr: Attr,
    /// `=` or `!=`.
    pub op: CmpOp,
    regex: Regex,
}

impl CompiledPredicate {
    fn compile(pred: &Predicate) -> Result<Self, QueryError> {
        // The non-capturing group keeps alternations in the value from
        // escaping the anchors.
        let anchored = format!("^(?:{})$", pred.value);
        let regex = Regex::new(&anchored).map_err(|err| QueryError::InvalidRegex {
            pattern: pred.value.to_string(),
            source: Box::new(err),
        })?;
        Ok(Self {
            attr: pred.attr,
            op: pred.op,
            regex,
        })
    }

    /// Tests an annotation value, honoring the comparison operator.
    pub fn test(&self, value: &str) -> bool {
        match self.op {
            CmpOp::Eq => self.regex.is_match(value),
            CmpOp::Neq => !self.regex.is_match(value),
        }
    }
}

/// A compiled OR alternative (also the body of an optional element).
#[derive(Debug)]
pub enum CompiledTest {
    /// A bare predicate.
    Simple(CompiledPredicate),
    /// An intra-token conjunction.
    And(Vec<CompiledPredicate>),
}

/// A compiled pattern element, mirroring [`PatternElem`].
#[derive(Debug)]
pub enum CompiledElem {
    /// A bare per-token predicate.
    Simple(CompiledPredicate),
    /// Conjunction over the same token.
    And(Vec<CompiledPredicate>),
    /// Disjunction over the same token.
    Or(Vec<CompiledTest>),
    /// A gap between two per-token elements.
    Distance { min: usize, max: usize },
    /// The inner test may or may not consume a token.
    Optional(CompiledTest),
}

/// An executable pattern: the parsed sequence with owned regexes.
#[derive(Debug)]
pub struct CompiledPattern {
    elems: Vec<CompiledElem>,
}

impl CompiledPattern {
    /// Compiles every predicate of `pattern`, preserving the sequence.
    pub fn compile(pattern: &Pattern) -> Result<Self, QueryError> {
        let elems = pattern
            .elems
            .iter()
            .map(compile_elem)
            .collect::<Result<_, _>>()?;
        Ok(Self { elems })
    }

    /// The compiled element sequence, in query order.
    pub fn elems(&self) -> &[CompiledElem] {
        &self.elems
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elems.len()
    }

    /// True when the sequence holds no elements.
    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }
}

fn compile_elem(elem: &PatternElem) -> Result<CompiledElem, QueryError> {
    Ok(match elem {
        PatternElem::Simple(pred) => CompiledElem::Simple(CompiledPredicate::compile(pred)?),
        PatternElem::And(preds) => CompiledElem::And(compile_preds(preds)?),
        PatternElem::Or(alts) => CompiledElem::Or(
            alts.iter()
                .map(compile_test)
                .collect::<Result<_, _>>()?,
        ),
        PatternElem::Distance { min, max } => CompiledElem::Distance {
            min: *min,
            max: *max,
        },
        PatternElem::Optional(test) => CompiledElem::Optional(compile_test(test)?),
    })
}

fn compile_test(test: &TokenTest) -> Result<CompiledTest, QueryError> {
    Ok(match test {
        TokenTest::Simple(pred) => CompiledTest::Simple(CompiledPredicate::compile(pred)?),
        TokenTest::And(preds) => CompiledTest::And(compile_preds(preds)?),
    })
}

fn compile_preds(preds: &[Predicate]) -> Result<Vec<CompiledPredicate>, QueryError> {
    preds.iter().map(CompiledPredicate::compile).collect()
}
