//! Per-token predicate evaluation.

use super::compile::{CompiledElem, CompiledPredicate, CompiledTest};
use crate::ast::Attr;
use crate::corpus::AnnotatedToken;
use thiserror::Error;
use tracing::trace;

/// A token lacked an annotation layer referenced by the query.
///
/// This never reaches API callers: the scanner downgrades it to a
/// predicate miss, and OR alternatives swallow it entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("token is missing the '{attr}' annotation")]
pub struct MissingAnnotation {
    /// The layer that was absent.
    pub attr: Attr,
}

/// Evaluates a single predicate against one token.
pub fn eval_predicate(
    pred: &CompiledPredicate,
    token: &AnnotatedToken,
) -> Result<bool, MissingAnnotation> {
    let value = token
        .annotation(pred.attr)
        .ok_or(MissingAnnotation { attr: pred.attr })?;
    Ok(pred.test(value))
}

/// Conjunction over one token; short-circuits on the first miss.
pub fn eval_conjunction(
    preds: &[CompiledPredicate],
    token: &AnnotatedToken,
) -> Result<bool, MissingAnnotation> {
    for pred in preds {
        if !eval_predicate(pred, token)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Evaluates one OR alternative (also the body of an optional element).
pub fn eval_test(test: &CompiledTest, token: &AnnotatedToken) -> Result<bool, MissingAnnotation> {
    match test {
        CompiledTest::Simple(pred) => eval_predicate(pred, token),
        CompiledTest::And(preds) => eval_conjunction(preds, token),
    }
}

/// Disjunction over one token.
///
/// A [`MissingAnnotation`] inside an alternative counts as a non-match,
/// so heterogeneous alternatives stay usable against sparsely annotated
/// tokens.
pub fn eval_disjunction(alts: &[CompiledTest], token: &AnnotatedToken) -> bool {
    for alt in alts {
        match eval_test(alt, token) {
            Ok(true) => return true,
            Ok(false) => {}
            Err(err) => trace!(%err, "alternative skipped"),
        }
    }
    false
}

/// Evaluates any per-token element against one token.
///
/// `Distance` is not a per-token element; the scanner consumes it
/// structurally and never routes it here.
pub fn eval_token_elem(
    elem: &CompiledElem,
    token: &AnnotatedToken,
) -> Result<bool, MissingAnnotation> {
    match elem {
        CompiledElem::Simple(pred) => eval_predicate(pred, token),
        CompiledElem::And(preds) => eval_conjunction(preds, token),
        CompiledElem::Or(alts) => Ok(eval_disjunction(alts, token)),
        CompiledElem::Optional(test) => eval_test(test, token),
        CompiledElem::Distance { .. } => {
            debug_assert!(false, "distance is not a per-token element");
            Ok(false)
        }
    }
}
