//! The positional scanner: executes a compiled pattern against a corpus.
//!
//! The scanner sweeps the corpus left-to-right with two cursors, one
//! into the corpus and one into the pattern. A predicate miss resets the
//! pattern cursor and restarts one token past the current anchor, so
//! every corpus position is tried as a match start exactly once and
//! spans come out in strictly increasing start order.

pub mod compile;
pub mod eval;

use crate::corpus::AnnotatedToken;
pub use compile::{CompiledElem, CompiledPattern, CompiledPredicate, CompiledTest};
pub use eval::MissingAnnotation;
use std::fmt;
use tracing::{debug, trace, warn};

/// Whether the scan stops at the first occurrence or collects all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Stop after the first completed match.
    Match,
    /// Collect every match span.
    Find,
}

/// A half-open interval `[start, end)` over corpus indices marking one
/// occurrence of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchSpan {
    /// First matched token index (inclusive).
    pub start: usize,
    /// One past the last matched token index (exclusive).
    pub end: usize,
}

impl MatchSpan {
    /// Creates a span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of corpus tokens covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when the span covers no tokens. The scanner never emits
    /// such a span.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for MatchSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}]", self.start, self.end)
    }
}

/// Returns every match of `pattern` in `corpus`, in increasing start
/// order.
pub fn find_all(pattern: &CompiledPattern, corpus: &[AnnotatedToken]) -> Vec<MatchSpan> {
    scan(pattern, corpus, ScanMode::Find)
}

/// Returns true when `pattern` matches anywhere in `corpus`.
pub fn any_match(pattern: &CompiledPattern, corpus: &[AnnotatedToken]) -> bool {
    !scan(pattern, corpus, ScanMode::Match).is_empty()
}

/// Runs the scan loop. In [`ScanMode::Match`] the result holds at most
/// one span; in [`ScanMode::Find`] it holds every span.
///
/// A token missing a queried annotation is logged and treated as a
/// predicate miss. Worst case cost is `O(|corpus| * |pattern|)`
/// predicate evaluations.
pub fn scan(
    pattern: &CompiledPattern,
    corpus: &[AnnotatedToken],
    mode: ScanMode,
) -> Vec<MatchSpan> {
    let ast_len = pattern.len();
    let corpus_len = corpus.len();
    let mut spans = Vec::new();

    if corpus_len == 0 || ast_len == 0 {
        warn!(corpus_len, ast_len, "nothing to scan");
        return spans;
    }

    debug!(ast_len, corpus_len, ?mode, "scanning corpus");

    // The corpus cursor, the pattern cursor, where the in-progress match
    // began, and the next start position to try after a miss or a
    // completed match.
    let mut text_i = 0usize;
    let mut tree_i = 0usize;
    let mut start: Option<usize> = None;
    let mut anchor = 0usize;

    while text_i < corpus_len || tree_i == ast_len {
        // The whole pattern has been consumed.
        if tree_i == ast_len {
            // `start` stays None when every element was a non-matching
            // optional; a zero-width "match" is not an occurrence.
            if let Some(matched_from) = start {
                trace!(start = matched_from, end = text_i, "match completed");
                spans.push(MatchSpan::new(matched_from, text_i));
                if mode == ScanMode::Match {
                    return spans;
                }
            }
            anchor += 1;
            text_i = anchor;
            tree_i = 0;
            start = None;
            continue;
        }

        if text_i >= corpus_len {
            trace!("reached end of corpus");
            break;
        }

        let token = &corpus[text_i];
        match &pattern.elems()[tree_i] {
            elem @ (CompiledElem::Simple(_) | CompiledElem::And(_) | CompiledElem::Or(_)) => {
                if eval_step(elem, token, text_i) {
                    start.get_or_insert(text_i);
                    tree_i += 1;
                    text_i += 1;
                } else {
                    anchor += 1;
                    text_i = anchor;
                    tree_i = 0;
                    start = None;
                }
            }
            CompiledElem::Optional(test) => {
                let hit = match eval::eval_test(test, token) {
                    Ok(hit) => hit,
                    Err(err) => {
                        warn!(position = text_i, %err, "optional step treated as non-match");
                        false
                    }
                };
                if hit {
                    start.get_or_insert(text_i);
                    text_i += 1;
                }
                tree_i += 1;
            }
            CompiledElem::Distance { min, max } => {
                let (min, max) = (*min, *max);
                // The grammar guarantees a per-token element after every
                // distance.
                let Some(target) = pattern.elems().get(tree_i + 1) else {
                    debug_assert!(false, "distance must be followed by a token element");
                    break;
                };

                // Skip the mandatory gap, then probe the remaining
                // `max - min` positions for the anchoring element.
                text_i += min;
                let mut hit = false;
                for _ in min..max {
                    if text_i >= corpus_len {
                        break;
                    }
                    if eval_step(target, &corpus[text_i], text_i) {
                        trace!(position = text_i, "distance anchor matched");
                        tree_i += 2;
                        text_i += 1;
                        hit = true;
                        break;
                    }
                    text_i += 1;
                }
                if !hit {
                    anchor += 1;
                    text_i = anchor;
                    tree_i = 0;
                    start = None;
                }
            }
        }
    }

    debug!(matches = spans.len(), "scan finished");
    spans
}

/// Evaluates a per-token element, downgrading a missing annotation to a
/// miss. The error is logged, not raised.
fn eval_step(elem: &CompiledElem, token: &AnnotatedToken, position: usize) -> bool {
    match eval::eval_token_elem(elem, token) {
        Ok(hit) => hit,
        Err(err) => {
            warn!(position, %err, "treating missing annotation as non-match");
            false
        }
    }
}
