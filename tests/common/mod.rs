//! Shared fixtures for the integration suites.

use cql_engine::{AnnotatedToken, MatchSpan};

/// The five-token sample sentence used across suites:
/// "Da paz al rey santo".
pub fn sample_corpus() -> Vec<AnnotatedToken> {
    vec![
        AnnotatedToken::new("Da", "dar", "VERB", "Mood=Imp"),
        AnnotatedToken::new("paz", "paz", "NOUN", "Gender=Masc"),
        AnnotatedToken::new("al", "al", "ADP", ""),
        AnnotatedToken::new("rey", "rey", "NOUN", "Gender=Masc"),
        AnnotatedToken::new("santo", "santo", "ADJ", "Gender=Masc"),
    ]
}

/// Collapses spans into plain tuples for compact assertions.
pub fn as_pairs(spans: &[MatchSpan]) -> Vec<(usize, usize)> {
    spans.iter().map(|span| (span.start, span.end)).collect()
}
