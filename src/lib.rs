//! Corpus Query Language engine: token-level pattern queries over
//! linguistically annotated corpora.
//!
//! A query describes a sequence of per-token predicates over the
//! annotation layers `word`, `lemma`, `pos` and `morph`; the engine
//! locates every occurrence of that sequence in a corpus.
//!
//! # Query a corpus
//!
//! ```
//! use cql_engine::{AnnotatedToken, findall, is_match};
//!
//! let corpus = vec![
//!     AnnotatedToken::new("Da", "dar", "VERB", "Mood=Imp"),
//!     AnnotatedToken::new("paz", "paz", "NOUN", "Gender=Masc"),
//!     AnnotatedToken::new("al", "al", "ADP", ""),
//!     AnnotatedToken::new("rey", "rey", "NOUN", "Gender=Masc"),
//! ];
//!
//! let spans = findall(&corpus, "[pos='NOUN']").unwrap();
//! assert_eq!(spans.len(), 2);
//! assert_eq!((spans[1].start, spans[1].end), (3, 4));
//!
//! assert!(is_match(&corpus, "[pos='VERB'][]{0,3}[pos='NOUN']").unwrap());
//! ```
//!
//! # Inspect a parse
//!
//! ```
//! use cql_engine::parse;
//!
//! let result = parse("[lemma='rey' & pos='NOUN']");
//! assert!(result.ast.is_some());
//!
//! let result = parse("[lemma='rey'");
//! assert!(!result.diagnostics.is_empty());
//! ```

use tracing::{debug, warn};

pub mod ast;
pub mod corpus;
pub mod diag;
pub mod engine;
pub mod error;
pub mod lexer;
pub mod parser;

// Re-export the pattern AST and its span primitive.
pub use ast::{Attr, CmpOp, Pattern, PatternElem, Predicate, Span, TokenTest};

// Re-export corpus and diagnostic types for convenience.
pub use corpus::{AnnotatedToken, CorpusError, load_corpus};
pub use diag::{Diag, DiagLabel, DiagSeverity, LabelRole};
pub use error::QueryError;

// Re-export lexer and parser types for convenience.
pub use lexer::token::{Token, TokenKind};
pub use lexer::{Lexer, LexerResult, tokenize};
pub use parser::{ParseResult, Parser};

// Re-export the matching engine surface.
pub use engine::{
    CompiledPattern, MatchSpan, MissingAnnotation, ScanMode, any_match, find_all, scan,
};

/// Parses CQL query text end-to-end (lexing + parsing).
///
/// This is the recommended front-end entry point. It guarantees parser
/// input comes from the lexer and merges diagnostics from both phases.
pub fn parse(source: &str) -> ParseResult {
    let lex_result = tokenize(source);
    Parser::new(lex_result.tokens, source)
        .with_lexer_diagnostics(lex_result.diagnostics)
        .parse()
}

/// Finds every occurrence of `query` in `corpus`, in increasing start
/// order.
///
/// An empty corpus yields an empty list without evaluating the pattern.
///
/// # Errors
///
/// [`QueryError::EmptyQuery`] when the query is blank,
/// [`QueryError::InvalidQuery`] when it fails to lex or parse, and
/// [`QueryError::InvalidRegex`] when a value does not compile.
pub fn findall(corpus: &[AnnotatedToken], query: &str) -> Result<Vec<MatchSpan>, QueryError> {
    let compiled = build_query(query)?;
    if corpus.is_empty() {
        warn!("findall called on an empty corpus");
        return Ok(Vec::new());
    }
    Ok(engine::find_all(&compiled, corpus))
}

/// Returns true when `query` matches anywhere in `corpus`.
///
/// Stops at the first occurrence; same error contract as [`findall`].
pub fn is_match(corpus: &[AnnotatedToken], query: &str) -> Result<bool, QueryError> {
    let compiled = build_query(query)?;
    if corpus.is_empty() {
        warn!("is_match called on an empty corpus");
        return Ok(false);
    }
    Ok(engine::any_match(&compiled, corpus))
}

/// Parses and compiles a query, mapping diagnostics to [`QueryError`].
fn build_query(query: &str) -> Result<CompiledPattern, QueryError> {
    if query.trim().is_empty() {
        return Err(QueryError::EmptyQuery);
    }

    let lex_result = tokenize(query);
    let (ast, diags) = Parser::new(lex_result.tokens, query)
        .with_lexer_diagnostics(lex_result.diagnostics)
        .parse_to_diags();

    if let Some(diag) = diags
        .iter()
        .find(|diag| diag.severity == DiagSeverity::Error)
    {
        return Err(QueryError::InvalidQuery {
            message: diag.message.clone(),
            offset: diag.primary_offset().unwrap_or(0),
        });
    }
    let Some(ast) = ast else {
        // Unreachable in practice: a missing AST always comes with an
        // error diagnostic.
        return Err(QueryError::InvalidQuery {
            message: "query did not produce a pattern".into(),
            offset: 0,
        });
    };

    debug!(elements = ast.len(), pattern = %ast, "parsed query");
    CompiledPattern::compile(&ast)
}
