//! Error types surfaced by the query API.

use thiserror::Error;

/// Errors returned by [`findall`](crate::findall) and
/// [`is_match`](crate::is_match).
///
/// Scanning itself never fails: a token lacking a queried annotation is
/// logged and treated as a predicate miss, so only the query text can
/// produce an error.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The query string was empty or all whitespace.
    #[error("query cannot be empty")]
    EmptyQuery,

    /// The query failed to lex or parse.
    #[error("invalid query at offset {offset}: {message}")]
    InvalidQuery {
        /// The first diagnostic's message.
        message: String,
        /// Byte offset of the failure in the query text.
        offset: usize,
    },

    /// A value failed to compile as a regular expression.
    #[error("invalid regex '{pattern}': {source}")]
    InvalidRegex {
        /// The offending value, as written in the query.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: Box<regex::Error>,
    },
}
