//! Token types for CQL lexical analysis.

use crate::ast::{Attr, Span};
use smol_str::SmolStr;
use std::fmt;

/// The kind of a lexical token in a CQL query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// An annotation keyword: `word`, `lemma`, `pos`, or `morph`.
    Attr(Attr),
    /// A single-quoted value, quotes stripped.
    Value(SmolStr),
    /// A gap specifier `[]{m,n}`, recognized as one token.
    Distance { min: usize, max: usize },

    // Operators
    Eq,        // =
    Neq,       // !=
    Ampersand, // &
    Pipe,      // |
    Question,  // ?

    // Punctuation
    LBracket, // [
    RBracket, // ]
    LParen,   // (
    RParen,   // )

    // Special
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Attr(attr) => write!(f, "{attr}"),
            TokenKind::Value(value) => write!(f, "'{value}'"),
            TokenKind::Distance { min, max } => write!(f, "[]{{{min},{max}}}"),
            TokenKind::Eq => write!(f, "="),
            TokenKind::Neq => write!(f, "!="),
            TokenKind::Ampersand => write!(f, "&"),
            TokenKind::Pipe => write!(f, "|"),
            TokenKind::Question => write!(f, "?"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Eof => write!(f, "<EOF>"),
        }
    }
}

/// A lexical token with its kind and source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span in query text.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the source slice covered by this token.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }
}
