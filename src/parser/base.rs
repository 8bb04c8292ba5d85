//! Shared parser infrastructure for token stream navigation.

use crate::ast::Span;
use crate::diag::Diag;
use crate::lexer::token::{Token, TokenKind};

/// Common error type for parsing operations.
pub type ParseError = Box<Diag>;

/// Common result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Token stream navigator used by the grammar productions.
///
/// Wraps the token slice with a cursor and the usual lookahead and
/// matching operations. The stream never runs past its final token,
/// which the lexer guarantees to be `Eof`.
pub struct TokenStream<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenStream<'a> {
    /// Creates a new token stream from a token slice.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Returns the current token.
    ///
    /// Past the end, returns the last token (which is EOF).
    pub fn current(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .unwrap_or_else(|| self.tokens.last().expect("token stream must be non-empty"))
    }

    /// Advances to the next token. Does nothing once at the last token.
    pub fn advance(&mut self) {
        if self.pos < self.tokens.len().saturating_sub(1) {
            self.pos += 1;
        }
    }

    /// Checks if the current token matches the given kind.
    pub fn check(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    /// Consumes the current token if it matches the given kind.
    pub fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects a specific token kind and returns its span.
    pub fn expect(&mut self, kind: TokenKind) -> ParseResult<Span> {
        if self.check(&kind) {
            let span = self.current().span.clone();
            self.advance();
            Ok(span)
        } else {
            Err(self.error_here(format!("expected {kind}, found {}", self.current().kind)))
        }
    }

    /// Creates an error at the current token position.
    pub fn error_here(&self, message: impl Into<String>) -> ParseError {
        Box::new(
            Diag::error(message.into()).with_primary_label(self.current().span.clone(), "here"),
        )
    }
}

/// Merges two spans into a single span covering both.
pub fn merge_spans(start: &Span, end: &Span) -> Span {
    start.start..end.end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Attr;

    fn make_tokens() -> Vec<Token> {
        vec![
            Token::new(TokenKind::LBracket, 0..1),
            Token::new(TokenKind::Attr(Attr::Lemma), 1..6),
            Token::new(TokenKind::Eq, 6..7),
            Token::new(TokenKind::Value("rey".into()), 7..12),
            Token::new(TokenKind::RBracket, 12..13),
            Token::new(TokenKind::Eof, 13..13),
        ]
    }

    #[test]
    fn token_stream_navigation() {
        let tokens = make_tokens();
        let mut stream = TokenStream::new(&tokens);

        assert_eq!(stream.current().kind, TokenKind::LBracket);
        stream.advance();
        assert_eq!(stream.current().kind, TokenKind::Attr(Attr::Lemma));
    }

    #[test]
    fn token_stream_check_and_consume() {
        let tokens = make_tokens();
        let mut stream = TokenStream::new(&tokens);

        assert!(stream.check(&TokenKind::LBracket));
        assert!(!stream.check(&TokenKind::RBracket));

        assert!(stream.consume(&TokenKind::LBracket));
        assert_eq!(stream.current().kind, TokenKind::Attr(Attr::Lemma));

        assert!(!stream.consume(&TokenKind::LBracket));
        assert_eq!(stream.current().kind, TokenKind::Attr(Attr::Lemma));
    }

    #[test]
    fn token_stream_expect_success_and_failure() {
        let tokens = make_tokens();
        let mut stream = TokenStream::new(&tokens);

        let span = stream.expect(TokenKind::LBracket).unwrap();
        assert_eq!(span, 0..1);

        let result = stream.expect(TokenKind::RBracket);
        assert!(result.is_err());
        // Position unchanged after a failed expect
        assert_eq!(stream.current().kind, TokenKind::Attr(Attr::Lemma));
    }

    #[test]
    fn token_stream_stays_at_eof() {
        let tokens = make_tokens();
        let mut stream = TokenStream::new(&tokens);

        while stream.current().kind != TokenKind::Eof {
            stream.advance();
        }
        stream.advance();
        assert_eq!(stream.current().kind, TokenKind::Eof);
    }

    #[test]
    fn merge_spans_covers_both() {
        assert_eq!(merge_spans(&(1..6), &(7..12)), 1..12);
    }
}
