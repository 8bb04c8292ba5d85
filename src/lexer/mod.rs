//! Lexical analysis for CQL queries.
//!
//! The lexer converts query text into a stream of tokens, recovering from
//! errors so a single bad character still yields diagnostics for the rest
//! of the query. The gap specifier `[]{m,n}` is recognized here as one
//! token, matching the surface syntax rather than the bracket structure.

pub mod token;

use crate::ast::Attr;
use crate::diag::Diag;
use token::{Token, TokenKind};

/// Result of lexical analysis: the tokens produced (always ending in
/// `Eof`) and any diagnostics encountered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerResult {
    /// The tokens produced, including an EOF token at the end.
    pub tokens: Vec<Token>,
    /// Diagnostics encountered during scanning.
    pub diagnostics: Vec<Diag>,
}

/// A lexical analyzer for CQL query text.
pub struct Lexer<'a> {
    /// The query text being lexed.
    source: &'a str,
    /// Current byte position in source.
    pos: usize,
    /// Accumulated tokens.
    tokens: Vec<Token>,
    /// Accumulated diagnostics.
    diagnostics: Vec<Diag>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given query text.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Tokenizes the query text, consuming the lexer.
    pub fn tokenize(mut self) -> LexerResult {
        while !self.is_at_end() {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }
            self.scan_token();
        }

        let eof_pos = self.source.len();
        self.tokens.push(Token::new(TokenKind::Eof, eof_pos..eof_pos));

        LexerResult {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    /// Scans a single token.
    fn scan_token(&mut self) {
        let start = self.pos;
        let ch = self.advance();

        match ch {
            '[' => self.scan_bracket_or_distance(start),
            ']' => self.add_token(TokenKind::RBracket, start),
            '(' => self.add_token(TokenKind::LParen, start),
            ')' => self.add_token(TokenKind::RParen, start),
            '=' => self.add_token(TokenKind::Eq, start),
            '&' => self.add_token(TokenKind::Ampersand, start),
            '|' => self.add_token(TokenKind::Pipe, start),
            '?' => self.add_token(TokenKind::Question, start),
            '!' => {
                if self.match_char('=') {
                    self.add_token(TokenKind::Neq, start);
                } else {
                    self.error(start, "expected '=' after '!'");
                }
            }
            '\'' => self.scan_value(start),
            'a'..='z' | 'A'..='Z' | '_' => self.scan_attr_keyword(start),
            _ => {
                self.error(start, &format!("invalid character '{}'", ch));
                // Error recovery: skip this character and continue
            }
        }
    }

    /// Distinguishes a plain `[` from the gap specifier `[]{m,n}`.
    ///
    /// Whitespace is permitted between the brackets (`[ ]{1,2}`); the
    /// `{` must follow the `]` directly.
    fn scan_bracket_or_distance(&mut self, start: usize) {
        let saved = self.pos;
        while matches!(self.peek(), ' ' | '\t') {
            self.advance();
        }
        if self.peek() == ']' && self.peek_next() == '{' {
            self.advance(); // consume ']'
            self.advance(); // consume '{'
            self.scan_distance_bounds(start);
            return;
        }
        self.pos = saved;
        self.add_token(TokenKind::LBracket, start);
    }

    /// Scans `m,n}` after `[]{`. An empty lower bound defaults to 0; the
    /// upper bound is required.
    fn scan_distance_bounds(&mut self, start: usize) {
        let min = self.scan_bound();
        while matches!(self.peek(), ' ' | '\t') {
            self.advance();
        }
        if !self.match_char(',') {
            self.error(self.pos, "expected ',' in distance bounds");
            self.recover_distance();
            return;
        }
        while matches!(self.peek(), ' ' | '\t') {
            self.advance();
        }
        let Some(max) = self.scan_bound() else {
            self.error(self.pos, "distance upper bound is required");
            self.recover_distance();
            return;
        };
        if !self.match_char('}') {
            self.error(self.pos, "expected '}' to close distance bounds");
            self.recover_distance();
            return;
        }
        self.add_token(
            TokenKind::Distance {
                min: min.unwrap_or(0),
                max,
            },
            start,
        );
    }

    /// Scans a decimal bound. Returns `None` when no digits are present.
    fn scan_bound(&mut self) -> Option<usize> {
        let digits_start = self.pos;
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        if self.pos == digits_start {
            return None;
        }
        match self.source[digits_start..self.pos].parse() {
            Ok(bound) => Some(bound),
            Err(_) => {
                self.error(digits_start, "distance bound out of range");
                Some(0)
            }
        }
    }

    /// Skips past the remainder of a malformed distance specifier.
    fn recover_distance(&mut self) {
        while !self.is_at_end() {
            match self.peek() {
                '}' => {
                    self.advance();
                    break;
                }
                '0'..='9' | ',' | ' ' | '\t' => {
                    self.advance();
                }
                _ => break,
            }
        }
    }

    /// Scans a single-quoted value. The contents are taken verbatim;
    /// there are no escape sequences, so a value cannot contain `'`.
    fn scan_value(&mut self, start: usize) {
        let value_start = self.pos;
        while self.peek() != '\'' && !self.is_at_end() {
            self.advance();
        }
        let value = &self.source[value_start..self.pos];

        if self.is_at_end() {
            self.error(start, "unclosed value literal");
            // Error recovery: synthesize the closing quote
        } else {
            self.advance(); // consume closing quote
        }

        self.add_token(TokenKind::Value(value.into()), start);
    }

    /// Scans an annotation keyword (`word`, `lemma`, `pos`, `morph`).
    fn scan_attr_keyword(&mut self, start: usize) {
        while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
            self.advance();
        }
        let text = &self.source[start..self.pos];

        match Attr::from_name(text) {
            Some(attr) => self.add_token(TokenKind::Attr(attr), start),
            None => {
                self.diagnostics.push(
                    Diag::error(format!("unknown attribute '{text}'"))
                        .with_primary_label(start..self.pos, "not an annotation layer")
                        .with_help("valid attributes are word, lemma, pos and morph"),
                );
                // Error recovery: drop the identifier and continue
            }
        }
    }

    /// Skips whitespace between tokens.
    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), ' ' | '\t' | '\r' | '\n') {
            self.advance();
        }
    }

    /// Adds a token spanning from `start` to the current position.
    fn add_token(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token::new(kind, start..self.pos));
    }

    /// Adds an error diagnostic at the given position.
    fn error(&mut self, pos: usize, message: &str) {
        let span = pos..pos.saturating_add(1).min(self.source.len()).max(pos);
        self.diagnostics
            .push(Diag::error(message).with_primary_label(span, "here"));
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> char {
        self.source[self.pos..].chars().next().unwrap_or('\0')
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> char {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next().unwrap_or('\0')
    }

    /// Advances and returns the current character.
    fn advance(&mut self) -> char {
        let ch = self.peek();
        if ch != '\0' {
            self.pos += ch.len_utf8();
        }
        ch
    }

    /// Consumes the current character when it matches the expected one.
    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Returns true if at end of input.
    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }
}

/// Convenience function to tokenize a query string.
pub fn tokenize(source: &str) -> LexerResult {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input() {
        let result = tokenize("");
        assert_eq!(result.tokens.len(), 1); // Just EOF
        assert_eq!(result.tokens[0].kind, TokenKind::Eof);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn whitespace_only() {
        let result = tokenize("   \t\n  ");
        assert_eq!(result.tokens.len(), 1);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn simple_query() {
        assert_eq!(
            kinds("[lemma='rey']"),
            vec![
                TokenKind::LBracket,
                TokenKind::Attr(Attr::Lemma),
                TokenKind::Eq,
                TokenKind::Value("rey".into()),
                TokenKind::RBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn all_attribute_keywords() {
        assert_eq!(
            kinds("word lemma pos morph"),
            vec![
                TokenKind::Attr(Attr::Word),
                TokenKind::Attr(Attr::Lemma),
                TokenKind::Attr(Attr::Pos),
                TokenKind::Attr(Attr::Morph),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn not_equal_operator() {
        assert_eq!(
            kinds("[pos!='NOUN']"),
            vec![
                TokenKind::LBracket,
                TokenKind::Attr(Attr::Pos),
                TokenKind::Neq,
                TokenKind::Value("NOUN".into()),
                TokenKind::RBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn conjunction_and_disjunction_operators() {
        assert_eq!(
            kinds("( [ ] & | ? )"),
            vec![
                TokenKind::LParen,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Ampersand,
                TokenKind::Pipe,
                TokenKind::Question,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn distance_token() {
        assert_eq!(
            kinds("[]{0,3}"),
            vec![TokenKind::Distance { min: 0, max: 3 }, TokenKind::Eof]
        );
    }

    #[test]
    fn distance_with_empty_lower_bound_defaults_to_zero() {
        assert_eq!(
            kinds("[]{,5}"),
            vec![TokenKind::Distance { min: 0, max: 5 }, TokenKind::Eof]
        );
    }

    #[test]
    fn distance_allows_interior_whitespace() {
        assert_eq!(
            kinds("[ ]{1 , 4}"),
            vec![TokenKind::Distance { min: 1, max: 4 }, TokenKind::Eof]
        );
    }

    #[test]
    fn distance_between_brackets() {
        let result = tokenize("[pos='DET'][]{0,3}[pos='NOUN']");
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.tokens.len(), 12); // 2 x 5 bracket tokens + distance + EOF
        assert_eq!(result.tokens[5].kind, TokenKind::Distance { min: 0, max: 3 });
    }

    #[test]
    fn value_may_contain_regex_metacharacters() {
        assert_eq!(
            kinds("'re.*' '[a-z]+'"),
            vec![
                TokenKind::Value("re.*".into()),
                TokenKind::Value("[a-z]+".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn token_spans_cover_source() {
        let source = "[lemma='rey']";
        let result = tokenize(source);
        let value = &result.tokens[3];
        assert_eq!(value.span, 7..12);
        assert_eq!(value.slice(source), "'rey'");
    }

    #[test]
    fn error_bare_bang() {
        let result = tokenize("[pos!'NOUN']");
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.diagnostics[0].message.contains("expected '='"));
    }

    #[test]
    fn error_invalid_character() {
        let result = tokenize("@ #");
        assert_eq!(result.diagnostics.len(), 2);
        assert!(
            result.diagnostics[0]
                .message
                .contains("invalid character '@'")
        );
    }

    #[test]
    fn error_unclosed_value() {
        let result = tokenize("[lemma='rey");
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.diagnostics[0].message.contains("unclosed value"));
        // Recovery still produces the value token
        assert_eq!(result.tokens[3].kind, TokenKind::Value("rey".into()));
    }

    #[test]
    fn error_unknown_attribute() {
        let result = tokenize("[stem='re']");
        assert_eq!(result.diagnostics.len(), 1);
        assert!(
            result.diagnostics[0]
                .message
                .contains("unknown attribute 'stem'")
        );
    }

    #[test]
    fn error_malformed_distance_bounds() {
        let result = tokenize("[]{1}");
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.diagnostics[0].message.contains("expected ','"));

        let result = tokenize("[]{1,}");
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.diagnostics[0].message.contains("upper bound"));
    }

    #[test]
    fn lone_brackets_are_not_a_distance() {
        assert_eq!(
            kinds("[]"),
            vec![TokenKind::LBracket, TokenKind::RBracket, TokenKind::Eof]
        );
    }
}
