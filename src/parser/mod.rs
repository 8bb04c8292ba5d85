//! Parser for CQL queries.
//!
//! The parser consumes the token stream produced by the lexer and
//! constructs the abstract pattern. The grammar is small enough for
//! plain recursive descent; there is no recovery across elements, so
//! the first error aborts the parse and the query is rejected whole.

pub mod base;
mod pattern;

use crate::ast::Pattern;
use crate::diag::{Diag, DiagSeverity, SourceFile, convert_diagnostics_to_reports};
use crate::lexer::token::{Token, TokenKind};
use miette::Report;

/// Result of parsing a CQL query.
#[derive(Debug)]
pub struct ParseResult {
    /// The parsed pattern, or None if parsing failed.
    pub ast: Option<Pattern>,
    /// All collected diagnostics rendered as miette reports.
    pub diagnostics: Vec<Report>,
}

/// CQL pattern parser.
pub struct Parser<'source> {
    tokens: Vec<Token>,
    diagnostics: Vec<Diag>,
    source: &'source str,
}

impl<'source> Parser<'source> {
    /// Creates a new parser from a token stream.
    pub fn new(mut tokens: Vec<Token>, source: &'source str) -> Self {
        if tokens.is_empty() {
            tokens.push(Token::new(TokenKind::Eof, 0..0));
        } else if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
            let eof_pos = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Token::new(TokenKind::Eof, eof_pos..eof_pos));
        }

        Self {
            tokens,
            diagnostics: Vec::new(),
            source,
        }
    }

    /// Merges lexer diagnostics ahead of parser diagnostics.
    pub fn with_lexer_diagnostics(mut self, lex_diags: Vec<Diag>) -> Self {
        let mut all_diags = lex_diags;
        all_diags.append(&mut self.diagnostics);
        self.diagnostics = all_diags;
        self
    }

    /// Parses the token stream into a pattern AST.
    pub fn parse(self) -> ParseResult {
        let source_text = self.source;
        let (ast, diagnostics) = self.parse_to_diags();

        let source = SourceFile::new(source_text);
        let reports = convert_diagnostics_to_reports(&diagnostics, &source);

        ParseResult {
            ast,
            diagnostics: reports,
        }
    }

    /// Parses into an AST and raw diagnostics, without rendering.
    ///
    /// A query with any error diagnostic yields no AST: the grammar has
    /// no recovery points, so a partial pattern would be meaningless.
    pub(crate) fn parse_to_diags(mut self) -> (Option<Pattern>, Vec<Diag>) {
        let (ast, parser_diags) = pattern::parse_pattern_tokens(&self.tokens);
        self.diagnostics.extend(parser_diags);

        let has_error = self
            .diagnostics
            .iter()
            .any(|diag| diag.severity == DiagSeverity::Error);
        let ast = if has_error { None } else { ast };

        (ast, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_source(source: &str) -> ParseResult {
        let lex = tokenize(source);
        Parser::new(lex.tokens, source)
            .with_lexer_diagnostics(lex.diagnostics)
            .parse()
    }

    #[test]
    fn parser_creation_normalizes_missing_eof() {
        let tokens = vec![Token::new(TokenKind::LBracket, 0..1)];
        let parser = Parser::new(tokens, "[");
        assert_eq!(parser.tokens.len(), 2);
        assert_eq!(parser.tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn parser_creation_handles_empty_token_list() {
        let parser = Parser::new(Vec::new(), "");
        assert_eq!(parser.tokens.len(), 1);
        assert_eq!(parser.tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn parse_simple_query() {
        let result = parse_source("[lemma='rey']");
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.ast.map(|ast| ast.len()), Some(1));
    }

    #[test]
    fn parse_empty_query_fails() {
        let result = parse_source("");
        assert!(result.ast.is_none());
        assert!(!result.diagnostics.is_empty());
    }

    #[test]
    fn lexer_diagnostics_nullify_ast() {
        // `stem` is dropped by the lexer; the bracket then parses as
        // empty, but the lexer error alone must reject the query.
        let result = parse_source("[stem='re']");
        assert!(result.ast.is_none());
        assert!(!result.diagnostics.is_empty());
    }

    #[test]
    fn lexer_diagnostics_come_first() {
        let lex = tokenize("@[lemma='rey'");
        let (_, diags) = Parser::new(lex.tokens, "@[lemma='rey'")
            .with_lexer_diagnostics(lex.diagnostics)
            .parse_to_diags();
        assert!(diags.len() >= 2);
        assert!(diags[0].message.contains("invalid character"));
    }
}
