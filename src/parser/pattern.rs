//! Grammar productions for CQL patterns.
//!
//! ```text
//! pattern  := element ( element | DISTANCE element )*
//! element  := '[' inside ']' '?'?
//!           | '(' alt ( '|' alt )+ ')'
//! inside   := simple ( '&' simple )*
//! simple   := ATTR ( '=' | '!=' ) VALUE
//! alt      := '[' inside ']'
//! ```
//!
//! The sequence alternates between per-token elements and distance
//! tokens; `?` binds to a single bracketed element.

use super::base::{ParseResult, TokenStream, merge_spans};
use crate::ast::{CmpOp, Pattern, PatternElem, Predicate, TokenTest};
use crate::diag::Diag;
use crate::lexer::token::{Token, TokenKind};

/// Parses a token stream into a pattern, collecting diagnostics.
pub(crate) fn parse_pattern_tokens(tokens: &[Token]) -> (Option<Pattern>, Vec<Diag>) {
    let mut stream = TokenStream::new(tokens);
    match parse_pattern(&mut stream) {
        Ok(pattern) => {
            debug_assert!(pattern.check_invariants().is_ok());
            (Some(pattern), Vec::new())
        }
        Err(diag) => (None, vec![*diag]),
    }
}

fn parse_pattern(stream: &mut TokenStream) -> ParseResult<Pattern> {
    if stream.check(&TokenKind::Eof) {
        return Err(Box::new(
            Diag::error("empty query")
                .with_primary_label(stream.current().span.clone(), "nothing to parse"),
        ));
    }

    let mut elems = vec![parse_element(stream)?];
    loop {
        match &stream.current().kind {
            TokenKind::Eof => break,
            TokenKind::Distance { min, max } => {
                let (min, max) = (*min, *max);
                let distance_span = stream.current().span.clone();
                if min >= max {
                    return Err(Box::new(
                        Diag::error(format!("empty distance range {{{min},{max}}}"))
                            .with_primary_label(
                                distance_span,
                                "upper bound must exceed lower bound",
                            ),
                    ));
                }
                stream.advance();
                elems.push(PatternElem::Distance { min, max });

                // A distance is a gap, not a match: it needs a token
                // pattern on its right to anchor against.
                if !matches!(
                    stream.current().kind,
                    TokenKind::LBracket | TokenKind::LParen
                ) {
                    return Err(Box::new(
                        Diag::error("a distance must be followed by a token pattern")
                            .with_primary_label(
                                stream.current().span.clone(),
                                format!("found {}", stream.current().kind),
                            )
                            .with_secondary_label(distance_span, "distance here"),
                    ));
                }
                elems.push(parse_element(stream)?);
            }
            TokenKind::LBracket | TokenKind::LParen => elems.push(parse_element(stream)?),
            other => {
                return Err(stream.error_here(format!("unexpected {other} in pattern")));
            }
        }
    }
    Ok(Pattern::new(elems))
}

fn parse_element(stream: &mut TokenStream) -> ParseResult<PatternElem> {
    match &stream.current().kind {
        TokenKind::LBracket => {
            let test = parse_bracketed(stream)?;
            if stream.consume(&TokenKind::Question) {
                Ok(PatternElem::Optional(test))
            } else {
                Ok(test.into_elem())
            }
        }
        TokenKind::LParen => {
            let elem = parse_or_group(stream)?;
            if stream.check(&TokenKind::Question) {
                return Err(
                    stream.error_here("'?' may only follow a bracketed token pattern")
                );
            }
            Ok(elem)
        }
        TokenKind::Distance { .. } => {
            Err(stream.error_here("a distance must sit between two token patterns"))
        }
        other => Err(stream.error_here(format!("expected a token pattern, found {other}"))),
    }
}

fn parse_bracketed(stream: &mut TokenStream) -> ParseResult<TokenTest> {
    stream.expect(TokenKind::LBracket)?;
    let mut preds = vec![parse_simple(stream)?];
    while stream.consume(&TokenKind::Ampersand) {
        preds.push(parse_simple(stream)?);
    }
    stream.expect(TokenKind::RBracket)?;
    if preds.len() == 1 {
        Ok(TokenTest::Simple(preds.remove(0)))
    } else {
        Ok(TokenTest::And(preds))
    }
}

fn parse_simple(stream: &mut TokenStream) -> ParseResult<Predicate> {
    let (attr, attr_span) = match &stream.current().kind {
        TokenKind::Attr(attr) => (*attr, stream.current().span.clone()),
        other => {
            return Err(stream.error_here(format!("expected attribute name, found {other}")));
        }
    };
    stream.advance();

    let op = match &stream.current().kind {
        TokenKind::Eq => CmpOp::Eq,
        TokenKind::Neq => CmpOp::Neq,
        other => {
            return Err(
                stream.error_here(format!("expected '=' or '!=' after {attr}, found {other}"))
            );
        }
    };
    stream.advance();

    let (value, value_span) = match &stream.current().kind {
        TokenKind::Value(value) => (value.clone(), stream.current().span.clone()),
        other => {
            return Err(stream.error_here(format!("expected a quoted value, found {other}")));
        }
    };
    stream.advance();

    Ok(Predicate {
        attr,
        op,
        value,
        span: merge_spans(&attr_span, &value_span),
    })
}

fn parse_or_group(stream: &mut TokenStream) -> ParseResult<PatternElem> {
    let open_span = stream.current().span.clone();
    stream.expect(TokenKind::LParen)?;
    let mut alts = vec![parse_alt(stream)?];
    if !stream.check(&TokenKind::Pipe) {
        return Err(Box::new(
            Diag::error("an alternation group needs at least two alternatives")
                .with_primary_label(
                    stream.current().span.clone(),
                    format!("expected '|', found {}", stream.current().kind),
                )
                .with_secondary_label(open_span, "group opened here"),
        ));
    }
    while stream.consume(&TokenKind::Pipe) {
        alts.push(parse_alt(stream)?);
    }
    stream.expect(TokenKind::RParen)?;
    Ok(PatternElem::Or(alts))
}

fn parse_alt(stream: &mut TokenStream) -> ParseResult<TokenTest> {
    if !stream.check(&TokenKind::LBracket) {
        return Err(stream.error_here(format!(
            "expected a bracketed alternative, found {}",
            stream.current().kind
        )));
    }
    parse_bracketed(stream)
}
