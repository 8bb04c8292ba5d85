//! Front-end integration tests: surface syntax, AST shape, and
//! diagnostics.

use cql_engine::{PatternElem, parse};

fn diagnostics_text(diags: &[miette::Report]) -> String {
    diags
        .iter()
        .map(|diag| format!("{diag:?}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_ok(source: &str) -> cql_engine::Pattern {
    let result = parse(source);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics for `{source}`: {}",
        diagnostics_text(&result.diagnostics)
    );
    result.ast.expect("pattern")
}

fn parse_fails(source: &str) -> String {
    let result = parse(source);
    assert!(
        result.ast.is_none(),
        "expected `{source}` to fail, got {:?}",
        result.ast
    );
    assert!(!result.diagnostics.is_empty(), "expected diagnostics");
    diagnostics_text(&result.diagnostics)
}

#[test]
fn documented_surface_forms_parse() {
    for query in [
        "[lemma='rey']",
        "[pos='NOUN']",
        "[lemma='rey' & pos='NOUN']",
        "[lemma='re.*']",
        "[pos='DET'][pos='NOUN']",
        "[pos='DET'][]{0,3}[pos='NOUN']",
        "([lemma='casa'] | [lemma='hogar'])",
        "[pos='ADV']?[pos='VERB']",
    ] {
        parse_ok(query);
    }
}

#[test]
fn whitespace_between_tokens_is_ignored() {
    let compact = parse_ok("[lemma='rey'&pos='NOUN']");
    let spaced = parse_ok("[ lemma = 'rey' & pos = 'NOUN' ]");
    assert_eq!(compact.to_string(), spaced.to_string());
}

#[test]
fn canonical_printer_round_trips() {
    for query in [
        "[lemma='rey']",
        "[word!='Da']",
        "[lemma='rey' & pos='NOUN' & morph='Gender=Masc']",
        "[pos='DET'][]{0,3}[pos='NOUN']",
        "[pos='DET'][]{2,5}[pos='NOUN'][pos='ADJ']",
        "([lemma='casa'] | [lemma='hogar'] | [pos='NOUN' & word='x'])",
        "[pos='ADV']?[pos='VERB'][pos='NOUN']?",
    ] {
        let printed = parse_ok(query).to_string();
        let reprinted = parse_ok(&printed).to_string();
        assert_eq!(printed, reprinted, "printer not stable for `{query}`");
    }
}

#[test]
fn distance_lower_bound_defaults_to_zero() {
    let pattern = parse_ok("[pos='DET'][]{,3}[pos='NOUN']");
    assert!(matches!(
        pattern.elems[1],
        PatternElem::Distance { min: 0, max: 3 }
    ));
}

#[test]
fn parsed_patterns_satisfy_structural_invariants() {
    for query in [
        "[lemma='rey']",
        "[pos='DET'][]{0,3}[pos='NOUN']",
        "[pos='ADV']?[pos='VERB']",
        "([lemma='a'] | [lemma='b'])[]{1,2}[pos='X']",
    ] {
        assert!(parse_ok(query).check_invariants().is_ok());
    }
}

#[test]
fn empty_query_is_rejected() {
    let text = parse_fails("");
    assert!(text.contains("empty query"), "got: {text}");
}

#[test]
fn lexer_errors_are_reported_with_position() {
    let text = parse_fails("[lemma='rey'] @");
    assert!(text.contains("invalid character '@'"), "got: {text}");
}

#[test]
fn unknown_attribute_is_rejected_with_help() {
    let text = parse_fails("[stem='re']");
    assert!(text.contains("unknown attribute 'stem'"), "got: {text}");
}

#[test]
fn unclosed_value_is_rejected() {
    let text = parse_fails("[lemma='rey");
    assert!(text.contains("unclosed value"), "got: {text}");
}

#[test]
fn distance_must_sit_between_token_patterns() {
    parse_fails("[]{0,3}[pos='NOUN']");
    parse_fails("[pos='DET'][]{0,3}");
    parse_fails("[pos='DET'][]{0,3}[]{1,2}[pos='NOUN']");
}

#[test]
fn empty_distance_range_is_rejected() {
    let text = parse_fails("[pos='DET'][]{3,3}[pos='NOUN']");
    assert!(text.contains("empty distance range"), "got: {text}");
}

#[test]
fn optional_marker_requires_bracketed_element() {
    let text = parse_fails("([lemma='a'] | [lemma='b'])?");
    assert!(text.contains("bracketed token pattern"), "got: {text}");
}

#[test]
fn alternation_requires_two_alternatives() {
    let text = parse_fails("([lemma='casa'])");
    assert!(text.contains("at least two alternatives"), "got: {text}");
}

#[test]
fn trailing_garbage_is_rejected() {
    parse_fails("[lemma='rey'] ]");
    parse_fails("[lemma='rey'] = 'x'");
}
