//! `cql` command-line front end.
//!
//! Loads a JSON corpus, runs one query against it, and reports either
//! every match span or whether any match exists. Exit code 0 means at
//! least one result (or a successful findall); a failed match and any
//! error exit with 1.

use clap::{Parser, ValueEnum};
use cql_engine::engine::{CompiledPattern, any_match, find_all};
use cql_engine::{AnnotatedToken, MatchSpan, load_corpus};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cql",
    version,
    about = "Query annotated text corpora with CQL patterns"
)]
struct Cli {
    /// CQL query to execute, e.g. "[lemma='rey' & pos='NOUN']"
    query: String,

    /// Path to the JSON corpus file
    corpus: PathBuf,

    /// Query mode
    #[arg(short, long, value_enum, default_value_t = Mode::Findall)]
    mode: Mode,

    /// Verbose output (matched token text, info-level logs)
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Report whether the pattern occurs at all
    Match,
    /// Report every occurrence
    Findall,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Match => write!(f, "match"),
            Mode::Findall => write!(f, "findall"),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.debug {
        "cql_engine=debug,cql=debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    run(&cli)
}

fn run(cli: &Cli) -> ExitCode {
    let corpus = match load_corpus(&cli.corpus) {
        Ok(corpus) => corpus,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    // Parse through the report-producing front end so query errors
    // render with source context.
    let parsed = cql_engine::parse(&cli.query);
    if !parsed.diagnostics.is_empty() {
        for report in &parsed.diagnostics {
            eprintln!("{report:?}");
        }
        return ExitCode::FAILURE;
    }
    let Some(ast) = parsed.ast else {
        eprintln!("error: query cannot be empty");
        return ExitCode::FAILURE;
    };

    let compiled = match CompiledPattern::compile(&ast) {
        Ok(compiled) => compiled,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match cli.mode {
        Mode::Match => {
            let matched = any_match(&compiled, &corpus);
            println!("Match: {matched}");
            if matched {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Mode::Findall => {
            let spans = find_all(&compiled, &corpus);
            println!("Found {} matches:", spans.len());
            for span in &spans {
                print_span(span, &corpus, cli.verbose);
            }
            ExitCode::SUCCESS
        }
    }
}

fn print_span(span: &MatchSpan, corpus: &[AnnotatedToken], verbose: bool) {
    if verbose {
        let words: Vec<&str> = corpus[span.start..span.end]
            .iter()
            .map(|token| token.word.as_deref().unwrap_or("_"))
            .collect();
        println!("  {span} -> {}", words.join(" "));
    } else {
        println!("  {span}");
    }
}
