use anyhow::Result;
use clap::{Parser, Subcommand};
use poemdex_core::{load_corpus_file, search, InvertedIndex, RankedDocument};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use tracing_subscriber::{fmt, EnvFilter};

const HIGHLIGHT: &str = "\x1b[1;32;40m";
const NO_MATCH: &str = "\x1b[1;31;40m NO MATCH \x1b[0m";
const RESET: &str = "\x1b[0m";

#[derive(Parser)]
#[command(name = "poemdex")]
#[command(about = "Search a corpus of one-line poems", long_about = None)]
struct Cli {
    /// Corpus file, one poem per line
    #[arg(long, default_value = "./poems.txt")]
    corpus: String,
    /// Maximum number of documents to print per query
    #[arg(long, default_value_t = 10)]
    limit: usize,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prompt for queries until end of input
    Repl,
    /// Run a single query
    Query {
        /// Terms separated by spaces or '@'; any '&' switches to AND
        query: String,
        /// Print hits as JSON instead of highlighted text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Serialize)]
struct Hit<'a> {
    #[serde(flatten)]
    ranked: &'a RankedDocument,
    text: &'a str,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let index = load_corpus_file(&cli.corpus)?;
    tracing::info!(corpus = %cli.corpus, num_docs = index.num_docs(), "ready");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Repl => repl(&index, cli.limit, io::stdin().lock(), &mut out),
        Commands::Query { query, json } => {
            let ranked = search(&index, &query);
            if json {
                print_json(&index, ranked.as_deref(), cli.limit, &mut out)
            } else {
                print_results(&index, ranked.as_deref(), cli.limit, &mut out)
            }
        }
    }
}

fn repl<R: BufRead, W: Write>(index: &InvertedIndex, limit: usize, input: R, out: &mut W) -> Result<()> {
    write!(out, "Enter term(s) to search: ")?;
    out.flush()?;
    for line in input.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            print_results(index, search(index, &line).as_deref(), limit, out)?;
        }
        write!(out, "Enter term(s) to search: ")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}

fn print_results<W: Write>(index: &InvertedIndex, ranked: Option<&[RankedDocument]>, limit: usize, out: &mut W) -> Result<()> {
    let Some(ranked) = ranked else {
        writeln!(out, "{NO_MATCH}")?;
        return Ok(());
    };
    for hit in ranked.iter().take(limit) {
        let Some(doc) = index.document(hit.doc_id) else { continue };
        writeln!(out, "--- document {} ({:.2}): {}", hit.doc_id, hit.score, highlight_terms(&doc.text, &hit.matched_terms))?;
    }
    writeln!(out, "-----------------------------")?;
    Ok(())
}

fn print_json<W: Write>(index: &InvertedIndex, ranked: Option<&[RankedDocument]>, limit: usize, out: &mut W) -> Result<()> {
    let hits: Vec<Hit> = ranked
        .unwrap_or_default()
        .iter()
        .take(limit)
        .filter_map(|r| {
            index.document(r.doc_id).map(|doc| Hit { ranked: r, text: &doc.text })
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &serde_json::json!({ "matched": ranked.is_some(), "hits": hits }))?;
    writeln!(out)?;
    Ok(())
}

/// Wrap every occurrence of the matched terms in ANSI color. Longer terms win
/// where matches overlap.
fn highlight_terms(text: &str, terms: &[String]) -> String {
    let mut sorted: Vec<&String> = terms.iter().filter(|t| !t.is_empty()).collect();
    if sorted.is_empty() {
        return text.to_string();
    }
    sorted.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));
    let pattern = sorted.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
    match regex::Regex::new(&pattern) {
        Ok(re) => re.replace_all(text, |caps: &regex::Captures| format!("{HIGHLIGHT}{}{RESET}", &caps[0])).into_owned(),
        Err(e) => {
            tracing::warn!(error = %e, "could not build highlight pattern");
            text.to_string()
        }
    }
}
