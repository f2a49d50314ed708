use anyhow::Result;
use clap::Parser;
use poemdex_core::keywords::{decode_payload, SearchSegmenter, DEFAULT_SCORE_THRESHOLD};
use poemdex_core::load_corpus_file;
use poemdex_matcher::fetch_payload;
use poemdex_matcher::match_records;
use poemdex_matcher::sink::MatchSink;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "poemdex-matcher")]
#[command(about = "Pick a poem for every image in a keyword payload")]
struct Cli {
    /// Keyword payload: a JSON file path or an http(s) URL
    #[arg(long)]
    keywords: String,
    /// Corpus file, one poem per line
    #[arg(long, default_value = "./poems.txt")]
    corpus: String,
    /// Match database directory
    #[arg(long, default_value = "./matches.db")]
    db: String,
    /// Keywords must score strictly above this to be used
    #[arg(long, default_value_t = DEFAULT_SCORE_THRESHOLD)]
    threshold: f64,
    /// Request timeout seconds for remote payloads
    #[arg(long, default_value_t = 12)]
    timeout_secs: u64,
    /// User-Agent for remote payloads
    #[arg(long, default_value = "poemdex-matcher/0.1")]
    user_agent: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Cli::parse();

    let index = load_corpus_file(&args.corpus)?;
    let payload = fetch_payload(&args.keywords, args.timeout_secs, &args.user_agent).await?;
    let records = decode_payload(&payload)?;
    tracing::info!(records = records.len(), "decoded keyword payload");

    let sink = MatchSink::open(&args.db)?;
    let summary = match_records(&index, records, args.threshold, &SearchSegmenter, &sink)?;
    sink.flush()?;

    eprintln!(
        "done: matched={} unmatched={} skipped={} -> {}",
        summary.matched, summary.unmatched, summary.skipped, &args.db
    );
    Ok(())
}
