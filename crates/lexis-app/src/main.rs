use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use lexis_config::Config;
use lexis_core::LookupOrchestrator;
use lexis_sources::build_source;
use lexis_types::LookupResult;
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "lexis", about = "Look a word up in an online dictionary", version)]
struct Args {
    /// Word to look up
    word: String,

    /// Language code to search in, defaults to the configured default language
    #[arg(short, long)]
    lang: Option<String>,

    /// JSON profile to load instead of the LEXIS_* environment
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the lookup result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("lookup failed: {e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::new(),
    };

    let source = build_source(&config.source).context("failed to build dictionary source")?;
    let orchestrator = LookupOrchestrator::from_config(source, &config.dictionary);
    let language = args
        .lang
        .unwrap_or_else(|| orchestrator.default_language().to_string());

    let result = orchestrator
        .lookup(&args.word, &language)
        .await
        .with_context(|| format!("cannot look up {:?}", args.word))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", render::render(&result, args.word.trim(), &language));
    }

    Ok(match result {
        LookupResult::SourceError { .. } => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

/// Logs go to stderr so `--json` output stays parseable
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lexis=info"));
    let json = std::env::var("LEXIS_LOG_JSON").is_ok_and(|v| v == "1");

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
