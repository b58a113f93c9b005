use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use wikiabstracts::config;
use wikiabstracts::extract::{extract_to_file, ExtractOptions};
use wikiabstracts::fetch::DumpFetcher;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "wikiabstracts")]
#[command(about = "Write first-paragraph abstracts from a Wikipedia dump to XML")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Dump URL to download
    #[arg(long, default_value = config::DUMP_URL)]
    url: String,

    /// Read a local .xml.bz2 dump instead of downloading
    #[arg(short, long, conflicts_with = "url")]
    input: Option<PathBuf>,

    /// Output XML file
    #[arg(short, long, default_value = config::OUTPUT_PATH)]
    output: PathBuf,

    /// Limit number of pages to scan (for testing)
    #[arg(long)]
    limit: Option<u64>,

    /// Write only the first abstract for each title
    #[arg(long)]
    dedup_titles: bool,
}

fn run(cli: Cli) -> Result<()> {
    let options = ExtractOptions {
        limit: cli.limit,
        dedup_titles: cli.dedup_titles,
        show_progress: std::io::stderr().is_terminal(),
    };

    let start = Instant::now();
    let stats = match &cli.input {
        Some(path) => {
            info!(path = %path.display(), "Reading local dump");
            let file = File::open(path)
                .with_context(|| format!("Failed to open dump: {}", path.display()))?;
            extract_to_file(file, &cli.output, &options)?
        }
        None => {
            let fetcher = DumpFetcher::new()?;
            let response = fetcher.fetch(&cli.url)?;
            extract_to_file(response, &cli.output, &options)?
        }
    };

    info!(
        duration_secs = start.elapsed().as_secs_f64(),
        pages = stats.pages(),
        abstracts = stats.written(),
        empty = stats.empty(),
        duplicates = stats.duplicates(),
        "Run complete"
    );

    println!("Done! {} is ready.", cli.output.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
