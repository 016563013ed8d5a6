//! Command-line host for pdfcheck.
//!
//! Takes a list of files, checks them in the given order and prints one
//! report per file as soon as it is ready.

use clap::{ArgAction, Parser, ValueEnum};
use pdfcheck::{
    BatchProcessor, CheckerConfig, Field, HtmlRenderer, JsonRenderer, LocalFile, RenderSink,
    Renderer, Result, TextRenderer,
};
use std::path::PathBuf;
use std::{io, process};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Html,
    Json,
}

/// Check PDF files for accessibility-related metadata: version, tagging,
/// language, Marked flag, PDF/UA identifier, title, creator tool and producer.
#[derive(Debug, Parser)]
#[command(name = "pdfcheck", version, about)]
struct Cli {
    /// Files to check, reported in this order
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Comma-separated subset of checks to run
    /// (title, display-doc-title, marked, pdfua, tagged, language, creator-tool, producer)
    #[arg(long, value_delimiter = ',', value_name = "FIELDS")]
    fields: Vec<Field>,

    /// Inspect files even when they are not named *.pdf
    #[arg(long)]
    allow_any_type: bool,

    /// Skip files larger than this many bytes
    #[arg(long, value_name = "BYTES")]
    max_size: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn config(&self) -> CheckerConfig {
        let mut config = CheckerConfig {
            reject_non_pdf: !self.allow_any_type,
            max_file_size: self.max_size,
            ..Default::default()
        };
        if !self.fields.is_empty() {
            config.fields = self.fields.clone();
        }
        config
    }

    fn renderer(&self) -> Box<dyn Renderer + Send> {
        match self.format {
            Format::Text => Box::new(TextRenderer),
            Format::Html => Box::new(HtmlRenderer),
            Format::Json => Box::new(JsonRenderer),
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pdfcheck={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli).await {
        Ok(all_checked) => process::exit(if all_checked { 0 } else { 2 }),
        Err(e) => {
            eprintln!("❌ Error: {e}");
            process::exit(1);
        }
    }
}

/// Returns `Ok(true)` when every file was a PDF whose fields were checked.
async fn run(cli: &Cli) -> Result<bool> {
    let mut files = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        files.push(LocalFile::open(path).await);
    }

    let processor = BatchProcessor::new(cli.config());
    let mut sink = RenderSink::new(cli.renderer(), io::stdout().lock());
    let summary = processor.process(&files, &mut sink).await?;

    if !cli.quiet && cli.format == Format::Text {
        eprintln!(
            "\n📊 {} file(s): {} checked, {} not valid PDF, {} rejected, {} unreadable",
            summary.total(),
            summary.checked,
            summary.invalid,
            summary.rejected,
            summary.failed
        );
    }

    Ok(summary.all_checked())
}
