use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::prelude::*;
use typewriter_core::{tokenize_bytes, ParseError, RevealSequence, RevealUnit, Revealer, RunOutcome, Surface};

mod config;
mod surface;

use config::{FileConfig, GranularityArg, RenderMode, Settings};
use surface::{MarkupSurface, TakeError, TextSurface};

/// Markup revealed when neither `--markup` nor `--input` is given.
const DEFAULT_MARKUP: &str = "<p>Hello, <strong>this</strong> is <em>HTML</em> text!</p>";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "typewriter",
    about = "Reveal HTML markup one unit per tick, keeping tags whole",
    version
)]
struct Opts {
    /// Markup to reveal
    #[arg(long, conflicts_with = "input")]
    markup: Option<String>,

    /// Read markup from a file (`-` for stdin)
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Delay between units in milliseconds [default: 100]
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Split text per character or per text node [default: char]
    #[arg(long, value_enum)]
    granularity: Option<GranularityArg>,

    /// Write units verbatim, or only text with tags hidden [default: markup]
    #[arg(long, value_enum)]
    render: Option<RenderMode>,

    /// Print the reveal units as JSON and exit
    #[arg(long)]
    units: bool,

    /// TOML file with defaults for delay_ms, granularity and render
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Serialize)]
struct UnitJson<'a> {
    kind: &'static str,
    text: &'a str,
}

impl<'a> From<&'a RevealUnit<'_>> for UnitJson<'a> {
    fn from(unit: &'a RevealUnit<'_>) -> Self {
        let kind = match unit {
            RevealUnit::OpenTag(_) => "open",
            RevealUnit::CloseTag(_) => "close",
            RevealUnit::Char(_) => "char",
            RevealUnit::Text(_) => "text",
        };
        Self {
            kind,
            text: unit.as_str(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    init_tracing();

    let file = match &opts.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::merge(opts.delay_ms, opts.granularity, opts.render, &file);
    debug!(?settings, "resolved settings");

    let markup = read_markup(&opts)?;
    let sequence = tokenize_bytes(&markup, settings.granularity).map_err(|e| describe(&markup, e))?;

    if opts.units {
        let units: Vec<UnitJson<'_>> = sequence.iter().map(UnitJson::from).collect();
        println!("{}", serde_json::to_string_pretty(&units)?);
        return Ok(());
    }

    let stdout = std::io::stdout().lock();
    match settings.render {
        RenderMode::Markup => reveal(sequence, MarkupSurface::new(stdout), &settings).await,
        RenderMode::Text => reveal(sequence, TextSurface::new(stdout), &settings).await,
    }
}

async fn reveal<S>(sequence: RevealSequence<'_>, mut surface: S, settings: &Settings) -> anyhow::Result<()>
where
    S: Surface + TakeError,
{
    let shutdown = async {
        // An error here means no handler could be installed; keep running
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    let outcome = Revealer::new(sequence)
        .run_until(&mut surface, settings.delay, shutdown)
        .await;

    if let RunOutcome::Cancelled { .. } = outcome {
        surface.finish();
        info!(?outcome, "interrupted");
    }
    if let Some(e) = surface.take_error() {
        return Err(e).context("writing to stdout");
    }
    Ok(())
}

/// Raw markup bytes; UTF-8 is checked when tokenizing.
fn read_markup(opts: &Opts) -> anyhow::Result<Vec<u8>> {
    if let Some(markup) = &opts.markup {
        return Ok(markup.clone().into_bytes());
    }
    match &opts.input {
        Some(path) if path.as_os_str() == "-" => {
            let mut markup = Vec::new();
            std::io::stdin()
                .read_to_end(&mut markup)
                .context("reading markup from stdin")?;
            Ok(markup)
        }
        Some(path) => std::fs::read(path).with_context(|| format!("reading markup from {}", path.display())),
        None => Ok(DEFAULT_MARKUP.as_bytes().to_vec()),
    }
}

/// Attach the offending source text to a parse error.
fn describe(markup: &[u8], err: ParseError) -> anyhow::Error {
    match markup.get(err.span.range()).filter(|s| !s.is_empty()) {
        Some(excerpt) => {
            let excerpt: String = String::from_utf8_lossy(excerpt).chars().take(40).collect();
            anyhow::Error::new(err).context(format!("invalid markup near {:?}", excerpt))
        }
        None => anyhow::Error::new(err).context("invalid markup"),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
