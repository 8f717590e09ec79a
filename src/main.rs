//! streammark CLI - convert Markdown to HTML as it is read

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use streammark::{Options, StreamParser, limits};

/// CLI flags
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Input file; `-` or absent reads standard input
    input: Option<PathBuf>,

    /// Bytes read and converted per step
    #[arg(long, default_value_t = limits::DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Render headings without numeric ids
    #[arg(long = "no-heading-ids", action = ArgAction::SetTrue)]
    no_heading_ids: bool,

    /// Decode and attribute-escape link destinations
    #[arg(long, action = ArgAction::SetTrue)]
    escape_link_attributes: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Convert(#[from] streammark::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(?err, "conversion failed");
            eprintln!("streammark: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let options = Options {
        heading_ids: !cli.no_heading_ids,
        escape_link_attributes: cli.escape_link_attributes,
    };

    let mut input: Box<dyn Read> = match cli.input.as_deref() {
        None => Box::new(io::stdin().lock()),
        Some(path) if path.as_os_str() == "-" => Box::new(io::stdin().lock()),
        Some(path) => Box::new(File::open(path).map_err(|source| CliError::Open {
            path: path.to_path_buf(),
            source,
        })?),
    };
    let mut out = BufWriter::new(io::stdout().lock());

    convert(&mut input, &mut out, options, cli.chunk_size)?;
    out.flush()?;
    Ok(())
}

/// Stream `input` through a parser, writing HTML as each chunk is converted.
fn convert(
    input: &mut dyn Read,
    out: &mut dyn Write,
    options: Options,
    chunk_size: usize,
) -> Result<(), CliError> {
    let mut parser = StreamParser::with_options(options);
    let mut chunk = vec![0u8; chunk_size.max(1)];

    loop {
        let n = match input.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        out.write_all(parser.feed(&chunk[..n])?)?;
    }
    out.write_all(parser.flush()?)?;

    tracing::debug!(
        feeds = parser.feed_count(),
        replays = parser.replays(),
        "input converted"
    );
    Ok(())
}
