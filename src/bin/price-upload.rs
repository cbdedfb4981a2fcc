//! `price-upload` - load a price-master file and show its status line and preview, or write a
//! sample template.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use price_master_upload::ingestion::{
    CompositeObserver, CsvOptions, FileObserver, IngestionFormat, IngestionObserver, IngestionOptions,
    StdErrObserver, UploadedFile,
};
use price_master_upload::preview::PREVIEW_ROW_LIMIT;
use price_master_upload::sample::SampleFormat;
use price_master_upload::session::{SessionOptions, UploadSession};

/// Price-master upload tool.
#[derive(Debug, Parser)]
#[command(name = "price-upload")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load a CSV or .xlsx file and print the status line and a preview.
    Ingest(IngestArgs),
    /// Write a sample template file.
    Sample(SampleArgs),
}

#[derive(Debug, Args)]
struct IngestArgs {
    /// File to load.
    file: PathBuf,

    /// Force the input format instead of detecting it from the file name.
    #[arg(long)]
    format: Option<FormatArg>,

    /// Field delimiter for delimited text (detected when omitted).
    #[arg(long)]
    delimiter: Option<char>,

    /// Number of preview rows.
    #[arg(long, default_value_t = PREVIEW_ROW_LIMIT)]
    preview: usize,

    /// Print all rows as JSON instead of the preview table.
    #[arg(long)]
    json: bool,

    /// Append ingestion events to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log ingestion events to stderr.
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Debug, Args)]
struct SampleArgs {
    /// Template encoding.
    format: FormatArg,

    /// Directory to write the template into.
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Xlsx,
}

impl From<FormatArg> for IngestionFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Csv => IngestionFormat::Csv,
            FormatArg::Xlsx => IngestionFormat::Excel,
        }
    }
}

impl From<FormatArg> for SampleFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Csv => SampleFormat::Csv,
            FormatArg::Xlsx => SampleFormat::Xlsx,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Ingest(args) => ingest(args),
        Commands::Sample(args) => sample(args),
    }
}

fn ingest(args: IngestArgs) -> Result<()> {
    let delimiter = match args.delimiter {
        Some(c) if c.is_ascii() => Some(c as u8),
        Some(c) => bail!("delimiter must be a single ASCII character, got '{c}'"),
        None => None,
    };

    let mut observers: Vec<Arc<dyn IngestionObserver>> = Vec::new();
    if args.verbose {
        observers.push(Arc::new(StdErrObserver));
    }
    if let Some(path) = &args.log_file {
        observers.push(Arc::new(FileObserver::new(path)));
    }
    let observer: Option<Arc<dyn IngestionObserver>> = match observers.len() {
        0 => None,
        _ => Some(Arc::new(CompositeObserver::new(observers))),
    };

    let options = SessionOptions {
        ingestion: IngestionOptions {
            format: args.format.map(IngestionFormat::from),
            csv: CsvOptions { delimiter },
            observer,
            ..Default::default()
        },
        preview_limit: args.preview,
        ..Default::default()
    };

    let file = UploadedFile::from_path(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let mut session = UploadSession::new(options);
    session.submit(Some(file));
    session.wait_all();

    println!("{}", session.status());
    if args.json {
        println!("{}", session.dataset().to_json_pretty()?);
    } else if let Some(preview) = session.preview() {
        print!("{}", preview.render_text());
    }
    Ok(())
}

fn sample(args: SampleArgs) -> Result<()> {
    let file = price_master_upload::sample::export_sample(args.format.into())?;
    let path = file
        .save_in(&args.out)
        .with_context(|| format!("failed to write sample into {}", args.out.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ingest_flags() {
        let cli = Cli::parse_from([
            "price-upload",
            "ingest",
            "prices.txt",
            "--format",
            "xlsx",
            "--preview",
            "3",
            "--json",
        ]);
        let Commands::Ingest(args) = cli.command else {
            panic!("expected ingest");
        };
        assert_eq!(args.file, PathBuf::from("prices.txt"));
        assert!(matches!(args.format, Some(FormatArg::Xlsx)));
        assert_eq!(args.preview, 3);
        assert!(args.json);
    }

    #[test]
    fn preview_defaults_to_session_limit() {
        let cli = Cli::parse_from(["price-upload", "ingest", "prices.csv"]);
        let Commands::Ingest(args) = cli.command else {
            panic!("expected ingest");
        };
        assert_eq!(args.preview, PREVIEW_ROW_LIMIT);
        assert!(args.format.is_none());
    }

    #[test]
    fn parses_sample_command() {
        let cli = Cli::parse_from(["price-upload", "sample", "csv", "--out", "/tmp"]);
        let Commands::Sample(args) = cli.command else {
            panic!("expected sample");
        };
        assert!(matches!(args.format, FormatArg::Csv));
        assert_eq!(args.out, PathBuf::from("/tmp"));
    }
}
