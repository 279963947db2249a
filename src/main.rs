//! `parquet-slice` - list a Parquet file's columns or export a row window as CSV.
//!
//! ```bash
//! # Show the columns
//! parquet-slice --file data.parquet --schema
//!
//! # Rows 10..30 of two columns
//! parquet-slice --file data.parquet --offset 10 --size 20 --columns col1,col2
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use parquet_slice::options::{DEFAULT_BATCH_SIZE, DEFAULT_SIZE};
use parquet_slice::{ExportOptions, export_file, parse_columns, show_schema_file};
use std::fs::{File, create_dir_all};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const EXAMPLES: &str = "\
Usage examples:
  - Display the schema of a Parquet file:
    parquet-slice --file data.parquet --schema

  - Read records from a Parquet file:
    parquet-slice --file data.parquet --offset 10 --size 20 --columns col1,col2

  - Display help:
    parquet-slice --help";

/// Inspect a Parquet file or export a window of its rows as CSV
#[derive(Parser, Debug)]
#[command(name = "parquet-slice", version, after_help = EXAMPLES)]
struct Cli {
    /// Path to the Parquet file (required)
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Display only the Parquet schema
    #[arg(long)]
    schema: bool,

    /// Start row number
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    offset: i64,

    /// Number of rows to read
    #[arg(long, default_value_t = DEFAULT_SIZE, allow_negative_numbers = true)]
    size: i64,

    /// List of columns separated by commas (e.g. 'col1,col2,col3')
    #[arg(long, value_name = "LIST")]
    columns: Option<String>,

    /// Rows read per column in one batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Output field delimiter (a single ASCII character)
    #[arg(long, default_value = ",", value_parser = parse_delimiter)]
    delimiter: u8,

    /// Do not write the header record
    #[arg(long)]
    no_header: bool,

    /// Write output to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(format!("delimiter must be a single ASCII character, got {s:?}")),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Output file that is only created on the first write or flush, so a
/// request rejected during validation leaves nothing on disk.
struct LazyFile {
    path: PathBuf,
    file: Option<File>,
}

impl LazyFile {
    fn new(path: PathBuf) -> Self {
        Self { path, file: None }
    }

    fn get(&mut self) -> io::Result<&mut File> {
        let file = match self.file.take() {
            Some(file) => file,
            None => {
                if let Some(parent) = self.path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    create_dir_all(parent)?;
                }
                File::create(&self.path)?
            }
        };
        Ok(self.file.insert(file))
    }
}

impl Write for LazyFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.get()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.get()?.flush()
    }
}

fn open_output(path: Option<&PathBuf>) -> Box<dyn Write> {
    match path {
        Some(path) => Box::new(BufWriter::new(LazyFile::new(path.clone()))),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    }
}

fn run(cli: &Cli) -> Result<()> {
    let path = cli
        .file
        .as_ref()
        .context("the --file parameter is required")?;

    if cli.schema {
        eprintln!("Parquet File Schema:");
        let mut stdout = io::stdout().lock();
        show_schema_file(path, &mut stdout)
            .with_context(|| format!("read schema of {}", path.display()))?;
        return Ok(());
    }

    let options = ExportOptions {
        offset: cli.offset,
        size: cli.size,
        columns: parse_columns(cli.columns.as_deref().unwrap_or_default()),
        batch_size: cli.batch_size,
        delimiter: cli.delimiter,
        header: !cli.no_header,
    };
    tracing::debug!(?options, file = %path.display(), "export requested");

    let out = open_output(cli.output.as_ref());
    let summary = export_file(path, &options, out).with_context(|| match &cli.output {
        Some(target) => format!("export rows from {} to {}", path.display(), target.display()),
        None => format!("export rows from {}", path.display()),
    })?;
    tracing::info!(
        rows = summary.rows_written,
        batches = summary.batches,
        columns = summary.columns.len(),
        "done"
    );
    Ok(())
}

fn main() -> ExitCode {
    if std::env::args_os().len() <= 1 {
        let mut cmd = Cli::command();
        if cmd.print_help().is_err() {
            return ExitCode::FAILURE;
        }
        println!();
        return ExitCode::SUCCESS;
    }

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
