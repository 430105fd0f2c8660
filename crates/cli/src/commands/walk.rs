use std::{
    io,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Args;
use log::{debug, error, warn};
use signal_hook::{
    consts::{SIGINT, SIGTERM},
    flag,
};
use statwalk_fs::{CancellationToken, Enricher, WalkOptions, walk};
use statwalk_runtime::{DEFAULT_IGNORE_FILE, read_pattern_file};

use crate::printer::{HumanPrinter, JsonPrinter, OutputFormat, PrinterConfig, RecordPrinter};

/// Exit code after SIGINT/SIGTERM, as a shell would report it.
const EXIT_CANCELLED: u8 = 130;
const EXIT_FAILURE: u8 = 2;

#[derive(Debug, Args)]
pub struct OutputOptions {
    /// Output records as NDJSON (one JSON object per line)
    #[arg(long)]
    pub json: bool,

    /// Suppress the closing summary
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl OutputOptions {
    pub fn make_printer(&self) -> Box<dyn RecordPrinter> {
        let format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        };

        let cfg = PrinterConfig {
            format,
            show_summary: !self.quiet,
        };

        match cfg.format {
            OutputFormat::Human => Box::new(HumanPrinter::stdout(cfg)),
            OutputFormat::Json => Box::new(JsonPrinter::stdout(cfg)),
        }
    }
}

#[derive(Debug, Args)]
pub struct WalkArgs {
    /// Directory to walk; symlinks are resolved first
    pub root: PathBuf,

    /// Only list paths matching GLOB (repeatable)
    #[arg(long = "include", short = 'i', value_name = "GLOB")]
    pub includes: Vec<String>,

    /// Skip paths matching GLOB, `!GLOB` re-includes (repeatable)
    #[arg(
        long = "exclude",
        short = 'e',
        value_name = "GLOB",
        allow_hyphen_values = true
    )]
    pub excludes: Vec<String>,

    /// Read exclude patterns from FILE, one per line
    #[arg(long, value_name = "FILE")]
    pub exclude_from: Option<PathBuf>,

    /// Do not read `.statwalkignore` from the root
    #[arg(long)]
    pub no_ignore_file: bool,

    /// Do not collect extended attributes
    #[arg(long)]
    pub no_xattrs: bool,

    /// Only list non-directories
    #[arg(long)]
    pub files_only: bool,

    #[command(flatten)]
    pub output: OutputOptions,
}

pub fn run(args: WalkArgs) -> ExitCode {
    match execute(args) {
        Ok(code) => code,
        Err(e) => {
            error!("[error] {e:#}");
            eprintln!("[walk] {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn execute(args: WalkArgs) -> Result<ExitCode> {
    let cancel = install_signal_handlers()?;
    let options = build_options(&args)?;
    let mut printer = args.output.make_printer();

    walk_to(&args.root, options, &cancel, printer.as_mut())
}

/// Route SIGINT and SIGTERM into the walk's cancellation flag.
fn install_signal_handlers() -> Result<CancellationToken> {
    let cancel = CancellationToken::new();
    for signal in [SIGINT, SIGTERM] {
        flag::register(signal, cancel.flag())
            .with_context(|| format!("failed to register handler for signal {signal}"))?;
    }
    Ok(cancel)
}

/// Exclude patterns in precedence order: the root's ignore file, then
/// `--exclude-from`, then `--exclude`. Later patterns win.
pub(crate) fn exclude_patterns(args: &WalkArgs) -> Result<Vec<String>> {
    let mut patterns = Vec::new();

    if !args.no_ignore_file {
        let path = args.root.join(DEFAULT_IGNORE_FILE);
        match read_pattern_file(&path) {
            Ok(found) => {
                debug!("[walk] {} patterns from {}", found.len(), path.display());
                patterns.extend(found);
            }
            Err(e) if is_absent(&e) => {}
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        }
    }

    if let Some(file) = &args.exclude_from {
        let found = read_pattern_file(file)
            .with_context(|| format!("failed to read exclude file {}", file.display()))?;
        patterns.extend(found);
    }

    patterns.extend(args.excludes.iter().cloned());
    Ok(patterns)
}

fn is_absent(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

pub(crate) fn build_options(args: &WalkArgs) -> Result<WalkOptions> {
    let mut options = WalkOptions::default();

    if !args.includes.is_empty() {
        options = options.include(args.includes.iter().cloned());
    }

    let excludes = exclude_patterns(args)?;
    if !excludes.is_empty() {
        options = options.exclude(excludes);
    }

    if args.no_xattrs {
        options.enrichers = identity_enrichers();
    }

    if args.files_only {
        options = options.accept(|record| !record.is_dir());
    }

    Ok(options)
}

#[cfg(unix)]
fn identity_enrichers() -> Vec<Box<dyn Enricher>> {
    vec![Box::new(statwalk_fs::UnixIdentity::default())]
}

#[cfg(not(unix))]
fn identity_enrichers() -> Vec<Box<dyn Enricher>> {
    Vec::new()
}

/// Run the walk, streaming records into `printer`.
///
/// A closed stdout (e.g. piping into `head`) ends the walk quietly.
pub(crate) fn walk_to(
    root: &Path,
    options: WalkOptions,
    cancel: &CancellationToken,
    printer: &mut dyn RecordPrinter,
) -> Result<ExitCode> {
    let mut output_closed = false;

    let result = walk(root, options, cancel, |_, record| {
        match printer.print_record(record) {
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                output_closed = true;
                Err(e.into())
            }
            other => other.map_err(Into::into),
        }
    });

    if output_closed {
        debug!("[walk] output closed, stopping");
        return Ok(ExitCode::SUCCESS);
    }

    match result {
        Ok(stats) => {
            printer.finish(&stats)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_cancelled() => {
            warn!("[walk] cancelled");
            eprintln!("[walk] cancelled");
            Ok(ExitCode::from(EXIT_CANCELLED))
        }
        Err(e) => Err(e).with_context(|| format!("failed to walk {}", root.display())),
    }
}

#[cfg(test)]
#[path = "walk_tests.rs"]
mod tests;
