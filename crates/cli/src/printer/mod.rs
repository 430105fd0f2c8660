use std::io::{self, Write};

use chrono::{DateTime, Utc};
use statwalk_fs::{StatRecord, WalkStats};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `ls -l` style lines.
    #[default]
    Human,
    /// NDJSON (newline-delimited JSON) for machine consumption.
    Json,
}

/// Configuration for printing walk results.
#[derive(Debug, Clone)]
pub struct PrinterConfig {
    pub format: OutputFormat,
    /// Whether to write the closing summary to the error stream.
    pub show_summary: bool,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            show_summary: true,
        }
    }
}

/// Trait for printing walk results.
///
/// Records arrive in walk order; the printer must not reorder or buffer
/// them beyond what the underlying writer does.
pub trait RecordPrinter {
    fn print_record(&mut self, record: &StatRecord) -> io::Result<()>;

    /// Called once after the walk completed successfully.
    fn finish(&mut self, stats: &WalkStats) -> io::Result<()>;
}

/// Render one record as `<mode> <size> <mtime> <path>[ -> <linkname>]`.
pub fn format_record(record: &StatRecord) -> String {
    let mtime: DateTime<Utc> = record.mod_time().into();
    let mut line = format!(
        "{} {:>12} {} {}",
        record.mode,
        record.size,
        mtime.format("%Y-%m-%d %H:%M:%S"),
        record.path
    );
    if let Some(link) = &record.linkname {
        line.push_str(" -> ");
        line.push_str(link);
    }
    line
}

pub struct HumanPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
}

impl<W: Write, E: Write> HumanPrinter<W, E> {
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        Self { out, err, cfg }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> (W, E) {
        (self.out, self.err)
    }
}

impl HumanPrinter<io::Stdout, io::Stderr> {
    /// Create a printer that writes to stdout and stderr.
    pub fn stdout(cfg: PrinterConfig) -> Self {
        Self::new(io::stdout(), io::stderr(), cfg)
    }
}

pub struct JsonPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
}

impl<W: Write, E: Write> JsonPrinter<W, E> {
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        Self { out, err, cfg }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> (W, E) {
        (self.out, self.err)
    }
}

impl JsonPrinter<io::Stdout, io::Stderr> {
    /// Create a printer that writes to stdout and stderr.
    pub fn stdout(cfg: PrinterConfig) -> Self {
        Self::new(io::stdout(), io::stderr(), cfg)
    }
}

impl<W: Write, E: Write> RecordPrinter for HumanPrinter<W, E> {
    fn print_record(&mut self, record: &StatRecord) -> io::Result<()> {
        writeln!(self.out, "{}", format_record(record))
    }

    fn finish(&mut self, stats: &WalkStats) -> io::Result<()> {
        self.out.flush()?;
        if self.cfg.show_summary {
            writeln!(
                self.err,
                "\n[walk] {} records ({} visited, {} skipped, {} pruned, {} rejected, {} vanished)",
                stats.emitted,
                stats.visited,
                stats.skipped,
                stats.pruned,
                stats.rejected,
                stats.vanished,
            )?;
        }
        Ok(())
    }
}

impl<W: Write, E: Write> RecordPrinter for JsonPrinter<W, E> {
    fn print_record(&mut self, record: &StatRecord) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        writeln!(self.out)
    }

    fn finish(&mut self, stats: &WalkStats) -> io::Result<()> {
        self.out.flush()?;
        if self.cfg.show_summary {
            let obj = serde_json::json!({
                "type": "summary",
                "emitted": stats.emitted,
                "visited": stats.visited,
                "skipped": stats.skipped,
                "pruned": stats.pruned,
                "rejected": stats.rejected,
                "vanished": stats.vanished,
            });
            writeln!(self.err, "{}", obj)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "printer_tests.rs"]
mod tests;
