//! Append-only text report for one run.
//!
//! The report lives at `<dir>/results_<YYYY-MM-DD>_<HHMM>.txt`. It is opened
//! in append mode and each section goes out in a single write, so a later
//! section can never truncate an earlier one.

use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Placeholder for a value that could not be extracted.
pub const PLACEHOLDER: &str = "N/A";

/// Build the report path for a run started at `at`.
pub fn report_path(dir: &Path, at: DateTime<Local>) -> PathBuf {
    dir.join(format!(
        "results_{}_{}.txt",
        at.format("%Y-%m-%d"),
        at.format("%H%M")
    ))
}

/// Append-only sink shared by every source in a run.
#[derive(Debug)]
pub struct ReportWriter {
    file: File,
    path: PathBuf,
    sections: usize,
}

impl ReportWriter {
    /// Open (or create) the report for a run started at `at` under `dir`.
    pub fn open(dir: &Path, at: DateTime<Local>) -> io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        Self::open_path(report_path(dir, at))
    }

    /// Open (or create) a report at an explicit path.
    pub fn open_path(path: PathBuf) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            file,
            path,
            sections: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of sections appended through this writer.
    pub fn sections(&self) -> usize {
        self.sections
    }

    /// Append one section with a single write.
    pub fn append(&mut self, section: &str) -> io::Result<()> {
        self.file.write_all(section.as_bytes())?;
        self.file.flush()?;
        self.sections += 1;
        tracing::debug!(
            "appended {} bytes to {}",
            section.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// A separator line of `width` copies of `ch`.
pub fn rule(ch: char, width: usize) -> String {
    std::iter::repeat(ch).take(width).collect()
}

/// Format an optional value with one decimal and a unit suffix, or the
/// placeholder.
pub fn value_or_placeholder(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) if unit.is_empty() => format!("{v:.1}"),
        Some(v) => format!("{v:.1} {unit}"),
        None => PLACEHOLDER.to_string(),
    }
}

/// Like [`value_or_placeholder`] but right-aligned to `width` columns for
/// the numeric part (`" 21.4 °C"`), keeping fixed-width rows aligned.
pub fn padded_value(value: Option<f64>, width: usize, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:>width$.1} {unit}"),
        None => format!("{PLACEHOLDER:>width$} {unit}"),
    }
}
