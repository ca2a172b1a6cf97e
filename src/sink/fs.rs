//! Filesystem-backed sink with stdout as the fallback channel.

use report_model::Report;
use std::fs;
use std::io::{self, Stdout, Write};
use std::path::Path;

use super::{ReportSink, SinkError};

/// Stores reports as pretty JSON files.
#[derive(Debug)]
pub struct FsReportSink<W: Write = Stdout> {
    fallback: W,
}

impl FsReportSink<Stdout> {
    pub fn new() -> Self {
        Self {
            fallback: io::stdout(),
        }
    }
}

impl Default for FsReportSink<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> FsReportSink<W> {
    /// Use a custom writer as the fallback channel.
    pub fn with_fallback(fallback: W) -> Self {
        Self { fallback }
    }

    pub fn into_fallback(self) -> W {
        self.fallback
    }

    fn emit(&mut self, report: &Report) -> io::Result<()> {
        let json = report
            .to_json()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("JSON error: {}", e)))?;
        self.fallback.write_all(json.as_bytes())?;
        self.fallback.flush()
    }
}

impl<W: Write> ReportSink for FsReportSink<W> {
    fn exists(&self, location: &Path) -> bool {
        location.exists()
    }

    fn load(&self, location: &Path) -> Result<Report, SinkError> {
        let json = fs::read_to_string(location).map_err(|source| SinkError::Read {
            path: location.to_path_buf(),
            source,
        })?;
        Report::from_json(&json).map_err(|source| SinkError::Parse {
            path: location.to_path_buf(),
            source,
        })
    }

    fn persist(&mut self, location: &Path, report: &Report) -> Result<(), SinkError> {
        let json = report.to_json()?;
        let write_error = |source| SinkError::Write {
            path: location.to_path_buf(),
            source,
        };

        if let Some(parent) = location.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_error)?;
            }
        }
        fs::write(location, json).map_err(write_error)
    }

    fn write_to_fallback_channel(&mut self, report: &Report) {
        if let Err(e) = self.emit(report) {
            tracing::error!(error = %e, "failed to write report to fallback channel");
        }
    }
}
