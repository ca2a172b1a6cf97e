//! In-memory sink.

use report_model::Report;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use super::{ReportSink, SinkError};

/// Keeps serialized reports in a map and fallback output in a list.
#[derive(Debug, Default)]
pub struct MemoryReportSink {
    documents: BTreeMap<PathBuf, String>,
    fallback: Vec<Report>,
    fail_writes: bool,
    writes: usize,
}

impl MemoryReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw document, valid or not.
    pub fn insert_raw(&mut self, location: impl Into<PathBuf>, contents: impl Into<String>) {
        self.documents.insert(location.into(), contents.into());
    }

    /// Make every subsequent `persist` fail.
    pub fn fail_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn raw(&self, location: &Path) -> Option<&str> {
        self.documents.get(location).map(String::as_str)
    }

    /// Number of successful `persist` calls.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Reports emitted on the fallback channel, oldest first.
    pub fn fallback_reports(&self) -> &[Report] {
        &self.fallback
    }
}

impl ReportSink for MemoryReportSink {
    fn exists(&self, location: &Path) -> bool {
        self.documents.contains_key(location)
    }

    fn load(&self, location: &Path) -> Result<Report, SinkError> {
        let json = self.documents.get(location).ok_or_else(|| SinkError::Read {
            path: location.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such document"),
        })?;
        Report::from_json(json).map_err(|source| SinkError::Parse {
            path: location.to_path_buf(),
            source,
        })
    }

    fn persist(&mut self, location: &Path, report: &Report) -> Result<(), SinkError> {
        if self.fail_writes {
            return Err(SinkError::Write {
                path: location.to_path_buf(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "writes disabled"),
            });
        }
        self.documents.insert(location.to_path_buf(), report.to_json()?);
        self.writes += 1;
        Ok(())
    }

    fn write_to_fallback_channel(&mut self, report: &Report) {
        self.fallback.push(report.clone());
    }
}
