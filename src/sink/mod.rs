//! Report persistence
//!
//! The publish flow only needs four operations from a store, captured by
//! [`ReportSink`]. [`FsReportSink`] backs them with the filesystem and
//! stdout; [`MemoryReportSink`] keeps everything in memory.
//!
//! No locking is done: two runs publishing to the same location at once
//! race on read-modify-write and the last writer wins.

mod fs;
mod memory;
mod publish;

pub use fs::FsReportSink;
pub use memory::MemoryReportSink;
pub use publish::{publish, PublishError, PublishOutcome};

use report_model::Report;
use std::io;
use std::path::{Path, PathBuf};

/// Error from a sink operation
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a valid report: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Backing store for reports.
pub trait ReportSink {
    /// Whether a report (valid or not) exists at `location`.
    fn exists(&self, location: &Path) -> bool;

    /// Read and decode the report at `location`.
    fn load(&self, location: &Path) -> Result<Report, SinkError>;

    /// Store `report` at `location`, replacing what was there.
    fn persist(&mut self, location: &Path, report: &Report) -> Result<(), SinkError>;

    /// Emit `report` on the default output channel. Failures here are
    /// logged and otherwise dropped; there is nothing left to fall back to.
    fn write_to_fallback_channel(&mut self, report: &Report);
}
