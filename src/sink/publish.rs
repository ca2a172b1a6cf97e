//! Publishing a finished run's report.

use report_model::Report;
use std::path::{Path, PathBuf};

use super::{ReportSink, SinkError};
use crate::merge::merge_reports;

/// What happened to a published report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// No destination configured; written to the fallback channel
    Emitted,
    /// Destination did not exist; the fresh report was stored
    Created,
    /// Destination held a report; the merged result was stored
    Merged,
    /// Storing failed; the report went to the fallback channel instead
    FellBack,
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The existing report could not be read or decoded. Nothing was
    /// written, not even to the fallback channel.
    #[error("could not merge into existing report at {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: SinkError,
    },
}

/// Deliver `report` to `destination`, merging into an existing report there.
///
/// - No destination: emit on the fallback channel.
/// - Destination absent: store the fresh report.
/// - Destination present: load it, merge `report` into it, store the result.
/// - A failed store falls back to emitting the report that was to be stored.
/// - A failed load aborts: the existing document is left untouched and the
///   new report is not written anywhere. The error is logged here once and
///   returned.
pub fn publish<S>(
    sink: &mut S,
    destination: Option<&Path>,
    report: &Report,
) -> Result<PublishOutcome, PublishError>
where
    S: ReportSink + ?Sized,
{
    let Some(location) = destination else {
        sink.write_to_fallback_channel(report);
        return Ok(PublishOutcome::Emitted);
    };

    if !sink.exists(location) {
        return Ok(store(sink, location, report, PublishOutcome::Created));
    }

    let existing = match sink.load(location) {
        Ok(existing) => existing,
        Err(source) => {
            tracing::error!(
                path = %location.display(),
                error = %source,
                "existing report could not be loaded; nothing written"
            );
            return Err(PublishError::Load {
                path: location.to_path_buf(),
                source,
            });
        }
    };

    let merged = merge_reports(&existing, report);
    Ok(store(sink, location, &merged, PublishOutcome::Merged))
}

fn store<S>(sink: &mut S, location: &Path, report: &Report, outcome: PublishOutcome) -> PublishOutcome
where
    S: ReportSink + ?Sized,
{
    match sink.persist(location, report) {
        Ok(()) => {
            tracing::info!(path = %location.display(), ?outcome, "report written");
            outcome
        }
        Err(e) => {
            tracing::warn!(
                path = %location.display(),
                error = %e,
                "writing report failed; emitting on fallback channel"
            );
            sink.write_to_fallback_channel(report);
            PublishOutcome::FellBack
        }
    }
}
