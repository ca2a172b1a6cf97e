//! Run lifecycle events and their JSON-lines form.
//!
//! One event per line, tagged by `event`:
//!
//! ```text
//! {"event":"start"}
//! {"event":"suite","title":"math"}
//! {"event":"pass","test":{"title":"adds","fullTitle":"math adds","duration":3}}
//! {"event":"test end","test":{"title":"adds","fullTitle":"math adds","duration":3}}
//! {"event":"end"}
//! ```

use serde::Deserialize;
use std::io::BufRead;

use crate::normalize::{deserialize_thrown, TestCase, ThrownValue};

/// A lifecycle event emitted by the test engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event")]
pub enum RunEvent {
    #[serde(rename = "start")]
    RunBegin,

    #[serde(rename = "suite")]
    SuiteBegin {
        #[serde(default)]
        title: String,
        /// The implicit root suite is not counted
        #[serde(default)]
        root: bool,
    },

    #[serde(rename = "suite end")]
    SuiteEnd,

    #[serde(rename = "test")]
    TestBegin { test: TestCase },

    #[serde(rename = "hook")]
    Hook,

    #[serde(rename = "pass")]
    Pass { test: TestCase },

    #[serde(rename = "fail")]
    Fail {
        test: TestCase,
        #[serde(default, deserialize_with = "deserialize_thrown")]
        err: Option<ThrownValue>,
    },

    #[serde(rename = "pending")]
    Pending { test: TestCase },

    #[serde(rename = "retry")]
    Retry { test: TestCase },

    #[serde(rename = "test end")]
    TestEnd { test: TestCase },

    #[serde(rename = "end")]
    RunEnd,
}

impl RunEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            RunEvent::RunBegin => "start",
            RunEvent::SuiteBegin { .. } => "suite",
            RunEvent::SuiteEnd => "suite end",
            RunEvent::TestBegin { .. } => "test",
            RunEvent::Hook => "hook",
            RunEvent::Pass { .. } => "pass",
            RunEvent::Fail { .. } => "fail",
            RunEvent::Pending { .. } => "pending",
            RunEvent::Retry { .. } => "retry",
            RunEvent::TestEnd { .. } => "test end",
            RunEvent::RunEnd => "end",
        }
    }
}

/// Error reading an event stream
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("failed to read event stream: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid event on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a JSON-lines event stream. Blank lines are skipped.
pub fn read_events<R: BufRead>(reader: R) -> Result<Vec<RunEvent>, EventError> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str(&line).map_err(|source| EventError::Parse {
            line: index + 1,
            source,
        })?;
        events.push(event);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_stream() {
        let input = r#"{"event":"start"}
{"event":"suite","title":"","root":true}

{"event":"fail","test":{"title":"t","fullTitle":"s t"},"err":{"message":"boom"}}
{"event":"test end","test":{"title":"t","fullTitle":"s t"}}
{"event":"end"}
"#;
        let events = read_events(Cursor::new(input)).unwrap();
        let names: Vec<&str> = events.iter().map(RunEvent::name).collect();
        assert_eq!(names, vec!["start", "suite", "fail", "test end", "end"]);

        match &events[1] {
            RunEvent::SuiteBegin { root, .. } => assert!(*root),
            other => panic!("unexpected event: {:?}", other),
        }
        match &events[2] {
            RunEvent::Fail { err, .. } => assert!(matches!(err, Some(ThrownValue::Opaque(_)))),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_reports_line() {
        let input = "{\"event\":\"start\"}\n{\"event\":\"explode\"}\n";
        let err = read_events(Cursor::new(input)).unwrap_err();
        match err {
            EventError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {}", other),
        }
    }
}
