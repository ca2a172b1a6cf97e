//! Drives a collector and stats tracker from an event stream.

use report_model::{Report, Speed, DEFAULT_SLOW_MS};

use super::events::RunEvent;
use super::tracker::StatsTracker;
use super::RunCollector;
use crate::normalize::{Normalizer, TestCase, ThrownValue};

/// Records one run. The report is produced on the first `end` event; any
/// event after that is ignored.
#[derive(Debug)]
pub struct RunRecorder {
    collector: Option<RunCollector>,
    tracker: StatsTracker,
    slow_ms: f64,
    /// Speed assigned on `pass`, applied to the matching `test end`
    passed_speed: Option<(String, Speed)>,
    /// Error reported on `fail`, applied to the matching `test end`
    failed_err: Option<(String, ThrownValue)>,
}

impl Default for RunRecorder {
    fn default() -> Self {
        Self::new(Normalizer::default(), DEFAULT_SLOW_MS)
    }
}

impl RunRecorder {
    pub fn new(normalizer: Normalizer, slow_ms: f64) -> Self {
        Self {
            collector: Some(RunCollector::new(normalizer)),
            tracker: StatsTracker::new(),
            slow_ms,
            passed_speed: None,
            failed_err: None,
        }
    }

    /// Whether the run has already ended.
    pub fn is_finished(&self) -> bool {
        self.collector.is_none()
    }

    /// Feed one event. Returns the report when the event ends the run.
    pub fn record(&mut self, event: RunEvent) -> Option<Report> {
        let Some(collector) = self.collector.as_mut() else {
            tracing::debug!(event = event.name(), "ignoring event after run end");
            return None;
        };
        self.tracker.observe(&event);

        match event {
            RunEvent::Pass { mut test } => {
                if test.speed.is_none() {
                    if let Some(duration) = test.duration {
                        let speed = Speed::classify(duration, test.slow.unwrap_or(self.slow_ms));
                        test.speed = Some(speed);
                        self.passed_speed = Some((test.full_title.clone(), speed));
                    }
                }
                collector.on_test_pass(&test);
            }
            RunEvent::Fail { mut test, err } => {
                if err.is_some() {
                    test.err = err;
                }
                if let Some(thrown) = &test.err {
                    self.failed_err = Some((test.full_title.clone(), thrown.clone()));
                }
                collector.on_test_fail(&test);
            }
            RunEvent::TestEnd { mut test } => {
                apply_passed_speed(&mut self.passed_speed, &mut test);
                apply_failed_err(&mut self.failed_err, &mut test);
                collector.on_test_end(&test);
            }
            RunEvent::RunEnd => {
                let stats = self.tracker.stats();
                return self.collector.take().map(|collector| collector.on_run_end(stats));
            }
            _ => {}
        }
        None
    }

    /// Feed a whole stream; `None` if it never reaches `end`.
    pub fn replay<I: IntoIterator<Item = RunEvent>>(mut self, events: I) -> Option<Report> {
        let mut report = None;
        for event in events {
            if let Some(done) = self.record(event) {
                report = Some(done);
            }
        }
        report
    }
}

fn apply_passed_speed(passed_speed: &mut Option<(String, Speed)>, test: &mut TestCase) {
    if let Some((full_title, speed)) = passed_speed.take() {
        if test.speed.is_none() && test.full_title == full_title {
            test.speed = Some(speed);
        }
    }
}

fn apply_failed_err(failed_err: &mut Option<(String, ThrownValue)>, test: &mut TestCase) {
    if let Some((full_title, thrown)) = failed_err.take() {
        if test.err.is_none() && test.full_title == full_title {
            test.err = Some(thrown);
        }
    }
}
