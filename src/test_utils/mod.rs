//! Test utilities for CREX
//!
//! Helpers shared by unit tests and the integration suite (enable the
//! `test-utils` feature to use them outside the crate):
//! - [`init_test_logging`] wires `tracing` output into the test harness
//! - [`RecordingReporter`] captures workflow output instead of printing it
//!
//! # Example
//!
//! ```rust,no_run
//! use crex_cli::reporter::Reporter;
//! use crex_cli::test_utils::RecordingReporter;
//!
//! let reporter = RecordingReporter::new();
//! reporter.succeed("Package site uploaded on http://localhost:4502");
//! assert_eq!(reporter.successes().len(), 1);
//! ```

use crate::deploy::report::ReportLine;
use crate::reporter::Reporter;
use std::sync::{Mutex, Once};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. `level` wins over `RUST_LOG`; with
/// neither set, tests run without log output.
///
/// ```bash
/// RUST_LOG=crex_cli=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// A reporter call captured by [`RecordingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    /// `start(message)`
    Start(String),
    /// `progress(message)`
    Progress(String),
    /// `succeed(message)`
    Succeed(String),
    /// `fail(message)`
    Fail(String),
    /// `line(..)`, rendered without color
    Line(String),
    /// `stop()`
    Stop,
}

/// Reporter that keeps every call in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ReportEvent>>,
}

impl RecordingReporter {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: ReportEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    /// All events in call order.
    #[must_use]
    pub fn events(&self) -> Vec<ReportEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Messages passed to `succeed`.
    #[must_use]
    pub fn successes(&self) -> Vec<String> {
        self.collect(|event| match event {
            ReportEvent::Succeed(message) => Some(message.clone()),
            _ => None,
        })
    }

    /// Messages passed to `fail`.
    #[must_use]
    pub fn failures(&self) -> Vec<String> {
        self.collect(|event| match event {
            ReportEvent::Fail(message) => Some(message.clone()),
            _ => None,
        })
    }

    /// Rendered report lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.collect(|event| match event {
            ReportEvent::Line(line) => Some(line.clone()),
            _ => None,
        })
    }

    fn collect(&self, pick: impl Fn(&ReportEvent) -> Option<String>) -> Vec<String> {
        self.events().iter().filter_map(pick).collect()
    }
}

impl Reporter for RecordingReporter {
    fn start(&self, message: &str) {
        self.push(ReportEvent::Start(message.to_string()));
    }

    fn progress(&self, message: &str) {
        self.push(ReportEvent::Progress(message.to_string()));
    }

    fn succeed(&self, message: &str) {
        self.push(ReportEvent::Succeed(message.to_string()));
    }

    fn fail(&self, message: &str) {
        self.push(ReportEvent::Fail(message.to_string()));
    }

    fn line(&self, line: &ReportLine) {
        self.push(ReportEvent::Line(line.to_string()));
    }

    fn stop(&self) {
        self.push(ReportEvent::Stop);
    }
}
