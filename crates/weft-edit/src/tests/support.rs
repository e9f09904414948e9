//! Shared helpers for behavioural tests.

use std::sync::{Mutex, PoisonError};

use crate::notify::{FailureReport, NotificationSink};

/// Sink that keeps every report for later assertions.
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    reports: Mutex<Vec<FailureReport>>,
}

impl RecordingSink {
    pub(crate) fn reports(&self) -> Vec<FailureReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl NotificationSink for RecordingSink {
    fn report_failure(&self, report: &FailureReport) {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.clone());
    }
}

/// Expands `\n` escapes written in feature files.
pub(crate) fn unescape(text: &str) -> String {
    text.trim_matches('"').replace("\\n", "\n")
}
