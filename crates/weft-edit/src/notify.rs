//! Failure notifications surfaced to the user.

use std::fmt;
use std::sync::Arc;

use crate::error::WorkspaceEditError;

/// User-facing description of a failed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    /// Short headline.
    pub title: String,
    /// One-sentence summary.
    pub description: String,
    /// Every error that contributed to the failure, one per line.
    pub detail: String,
}

impl FailureReport {
    /// Builds the report for a workspace edit that could not be applied.
    #[must_use]
    pub fn workspace_edit_failed(errors: &[WorkspaceEditError]) -> Self {
        let description = match errors {
            [single] => format!("Failed to apply edits: {}.", single.label()),
            _ => format!("Failed to apply edits: {} operations failed.", errors.len()),
        };
        let detail = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            title: String::from("Workspace edit failed"),
            description,
            detail,
        }
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// Receives failure reports from the transaction coordinator.
pub trait NotificationSink: Send + Sync {
    /// Called at most once per failed transaction.
    fn report_failure(&self, report: &FailureReport);
}

impl<T> NotificationSink for Arc<T>
where
    T: NotificationSink + ?Sized,
{
    fn report_failure(&self, report: &FailureReport) {
        (**self).report_failure(report);
    }
}

/// Sink that records failures using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn report_failure(&self, report: &FailureReport) {
        tracing::error!(
            target: "weft::notify",
            event = "workspace_edit_failed",
            title = %report.title,
            description = %report.description,
            detail = %report.detail,
            "workspace edit was not applied"
        );
    }
}
