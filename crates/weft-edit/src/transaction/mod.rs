//! All-or-nothing application of workspace edits.
//!
//! The coordinator fans the operations of one workspace edit out over a
//! worker pool. Each successfully edited document contributes a checkpoint;
//! if any operation fails, every recorded checkpoint is reverted and a single
//! failure report is sent to the notification sink.
//!
//! Resource operations have no checkpoint. Files created, renamed, or deleted
//! before a failure stay that way after the transaction is rolled back.

use std::sync::{Arc, Mutex, PoisonError};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use weft_config::Config;

use crate::applier::apply_edits;
use crate::document::{Checkpoint, DocumentStore, SharedDocument, lock_document};
use crate::edit::{DocumentEditGroup, DocumentId};
use crate::error::WorkspaceEditError;
use crate::notify::{FailureReport, NotificationSink};
use crate::resource::{FileSystem, ResourceOperationHandler};
use crate::workspace_edit::{DocumentChange, WorkspaceEdit};

/// Result of applying a workspace edit.
///
/// There is no partial state: either every operation was applied or the
/// document edits were rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransactionOutcome {
    applied: bool,
}

impl TransactionOutcome {
    /// Outcome of a transaction whose operations all succeeded.
    #[must_use]
    pub const fn applied() -> Self {
        Self { applied: true }
    }

    /// Outcome of a transaction that was rolled back.
    #[must_use]
    pub const fn rejected() -> Self {
        Self { applied: false }
    }

    /// Returns true when the edit was applied.
    #[must_use]
    pub const fn is_applied(self) -> bool {
        self.applied
    }
}

/// Tuning for a [`TransactionCoordinator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorOptions {
    /// Worker pool size. Zero selects one worker per CPU.
    pub worker_threads: usize,
    /// Whether create and rename make missing parent directories.
    pub create_parent_directories: bool,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            worker_threads: 0,
            create_parent_directories: true,
        }
    }
}

impl From<&Config> for CoordinatorOptions {
    fn from(config: &Config) -> Self {
        Self {
            worker_threads: config.worker_threads(),
            create_parent_directories: config.create_parent_directories(),
        }
    }
}

/// Errors raised while constructing a coordinator.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// The worker pool could not be started.
    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] ThreadPoolBuildError),
}

/// Document edit that has been applied and can still be reverted.
struct AppliedGroup {
    id: DocumentId,
    document: SharedDocument,
    checkpoint: Checkpoint,
}

/// Applies workspace edits atomically with respect to document content.
pub struct TransactionCoordinator {
    store: Arc<dyn DocumentStore>,
    resources: ResourceOperationHandler,
    sink: Arc<dyn NotificationSink>,
    pool: ThreadPool,
}

impl std::fmt::Debug for TransactionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionCoordinator")
            .field("resources", &self.resources)
            .field("worker_threads", &self.pool.current_num_threads())
            .finish_non_exhaustive()
    }
}

impl TransactionCoordinator {
    /// Builds a coordinator over the given document store, filesystem, and
    /// notification sink.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::WorkerPool`] if the worker threads cannot
    /// be spawned.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        filesystem: Arc<dyn FileSystem>,
        sink: Arc<dyn NotificationSink>,
        options: CoordinatorOptions,
    ) -> Result<Self, CoordinatorError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(options.worker_threads)
            .thread_name(|index| format!("weft-worker-{index}"))
            .build()?;
        let resources = ResourceOperationHandler::new(filesystem)
            .with_parent_directories(options.create_parent_directories);
        Ok(Self {
            store,
            resources,
            sink,
            pool,
        })
    }

    /// Applies `edit`, returning whether every operation succeeded.
    ///
    /// This never fails. Errors are reported to the notification sink and
    /// turned into a rejected outcome after document edits are rolled back.
    pub fn apply(&self, edit: WorkspaceEdit) -> TransactionOutcome {
        let changes = edit.normalize();
        info!(
            target: "weft::transaction",
            event = "transaction_started",
            operations = changes.len(),
        );

        let applied = Mutex::new(Vec::new());
        let results: Vec<Result<(), WorkspaceEditError>> = self.pool.install(|| {
            changes
                .par_iter()
                .map(|change| self.apply_change(change, &applied))
                .collect()
        });
        let applied = applied.into_inner().unwrap_or_else(PoisonError::into_inner);

        let errors: Vec<WorkspaceEditError> = results.into_iter().filter_map(Result::err).collect();
        if errors.is_empty() {
            commit(applied);
            return TransactionOutcome::applied();
        }

        for error in &errors {
            warn!(
                target: "weft::transaction",
                event = "operation_failed",
                error = %error,
            );
        }
        self.sink
            .report_failure(&FailureReport::workspace_edit_failed(&errors));
        rollback(applied);
        TransactionOutcome::rejected()
    }

    fn apply_change(
        &self,
        change: &DocumentChange,
        applied: &Mutex<Vec<AppliedGroup>>,
    ) -> Result<(), WorkspaceEditError> {
        match change {
            DocumentChange::Edit(group) => self.apply_group(group, applied),
            DocumentChange::Resource(operation) => {
                self.resources.handle(operation)?;
                Ok(())
            }
        }
    }

    fn apply_group(
        &self,
        group: &DocumentEditGroup,
        applied: &Mutex<Vec<AppliedGroup>>,
    ) -> Result<(), WorkspaceEditError> {
        let id = group.document();
        let document =
            self.store
                .resolve(id)
                .map_err(|source| WorkspaceEditError::Resolution {
                    document: id.clone(),
                    source,
                })?;

        let mut guard = lock_document(&document);
        let checkpoint = apply_edits(&mut *guard, id, group.edits())?;
        debug!(
            target: "weft::transaction",
            event = "document_edited",
            document = %id,
            version = ?group.version(),
            edits = group.edits().len(),
        );
        // Record while the document is still locked so groups targeting the
        // same document are recorded in application order.
        applied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(AppliedGroup {
                id: id.clone(),
                document: Arc::clone(&document),
                checkpoint,
            });
        drop(guard);
        Ok(())
    }
}

fn commit(applied: Vec<AppliedGroup>) {
    let documents = applied.len();
    for group in applied {
        lock_document(&group.document).forget_checkpoint(group.checkpoint);
    }
    info!(
        target: "weft::transaction",
        event = "transaction_committed",
        documents,
    );
}

fn rollback(applied: Vec<AppliedGroup>) {
    let documents = applied.len();
    for group in applied.into_iter().rev() {
        if !lock_document(&group.document).revert_to_checkpoint(group.checkpoint) {
            warn!(
                target: "weft::transaction",
                event = "revert_failed",
                document = %group.id,
                checkpoint = %group.checkpoint,
                "document rejected checkpoint during rollback"
            );
        }
    }
    warn!(
        target: "weft::transaction",
        event = "transaction_rolled_back",
        documents,
    );
}
