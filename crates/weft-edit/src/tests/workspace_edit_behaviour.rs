//! Behavioural tests for atomic workspace edit application.

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

use super::support::{RecordingSink, unescape};
use crate::document::MemoryDocumentStore;
use crate::edit::{DocumentEditGroup, DocumentId, Position, TextEdit};
use crate::resource::{
    CreateOptions, DeleteOptions, LocalFileSystem, RenameOptions, ResourceOperation,
};
use crate::transaction::{CoordinatorOptions, TransactionCoordinator, TransactionOutcome};
use crate::workspace_edit::{DocumentChange, WorkspaceEdit};

/// Test world for workspace edit scenarios.
pub struct WorkspaceEditWorld {
    temp_dir: TempDir,
    store: Arc<MemoryDocumentStore>,
    sink: Arc<RecordingSink>,
    pending: Vec<DocumentChange>,
    outcome: Option<TransactionOutcome>,
}

impl WorkspaceEditWorld {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("create temp dir"),
            store: Arc::new(MemoryDocumentStore::new()),
            sink: Arc::new(RecordingSink::default()),
            pending: Vec::new(),
            outcome: None,
        }
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    fn file_id(&self, name: &str) -> DocumentId {
        DocumentId::from_file_path(&self.file_path(name)).expect("absolute temp path")
    }

    /// Adds an edit to the pending group for `id`, starting a new group when
    /// the previous change targets something else.
    fn push_edit(&mut self, id: &str, edit: TextEdit) {
        let document = DocumentId::new(id);
        if let Some(DocumentChange::Edit(group)) = self.pending.last_mut()
            && group.document() == &document
        {
            let mut edits = group.edits().to_vec();
            edits.push(edit);
            *group = DocumentEditGroup::unversioned(document, edits);
            return;
        }
        self.pending
            .push(DocumentChange::Edit(DocumentEditGroup::unversioned(document, vec![edit])));
    }

    fn apply(&mut self) {
        let coordinator = TransactionCoordinator::new(
            self.store.clone(),
            Arc::new(LocalFileSystem),
            self.sink.clone(),
            CoordinatorOptions::default(),
        )
        .expect("build coordinator");
        let edit = WorkspaceEdit::DocumentChanges(std::mem::take(&mut self.pending));
        self.outcome = Some(coordinator.apply(edit));
    }

    fn outcome(&self) -> TransactionOutcome {
        self.outcome.expect("workspace edit should have been applied")
    }
}

fn number(value: &str) -> u32 {
    value.parse().expect("numeric coordinate")
}

#[fixture]
fn world() -> RefCell<WorkspaceEditWorld> {
    RefCell::new(WorkspaceEditWorld::new())
}

// ---- Given steps ----

#[given("a document {id} containing {text}")]
fn given_document(world: &RefCell<WorkspaceEditWorld>, id: String, text: String) {
    let id = id.trim_matches('"');
    world.borrow().store.insert(id, unescape(&text));
}

#[given("a file {name} containing {text}")]
fn given_file(world: &RefCell<WorkspaceEditWorld>, name: String, text: String) {
    let path = world.borrow().file_path(name.trim_matches('"'));
    fs::write(path, unescape(&text)).expect("write fixture file");
}

// ---- When steps ----

#[when("an edit inserts {text} into {id} at row {row} column {column}")]
fn when_insert(
    world: &RefCell<WorkspaceEditWorld>,
    text: String,
    id: String,
    row: String,
    column: String,
) {
    let edit = TextEdit::insert_at(Position::new(number(&row), number(&column)), unescape(&text));
    world.borrow_mut().push_edit(id.trim_matches('"'), edit);
}

#[when("an edit replaces row {row} columns {start} to {end} of {id} with {text}")]
fn when_replace(
    world: &RefCell<WorkspaceEditWorld>,
    row: String,
    start: String,
    end: String,
    id: String,
    text: String,
) {
    let row = number(&row);
    let edit = TextEdit::from_positions(
        Position::new(row, number(&start)),
        Position::new(row, number(&end)),
        unescape(&text),
    );
    world.borrow_mut().push_edit(id.trim_matches('"'), edit);
}

#[when("a strict delete targets {name}")]
fn when_strict_delete(world: &RefCell<WorkspaceEditWorld>, name: String) {
    let uri = world.borrow().file_id(name.trim_matches('"'));
    let operation = ResourceOperation::delete(uri, DeleteOptions::default());
    world.borrow_mut().pending.push(operation.into());
}

#[when("a lenient delete targets {name}")]
fn when_lenient_delete(world: &RefCell<WorkspaceEditWorld>, name: String) {
    let uri = world.borrow().file_id(name.trim_matches('"'));
    let options = DeleteOptions {
        recursive: false,
        ignore_if_not_exists: true,
    };
    world
        .borrow_mut()
        .pending
        .push(ResourceOperation::delete(uri, options).into());
}

#[when("a create targets {name}")]
fn when_create(world: &RefCell<WorkspaceEditWorld>, name: String) {
    let uri = world.borrow().file_id(name.trim_matches('"'));
    world
        .borrow_mut()
        .pending
        .push(ResourceOperation::create(uri, CreateOptions::default()).into());
}

#[when("a rename moves {from} onto {to}")]
fn when_rename(world: &RefCell<WorkspaceEditWorld>, from: String, to: String) {
    let (old_uri, new_uri) = {
        let world = world.borrow();
        (
            world.file_id(from.trim_matches('"')),
            world.file_id(to.trim_matches('"')),
        )
    };
    world
        .borrow_mut()
        .pending
        .push(ResourceOperation::rename(old_uri, new_uri, RenameOptions::default()).into());
}

#[when("the workspace edit is applied")]
fn when_applied(world: &RefCell<WorkspaceEditWorld>) {
    world.borrow_mut().apply();
}

// ---- Then steps ----

#[then("the transaction is applied")]
fn then_applied(world: &RefCell<WorkspaceEditWorld>) {
    assert_eq!(world.borrow().outcome(), TransactionOutcome::applied());
}

#[then("the transaction is rejected")]
fn then_rejected(world: &RefCell<WorkspaceEditWorld>) {
    assert_eq!(world.borrow().outcome(), TransactionOutcome::rejected());
}

#[then("the document {id} contains {text}")]
fn then_document_contains(world: &RefCell<WorkspaceEditWorld>, id: String, text: String) {
    let id = DocumentId::new(id.trim_matches('"'));
    let content = world
        .borrow()
        .store
        .text(&id)
        .expect("document is registered");
    assert_eq!(content, unescape(&text), "unexpected content in {id}");
}

#[then("the file {name} exists")]
fn then_file_exists(world: &RefCell<WorkspaceEditWorld>, name: String) {
    let path = world.borrow().file_path(name.trim_matches('"'));
    assert!(path.exists(), "expected {} to exist", path.display());
}

#[then("the file {name} contains {text}")]
fn then_file_contains(world: &RefCell<WorkspaceEditWorld>, name: String, text: String) {
    let path = world.borrow().file_path(name.trim_matches('"'));
    let content = fs::read_to_string(&path).expect("read file");
    assert_eq!(content, unescape(&text));
}

#[then("no failure is reported")]
fn then_no_failure(world: &RefCell<WorkspaceEditWorld>) {
    let reports = world.borrow().sink.reports();
    assert!(reports.is_empty(), "unexpected reports: {reports:?}");
}

#[then("one failure is reported mentioning {text}")]
fn then_one_failure(world: &RefCell<WorkspaceEditWorld>, text: String) {
    let expected = text.trim_matches('"');
    let reports = world.borrow().sink.reports();
    assert_eq!(reports.len(), 1, "expected exactly one report: {reports:?}");
    let detail = reports.first().map(|report| report.detail.as_str()).unwrap_or_default();
    assert!(detail.contains(expected), "report detail was '{detail}'");
}

#[scenario(path = "tests/features/workspace_edit.feature", name = "An empty workspace edit is applied")]
fn empty_edit(#[from(world)] _: RefCell<WorkspaceEditWorld>) {}

#[scenario(
    path = "tests/features/workspace_edit.feature",
    name = "Edits to several documents are applied together"
)]
fn several_documents(#[from(world)] _: RefCell<WorkspaceEditWorld>) {}

#[scenario(
    path = "tests/features/workspace_edit.feature",
    name = "A failing document rolls back the others"
)]
fn failing_document_rolls_back(#[from(world)] _: RefCell<WorkspaceEditWorld>) {}

#[scenario(path = "tests/features/workspace_edit.feature", name = "Overlapping edits are rejected")]
fn overlapping_edits(#[from(world)] _: RefCell<WorkspaceEditWorld>) {}

#[scenario(
    path = "tests/features/workspace_edit.feature",
    name = "Deleting a missing file fails unless ignored"
)]
fn strict_delete(#[from(world)] _: RefCell<WorkspaceEditWorld>) {}

#[scenario(
    path = "tests/features/workspace_edit.feature",
    name = "A lenient delete of a missing file succeeds"
)]
fn lenient_delete(#[from(world)] _: RefCell<WorkspaceEditWorld>) {}

#[scenario(
    path = "tests/features/workspace_edit.feature",
    name = "Created files survive a rolled back transaction"
)]
fn created_files_survive(#[from(world)] _: RefCell<WorkspaceEditWorld>) {}

#[scenario(
    path = "tests/features/workspace_edit.feature",
    name = "Renaming onto an existing file without overwrite fails"
)]
fn rename_onto_existing(#[from(world)] _: RefCell<WorkspaceEditWorld>) {}
