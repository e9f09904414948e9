//! Command-line runtime for the weft workspace edit tool.
//!
//! `weft apply <EDIT_JSON>` reads an LSP `WorkspaceEdit`, applies it
//! atomically to the files it names, and prints `{"applied":<bool>}`. Edited
//! files are written back only when the whole edit applied. The exit status is
//! successful only in that case.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use clap::error::ErrorKind;
use tracing::info;
use weft_config::Config;
use weft_edit::{
    CoordinatorOptions, FileDocumentStore, LocalFileSystem, TracingNotificationSink,
    TransactionCoordinator, TransactionOutcome, WorkspaceEdit,
};

mod cli;
mod config;
mod errors;
mod telemetry;

use cli::{Cli, CliCommand};
use config::{ConfigLoader, OrthoConfigLoader, split_config_arguments};
use errors::AppError;

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    run_with_loader(args, stdout, stderr, &OrthoConfigLoader)
}

pub(crate) fn run_with_loader<I, W, E, L>(
    args: I,
    stdout: &mut W,
    stderr: &mut E,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let args: Vec<OsString> = args.into_iter().collect();
    let split = split_config_arguments(&args);

    let cli = match Cli::try_parse_from(&split.command_arguments) {
        Ok(cli) => cli,
        Err(error) if matches!(error.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = write!(stdout, "{error}");
            return ExitCode::SUCCESS;
        }
        Err(error) => {
            let _ = writeln!(stderr, "{}", AppError::CliUsage(error));
            return ExitCode::FAILURE;
        }
    };

    let result = loader
        .load(&split.config_arguments)
        .and_then(|config| execute(&cli, &config, stdout));

    match result {
        Ok(outcome) if outcome.is_applied() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            ExitCode::FAILURE
        }
    }
}

fn execute<W: Write>(
    cli: &Cli,
    config: &Config,
    stdout: &mut W,
) -> Result<TransactionOutcome, AppError> {
    telemetry::initialise(config)?;
    match &cli.command {
        CliCommand::Apply { edit } => {
            let outcome = apply_edit_file(edit, config)?;
            write_outcome(stdout, outcome)?;
            Ok(outcome)
        }
    }
}

fn apply_edit_file(path: &Path, config: &Config) -> Result<TransactionOutcome, AppError> {
    let edit = read_edit(path)?;
    let store = Arc::new(FileDocumentStore::new());
    let coordinator = TransactionCoordinator::new(
        store.clone(),
        Arc::new(LocalFileSystem),
        Arc::new(TracingNotificationSink),
        CoordinatorOptions::from(config),
    )?;

    let outcome = coordinator.apply(edit);
    if outcome.is_applied() {
        let saved = store.save_modified()?;
        info!(
            target: "weft::cli",
            event = "documents_saved",
            documents = saved,
        );
    }
    Ok(outcome)
}

fn read_edit(path: &Path) -> Result<WorkspaceEdit, AppError> {
    let text = fs::read_to_string(path).map_err(|source| AppError::ReadEdit {
        path: path.to_path_buf(),
        source,
    })?;
    let edit: lsp_types::WorkspaceEdit =
        serde_json::from_str(&text).map_err(|source| AppError::ParseEdit {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(WorkspaceEdit::from(edit))
}

fn write_outcome<W: Write>(stdout: &mut W, outcome: TransactionOutcome) -> Result<(), AppError> {
    let json = serde_json::to_string(&outcome).map_err(AppError::SerialiseOutcome)?;
    writeln!(stdout, "{json}").map_err(AppError::WriteOutcome)
}
