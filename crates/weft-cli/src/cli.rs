//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line interface for the weft workspace edit tool.
#[derive(Parser, Debug)]
#[command(name = "weft", version, disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Operation to perform.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Subcommands understood by the CLI.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Applies an LSP `WorkspaceEdit` read from a JSON file.
    Apply {
        /// Path to the JSON document holding the workspace edit.
        #[arg(value_name = "EDIT_JSON")]
        edit: PathBuf,
    },
}
