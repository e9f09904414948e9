//! CLI entrypoint for the weft workspace edit tool.
//!
//! The binary delegates to [`weft_cli::run`], which loads configuration,
//! initialises telemetry, and applies the requested workspace edit.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    weft_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
