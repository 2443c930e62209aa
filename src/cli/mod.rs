//! Command-line front end.
//!
//! With no paths, one source unit is read from stdin and its stub written to
//! stdout. With paths, every discovered source gets a `.pyi` beside it and
//! diagnostics go to stderr prefixed with the source path.

pub mod args;
pub mod logging;

pub use args::Args;
pub use logging::init_logging;

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::diagnostics::Diagnostic;
use crate::driver::{Driver, DriverError, FileOutcome};
use crate::extract_stub_with;
use crate::options::ExtractOptions;

/// Overall result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    /// A unit failed to extract or could not be written.
    Failure,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => ExitCode::SUCCESS,
            Status::Failure => ExitCode::FAILURE,
        }
    }
}

/// Run the command described by `args` against the process streams.
pub fn run(args: &Args) -> Result<Status, DriverError> {
    if args.reads_stdin() {
        return run_stdin(io::stdin().lock(), io::stdout().lock(), io::stderr().lock(), &args.extract_options());
    }
    let outcomes = Driver::new(args.driver_options()).run(&args.paths);
    report(io::stderr().lock(), &outcomes).map_err(|source| DriverError::Io {
        path: PathBuf::from("<stderr>"),
        source,
    })
}

/// Extract one unit from `input`, writing the stub to `out` and every
/// diagnostic to `err`.
pub fn run_stdin(
    mut input: impl Read,
    mut out: impl Write,
    mut err: impl Write,
    options: &ExtractOptions,
) -> Result<Status, DriverError> {
    let stdin_error = |source: io::Error| DriverError::Io {
        path: PathBuf::from("<stdin>"),
        source,
    };
    let stdout_error = |source: io::Error| DriverError::Io {
        path: PathBuf::from("<stdout>"),
        source,
    };
    let stderr_error = |source: io::Error| DriverError::Io {
        path: PathBuf::from("<stderr>"),
        source,
    };

    let mut source = String::new();
    input.read_to_string(&mut source).map_err(stdin_error)?;

    match extract_stub_with(&source, options) {
        Ok(stub) => {
            for warning in &stub.warnings {
                writeln!(err, "{warning}").map_err(stderr_error)?;
            }
            out.write_all(stub.text.as_bytes()).map_err(stdout_error)?;
            out.flush().map_err(stdout_error)?;
            Ok(Status::Success)
        }
        Err(diagnostics) => {
            for diagnostic in &diagnostics {
                writeln!(err, "{diagnostic}").map_err(stderr_error)?;
            }
            Ok(Status::Failure)
        }
    }
}

/// Print the diagnostics of a file run; fails if any unit failed.
pub fn report(mut err: impl Write, outcomes: &[FileOutcome]) -> io::Result<Status> {
    let mut status = Status::Success;
    for outcome in outcomes {
        match outcome {
            FileOutcome::Written { source, warnings, .. } => {
                for warning in warnings {
                    print_diagnostic(&mut err, source, warning)?;
                }
            }
            FileOutcome::Skipped { source, warning, .. } => print_diagnostic(&mut err, source, warning)?,
            FileOutcome::Failed { error, .. } => {
                status = Status::Failure;
                match error {
                    DriverError::Extract { path, diagnostics } => {
                        for diagnostic in diagnostics {
                            print_diagnostic(&mut err, path, diagnostic)?;
                        }
                    }
                    DriverError::Io { .. } => writeln!(err, "error: {error}")?,
                }
            }
        }
    }
    Ok(status)
}

/// `path:line:col: severity[code]: message`, or `path: ...` without a position.
fn print_diagnostic(err: &mut impl Write, path: &Path, diagnostic: &Diagnostic) -> io::Result<()> {
    let separator = if diagnostic.position.is_some() { ":" } else { ": " };
    writeln!(err, "{}{separator}{diagnostic}", path.display())
}
