//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::driver::DriverOptions;
use crate::options::ExtractOptions;

/// stub-extractor: write declaration-only `.pyi` stubs for Python sources
#[derive(Parser, Debug)]
#[command(
    name = "stub-extractor",
    version,
    about = "Extracts declaration-only .pyi stubs from Python sources"
)]
pub struct Args {
    /// Source files or directories. Reads standard input when omitted.
    pub paths: Vec<PathBuf>,

    /// Replace stub files that already exist.
    #[arg(long)]
    pub overwrite: bool,

    /// Keep declarations whose names start with an underscore.
    #[arg(long = "include-private")]
    pub include_private: bool,

    /// Keep private module declarations that public ones refer to.
    #[arg(long = "retain-referenced")]
    pub retain_referenced: bool,

    /// Log at debug level when no log filter is set in the environment.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions::default()
            .with_private(self.include_private)
            .with_retained_references(self.retain_referenced)
    }

    pub fn driver_options(&self) -> DriverOptions {
        DriverOptions {
            overwrite: self.overwrite,
            extract: self.extract_options(),
        }
    }

    /// No paths means one unit on standard input.
    pub fn reads_stdin(&self) -> bool {
        self.paths.is_empty()
    }
}
