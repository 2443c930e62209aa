//! stub-extractor binary.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use stub_extractor::cli::{self, Args};

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    cli::init_logging(args.verbose);

    let status = cli::run(&args).context("stub extraction failed")?;
    Ok(status.into())
}
