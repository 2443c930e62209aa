//! File driver: source discovery, parallel extraction and stub writing.
//!
//! Every source is extracted into memory first; the stub file is only
//! created once extraction succeeded, so a failed unit never leaves partial
//! output behind. Existing stubs are left alone unless
//! [`DriverOptions::overwrite`] is set.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::base::constants::{SOURCE_EXTENSION, STUB_EXTENSION};
use crate::diagnostics::{Diagnostic, DiagnosticCode, Diagnostics};
use crate::options::ExtractOptions;
use crate::{Stub, extract_stub_with};

/// Options for a driver run.
#[derive(Debug, Clone, Default)]
pub struct DriverOptions {
    /// Replace stubs that already exist.
    pub overwrite: bool,
    pub extract: ExtractOptions,
}

/// Errors attributable to one input path.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {diagnostics}", path.display())]
    Extract { path: PathBuf, diagnostics: Diagnostics },
}

impl DriverError {
    pub fn path(&self) -> &Path {
        match self {
            DriverError::Io { path, .. } | DriverError::Extract { path, .. } => path,
        }
    }
}

/// A source file and its dotted module path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub path: PathBuf,
    pub module_path: String,
}

/// What happened to one source file.
#[derive(Debug)]
pub enum FileOutcome {
    Written {
        source: PathBuf,
        target: PathBuf,
        warnings: Diagnostics,
    },
    /// The target existed and overwriting was not requested.
    Skipped {
        source: PathBuf,
        target: PathBuf,
        warning: Diagnostic,
    },
    Failed { source: PathBuf, error: DriverError },
}

impl FileOutcome {
    pub fn source(&self) -> &Path {
        match self {
            FileOutcome::Written { source, .. }
            | FileOutcome::Skipped { source, .. }
            | FileOutcome::Failed { source, .. } => source,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FileOutcome::Failed { .. })
    }
}

/// The stub path of a source: `.py` becomes `.pyi`, anything else gets
/// `.pyi` appended.
pub fn stub_path(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
        path.with_extension(STUB_EXTENSION)
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".");
        name.push(STUB_EXTENSION);
        PathBuf::from(name)
    }
}

/// Dotted module path of `path` below `root`; `__init__` names its package.
pub fn module_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut segments: Vec<String> = relative
        .with_extension("")
        .components()
        .filter_map(|c| c.as_os_str().to_str().map(str::to_string))
        .collect();
    if segments.last().is_some_and(|s| s == "__init__") {
        segments.pop();
    }
    segments.join(".")
}

/// Expand the input paths into source files, in discovery order.
///
/// Files are taken as given. Directories are walked recursively for `*.py`
/// files in sorted order; their module paths are relative to the
/// directory's parent, so `pkg/sub/mod.py` under `pkg` is `pkg.sub.mod`.
/// An entry that cannot be walked is returned as an error in its place and
/// the walk goes on.
pub fn collect_sources(paths: &[PathBuf]) -> Vec<Result<Source, DriverError>> {
    let mut sources = Vec::new();
    for path in paths {
        if !path.is_dir() {
            sources.push(Ok(Source {
                path: path.clone(),
                module_path: module_path(path.parent().unwrap_or(Path::new("")), path),
            }));
            continue;
        }
        let root = path.parent().unwrap_or(Path::new(""));
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    let failed = error.path().map_or_else(|| path.clone(), Path::to_path_buf);
                    warn!(path = %failed.display(), %error, "cannot walk entry");
                    sources.push(Err(DriverError::Io {
                        path: failed,
                        source: error.into(),
                    }));
                    continue;
                }
            };
            let is_source = entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == SOURCE_EXTENSION);
            if is_source {
                sources.push(Ok(Source {
                    path: entry.path().to_path_buf(),
                    module_path: module_path(root, entry.path()),
                }));
            }
        }
    }
    sources
}

/// Runs extraction over many files.
pub struct Driver {
    options: DriverOptions,
}

impl Driver {
    pub fn new(options: DriverOptions) -> Self {
        Self { options }
    }

    /// Extract every source below `paths`, in parallel; outcomes come back in
    /// discovery order. Entries that could not be walked are failed outcomes.
    pub fn run(&self, paths: &[PathBuf]) -> Vec<FileOutcome> {
        let sources = collect_sources(paths);
        debug!(count = sources.len(), "collected sources");
        sources
            .into_par_iter()
            .map(|source| match source {
                Ok(source) => self.process(&source),
                Err(error) => FileOutcome::Failed {
                    source: error.path().to_path_buf(),
                    error,
                },
            })
            .collect()
    }

    fn process(&self, source: &Source) -> FileOutcome {
        let target = stub_path(&source.path);
        let stub = match self.extract(source) {
            Ok(stub) => stub,
            Err(error) => {
                return FileOutcome::Failed {
                    source: source.path.clone(),
                    error,
                };
            }
        };
        match self.write(&target, &stub.text) {
            Ok(()) => {
                debug!(target = %target.display(), "wrote stub");
                FileOutcome::Written {
                    source: source.path.clone(),
                    target,
                    warnings: stub.warnings,
                }
            }
            Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {
                debug!(target = %target.display(), "stub exists, skipping");
                let warning = Diagnostic::warning(
                    DiagnosticCode::OverwriteSkip,
                    format!("{} already exists; pass --overwrite to replace it", target.display()),
                );
                FileOutcome::Skipped {
                    source: source.path.clone(),
                    target,
                    warning,
                }
            }
            Err(error) => FileOutcome::Failed {
                source: source.path.clone(),
                error: DriverError::Io {
                    path: target,
                    source: error,
                },
            },
        }
    }

    fn extract(&self, source: &Source) -> Result<Stub, DriverError> {
        let text = fs::read_to_string(&source.path).map_err(|e| DriverError::Io {
            path: source.path.clone(),
            source: e,
        })?;
        let options = self.options.extract.clone().with_module_path(source.module_path.clone());
        extract_stub_with(&text, &options).map_err(|diagnostics| DriverError::Extract {
            path: source.path.clone(),
            diagnostics,
        })
    }

    fn write(&self, target: &Path, text: &str) -> io::Result<()> {
        let mut open = OpenOptions::new();
        open.write(true);
        if self.options.overwrite {
            open.create(true).truncate(true);
        } else {
            open.create_new(true);
        }
        let file = open.open(target)?;
        write_or_remove(file, target, text)
    }
}

/// Write `text` to the freshly opened `target`, removing it again when the
/// write fails so no partial stub is left for a later run to skip.
fn write_or_remove(mut file: impl Write, target: &Path, text: &str) -> io::Result<()> {
    let written = file.write_all(text.as_bytes()).and_then(|()| file.flush());
    drop(file);
    if let Err(error) = written {
        if let Err(remove) = fs::remove_file(target) {
            warn!(target = %target.display(), error = %remove, "cannot remove partial stub");
        }
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests;
