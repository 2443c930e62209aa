//! # stub-extractor
//!
//! Extracts declaration-only `.pyi` stubs from Python sources.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! cli        → Argument parsing, logging setup, stdin/stdout mode
//!   ↓
//! driver     → Source discovery, parallel extraction, overwrite policy
//!   ↓
//! emit       → Stub text serialization
//!   ↓
//! normalize  → Type expressions, import requirements
//!   ↓
//! resolve    → Overload/property merging, visibility, ordering
//!   ↓
//! walk       → Syntax tree → declaration model
//!   ↓
//! model      → Declarations, raw and normalized types, imports
//!   ↓
//! parser     → Logos lexer, layout pass, recursive-descent parser, typed AST
//!   ↓
//! base       → Primitives (LineIndex, TextRange)
//! ```
//!
//! ## Example
//!
//! ```
//! let stub = stub_extractor::extract_stub("def add(x: int, y: int = 0) -> int:\n    return x + y\n").unwrap();
//! assert_eq!(stub.text, "def add(x: int, y: int = ...) -> int: ...\n");
//! ```

use tracing::debug;

// ============================================================================
// MODULES (dependency order: base → parser → model → walk → resolve → normalize → emit)
// ============================================================================

/// Foundation types: LineIndex, TextRange, file extensions
pub mod base;

/// Parser: Logos lexer, layout pass, recursive-descent parser, typed AST
pub mod parser;

/// Diagnostics and fatal extraction errors
pub mod diagnostics;

/// Name tables for visibility and decorator recognition
pub mod policy;

/// Extraction options
pub mod options;

/// Declaration model shared by every stage
pub mod model;

/// Declaration walker: syntax tree → SourceUnit
pub mod walk;

/// Overload/property merging, visibility filtering, ordering
pub mod resolve;

/// Type expression normalization and import requirements
pub mod normalize;

/// Stub serializer
pub mod emit;

/// Parallel file driver
pub mod driver;

/// Command-line front end
pub mod cli;

pub use base::{LineCol, LineIndex, TextRange, TextSize};
pub use diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, ExtractError, Severity};
pub use options::ExtractOptions;
pub use policy::Policy;

/// A successfully extracted stub and the warnings raised on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stub {
    pub text: String,
    pub warnings: Diagnostics,
}

/// Extract a stub with the default options.
pub fn extract_stub(source: &str) -> Result<Stub, Diagnostics> {
    extract_stub_with(source, &ExtractOptions::default())
}

/// Extract a stub: parse, walk, resolve, normalize, serialize.
///
/// A syntax error or an import collision fails the whole unit; the error
/// diagnostics then come with every warning raised before them.
pub fn extract_stub_with(source: &str, options: &ExtractOptions) -> Result<Stub, Diagnostics> {
    let parse = parser::parse(source);
    if let Some(error) = parse.first_error(&LineIndex::new(source)) {
        return Err(Diagnostic::from(error).into());
    }

    let (unit, mut warnings) = walk::walk(&parse, options);
    let (mut unit, resolved) = resolve::resolve(unit, options);
    warnings.extend(resolved);
    match normalize::normalize_unit(&mut unit, options) {
        Ok(normalized) => warnings.extend(normalized),
        Err(failed) => {
            warnings.extend(failed);
            return Err(warnings);
        }
    }

    let text = emit::serialize(&unit);
    debug!(
        module = %options.module_path,
        declarations = unit.declarations.len(),
        warnings = warnings.len(),
        "extracted stub"
    );
    Ok(Stub { text, warnings })
}
