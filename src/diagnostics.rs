//! Error and warning reporting for one source unit.
//!
//! Every stage returns the diagnostics it produced instead of printing them.
//! Fatal problems are [`ExtractError`]s; everything else is a warning that
//! travels with the stub.

use std::fmt;

use thiserror::Error;

use crate::base::LineCol;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// What a diagnostic is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// The source does not parse.
    Syntax,
    /// Two imports bind one local name to different origins.
    ImportCollision,
    /// A type name was rendered as a forward reference.
    UnresolvedReference,
    /// A construct the stub cannot express was skipped.
    Unsupported,
    /// A property setter accepts a different type than the getter returns.
    SetterTypeMismatch,
    /// `__all__` could not be read, or names something that does not exist.
    ExportList,
    /// An existing output file was left untouched.
    OverwriteSkip,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::Syntax => "syntax",
            DiagnosticCode::ImportCollision => "import-collision",
            DiagnosticCode::UnresolvedReference => "unresolved-reference",
            DiagnosticCode::Unsupported => "unsupported",
            DiagnosticCode::SetterTypeMismatch => "setter-type-mismatch",
            DiagnosticCode::ExportList => "export-list",
            DiagnosticCode::OverwriteSkip => "overwrite-skip",
        }
    }
}

/// A diagnostic message with an optional location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    /// 0-based position in the source unit.
    pub position: Option<LineCol>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            position: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            position: None,
        }
    }

    /// Set the source position.
    pub fn at(mut self, position: LineCol) -> Self {
        self.position = Some(position);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(position) = self.position {
            write!(f, "{position}: ")?;
        }
        write!(f, "{}[{}]: {}", self.severity, self.code.as_str(), self.message)
    }
}

/// Ordered diagnostics of one source unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn has_errors(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| !d.is_error())
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Self(vec![diagnostic])
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}

// ============================================================================
// FATAL ERRORS
// ============================================================================

/// Errors that stop extraction of a source unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The source does not parse (1-based line and column).
    #[error("{line}:{column}: syntax error: {message}")]
    Syntax {
        line: u32,
        column: u32,
        message: String,
    },

    /// One local name would be imported from two origins.
    #[error("import collision: '{local}' is bound to both '{first}' and '{second}'")]
    ImportCollision {
        local: String,
        first: String,
        second: String,
    },
}

impl ExtractError {
    /// Create a syntax error from a 0-based position.
    pub fn syntax(position: LineCol, message: impl Into<String>) -> Self {
        Self::Syntax {
            line: position.line + 1,
            column: position.col + 1,
            message: message.into(),
        }
    }
}

impl From<ExtractError> for Diagnostic {
    fn from(error: ExtractError) -> Self {
        match &error {
            ExtractError::Syntax { line, column, message } => {
                Diagnostic::error(DiagnosticCode::Syntax, message.clone()).at(LineCol {
                    line: line.saturating_sub(1),
                    col: column.saturating_sub(1),
                })
            }
            ExtractError::ImportCollision { .. } => {
                Diagnostic::error(DiagnosticCode::ImportCollision, error.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_positions_are_one_based() {
        let error = ExtractError::syntax(LineCol { line: 0, col: 4 }, "invalid syntax");
        assert_eq!(error.to_string(), "1:5: syntax error: invalid syntax");

        let diagnostic = Diagnostic::from(error);
        assert_eq!(diagnostic.position, Some(LineCol { line: 0, col: 4 }));
        assert_eq!(diagnostic.to_string(), "1:5: error[syntax]: invalid syntax");
    }

    #[test]
    fn test_collision_names_both_origins() {
        let error = ExtractError::ImportCollision {
            local: "Any".into(),
            first: "typing.Any".into(),
            second: "mylib.Any".into(),
        };
        let message = Diagnostic::from(error).message;
        assert!(message.contains("typing.Any"));
        assert!(message.contains("mylib.Any"));
    }

    #[test]
    fn test_diagnostics_filtering() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::warning(DiagnosticCode::Unsupported, "skipped"));
        assert!(!diagnostics.has_errors());
        diagnostics.push(Diagnostic::error(DiagnosticCode::Syntax, "bad"));
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.warnings().count(), 1);
        assert_eq!(diagnostics.errors().count(), 1);
    }
}
