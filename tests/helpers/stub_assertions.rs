//! Stub extraction helpers and assertions.

use stub_extractor::{Diagnostic, DiagnosticCode, Diagnostics, ExtractOptions, extract_stub, extract_stub_with};

/// Extract a stub, failing the test with the diagnostics on error.
pub fn stub_of(source: &str) -> String {
    match extract_stub(source) {
        Ok(stub) => stub.text,
        Err(diagnostics) => panic!("extraction failed:\n{diagnostics}\nsource:\n{source}"),
    }
}

/// Extract a stub keeping private declarations.
pub fn stub_with_private(source: &str) -> String {
    let options = ExtractOptions::default().with_private(true);
    match extract_stub_with(source, &options) {
        Ok(stub) => stub.text,
        Err(diagnostics) => panic!("extraction failed:\n{diagnostics}"),
    }
}

/// Extract a stub keeping the private declarations the public surface uses.
pub fn stub_retaining(source: &str) -> String {
    let options = ExtractOptions::default().with_retained_references(true);
    match extract_stub_with(source, &options) {
        Ok(stub) => stub.text,
        Err(diagnostics) => panic!("extraction failed:\n{diagnostics}"),
    }
}

/// Warnings of a successful extraction.
pub fn warnings_of(source: &str) -> Vec<Diagnostic> {
    match extract_stub(source) {
        Ok(stub) => stub.warnings.into_vec(),
        Err(diagnostics) => panic!("extraction failed:\n{diagnostics}"),
    }
}

/// Diagnostics of a failed extraction.
pub fn errors_of(source: &str) -> Diagnostics {
    match extract_stub(source) {
        Ok(stub) => panic!("expected extraction to fail, got:\n{}", stub.text),
        Err(diagnostics) => diagnostics,
    }
}

pub fn assert_stub(source: &str, expected: &str) {
    let actual = stub_of(source);
    assert_eq!(actual, expected, "\n--- actual ---\n{actual}\n--- expected ---\n{expected}");
}

/// Assert that some warning carries `code`.
pub fn assert_warns(source: &str, code: DiagnosticCode) {
    let warnings = warnings_of(source);
    assert!(
        warnings.iter().any(|w| w.code == code),
        "expected a {} warning, got {warnings:?}",
        code.as_str()
    );
}

/// Lines of `stub` starting with `prefix`, after indentation.
pub fn count_lines(stub: &str, prefix: &str) -> usize {
    stub.lines().filter(|line| line.trim_start().starts_with(prefix)).count()
}
