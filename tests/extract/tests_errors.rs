//! Fatal errors and warnings.

use rstest::rstest;
use stub_extractor::{DiagnosticCode, Severity};

use crate::helpers::stub_assertions::*;

#[rstest]
#[case("def f(:\n    pass\n", 0)]
#[case("x = 1\nclass\n", 1)]
fn test_syntax_error_fails_with_position(#[case] source: &str, #[case] line: u32) {
    let diagnostics = errors_of(source);
    let error = diagnostics.errors().next().expect("an error");
    assert_eq!(error.code, DiagnosticCode::Syntax);
    assert_eq!(error.position.map(|p| p.line), Some(line));
}

#[test]
fn test_only_the_first_syntax_error_is_reported() {
    let diagnostics = errors_of("def f(:\n    pass\ndef g(:\n    pass\n");
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn test_import_collision_reports_both_origins() {
    let source = "\
from json import loads as parse
from yaml import safe_load as parse

def read(text: str) -> parse:
    pass
";
    let diagnostics = errors_of(source);
    let error = diagnostics.errors().next().expect("an error");
    assert_eq!(error.code, DiagnosticCode::ImportCollision);
    assert_eq!(error.severity, Severity::Error);
    assert!(error.message.contains("json.loads"), "{}", error.message);
    assert!(error.message.contains("yaml.safe_load"), "{}", error.message);
}

#[test]
fn test_unused_conflicting_imports_are_fine() {
    let source = "from json import loads as parse\nfrom yaml import safe_load as parse\n\nx: int\n";
    assert_stub(source, "x: int\n");
}

#[test]
fn test_unresolved_reference_is_a_forward_reference() {
    let source = "def f(node: Node) -> None:\n    pass\n";
    assert_stub(source, "def f(node: \"Node\") -> None: ...\n");
    let warnings = warnings_of(source);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, DiagnosticCode::UnresolvedReference);
    assert_eq!(warnings[0].position.map(|p| p.line), Some(0));
}

#[test]
fn test_star_import_silences_unresolved_references() {
    let source = "from shapes import *\n\ndef area(s: Shape) -> float:\n    return 0.0\n";
    assert_stub(source, "from shapes import *\n\ndef area(s: Shape) -> float: ...\n");
    assert!(warnings_of(source).is_empty());
}

#[rstest]
#[case("x: make_type()\n", DiagnosticCode::Unsupported)]
#[case("__all__ = names()\n", DiagnosticCode::ExportList)]
#[case("__all__ = ['missing']\n", DiagnosticCode::ExportList)]
#[case("x = []  # type: list[int]\n", DiagnosticCode::Unsupported)]
fn test_recoverable_problems_warn(#[case] source: &str, #[case] code: DiagnosticCode) {
    assert_warns(source, code);
}

#[test]
fn test_unsupported_annotation_is_omitted() {
    assert_stub("x: make_type()\n", "x = ...\n");
}

#[rstest]
#[case("import sys\n__version__ = sys.version[:3]\n", "__version__ = ...\n")]
#[case("import numpy as np\n\nx: dict[np.int64, make()]\n", "x = ...\n")]
fn test_failed_annotation_requires_no_import(#[case] source: &str, #[case] expected: &str) {
    assert_stub(source, expected);
    assert_stub(expected, expected);
}

#[test]
fn test_declared_export_list_without_value_warns() {
    assert_warns("__all__: list[str]\n", DiagnosticCode::ExportList);
}
