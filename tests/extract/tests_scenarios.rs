//! End-to-end extraction of realistic modules.

use crate::helpers::source_fixtures::*;
use crate::helpers::stub_assertions::*;

#[test]
fn test_default_values_become_ellipsis() {
    assert_stub(ADD, "def add(x: int, y: int = ...) -> int: ...\n");
}

#[test]
fn test_class_with_only_private_helper_keeps_a_placeholder() {
    let stub = stub_of(HELPER_ONLY_CLASS);
    assert_eq!(stub, "class Worker: ...\n");
    assert!(!stub.contains("_helper"));
}

#[test]
fn test_overload_group_keeps_signatures_only() {
    let stub = stub_of(OVERLOADED);
    assert_eq!(count_lines(&stub, "def f("), 3);
    assert_eq!(count_lines(&stub, "@overload"), 3);
    assert!(!stub.contains("def f(x):"));
}

#[test]
fn test_import_block_is_sorted() {
    let stub = stub_of(ZETA_ALPHA);
    let alpha = stub.find("from alpha import First").expect("alpha import");
    let zeta = stub.find("from zeta import Last").expect("zeta import");
    assert!(alpha < zeta, "{stub}");
}

#[test]
fn test_service_module() {
    assert_stub(SERVICE_MODULE, SERVICE_STUB);
}

#[test]
fn test_empty_and_docstring_only_sources() {
    assert_stub("", "");
    assert_stub("\"\"\"Nothing to see.\"\"\"\n", "");
    assert_stub("# just a comment\n\n", "");
}

#[test]
fn test_type_checking_else_branch_is_skipped() {
    let source = "\
from typing import TYPE_CHECKING

if TYPE_CHECKING:
    from pathlib import Path
else:
    Path = str

def load(p: Path) -> bytes:
    return b''
";
    assert_stub(source, "from pathlib import Path\n\ndef load(p: Path) -> bytes: ...\n");
}

#[test]
fn test_try_handlers_are_skipped() {
    let source = "\
try:
    import ujson as json
except ImportError:
    import json

def dump(obj: json.JSONDecoder) -> str:
    return ''
";
    assert_stub(source, "import ujson as json\n\ndef dump(obj: json.JSONDecoder) -> str: ...\n");
}

#[test]
fn test_decorators_are_filtered() {
    let source = "\
import functools
from dataclasses import dataclass

@dataclass(frozen=True)
class Point:
    x: int
    y: int = 0

    @staticmethod
    def origin() -> 'Point':
        return Point(0)

    @functools.lru_cache(maxsize=None)
    def norm(self) -> float:
        return 0.0
";
    let expected = "\
from dataclasses import dataclass

@dataclass(frozen=True)
class Point:
    x: int
    y: int

    @staticmethod
    def origin() -> Point: ...
    def norm(self) -> float: ...
";
    assert_stub(source, expected);
}

#[test]
fn test_export_list_is_rendered_and_reexports_imports() {
    let source = "\
from ._impl import Engine, helper

__all__ = ['Engine', 'run']

def run() -> None:
    pass
";
    assert_stub(
        source,
        "from ._impl import Engine as Engine\n\n__all__ = [\"Engine\", \"run\"]\n\ndef run() -> None: ...\n",
    );
}

#[test]
fn test_extraction_is_deterministic() {
    let first = stub_of(SERVICE_MODULE);
    for _ in 0..4 {
        assert_eq!(stub_of(SERVICE_MODULE), first);
    }
}
