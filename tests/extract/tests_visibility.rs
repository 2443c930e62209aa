//! Which declarations reach the stub.

use rstest::rstest;
use stub_extractor::DiagnosticCode;

use crate::helpers::stub_assertions::*;

#[rstest]
#[case("_private = 1\n")]
#[case("def _private() -> None:\n    pass\n")]
#[case("class _Private:\n    pass\n")]
#[case("__mangled = 2\n")]
fn test_private_module_names_are_dropped(#[case] source: &str) {
    assert_stub(source, "");
}

#[test]
fn test_exported_private_name_is_kept() {
    let source = "__all__ = ['_private']\n_private = 1\n";
    assert_stub(source, "__all__ = [\"_private\"]\n\n_private: int\n");
}

#[test]
fn test_public_dunders_are_kept_on_classes() {
    let source = "\
class Money:
    def __init__(self, cents: int) -> None:
        self.cents = cents

    def __add__(self, other: 'Money') -> 'Money':
        return Money(self.cents + other.cents)

    def __secret__(self):
        pass

    def _round(self):
        pass
";
    let stub = stub_of(source);
    assert!(stub.contains("def __init__(self, cents: int) -> None: ..."), "{stub}");
    assert!(stub.contains("def __add__(self, other: Money) -> Money: ..."), "{stub}");
    assert!(!stub.contains("__secret__"));
    assert!(!stub.contains("_round"));
}

const USES_PRIVATES: &str = "\
from typing import TypeVar

_T = TypeVar('_T')
_Key = str

class _Base:
    pass

class Store(_Base):
    def get(self, key: _Key, default: _T) -> _T:
        return default
";

#[test]
fn test_private_names_used_by_the_surface_stay_private() {
    let stub = stub_of(USES_PRIVATES);
    assert!(stub.contains("class Store(_Base):"), "{stub}");
    for hidden in ["TypeVar", "_T =", "_Key =", "class _Base"] {
        assert!(!stub.contains(hidden), "{hidden} leaked into:\n{stub}");
    }
    assert_warns(USES_PRIVATES, DiagnosticCode::UnresolvedReference);
}

#[test]
fn test_retain_referenced_keeps_used_privates() {
    let expected = "\
from typing import TypeVar

_T = TypeVar(\"_T\")
_Key = str

class _Base: ...

class Store(_Base):
    def get(self, key: _Key, default: _T) -> _T: ...
";
    assert_eq!(stub_retaining(USES_PRIVATES), expected);
}

#[test]
fn test_include_private_keeps_everything() {
    let stub = stub_with_private("_a = 1\n\nclass K:\n    def _m(self):\n        pass\n");
    assert_eq!(stub, "_a: int\n\nclass K:\n    def _m(self): ...\n");
}
