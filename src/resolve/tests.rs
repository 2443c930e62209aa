use super::*;
use crate::model::{LiteralKind, RawExpr, Role, TypeSlot};
use crate::parser::parse;
use crate::walk::walk;
use rstest::rstest;

fn resolve_source(source: &str, options: &ExtractOptions) -> (SourceUnit, Diagnostics) {
    let (unit, _) = walk(&parse(source), options);
    resolve(unit, options)
}

fn resolved(source: &str) -> SourceUnit {
    resolve_source(source, &ExtractOptions::default()).0
}

fn retaining(source: &str) -> SourceUnit {
    resolve_source(source, &ExtractOptions::default().with_retained_references(true)).0
}

fn names(declarations: &[Declaration]) -> Vec<&str> {
    declarations.iter().map(|d| d.name.as_str()).collect()
}

fn members<'a>(unit: &'a SourceUnit, class: &str) -> &'a [Declaration] {
    match unit.declaration(class).map(|d| &d.kind) {
        Some(DeclarationKind::Class(class)) => &class.members,
        other => panic!("expected class, got {other:?}"),
    }
}

#[test]
fn test_overloads_merge_with_implementation() {
    let unit = resolved(
        "from typing import overload\n\
         @overload\ndef f(x: int) -> int: ...\n\
         @overload\ndef f(x: str) -> str: ...\n\
         @overload\ndef f(x: bytes) -> bytes: ...\n\
         def f(x): return x\n",
    );
    assert_eq!(names(&unit.declarations), vec!["f"]);
    let DeclarationKind::Overloads(group) = &unit.declarations[0].kind else {
        panic!("expected overloads");
    };
    assert_eq!(group.signatures.len(), 3);
    assert!(group.has_implementation);
}

#[test]
fn test_overloads_without_implementation() {
    let unit = resolved(
        "import typing\n\
         @typing.overload\ndef f(x: int) -> int: ...\n\
         @typing.overload\ndef f(x: str) -> str: ...\n",
    );
    let DeclarationKind::Overloads(group) = &unit.declarations[0].kind else {
        panic!("expected overloads");
    };
    assert_eq!(group.signatures.len(), 2);
    assert!(!group.has_implementation);
}

#[test]
fn test_function_after_implementation_shadows_group() {
    let unit = resolved(
        "from typing import overload\n\
         @overload\ndef f(x: int) -> int: ...\n\
         def f(x): ...\n\
         def f(y): ...\n",
    );
    assert!(matches!(unit.declarations[0].kind, DeclarationKind::Function(_)));
    assert_eq!(unit.declarations[0].order, 2);
}

#[test]
fn test_property_accessors_merge() {
    let unit = resolved(
        "class C:\n\
         \x20   @property\n    def value(self) -> int: ...\n\
         \x20   @value.setter\n    def value(self, v: int) -> None: ...\n\
         \x20   @value.deleter\n    def value(self) -> None: ...\n",
    );
    let members = members(&unit, "C");
    assert_eq!(names(members), vec!["value"]);
    let DeclarationKind::Property(property) = &members[0].kind else {
        panic!("expected property, got {:?}", members[0].kind);
    };
    assert!(property.setter.is_some());
    assert!(property.deleter.is_some());
}

#[test]
fn test_setter_without_property_is_plain() {
    let unit = resolved("class C:\n    @value.setter\n    def value(self, v): ...\n");
    let members = members(&unit, "C");
    assert_eq!(members[0].role, Role::Plain);
    assert!(matches!(members[0].kind, DeclarationKind::Function(_)));
}

#[test]
fn test_later_declaration_shadows() {
    let unit = resolved("def f(): ...\nclass g: ...\nf = 1\n");
    assert_eq!(names(&unit.declarations), vec!["f", "g"]);
    assert_eq!(
        unit.declarations[0].kind,
        DeclarationKind::Variable(crate::model::VariableDecl {
            annotation: TypeSlot::Inferred(LiteralKind::Int)
        })
    );
}

#[test]
fn test_reassignment_keeps_annotation() {
    let unit = resolved("x: int\nx = 5\n");
    let DeclarationKind::Variable(variable) = &unit.declarations[0].kind else {
        panic!("expected variable");
    };
    assert_eq!(variable.annotation, TypeSlot::Raw(RawExpr::Name("int".into())));
}

#[rstest]
#[case("def _private(): ...\ndef public(): ...\n", vec!["public"])]
#[case("_x = 1\nx = 2\n", vec!["x"])]
#[case("__all__ = ['_private']\ndef _private(): ...\ndef public(): ...\n", vec!["public", "_private"])]
#[case("class __Mangled: ...\n", vec![])]
fn test_module_visibility(#[case] source: &str, #[case] expected: Vec<&str>) {
    let unit = resolved(source);
    let mut actual = names(&unit.declarations);
    actual.sort();
    let mut expected = expected;
    expected.sort();
    assert_eq!(actual, expected);
}

#[test]
fn test_class_member_visibility() {
    let unit = resolved(
        "class C:\n    def __init__(self): ...\n    def __repr__(self): ...\n    def _helper(self): ...\n",
    );
    assert_eq!(names(members(&unit, "C")), vec!["__init__", "__repr__"]);
}

#[test]
fn test_class_with_only_private_members_is_empty() {
    let unit = resolved("class C:\n    def _helper(self): ...\n");
    assert!(members(&unit, "C").is_empty());
}

#[test]
fn test_include_private_keeps_everything() {
    let options = ExtractOptions::default().with_private(true);
    let (unit, _) = resolve_source("def _a(): ...\nclass C:\n    def _b(self): ...\n", &options);
    assert_eq!(names(&unit.declarations), vec!["_a", "C"]);
    assert_eq!(names(members(&unit, "C")), vec!["_b"]);
}

#[rstest]
#[case("from typing import TypeVar\n_T = TypeVar('_T')\ndef first(x: list[_T]) -> _T: ...\n", "_T")]
#[case("_A = int\n_B = list[_A]\nvalue: _B\n", "_A")]
#[case("class _Node: ...\ndef walk(node: '_Node') -> None: ...\n", "_Node")]
#[case("class _Base: ...\nclass Public(_Base): ...\n", "_Base")]
fn test_referenced_private_is_retained(#[case] source: &str, #[case] retained: &str) {
    let unit = retaining(source);
    let declaration = unit.declaration(retained).unwrap();
    assert_eq!(declaration.visibility, Visibility::Retained);
    assert!(resolved(source).declaration(retained).is_none());
}

#[test]
fn test_private_referenced_only_by_dropped_is_dropped() {
    let unit = retaining("class _Node: ...\ndef _walk(node: _Node) -> None: ...\n");
    assert!(unit.declarations.is_empty());
}

#[test]
fn test_literal_values_do_not_retain() {
    let unit = retaining("_mode = 1\nMode = Literal['_mode']\n");
    assert_eq!(names(&unit.declarations), vec!["Mode"]);
}

#[test]
fn test_exported_import_is_reexported() {
    let unit = resolved("from pkg import helper, other\n__all__ = ['helper']\n");
    let flags: Vec<(&str, bool)> = unit.imports.iter().map(|b| (b.local.as_str(), b.reexported)).collect();
    assert_eq!(flags, vec![("helper", true), ("other", false)]);
}

#[test]
fn test_missing_export_warns() {
    let (_, diagnostics) = resolve_source("__all__ = ['missing', 'present']\npresent = 1\n", &ExtractOptions::default());
    let messages: Vec<_> = diagnostics.iter().map(|d| (d.code, d.message.clone())).collect();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, DiagnosticCode::ExportList);
    assert!(messages[0].1.contains("missing"));
}

#[test]
fn test_star_import_silences_missing_export() {
    let (_, diagnostics) = resolve_source("from pkg import *\n__all__ = ['anything']\n", &ExtractOptions::default());
    assert!(diagnostics.is_empty());
}

#[test]
fn test_export_list_is_deduplicated() {
    let unit = resolved("__all__ = ['a', 'a']\n__all__ += ['b']\na = 1\nb = 2\n");
    let exports: Vec<&str> = unit.export_list.iter().flatten().map(SmolStr::as_str).collect();
    assert_eq!(exports, vec!["a", "b"]);
}

#[test]
fn test_values_order_before_definitions() {
    let unit = resolved("def f(): ...\nx = 1\nclass C:\n    def m(self): ...\n    attr: int\ny: int\n");
    assert_eq!(names(&unit.declarations), vec!["x", "y", "f", "C"]);
    assert_eq!(names(members(&unit, "C")), vec!["attr", "m"]);
}
