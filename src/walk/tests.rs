use super::*;
use crate::diagnostics::DiagnosticCode;
use crate::model::{
    AliasForm, Constant, Declaration, DeclarationKind, ImportOrigin, LiteralKind, ParamKind, RawExpr, Role, TypeSlot,
    Visibility,
};
use crate::parser::parse;
use rstest::rstest;

fn walk_source(source: &str) -> (SourceUnit, Diagnostics) {
    let parsed = parse(source);
    assert!(parsed.ok(), "errors: {:?}", parsed.errors);
    walk(&parsed, &ExtractOptions::default())
}

fn names(declarations: &[Declaration]) -> Vec<&str> {
    declarations.iter().map(|d| d.name.as_str()).collect()
}

fn raw_name(text: &str) -> TypeSlot {
    TypeSlot::Raw(RawExpr::Name(text.into()))
}

#[test]
fn test_walk_function_signature() {
    let (unit, _) = walk_source("async def f(a, b: int, /, c=1, *args: str, d, e: bool = True, **kw) -> None: ...\n");
    let DeclarationKind::Function(func) = &unit.declarations[0].kind else {
        panic!("expected function");
    };
    assert!(func.is_async);
    let kinds: Vec<_> = func.params.iter().map(|p| (p.name.as_str(), p.kind, p.has_default)).collect();
    assert_eq!(
        kinds,
        vec![
            ("a", ParamKind::PositionalOnly, false),
            ("b", ParamKind::PositionalOnly, false),
            ("c", ParamKind::Positional, true),
            ("args", ParamKind::VarPositional, false),
            ("d", ParamKind::KeywordOnly, false),
            ("e", ParamKind::KeywordOnly, true),
            ("kw", ParamKind::VarKeyword, false),
        ]
    );
    assert_eq!(func.params[1].annotation, raw_name("int"));
    assert_eq!(func.params[0].annotation, TypeSlot::Absent);
    assert_eq!(func.returns, TypeSlot::Raw(RawExpr::Const(Constant::None)));
}

#[test]
fn test_walk_bare_star_makes_keyword_only() {
    let (unit, _) = walk_source("def f(a, *, b): ...\n");
    let DeclarationKind::Function(func) = &unit.declarations[0].kind else {
        panic!("expected function");
    };
    assert_eq!(func.params.len(), 2);
    assert_eq!(func.params[1].kind, ParamKind::KeywordOnly);
}

#[test]
fn test_walk_class_members_and_header() {
    let source = "\
class A(Base, metaclass=Meta, total=False):
    '''Docs.'''
    x: int
    y = 1

    def method(self) -> str:
        return ''

    class Inner:
        pass
";
    let (unit, _) = walk_source(source);
    let DeclarationKind::Class(class) = &unit.declarations[0].kind else {
        panic!("expected class");
    };
    assert_eq!(class.bases, vec![raw_name("Base")]);
    assert_eq!(class.keywords.len(), 2);
    assert_eq!(class.keywords[0].value, raw_name("Meta"));
    assert_eq!(
        class.keywords[1].value,
        TypeSlot::Resolved(crate::model::TypeExpr::Constant("False".into()))
    );
    assert_eq!(names(&class.members), vec!["x", "y", "method", "Inner"]);
    let orders: Vec<_> = class.members.iter().map(|d| d.order).collect();
    assert_eq!(orders, vec![0, 1, 2, 3]);
}

#[rstest]
#[case("x = 1\n", TypeSlot::Inferred(LiteralKind::Int))]
#[case("x = -1\n", TypeSlot::Inferred(LiteralKind::Int))]
#[case("x = True\n", TypeSlot::Inferred(LiteralKind::Bool))]
#[case("x = 'a' 'b'\n", TypeSlot::Inferred(LiteralKind::Str))]
#[case("x = None\n", TypeSlot::Inferred(LiteralKind::None))]
#[case("x = 1.5\n", TypeSlot::Unknown)]
#[case("x = [1, 2]\n", TypeSlot::Unknown)]
#[case("x = compute()\n", TypeSlot::Unknown)]
#[case("x: int = compute()\n", raw_name("int"))]
fn test_walk_variable_types(#[case] source: &str, #[case] expected: TypeSlot) {
    let (unit, _) = walk_source(source);
    let DeclarationKind::Variable(var) = &unit.declarations[0].kind else {
        panic!("expected variable, got {:?}", unit.declarations[0].kind);
    };
    assert_eq!(var.annotation, expected);
}

#[rstest]
#[case("Alias = int | None\n", AliasForm::Assignment)]
#[case("Alias = Dict[str, int]\n", AliasForm::Assignment)]
#[case("type Alias = int\n", AliasForm::Statement)]
#[case(
    "from typing import TypeAlias\nAlias: TypeAlias = 'int'\n",
    AliasForm::Annotated(raw_name("TypeAlias"))
)]
fn test_walk_aliases(#[case] source: &str, #[case] form: AliasForm) {
    let (unit, _) = walk_source(source);
    let DeclarationKind::Alias(alias) = &unit.declarations[0].kind else {
        panic!("expected alias, got {:?}", unit.declarations[0].kind);
    };
    assert_eq!(alias.form, form);
}

#[test]
fn test_walk_type_var() {
    let (unit, _) = walk_source("import typing\nT = typing.TypeVar('T', int, str, covariant=True)\n");
    let DeclarationKind::TypeVar(type_var) = &unit.declarations[0].kind else {
        panic!("expected type variable");
    };
    assert_eq!(type_var.name_arg, "T");
    assert_eq!(type_var.args, vec![raw_name("int"), raw_name("str")]);
    assert_eq!(type_var.keywords[0].name, "covariant");
}

#[test]
fn test_walk_unimported_type_var_is_a_variable() {
    let (unit, _) = walk_source("T = TypeVar('T')\n");
    assert!(matches!(unit.declarations[0].kind, DeclarationKind::Variable(_)));
}

#[test]
fn test_walk_tuple_targets() {
    let (unit, _) = walk_source("a, b = 1, 'x'\nc = d = True\ne, f = compute()\n");
    assert_eq!(names(&unit.declarations), vec!["a", "b", "c", "d", "e", "f"]);
    let DeclarationKind::Variable(b) = &unit.declarations[1].kind else {
        panic!("expected variable");
    };
    assert_eq!(b.annotation, TypeSlot::Inferred(LiteralKind::Str));
    let DeclarationKind::Variable(e) = &unit.declarations[4].kind else {
        panic!("expected variable");
    };
    assert_eq!(e.annotation, TypeSlot::Unknown);
}

#[test]
fn test_walk_imports() {
    let (unit, _) = walk_source("import os.path\nimport numpy as np\nfrom .util import helper as helper\nfrom m import *\n");
    let locals: Vec<_> = unit.imports.iter().map(|b| b.local.as_str()).collect();
    assert_eq!(locals, vec!["os", "np", "helper"]);
    assert_eq!(
        unit.imports[0].origin,
        ImportOrigin::Module {
            module: "os.path".into(),
            aliased: false
        }
    );
    assert!(unit.imports[2].reexported);
    assert_eq!(
        unit.imports[2].origin,
        ImportOrigin::Member {
            module: ".util".into(),
            name: "helper".into()
        }
    );
    assert_eq!(unit.star_imports, vec!["m".to_string()]);
}

#[rstest]
#[case("from typing import TYPE_CHECKING\nif TYPE_CHECKING:\n    a = 1\nelse:\n    b = 1\n", vec!["a"])]
#[case("import typing\nif typing.TYPE_CHECKING:\n    a = 1\nelse:\n    b = 1\n", vec!["a"])]
#[case("if not TYPE_CHECKING:\n    a = 1\nelse:\n    b = 1\n", vec!["b"])]
#[case("if x:\n    a = 1\nelif y:\n    b = 1\nelse:\n    c = 1\n", vec!["a", "b", "c"])]
#[case("try:\n    a = 1\nexcept E:\n    b = 1\nelse:\n    c = 1\nfinally:\n    d = 1\n", vec!["a", "c", "d"])]
#[case("for i in x:\n    a = 1\nwith f:\n    b = 1\n", vec![])]
fn test_walk_visible_branches(#[case] source: &str, #[case] expected: Vec<&str>) {
    let (unit, _) = walk_source(source);
    assert_eq!(names(&unit.declarations), expected);
}

#[test]
fn test_walk_type_checking_imports_are_bindings() {
    let (unit, _) = walk_source("from typing import TYPE_CHECKING\nif TYPE_CHECKING:\n    from a import B\n");
    assert!(unit.imports.iter().any(|b| b.local == "B"));
}

#[rstest]
#[case("from typing import overload\n@overload\ndef f(): ...\n", Role::OverloadCandidate, vec!["overload"])]
#[case("import typing as t\n@t.overload\ndef f(): ...\n", Role::OverloadCandidate, vec!["t.overload"])]
#[case("@property\ndef f(self): ...\n", Role::Getter, vec!["property"])]
#[case("@f.setter\ndef f(self, v): ...\n", Role::Setter, vec![])]
#[case("@f.deleter\ndef f(self): ...\n", Role::Deleter, vec![])]
#[case("@staticmethod\n@staticmethod\ndef f(): ...\n", Role::Plain, vec!["staticmethod"])]
#[case("@functools.wraps(g)\n@cache\ndef f(): ...\n", Role::Plain, vec![])]
fn test_walk_decorator_roles(#[case] source: &str, #[case] role: Role, #[case] kept: Vec<&str>) {
    let (unit, _) = walk_source(source);
    let declaration = &unit.declarations[0];
    assert_eq!(declaration.role, role);
    let DeclarationKind::Function(func) = &declaration.kind else {
        panic!("expected function");
    };
    let paths: Vec<_> = func.decorators.iter().map(|d| d.path.as_str()).collect();
    assert_eq!(paths, kept);
}

#[test]
fn test_walk_decorator_literal_args() {
    let (unit, _) = walk_source("from dataclasses import dataclass\n@dataclass(frozen=True, order=False)\nclass P: ...\n");
    let DeclarationKind::Class(class) = &unit.declarations[0].kind else {
        panic!("expected class");
    };
    assert_eq!(class.decorators[0].canonical, "dataclasses.dataclass");
    assert_eq!(class.decorators[0].args.as_deref(), Some("frozen=True, order=False"));
}

#[rstest]
#[case("__all__ = ['a', 'b']\n", Some(vec!["a", "b"]))]
#[case("__all__ = ('a',)\n__all__ += ['b']\n", Some(vec!["a", "b"]))]
#[case("__all__ = []\n__all__.extend(['a'])\n__all__.append('b')\n", Some(vec!["a", "b"]))]
#[case("__all__: list[str] = ['a']\n", Some(vec!["a"]))]
#[case("x = 1\n", None)]
fn test_walk_export_list(#[case] source: &str, #[case] expected: Option<Vec<&str>>) {
    let (unit, diagnostics) = walk_source(source);
    let exports = unit
        .export_list
        .as_ref()
        .map(|names| names.iter().map(|n| n.as_str()).collect::<Vec<_>>());
    assert_eq!(exports, expected);
    assert!(diagnostics.is_empty());
    assert!(unit.declaration("__all__").is_none());
}

#[rstest]
#[case("__all__ = make_names()\n")]
#[case("__all__: list[str]\n")]
#[case("__all__: list[str] = make_names()\n")]
fn test_walk_invalid_export_list_warns(#[case] source: &str) {
    let (unit, diagnostics) = walk_source(source);
    assert!(unit.export_list.is_none());
    assert_eq!(diagnostics.iter().next().map(|d| d.code), Some(DiagnosticCode::ExportList));
}

#[test]
fn test_walk_type_comment_warns() {
    let (_, diagnostics) = walk_source("x = [] # type: List[int]\ny = [] # type: ignore\n");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.iter().next().map(|d| d.code), Some(DiagnosticCode::Unsupported));
}

#[test]
fn test_walk_visibility_by_convention() {
    let (unit, _) = walk_source("def _private(): ...\ndef public(): ...\nclass C:\n    def __init__(self): ...\n");
    assert_eq!(unit.declarations[0].visibility, Visibility::Private);
    assert_eq!(unit.declarations[1].visibility, Visibility::Public);
    let DeclarationKind::Class(class) = &unit.declarations[2].kind else {
        panic!("expected class");
    };
    assert_eq!(class.members[0].visibility, Visibility::Public);
}

#[test]
fn test_walk_nested_function_bodies_are_skipped() {
    let (unit, _) = walk_source("def outer():\n    def inner(): ...\n    x = 1\n");
    assert_eq!(names(&unit.declarations), vec!["outer"]);
}
