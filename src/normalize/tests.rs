use super::*;
use crate::model::{Declaration, DeclarationKind, ImportRequirement, TypeSlot};
use crate::parser::parse;
use crate::resolve::resolve;
use crate::walk::walk;
use rstest::rstest;

fn normalized(source: &str) -> (SourceUnit, Result<Diagnostics, Diagnostics>) {
    let options = ExtractOptions::default();
    let (unit, _) = walk(&parse(source), &options);
    let (mut unit, _) = resolve(unit, &options);
    let result = normalize_unit(&mut unit, &options);
    (unit, result)
}

fn variable_type(declaration: &Declaration) -> String {
    match &declaration.kind {
        DeclarationKind::Variable(variable) => match &variable.annotation {
            TypeSlot::Resolved(ty) => ty.to_string(),
            other => format!("{other:?}"),
        },
        other => panic!("expected variable, got {other:?}"),
    }
}

fn type_of(source: &str, name: &str) -> String {
    let (unit, result) = normalized(source);
    assert!(result.is_ok(), "{result:?}");
    variable_type(unit.declaration(name).unwrap())
}

fn requirements(unit: &SourceUnit) -> Vec<String> {
    unit.requirements
        .iter()
        .map(|r: &ImportRequirement| match (&r.name, &r.alias) {
            (None, None) => format!("import {}", r.module),
            (None, Some(alias)) => format!("import {} as {alias}", r.module),
            (Some(name), None) => format!("from {} import {name}", r.module),
            (Some(name), Some(alias)) => format!("from {} import {name} as {alias}", r.module),
        })
        .collect()
}

#[rstest]
#[case("x: int\n", "int")]
#[case("from typing import Optional\nx: Optional[int]\n", "int | None")]
#[case("from typing import Union\nx: Union[int, Union[str, int]]\n", "int | str")]
#[case("from typing import Union\nx: Union[int]\n", "int")]
#[case("x: int | None | int\n", "int | None")]
#[case("import typing\nx: typing.Optional[typing.Optional[str]]\n", "str | None")]
#[case("from typing import Literal\nx: Literal['a', 1, None]\n", "Literal[\"a\", 1, None]")]
#[case("from typing import Literal\nx: Literal[Literal[1], 2]\n", "Literal[1, 2]")]
#[case("from typing import Annotated\nx: Annotated[int, 'meta']\n", "int")]
#[case("from collections.abc import Callable\nx: Callable[[int, str], bool]\n", "Callable[[int, str], bool]")]
#[case("from typing import Callable\nx: Callable[..., None]\n", "Callable[..., None]")]
#[case("x: dict[str, list[int]]\n", "dict[str, list[int]]")]
#[case("x: tuple[()]\n", "tuple[()]")]
#[case("x: tuple[int, ...]\n", "tuple[int, ...]")]
#[case("class Node: ...\nx: 'list[Node]'\n", "list[Node]")]
#[case("x: 'Missing'\n", "\"Missing\"")]
#[case("x: Foo[int]\n", "\"Foo[int]\"")]
#[case("x: list[Missing]\n", "list[\"Missing\"]")]
fn test_normalized_types(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(type_of(source, "x"), expected);
}

#[test]
fn test_builtins_need_no_imports() {
    let (unit, result) = normalized("def f(x: int, *args: str, **kwargs: object) -> bytes: ...\n");
    assert!(result.unwrap().is_empty());
    assert!(unit.requirements.is_empty());
}

#[test]
fn test_special_forms_that_disappear_need_no_imports() {
    let (unit, _) = normalized("from typing import Annotated, Optional, Union\nx: Optional[Union[int, Annotated[str, 1]]]\n");
    assert!(unit.requirements.is_empty());
}

#[test]
fn test_imported_names_are_required() {
    let (unit, _) = normalized(
        "import typing\nimport numpy as np\nfrom os import path as p, sep\n\
         x: typing.Any\ny: np.ndarray\nz: p.PathLike\n",
    );
    assert_eq!(
        requirements(&unit),
        vec!["import numpy as np", "from os import path as p", "import typing"]
    );
}

#[test]
fn test_reexported_imports_are_required_unused() {
    let (unit, _) = normalized("from pkg import helper as helper\nimport json as json\n");
    assert_eq!(
        requirements(&unit),
        vec!["import json as json", "from pkg import helper as helper"]
    );
}

#[test]
fn test_unresolved_reference_warns() {
    let (_, result) = normalized("x: Missing\n");
    let diagnostics = result.unwrap();
    let codes: Vec<_> = diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![DiagnosticCode::UnresolvedReference]);
    assert_eq!(diagnostics.iter().next().unwrap().position.map(|p| p.line), Some(0));
}

#[test]
fn test_star_import_resolves_anything() {
    let (unit, result) = normalized("from shapes import *\nx: Circle\n");
    assert!(result.unwrap().is_empty());
    assert_eq!(variable_type(unit.declaration("x").unwrap()), "Circle");
    assert_eq!(unit.requirements.stars().collect::<Vec<_>>(), vec!["shapes"]);
}

#[test]
fn test_conflicting_imports_collide() {
    let (_, result) = normalized(
        "import sys\n\
         if sys.version_info >= (3, 8):\n    from typing import Literal\n\
         else:\n    from typing_extensions import Literal\n\
         x: Literal[1]\ny: Literal[2]\n",
    );
    let diagnostics = result.unwrap_err();
    let errors: Vec<_> = diagnostics.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, DiagnosticCode::ImportCollision);
    assert!(errors[0].message.contains("typing.Literal"));
    assert!(errors[0].message.contains("typing_extensions.Literal"));
}

#[test]
fn test_unused_conflicting_imports_are_fine() {
    let (_, result) = normalized(
        "try:\n    from json import loads\nfinally:\n    from simplejson import loads\n",
    );
    assert!(result.is_ok());
}

#[test]
fn test_unsupported_annotation_becomes_unknown() {
    let (unit, result) = normalized("x: make_type()\n");
    let DeclarationKind::Variable(variable) = &unit.declaration("x").unwrap().kind else {
        panic!("expected variable");
    };
    assert_eq!(variable.annotation, TypeSlot::Unknown);
    let codes: Vec<_> = result.unwrap().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![DiagnosticCode::Unsupported]);
}

#[test]
fn test_scoped_names_resolve() {
    let (_, result) = normalized(
        "class Outer:\n    class Inner: ...\n    def make(self) -> Inner: ...\n\
         def first[T](items: list[T]) -> T: ...\n\
         type Pair[K, V] = tuple[K, V]\n",
    );
    assert!(result.unwrap().is_empty());
}

#[test]
fn test_setter_type_mismatch_warns() {
    let (_, result) = normalized(
        "class C:\n\
         \x20   @property\n    def value(self) -> int: ...\n\
         \x20   @value.setter\n    def value(self, v: str) -> None: ...\n",
    );
    let codes: Vec<_> = result.unwrap().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![DiagnosticCode::SetterTypeMismatch]);
}

#[test]
fn test_decorators_require_imports() {
    let (unit, _) = normalized("from dataclasses import dataclass\n@dataclass\nclass Point:\n    x: int\n");
    assert_eq!(requirements(&unit), vec!["from dataclasses import dataclass"]);
}
