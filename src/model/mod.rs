//! Declaration model of one source unit.
//!
//! The walker produces it with raw annotations, the resolver filters and
//! merges it, the normalizer replaces raw annotations with [`TypeExpr`]s and
//! the serializer renders it. Children are owned by exactly one parent; a
//! class referring to itself does so by name only.

mod imports;
mod types;

pub use imports::{ImportBinding, ImportOrigin, ImportRequirement, ImportRequirements, resolve_relative};
pub use types::{Constant, LiteralKind, RawExpr, TypeExpr, TypeSlot, quote_str};

use smol_str::SmolStr;
use text_size::TextRange;

use crate::base::LineIndex;

/// One parsed file, from walk to serialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceUnit {
    /// Dotted module path, empty when unknown.
    pub module_path: String,
    /// Top-level declarations.
    pub declarations: Vec<Declaration>,
    /// Every import binding found, in source order.
    pub imports: Vec<ImportBinding>,
    /// Modules imported with `from m import *`, as written.
    pub star_imports: Vec<String>,
    /// Names listed in `__all__`, if the module defines it.
    pub export_list: Option<Vec<SmolStr>>,
    /// Imports the stub needs, filled in by normalization.
    pub requirements: ImportRequirements,
    /// Line index of the source text, for positioning diagnostics.
    pub line_index: LineIndex,
}

impl SourceUnit {
    pub fn new(module_path: impl Into<String>) -> Self {
        Self {
            module_path: module_path.into(),
            ..Self::default()
        }
    }

    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name == name)
    }
}

/// How a declaration came to be part of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Public by naming convention.
    Public,
    /// Underscore-prefixed; dropped unless retained.
    Private,
    /// Listed in `__all__`.
    Exported,
    /// Private, but referenced by the kept surface.
    Retained,
}

impl Visibility {
    pub fn is_kept(&self) -> bool {
        !matches!(self, Visibility::Private)
    }
}

/// Role of a function, classified from its decorators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[default]
    Plain,
    OverloadCandidate,
    Getter,
    Setter,
    Deleter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: SmolStr,
    /// Source order among siblings.
    pub order: usize,
    pub visibility: Visibility,
    pub role: Role,
    pub kind: DeclarationKind,
    pub range: TextRange,
}

impl Declaration {
    pub fn new(name: impl Into<SmolStr>, order: usize, kind: DeclarationKind, range: TextRange) -> Self {
        Self {
            name: name.into(),
            order,
            visibility: Visibility::Public,
            role: Role::Plain,
            kind,
            range,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Variables, aliases and type variables render before definitions.
    pub fn is_value(&self) -> bool {
        matches!(
            self.kind,
            DeclarationKind::Variable(_) | DeclarationKind::Alias(_) | DeclarationKind::TypeVar(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationKind {
    Class(ClassDecl),
    Function(FunctionDecl),
    Variable(VariableDecl),
    Property(PropertyDecl),
    Alias(AliasDecl),
    TypeVar(TypeVarDecl),
    Overloads(OverloadGroup),
}

impl DeclarationKind {
    pub fn describe(&self) -> &'static str {
        match self {
            DeclarationKind::Class(_) => "class",
            DeclarationKind::Function(_) => "function",
            DeclarationKind::Variable(_) => "variable",
            DeclarationKind::Property(_) => "property",
            DeclarationKind::Alias(_) => "type alias",
            DeclarationKind::TypeVar(_) => "type variable",
            DeclarationKind::Overloads(_) => "overloaded function",
        }
    }
}

/// A decorator as written plus its canonical path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decorator {
    /// Dotted path as written (`overload`, `typing.overload`, `prop.setter`).
    pub path: String,
    /// Path with the first segment canonicalized through import bindings.
    pub canonical: String,
    /// Rendered literal-only call arguments, `None` when not called.
    pub args: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassDecl {
    pub decorators: Vec<Decorator>,
    pub type_params: Vec<TypeParam>,
    pub bases: Vec<TypeSlot>,
    pub keywords: Vec<Keyword>,
    pub members: Vec<Declaration>,
}

/// `name=value` in a class header or a type variable call.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub name: SmolStr,
    pub value: TypeSlot,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionDecl {
    pub is_async: bool,
    pub decorators: Vec<Decorator>,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Parameter>,
    pub returns: TypeSlot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: SmolStr,
    pub kind: ParamKind,
    pub annotation: TypeSlot,
    pub has_default: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Before `/`
    PositionalOnly,
    Positional,
    /// `*args`
    VarPositional,
    /// After `*` or `*args`
    KeywordOnly,
    /// `**kwargs`
    VarKeyword,
}

impl ParamKind {
    pub fn is_positional(&self) -> bool {
        matches!(self, ParamKind::PositionalOnly | ParamKind::Positional)
    }
}

/// A PEP 695 type parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: SmolStr,
    pub kind: TypeParamKind,
    pub bound: TypeSlot,
    pub default: TypeSlot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeParamKind {
    TypeVar,
    /// `*Ts`
    TypeVarTuple,
    /// `**P`
    ParamSpec,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariableDecl {
    pub annotation: TypeSlot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub getter: FunctionDecl,
    pub setter: Option<FunctionDecl>,
    pub deleter: Option<FunctionDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AliasDecl {
    pub value: TypeSlot,
    pub form: AliasForm,
    pub type_params: Vec<TypeParam>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AliasForm {
    /// `X = int | str`
    Assignment,
    /// `X: TypeAlias = int | str`, holding the marker annotation.
    Annotated(TypeSlot),
    /// `type X = int | str`
    Statement,
}

/// `T = TypeVar("T", bound=int)` and the other factories.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeVarDecl {
    pub factory: TypeSlot,
    /// The string passed as the first argument.
    pub name_arg: String,
    pub args: Vec<TypeSlot>,
    pub keywords: Vec<Keyword>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverloadGroup {
    /// Declared signatures in source order.
    pub signatures: Vec<FunctionDecl>,
    /// An undecorated implementation followed the signatures.
    pub has_implementation: bool,
}

#[cfg(test)]
mod tests;
