//! Names a declaration refers to, for keeping private helpers alive.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::model::{AliasForm, Declaration, DeclarationKind, Decorator, FunctionDecl, RawExpr, TypeParam, TypeSlot};
use crate::walk::parse_annotation;

/// Collect the root names referenced by `declaration`'s annotations, bases,
/// decorators and type-variable arguments, members included.
pub fn collect(declaration: &Declaration, out: &mut FxHashSet<SmolStr>) {
    match &declaration.kind {
        DeclarationKind::Class(class) => {
            decorators(&class.decorators, out);
            type_params(&class.type_params, out);
            class.bases.iter().for_each(|base| slot(base, out));
            class.keywords.iter().for_each(|keyword| slot(&keyword.value, out));
            class.members.iter().for_each(|member| collect(member, out));
        }
        DeclarationKind::Function(function) => self::function(function, out),
        DeclarationKind::Variable(variable) => slot(&variable.annotation, out),
        DeclarationKind::Property(property) => {
            self::function(&property.getter, out);
            property.setter.iter().chain(&property.deleter).for_each(|f| self::function(f, out));
        }
        DeclarationKind::Alias(alias) => {
            slot(&alias.value, out);
            if let AliasForm::Annotated(marker) = &alias.form {
                slot(marker, out);
            }
            type_params(&alias.type_params, out);
        }
        DeclarationKind::TypeVar(type_var) => {
            slot(&type_var.factory, out);
            type_var.args.iter().for_each(|arg| slot(arg, out));
            type_var.keywords.iter().for_each(|keyword| slot(&keyword.value, out));
        }
        DeclarationKind::Overloads(group) => group.signatures.iter().for_each(|f| self::function(f, out)),
    }
}

fn function(function: &FunctionDecl, out: &mut FxHashSet<SmolStr>) {
    decorators(&function.decorators, out);
    type_params(&function.type_params, out);
    function.params.iter().for_each(|param| slot(&param.annotation, out));
    slot(&function.returns, out);
}

fn decorators(decorators: &[Decorator], out: &mut FxHashSet<SmolStr>) {
    for decorator in decorators {
        if let Some(root) = decorator.path.split('.').next() {
            out.insert(root.into());
        }
    }
}

fn type_params(params: &[TypeParam], out: &mut FxHashSet<SmolStr>) {
    for param in params {
        slot(&param.bound, out);
        slot(&param.default, out);
    }
}

fn slot(slot: &TypeSlot, out: &mut FxHashSet<SmolStr>) {
    if let TypeSlot::Raw(expr) = slot {
        raw(expr, out);
    }
}

fn raw(expr: &RawExpr, out: &mut FxHashSet<SmolStr>) {
    match expr {
        RawExpr::Name(name) => {
            out.insert(name.clone());
        }
        RawExpr::Attribute(base, _) => raw(base, out),
        RawExpr::Subscript(base, items) => {
            raw(base, out);
            // `Literal["_x"]` holds values, not annotations.
            let literal = base
                .dotted_path()
                .is_some_and(|path| path == "Literal" || path.ends_with(".Literal"));
            if !literal {
                items.iter().for_each(|item| raw(item, out));
            }
        }
        RawExpr::Tuple(items) | RawExpr::List(items) => items.iter().for_each(|item| raw(item, out)),
        RawExpr::BitOr(lhs, rhs) => {
            raw(lhs, out);
            raw(rhs, out);
        }
        RawExpr::Str(text) => {
            if let Some(parsed) = parse_annotation(text) {
                raw(&parsed, out);
            }
        }
        RawExpr::Bytes(_) | RawExpr::Number(_) | RawExpr::Const(_) | RawExpr::Unsupported(_) => {}
    }
}
